use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{BookingStatus, User};

/// Everything a notification template needs to describe a booking.
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking_id: i64,
    pub requested_by: String,
    pub guest_house: String,
    pub room: String,
    pub bed: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub purpose: String,
}

/// Outbound notification channel (email in production). Implementations
/// may fail; the core only ever calls them through [`BestEffort`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_new_booking_alert(
        &self,
        admin: &User,
        details: &BookingDetails,
    ) -> anyhow::Result<()>;

    async fn send_booking_pending(
        &self,
        user: &User,
        details: &BookingDetails,
    ) -> anyhow::Result<()>;

    async fn send_status_changed(
        &self,
        user: &User,
        status: BookingStatus,
        acted_by: &str,
        reason: Option<&str>,
        details: &BookingDetails,
    ) -> anyhow::Result<()>;
}

/// Notifier that only logs. Stands in wherever no mail transport is
/// wired up.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_new_booking_alert(
        &self,
        admin: &User,
        details: &BookingDetails,
    ) -> anyhow::Result<()> {
        tracing::debug!(
            to = %admin.email,
            booking_id = details.booking_id,
            "new-booking alert (noop)"
        );
        Ok(())
    }

    async fn send_booking_pending(
        &self,
        user: &User,
        details: &BookingDetails,
    ) -> anyhow::Result<()> {
        tracing::debug!(
            to = %user.email,
            booking_id = details.booking_id,
            "booking-pending notice (noop)"
        );
        Ok(())
    }

    async fn send_status_changed(
        &self,
        user: &User,
        status: BookingStatus,
        _acted_by: &str,
        _reason: Option<&str>,
        details: &BookingDetails,
    ) -> anyhow::Result<()> {
        tracing::debug!(
            to = %user.email,
            booking_id = details.booking_id,
            status = status.as_str(),
            "status-changed notice (noop)"
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch: failures are logged and swallowed, never
/// surfaced. The committed booking is authoritative; notifications are
/// at-least-attempted.
pub struct BestEffort<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> BestEffort<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    pub async fn new_booking_alert(&self, admin: &User, details: &BookingDetails) {
        if let Err(err) = self.notifier.send_new_booking_alert(admin, details).await {
            tracing::warn!(
                to = %admin.email,
                booking_id = details.booking_id,
                "new-booking alert failed: {err:#}"
            );
        }
    }

    pub async fn booking_pending(&self, user: &User, details: &BookingDetails) {
        if let Err(err) = self.notifier.send_booking_pending(user, details).await {
            tracing::warn!(
                to = %user.email,
                booking_id = details.booking_id,
                "booking-pending notice failed: {err:#}"
            );
        }
    }

    pub async fn status_changed(
        &self,
        user: &User,
        status: BookingStatus,
        acted_by: &str,
        reason: Option<&str>,
        details: &BookingDetails,
    ) {
        if let Err(err) = self
            .notifier
            .send_status_changed(user, status, acted_by, reason, details)
            .await
        {
            tracing::warn!(
                to = %user.email,
                booking_id = details.booking_id,
                status = status.as_str(),
                "status-changed notice failed: {err:#}"
            );
        }
    }
}
