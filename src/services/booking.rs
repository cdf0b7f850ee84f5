use chrono::{Local, Utc};
use rusqlite::Connection;

use crate::db::queries::{self, BookingSummary};
use crate::errors::AppError;
use crate::models::{BedStatus, Booking, BookingRequest, BookingStatus, LogAction, NewBooking};
use crate::services::actor::Actor;
use crate::services::audit;
use crate::services::notify::{BestEffort, BookingDetails};
use crate::services::validation;
use crate::state::AppState;

/// Create a booking in Pending state.
///
/// Validation, the insert and the audit append run in one transaction
/// under the connection lock, so a concurrent request for the same bed
/// cannot slip between the availability check and the write. The lock is
/// released before any notification goes out.
pub async fn create_booking(
    state: &AppState,
    actor: &Actor,
    req: BookingRequest,
) -> Result<Booking, AppError> {
    let today = Local::now().date_naive();
    let now = Utc::now().naive_utc();

    let (booking, details, admins, requester) = {
        let mut conn = state.db.lock().unwrap();
        let tx = conn.transaction()?;

        let validated = validation::validate_booking_request(
            &tx,
            &req,
            today,
            state.config.booking_window_days,
        )?;

        let booking_id = queries::insert_booking(
            &tx,
            &NewBooking {
                user_id: actor.user_id,
                guest_house_id: Some(validated.guest_house.id),
                room_id: Some(validated.room.id),
                bed_id: validated.bed.as_ref().map(|b| b.id),
                start_date: req.start_date,
                end_date: req.end_date,
                purpose_of_visit: req.purpose_of_visit.clone(),
                status: BookingStatus::Pending,
                created_at: now,
                created_by: Some(actor.display_name.clone()),
            },
        )?;

        let bed_label = validated
            .bed
            .as_ref()
            .map(|b| b.label.as_str())
            .unwrap_or("N/A");
        let detail = format!(
            "Booking created by {} | GH: {}, Room: {}, Bed: {}, Dates: {} -> {}",
            actor.display_name,
            validated.guest_house.name,
            validated.room.room_number,
            bed_label,
            req.start_date,
            req.end_date,
        );
        audit::append(
            &tx,
            audit::LOG_TYPE_BOOKING,
            LogAction::Create,
            &detail,
            actor,
            Some(booking_id),
            now,
        )?;

        tx.commit()?;

        let booking = queries::get_booking(&conn, booking_id)?.ok_or_else(|| {
            AppError::Database(format!("booking {booking_id} missing after insert"))
        })?;
        let details = booking_details(&conn, &booking)?;
        let admins = queries::list_admins(&conn, false)?;
        let requester = match actor.user_id {
            Some(id) => queries::get_user(&conn, id, false)?,
            None => None,
        };
        (booking, details, admins, requester)
    };

    tracing::info!(booking_id = booking.id, "booking created (pending)");

    let notify = BestEffort::new(state.notifier.as_ref());
    for admin in &admins {
        notify.new_booking_alert(admin, &details).await;
    }
    if let Some(user) = &requester {
        notify.booking_pending(user, &details).await;
    }

    Ok(booking)
}

/// Transition a Pending booking to Accepted and mark its bed Occupied,
/// atomically with the audit entry.
pub async fn accept_booking(
    state: &AppState,
    actor: &Actor,
    booking_id: i64,
) -> Result<Booking, AppError> {
    let now = Utc::now().naive_utc();

    let (booking, details, recipient) = {
        let mut conn = state.db.lock().unwrap();
        let tx = conn.transaction()?;

        let booking = queries::get_booking(&tx, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        if booking.status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "only pending bookings can be accepted (booking {booking_id} is {})",
                booking.status.as_str()
            )));
        }

        // Several pending requests may target the same bed; re-check under
        // the transaction that none of them was accepted for these dates.
        if let Some(bed_id) = booking.bed_id {
            if queries::bed_has_accepted_overlap(
                &tx,
                bed_id,
                booking.id,
                booking.start_date,
                booking.end_date,
            )? {
                return Err(AppError::Conflict(format!(
                    "bed {bed_id} is already booked for overlapping dates"
                )));
            }
        }

        let transitioned = queries::transition_booking_status(
            &tx,
            booking.id,
            BookingStatus::Pending,
            BookingStatus::Accepted,
            &actor.display_name,
            now,
        )?;
        if !transitioned {
            return Err(AppError::Conflict(format!(
                "booking {booking_id} was modified concurrently"
            )));
        }

        if let Some(bed_id) = booking.bed_id {
            queries::set_bed_status(&tx, bed_id, BedStatus::Occupied, now)?;
        }

        let detail = format!(
            "Booking accepted by {} | Dates: {} -> {}",
            actor.display_name, booking.start_date, booking.end_date,
        );
        audit::append(
            &tx,
            audit::LOG_TYPE_BOOKING,
            LogAction::Update,
            &detail,
            actor,
            Some(booking.id),
            now,
        )?;

        tx.commit()?;

        let booking = queries::get_booking(&conn, booking_id)?.ok_or_else(|| {
            AppError::Database(format!("booking {booking_id} missing after update"))
        })?;
        let details = booking_details(&conn, &booking)?;
        let recipient = match booking.user_id {
            Some(id) => queries::get_user(&conn, id, false)?,
            None => None,
        };
        (booking, details, recipient)
    };

    tracing::info!(booking_id = booking.id, "booking accepted");

    if let Some(user) = &recipient {
        BestEffort::new(state.notifier.as_ref())
            .status_changed(
                user,
                BookingStatus::Accepted,
                &actor.display_name,
                None,
                &details,
            )
            .await;
    }

    Ok(booking)
}

/// Transition a Pending booking to Rejected. The bed is left untouched;
/// the reason lands in the audit detail and the notification.
pub async fn reject_booking(
    state: &AppState,
    actor: &Actor,
    booking_id: i64,
    reason: &str,
) -> Result<Booking, AppError> {
    let now = Utc::now().naive_utc();

    let (booking, details, recipient) = {
        let mut conn = state.db.lock().unwrap();
        let tx = conn.transaction()?;

        let booking = queries::get_booking(&tx, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        if booking.status != BookingStatus::Pending {
            return Err(AppError::InvalidTransition(format!(
                "only pending bookings can be rejected (booking {booking_id} is {})",
                booking.status.as_str()
            )));
        }

        let transitioned = queries::transition_booking_status(
            &tx,
            booking.id,
            BookingStatus::Pending,
            BookingStatus::Rejected,
            &actor.display_name,
            now,
        )?;
        if !transitioned {
            return Err(AppError::Conflict(format!(
                "booking {booking_id} was modified concurrently"
            )));
        }

        let detail = format!(
            "Booking rejected by {} | Reason: {reason} | Dates: {} -> {}",
            actor.display_name, booking.start_date, booking.end_date,
        );
        audit::append(
            &tx,
            audit::LOG_TYPE_BOOKING,
            LogAction::Update,
            &detail,
            actor,
            Some(booking.id),
            now,
        )?;

        tx.commit()?;

        let booking = queries::get_booking(&conn, booking_id)?.ok_or_else(|| {
            AppError::Database(format!("booking {booking_id} missing after update"))
        })?;
        let details = booking_details(&conn, &booking)?;
        let recipient = match booking.user_id {
            Some(id) => queries::get_user(&conn, id, false)?,
            None => None,
        };
        (booking, details, recipient)
    };

    tracing::info!(booking_id = booking.id, "booking rejected");

    if let Some(user) = &recipient {
        BestEffort::new(state.notifier.as_ref())
            .status_changed(
                user,
                BookingStatus::Rejected,
                &actor.display_name,
                Some(reason),
                &details,
            )
            .await;
    }

    Ok(booking)
}

/// Admin listing: newest first, optionally filtered by status, display
/// names resolved.
pub fn list_bookings(
    state: &AppState,
    status: Option<BookingStatus>,
    limit: i64,
) -> Result<Vec<BookingSummary>, AppError> {
    let conn = state.db.lock().unwrap();
    Ok(queries::list_bookings(&conn, status, limit)?)
}

fn booking_details(conn: &Connection, booking: &Booking) -> Result<BookingDetails, AppError> {
    let guest_house = match booking.guest_house_id {
        Some(id) => queries::get_guest_house(conn, id)?.map(|gh| gh.name),
        None => None,
    };
    let room = match booking.room_id {
        Some(id) => queries::get_room(conn, id)?.map(|r| r.room_number),
        None => None,
    };
    let bed = match booking.bed_id {
        Some(id) => queries::get_bed(conn, id)?.map(|b| b.label),
        None => None,
    };
    let requested_by = match booking.user_id {
        Some(id) => queries::get_user(conn, id, true)?.map(|u| u.emp_name),
        None => None,
    };

    Ok(BookingDetails {
        booking_id: booking.id,
        requested_by: requested_by
            .or_else(|| booking.created_by.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        guest_house: guest_house.unwrap_or_else(|| "N/A".to_string()),
        room: room.unwrap_or_else(|| "N/A".to_string()),
        bed: bed.unwrap_or_else(|| "N/A".to_string()),
        check_in: booking.start_date,
        check_out: booking.end_date,
        purpose: booking.purpose_of_visit.clone(),
    })
}
