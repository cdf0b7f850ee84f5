use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "accepted" => BookingStatus::Accepted,
            "rejected" => BookingStatus::Rejected,
            _ => BookingStatus::Pending,
        }
    }
}

/// A bed booking over the half-open date interval `[start_date, end_date)`.
///
/// References are nullable so a booking row survives later changes to the
/// entities it points at; rows are never hard-deleted. Once Accepted or
/// Rejected the row is immutable apart from its audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: Option<i64>,
    pub guest_house_id: Option<i64>,
    pub room_id: Option<i64>,
    pub bed_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose_of_visit: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
    pub modified_at: Option<NaiveDateTime>,
    pub modified_by: Option<String>,
}

/// What a guest submits to request a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub guest_house_id: i64,
    pub room_id: i64,
    /// Optional: omit to request any bed in the room.
    pub bed_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose_of_visit: String,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<i64>,
    pub guest_house_id: Option<i64>,
    pub room_id: Option<i64>,
    pub bed_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose_of_visit: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Rejected,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Accepted).unwrap(),
            r#""accepted""#
        );
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(BookingStatus::parse("garbage"), BookingStatus::Pending);
    }
}
