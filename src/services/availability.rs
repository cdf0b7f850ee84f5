use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BedAvailability {
    pub bed_id: i64,
    pub label: String,
    pub is_available: bool,
}

/// Which beds of a room are free over the half-open interval
/// `[start, end)`, sorted by label.
///
/// A bed is taken iff an *accepted* booking on it overlaps the interval
/// (`existing.start < end AND existing.end > start`); pending and
/// rejected bookings reserve nothing, and the cached bed status field is
/// ignored. Read-only.
pub fn compute_availability(
    conn: &Connection,
    room_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<BedAvailability>, AppError> {
    if start >= end {
        return Err(AppError::Validation(
            "check-out must be after check-in".to_string(),
        ));
    }

    let room = queries::get_room(conn, room_id)?
        .ok_or_else(|| AppError::NotFound(format!("room {room_id}")))?;

    let beds = queries::list_active_beds(conn, room.id)?;
    if beds.is_empty() {
        return Ok(Vec::new());
    }

    let booked = queries::overlapping_booked_bed_ids(conn, room.id, start, end)?;

    Ok(beds
        .into_iter()
        .map(|bed| BedAvailability {
            bed_id: bed.id,
            is_available: !booked.contains(&bed.id),
            label: bed.label,
        })
        .collect())
}

pub fn get_availability(
    state: &AppState,
    room_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<BedAvailability>, AppError> {
    let conn = state.db.lock().unwrap();
    compute_availability(&conn, room_id, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BedStatus, BookingStatus, NewBed, NewBooking, NewGuestHouse, NewRoom};
    use chrono::Utc;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seed_room(conn: &Connection, capacity: i64, labels: &[&str]) -> (i64, Vec<i64>) {
        let gh = queries::insert_guest_house(
            conn,
            &NewGuestHouse {
                name: "Hill View".into(),
                address: "1 Ridge Road".into(),
                city: "Shimla".into(),
                contact: None,
                is_available: true,
            },
            None,
        )
        .unwrap();
        let room = queries::insert_room(
            conn,
            gh,
            &NewRoom {
                room_number: "101".into(),
                floor: "1".into(),
                capacity,
            },
            None,
        )
        .unwrap();
        let beds = labels
            .iter()
            .map(|label| {
                queries::insert_bed(
                    conn,
                    room,
                    &NewBed {
                        label: label.to_string(),
                        status: BedStatus::Vacant,
                        is_active: true,
                    },
                )
                .unwrap()
            })
            .collect();
        (room, beds)
    }

    fn seed_booking(
        conn: &Connection,
        room_id: i64,
        bed_id: i64,
        start: &str,
        end: &str,
        status: BookingStatus,
    ) {
        queries::insert_booking(
            conn,
            &NewBooking {
                user_id: None,
                guest_house_id: None,
                room_id: Some(room_id),
                bed_id: Some(bed_id),
                start_date: date(start),
                end_date: date(end),
                purpose_of_visit: "training".into(),
                status,
                created_at: Utc::now().naive_utc(),
                created_by: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_all_beds_free_when_no_bookings() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 2, &["A", "B"]);

        let result =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();

        assert_eq!(
            result,
            vec![
                BedAvailability {
                    bed_id: beds[0],
                    label: "A".into(),
                    is_available: true
                },
                BedAvailability {
                    bed_id: beds[1],
                    label: "B".into(),
                    is_available: true
                },
            ]
        );
    }

    #[test]
    fn test_accepted_overlap_blocks_bed() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 2, &["A", "B"]);
        seed_booking(&conn, room, beds[0], "2024-06-03", "2024-06-05", BookingStatus::Accepted);

        let result =
            compute_availability(&conn, room, date("2024-06-04"), date("2024-06-06")).unwrap();

        assert_eq!(result[0].label, "A");
        assert!(!result[0].is_available);
        assert_eq!(result[1].label, "B");
        assert!(result[1].is_available);
    }

    #[test]
    fn test_adjacent_interval_does_not_block() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 1, &["A"]);
        seed_booking(&conn, room, beds[0], "2024-06-03", "2024-06-05", BookingStatus::Accepted);

        // Checkout day equals the next check-in: half-open intervals touch
        // without overlapping.
        let result =
            compute_availability(&conn, room, date("2024-06-05"), date("2024-06-07")).unwrap();
        assert!(result[0].is_available);
    }

    #[test]
    fn test_pending_and_rejected_reserve_nothing() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 1, &["A"]);
        seed_booking(&conn, room, beds[0], "2024-06-03", "2024-06-05", BookingStatus::Pending);
        seed_booking(&conn, room, beds[0], "2024-06-03", "2024-06-05", BookingStatus::Rejected);

        let result =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        assert!(result[0].is_available);
    }

    #[test]
    fn test_room_without_active_beds_yields_empty_list() {
        let conn = setup_db();
        let (room, _) = seed_room(&conn, 0, &[]);

        let result =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_inactive_beds_are_not_listed() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 2, &["A", "B"]);
        queries::update_bed(
            &conn,
            beds[1],
            &crate::models::UpdateBed {
                is_active: Some(false),
                ..Default::default()
            },
            Utc::now().naive_utc(),
        )
        .unwrap();

        let result =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "A");
    }

    #[test]
    fn test_output_sorted_by_label() {
        let conn = setup_db();
        let (room, _) = seed_room(&conn, 3, &["C", "A", "B"]);

        let result =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        let labels: Vec<&str> = result.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_room_is_not_found() {
        let conn = setup_db();
        let result = compute_availability(&conn, 99, date("2024-06-03"), date("2024-06-05"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let conn = setup_db();
        let (room, _) = seed_room(&conn, 1, &["A"]);

        let result = compute_availability(&conn, room, date("2024-06-05"), date("2024-06-05"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_idempotent_without_intervening_mutation() {
        let conn = setup_db();
        let (room, beds) = seed_room(&conn, 2, &["A", "B"]);
        seed_booking(&conn, room, beds[1], "2024-06-01", "2024-06-10", BookingStatus::Accepted);

        let first =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        let second =
            compute_availability(&conn, room, date("2024-06-03"), date("2024-06-05")).unwrap();
        assert_eq!(first, second);
    }
}
