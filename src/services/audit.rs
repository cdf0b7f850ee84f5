use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::queries::{self, AuditListEntry};
use crate::errors::AppError;
use crate::models::{LogAction, LogEntry};
use crate::services::actor::Actor;

pub const LOG_TYPE_BOOKING: &str = "Booking";
pub const LOG_TYPE_ROOM: &str = "Room Master";
pub const LOG_TYPE_GUEST_HOUSE: &str = "Guest House Master";
pub const LOG_TYPE_BED: &str = "Bed Master";
pub const LOG_TYPE_USER: &str = "User";

const MAX_DETAIL_LEN: usize = 500;

/// Append one audit entry. The log only grows: no update or delete is
/// exposed. A failed append propagates so the surrounding transaction
/// rolls back instead of committing an unaudited mutation.
pub fn append(
    conn: &Connection,
    log_type: &str,
    action: LogAction,
    detail: &str,
    actor: &Actor,
    booking_id: Option<i64>,
    now: NaiveDateTime,
) -> Result<LogEntry, AppError> {
    let detail = clip_detail(detail);
    let id = queries::insert_log(
        conn,
        log_type,
        action,
        &detail,
        actor.user_id,
        Some(actor.display_name.as_str()),
        booking_id,
        now,
    )?;

    Ok(LogEntry {
        id,
        booking_id,
        user_id: actor.user_id,
        log_type: log_type.to_string(),
        action,
        detail,
        created_by: Some(actor.display_name.clone()),
        logged_at: now,
    })
}

/// Newest first, with actor names resolved ("System" when unresolvable).
pub fn list_recent(conn: &Connection, limit: i64) -> Result<Vec<AuditListEntry>, AppError> {
    Ok(queries::list_audit(conn, limit)?)
}

/// Insertion order for one booking's trail.
pub fn list_for_booking(
    conn: &Connection,
    booking_id: i64,
) -> Result<Vec<AuditListEntry>, AppError> {
    Ok(queries::list_audit_for_booking(conn, booking_id)?)
}

fn clip_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_DETAIL_LEN {
        detail.to_string()
    } else {
        detail.chars().take(MAX_DETAIL_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{BookingStatus, NewBooking, NewUser, Role};
    use chrono::{NaiveDate, Utc};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_append_and_list_newest_first() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        let actor = Actor::system();

        append(&conn, LOG_TYPE_BOOKING, LogAction::Create, "first", &actor, None, now).unwrap();
        append(&conn, LOG_TYPE_BOOKING, LogAction::Update, "second", &actor, None, now).unwrap();

        let entries = list_recent(&conn, 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].detail, "second");
        assert_eq!(entries[1].detail, "first");
    }

    #[test]
    fn test_actor_name_resolved_from_user() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        let id = queries::insert_user(
            &conn,
            &NewUser {
                emp_name: "Asha Rao".into(),
                username: "asha".into(),
                email: "asha@example.com".into(),
                password_hash: "x".into(),
                role: Role::Admin,
            },
        )
        .unwrap();
        let actor = Actor {
            user_id: Some(id),
            display_name: "Asha Rao".into(),
        };

        append(&conn, LOG_TYPE_ROOM, LogAction::Create, "room added", &actor, None, now).unwrap();

        let entries = list_recent(&conn, 10).unwrap();
        assert_eq!(entries[0].actor_name, "Asha Rao");
        assert_eq!(entries[0].log_type, LOG_TYPE_ROOM);
    }

    #[test]
    fn test_anonymous_actor_lists_as_system() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        queries::insert_log(
            &conn,
            LOG_TYPE_USER,
            LogAction::Delete,
            "cleanup",
            None,
            None,
            None,
            now,
        )
        .unwrap();

        let entries = list_recent(&conn, 10).unwrap();
        assert_eq!(entries[0].actor_name, "System");
    }

    #[test]
    fn test_detail_clipped_to_limit() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        let long = "x".repeat(650);

        append(&conn, LOG_TYPE_BOOKING, LogAction::Create, &long, &Actor::system(), None, now)
            .unwrap();

        let entries = list_recent(&conn, 1).unwrap();
        assert_eq!(entries[0].detail.chars().count(), 500);
    }

    #[test]
    fn test_booking_trail_in_insertion_order() {
        let conn = setup_db();
        let now = Utc::now().naive_utc();
        let actor = Actor::system();
        let first = seed_booking(&conn);
        let second = seed_booking(&conn);

        append(&conn, LOG_TYPE_BOOKING, LogAction::Create, "created", &actor, Some(first), now)
            .unwrap();
        append(&conn, LOG_TYPE_BOOKING, LogAction::Update, "accepted", &actor, Some(first), now)
            .unwrap();
        append(
            &conn,
            LOG_TYPE_BOOKING,
            LogAction::Create,
            "other booking",
            &actor,
            Some(second),
            now,
        )
        .unwrap();

        let trail = list_for_booking(&conn, first).unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].detail, "created");
        assert_eq!(trail[1].detail, "accepted");
    }

    fn seed_booking(conn: &Connection) -> i64 {
        queries::insert_booking(
            conn,
            &NewBooking {
                user_id: None,
                guest_house_id: None,
                room_id: None,
                bed_id: None,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
                purpose_of_visit: "training".into(),
                status: BookingStatus::Pending,
                created_at: Utc::now().naive_utc(),
                created_by: None,
            },
        )
        .unwrap()
    }
}
