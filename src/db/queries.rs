use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Bed, BedStatus, Booking, BookingStatus, GuestHouse, LogAction, NewBed, NewBooking,
    NewGuestHouse, NewRoom, NewUser, Role, Room, UpdateBed, UpdateGuestHouse, UpdateRoom,
    UpdateUser, User,
};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn fmt_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Users ──

const USER_COLS: &str = "id, emp_name, username, email, password_hash, role, is_deleted, \
     deleted_at, password_reset_token, password_reset_expiry, created_at, updated_at";

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let role: String = row.get(5)?;
    let deleted_at: Option<String> = row.get(7)?;
    let reset_expiry: Option<String> = row.get(9)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(User {
        id: row.get(0)?,
        emp_name: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        role: Role::parse(&role),
        is_deleted: row.get::<_, i32>(6)? != 0,
        deleted_at: deleted_at.map(|v| parse_datetime(&v)),
        password_reset_token: row.get(8)?,
        password_reset_expiry: reset_expiry.map(|v| parse_datetime(&v)),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

pub fn insert_user(conn: &Connection, user: &NewUser) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO users (emp_name, username, email, password_hash, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.emp_name,
            user.username,
            user.email,
            user.password_hash,
            user.role.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user(conn: &Connection, id: i64, include_deleted: bool) -> anyhow::Result<Option<User>> {
    let sql = format!("SELECT {USER_COLS} FROM users WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_user_row(row)));

    match result {
        Ok(user) => {
            let user = user?;
            if user.is_deleted && !include_deleted {
                return Ok(None);
            }
            Ok(Some(user))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_admins(conn: &Connection, include_deleted: bool) -> anyhow::Result<Vec<User>> {
    let filter = if include_deleted {
        ""
    } else {
        "AND is_deleted = 0"
    };
    let sql =
        format!("SELECT {USER_COLS} FROM users WHERE role = 'admin' {filter} ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_user_row(row)))?;

    let mut users = vec![];
    for row in rows {
        users.push(row??);
    }
    Ok(users)
}

pub fn update_user(
    conn: &Connection,
    id: i64,
    update: &UpdateUser,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET
            emp_name = COALESCE(?1, emp_name),
            email = COALESCE(?2, email),
            role = COALESCE(?3, role),
            updated_at = ?4
         WHERE id = ?5 AND is_deleted = 0",
        params![
            update.emp_name,
            update.email,
            update.role.map(|r| r.as_str()),
            fmt_datetime(now),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn soft_delete_user(conn: &Connection, id: i64, now: NaiveDateTime) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET is_deleted = 1, deleted_at = ?1, updated_at = ?1
         WHERE id = ?2 AND is_deleted = 0",
        params![fmt_datetime(now), id],
    )?;
    Ok(count > 0)
}

// ── Guest houses ──

const GUEST_HOUSE_COLS: &str = "id, name, address, city, contact, is_available, created_by, deleted_by";

fn parse_guest_house_row(row: &rusqlite::Row) -> anyhow::Result<GuestHouse> {
    Ok(GuestHouse {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        contact: row.get(4)?,
        is_available: row.get::<_, i32>(5)? != 0,
        created_by: row.get(6)?,
        deleted_by: row.get(7)?,
    })
}

pub fn insert_guest_house(
    conn: &Connection,
    gh: &NewGuestHouse,
    created_by: Option<&str>,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO guest_houses (name, address, city, contact, is_available, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            gh.name,
            gh.address,
            gh.city,
            gh.contact,
            gh.is_available as i32,
            created_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_guest_house(conn: &Connection, id: i64) -> anyhow::Result<Option<GuestHouse>> {
    let sql = format!("SELECT {GUEST_HOUSE_COLS} FROM guest_houses WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_guest_house_row(row)));

    match result {
        Ok(gh) => Ok(Some(gh?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_guest_houses(conn: &Connection) -> anyhow::Result<Vec<GuestHouse>> {
    let sql = format!("SELECT {GUEST_HOUSE_COLS} FROM guest_houses ORDER BY name ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_guest_house_row(row)))?;

    let mut houses = vec![];
    for row in rows {
        houses.push(row??);
    }
    Ok(houses)
}

pub fn update_guest_house(
    conn: &Connection,
    id: i64,
    update: &UpdateGuestHouse,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE guest_houses
         SET name = ?1, address = ?2, city = ?3, contact = ?4, is_available = ?5
         WHERE id = ?6",
        params![
            update.name,
            update.address,
            update.city,
            update.contact,
            update.is_available as i32,
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn deactivate_guest_house(
    conn: &Connection,
    id: i64,
    deleted_by: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE guest_houses SET is_available = 0, deleted_by = ?1 WHERE id = ?2",
        params![deleted_by, id],
    )?;
    Ok(count > 0)
}

// ── Rooms ──

const ROOM_COLS: &str = "id, guest_house_id, room_number, floor, capacity, is_active, \
     created_by, created_at, modified_by, modified_at, deleted_by, deleted_at";

fn parse_room_row(row: &rusqlite::Row) -> anyhow::Result<Room> {
    let created_at: String = row.get(7)?;
    let modified_at: Option<String> = row.get(9)?;
    let deleted_at: Option<String> = row.get(11)?;

    Ok(Room {
        id: row.get(0)?,
        guest_house_id: row.get(1)?,
        room_number: row.get(2)?,
        floor: row.get(3)?,
        capacity: row.get(4)?,
        is_active: row.get::<_, i32>(5)? != 0,
        created_by: row.get(6)?,
        created_at: parse_datetime(&created_at),
        modified_by: row.get(8)?,
        modified_at: modified_at.map(|v| parse_datetime(&v)),
        deleted_by: row.get(10)?,
        deleted_at: deleted_at.map(|v| parse_datetime(&v)),
    })
}

pub fn insert_room(
    conn: &Connection,
    guest_house_id: i64,
    room: &NewRoom,
    created_by: Option<&str>,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO rooms (guest_house_id, room_number, floor, capacity, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            guest_house_id,
            room.room_number,
            room.floor,
            room.capacity,
            created_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_room(conn: &Connection, id: i64) -> anyhow::Result<Option<Room>> {
    let sql = format!("SELECT {ROOM_COLS} FROM rooms WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_room_row(row)));

    match result {
        Ok(room) => Ok(Some(room?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_active_rooms(conn: &Connection, guest_house_id: i64) -> anyhow::Result<Vec<Room>> {
    let sql = format!(
        "SELECT {ROOM_COLS} FROM rooms
         WHERE guest_house_id = ?1 AND is_active = 1
         ORDER BY room_number ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![guest_house_id], |row| Ok(parse_room_row(row)))?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row??);
    }
    Ok(rooms)
}

pub fn update_room(
    conn: &Connection,
    id: i64,
    update: &UpdateRoom,
    modified_by: &str,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE rooms SET
            room_number = COALESCE(?1, room_number),
            floor = COALESCE(?2, floor),
            capacity = COALESCE(?3, capacity),
            modified_by = ?4,
            modified_at = ?5
         WHERE id = ?6",
        params![
            update.room_number,
            update.floor,
            update.capacity,
            modified_by,
            fmt_datetime(now),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn deactivate_room(
    conn: &Connection,
    id: i64,
    deleted_by: &str,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE rooms SET is_active = 0, deleted_by = ?1, deleted_at = ?2
         WHERE id = ?3 AND is_active = 1",
        params![deleted_by, fmt_datetime(now), id],
    )?;
    Ok(count > 0)
}

pub fn count_active_beds(conn: &Connection, room_id: i64) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM beds WHERE room_id = ?1 AND is_active = 1",
        params![room_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Beds ──

const BED_COLS: &str = "id, room_id, label, status, is_active, created_at, modified_at";

fn parse_bed_row(row: &rusqlite::Row) -> anyhow::Result<Bed> {
    let status: String = row.get(3)?;
    let created_at: String = row.get(5)?;
    let modified_at: Option<String> = row.get(6)?;

    Ok(Bed {
        id: row.get(0)?,
        room_id: row.get(1)?,
        label: row.get(2)?,
        status: BedStatus::parse(&status),
        is_active: row.get::<_, i32>(4)? != 0,
        created_at: parse_datetime(&created_at),
        modified_at: modified_at.map(|v| parse_datetime(&v)),
    })
}

pub fn insert_bed(conn: &Connection, room_id: i64, bed: &NewBed) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO beds (room_id, label, status, is_active) VALUES (?1, ?2, ?3, ?4)",
        params![room_id, bed.label, bed.status.as_str(), bed.is_active as i32],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_bed(conn: &Connection, id: i64) -> anyhow::Result<Option<Bed>> {
    let sql = format!("SELECT {BED_COLS} FROM beds WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_bed_row(row)));

    match result {
        Ok(bed) => Ok(Some(bed?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_beds(conn: &Connection, room_id: i64) -> anyhow::Result<Vec<Bed>> {
    let sql = format!("SELECT {BED_COLS} FROM beds WHERE room_id = ?1 ORDER BY label ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![room_id], |row| Ok(parse_bed_row(row)))?;

    let mut beds = vec![];
    for row in rows {
        beds.push(row??);
    }
    Ok(beds)
}

pub fn list_active_beds(conn: &Connection, room_id: i64) -> anyhow::Result<Vec<Bed>> {
    let sql = format!(
        "SELECT {BED_COLS} FROM beds
         WHERE room_id = ?1 AND is_active = 1
         ORDER BY label ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![room_id], |row| Ok(parse_bed_row(row)))?;

    let mut beds = vec![];
    for row in rows {
        beds.push(row??);
    }
    Ok(beds)
}

pub fn bed_label_exists(
    conn: &Connection,
    room_id: i64,
    label: &str,
    exclude_bed_id: Option<i64>,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM beds
         WHERE room_id = ?1 AND label = ?2 AND id != COALESCE(?3, -1)",
        params![room_id, label, exclude_bed_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn update_bed(
    conn: &Connection,
    id: i64,
    update: &UpdateBed,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE beds SET
            label = COALESCE(?1, label),
            status = COALESCE(?2, status),
            is_active = COALESCE(?3, is_active),
            modified_at = ?4
         WHERE id = ?5",
        params![
            update.label,
            update.status.map(|s| s.as_str()),
            update.is_active.map(|a| a as i32),
            fmt_datetime(now),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_bed_status(
    conn: &Connection,
    id: i64,
    status: BedStatus,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE beds SET status = ?1, modified_at = ?2 WHERE id = ?3",
        params![status.as_str(), fmt_datetime(now), id],
    )?;
    Ok(count > 0)
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, user_id, guest_house_id, room_id, bed_id, start_date, end_date, \
     purpose_of_visit, status, created_at, created_by, modified_at, modified_by";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let start_date: String = row.get(5)?;
    let end_date: String = row.get(6)?;
    let status: String = row.get(8)?;
    let created_at: String = row.get(9)?;
    let modified_at: Option<String> = row.get(11)?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        guest_house_id: row.get(2)?,
        room_id: row.get(3)?,
        bed_id: row.get(4)?,
        start_date: parse_date(&start_date),
        end_date: parse_date(&end_date),
        purpose_of_visit: row.get(7)?,
        status: BookingStatus::parse(&status),
        created_at: parse_datetime(&created_at),
        created_by: row.get(10)?,
        modified_at: modified_at.map(|v| parse_datetime(&v)),
        modified_by: row.get(12)?,
    })
}

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (user_id, guest_house_id, room_id, bed_id, start_date, end_date,
                               purpose_of_visit, status, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.user_id,
            booking.guest_house_id,
            booking.room_id,
            booking.bed_id,
            fmt_date(booking.start_date),
            fmt_date(booking.end_date),
            booking.purpose_of_visit,
            booking.status.as_str(),
            fmt_datetime(booking.created_at),
            booking.created_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_booking_row(row)));

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Beds in the room taken by an accepted booking overlapping
/// `[start, end)`. Pending and rejected bookings reserve nothing.
pub fn overlapping_booked_bed_ids(
    conn: &Connection,
    room_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT bed_id FROM bookings
         WHERE room_id = ?1 AND status = 'accepted' AND bed_id IS NOT NULL
           AND start_date < ?3 AND end_date > ?2",
    )?;
    let rows = stmt.query_map(
        params![room_id, fmt_date(start), fmt_date(end)],
        |row| row.get::<_, i64>(0),
    )?;

    let mut bed_ids = vec![];
    for row in rows {
        bed_ids.push(row?);
    }
    Ok(bed_ids)
}

pub fn bed_has_accepted_overlap(
    conn: &Connection,
    bed_id: i64,
    exclude_booking_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE bed_id = ?1 AND status = 'accepted' AND id != ?2
           AND start_date < ?4 AND end_date > ?3",
        params![bed_id, exclude_booking_id, fmt_date(start), fmt_date(end)],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Compare-and-swap on booking status. Returns false when the row was not
/// in `from` anymore, i.e. a concurrent transition won.
pub fn transition_booking_status(
    conn: &Connection,
    id: i64,
    from: BookingStatus,
    to: BookingStatus,
    modified_by: &str,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, modified_at = ?2, modified_by = ?3
         WHERE id = ?4 AND status = ?5",
        params![
            to.as_str(),
            fmt_datetime(now),
            modified_by,
            id,
            from.as_str(),
        ],
    )?;
    Ok(count > 0)
}

pub struct BookingSummary {
    pub id: i64,
    pub user_name: String,
    pub guest_house: String,
    pub room: String,
    pub bed: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose_of_visit: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub created_by: Option<String>,
    pub modified_at: Option<NaiveDateTime>,
    pub modified_by: Option<String>,
    pub log_count: i64,
}

pub fn list_bookings(
    conn: &Connection,
    status_filter: Option<BookingStatus>,
    limit: i64,
) -> anyhow::Result<Vec<BookingSummary>> {
    let base = "SELECT b.id,
            COALESCE(u.emp_name, 'Unknown'),
            COALESCE(g.name, 'N/A'),
            COALESCE(r.room_number, 'N/A'),
            COALESCE(d.label, 'N/A'),
            b.start_date, b.end_date, b.purpose_of_visit, b.status,
            b.created_at, b.created_by, b.modified_at, b.modified_by,
            (SELECT COUNT(*) FROM audit_log a WHERE a.booking_id = b.id)
         FROM bookings b
         LEFT JOIN users u ON u.id = b.user_id
         LEFT JOIN guest_houses g ON g.id = b.guest_house_id
         LEFT JOIN rooms r ON r.id = b.room_id
         LEFT JOIN beds d ON d.id = b.bed_id";

    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!("{base} WHERE b.status = ?1 ORDER BY b.created_at DESC, b.id DESC LIMIT ?2"),
            vec![
                Box::new(status.as_str().to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!("{base} ORDER BY b.created_at DESC, b.id DESC LIMIT ?1"),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        let start_date: String = row.get(5)?;
        let end_date: String = row.get(6)?;
        let status: String = row.get(8)?;
        let created_at: String = row.get(9)?;
        let modified_at: Option<String> = row.get(11)?;

        Ok(BookingSummary {
            id: row.get(0)?,
            user_name: row.get(1)?,
            guest_house: row.get(2)?,
            room: row.get(3)?,
            bed: row.get(4)?,
            start_date: parse_date(&start_date),
            end_date: parse_date(&end_date),
            purpose_of_visit: row.get(7)?,
            status: BookingStatus::parse(&status),
            created_at: parse_datetime(&created_at),
            created_by: row.get(10)?,
            modified_at: modified_at.map(|v| parse_datetime(&v)),
            modified_by: row.get(12)?,
            log_count: row.get(13)?,
        })
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

// ── Audit log ──

#[allow(clippy::too_many_arguments)]
pub fn insert_log(
    conn: &Connection,
    log_type: &str,
    action: LogAction,
    detail: &str,
    user_id: Option<i64>,
    created_by: Option<&str>,
    booking_id: Option<i64>,
    now: NaiveDateTime,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO audit_log (booking_id, user_id, log_type, action, detail, created_by, logged_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking_id,
            user_id,
            log_type,
            action.as_str(),
            detail,
            created_by,
            fmt_datetime(now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub struct AuditListEntry {
    pub id: i64,
    pub booking_id: Option<i64>,
    pub log_type: String,
    pub action: LogAction,
    pub detail: String,
    /// Resolved actor display name; "System" when unresolvable.
    pub actor_name: String,
    pub logged_at: NaiveDateTime,
}

fn parse_audit_row(row: &rusqlite::Row) -> rusqlite::Result<AuditListEntry> {
    let action: String = row.get(3)?;
    let logged_at: String = row.get(6)?;

    Ok(AuditListEntry {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        log_type: row.get(2)?,
        action: LogAction::parse(&action),
        detail: row.get(4)?,
        actor_name: row.get(5)?,
        logged_at: parse_datetime(&logged_at),
    })
}

const AUDIT_COLS: &str = "a.id, a.booking_id, a.log_type, a.action, a.detail, \
     COALESCE(u.emp_name, a.created_by, 'System'), a.logged_at";

pub fn list_audit(conn: &Connection, limit: i64) -> anyhow::Result<Vec<AuditListEntry>> {
    let sql = format!(
        "SELECT {AUDIT_COLS} FROM audit_log a
         LEFT JOIN users u ON u.id = a.user_id
         ORDER BY a.id DESC LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], parse_audit_row)?;

    let mut entries = vec![];
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub fn list_audit_for_booking(
    conn: &Connection,
    booking_id: i64,
) -> anyhow::Result<Vec<AuditListEntry>> {
    let sql = format!(
        "SELECT {AUDIT_COLS} FROM audit_log a
         LEFT JOIN users u ON u.id = a.user_id
         WHERE a.booking_id = ?1
         ORDER BY a.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![booking_id], parse_audit_row)?;

    let mut entries = vec![];
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}
