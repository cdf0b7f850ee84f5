use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Bed, BookingRequest, GuestHouse, Room};
use crate::services::availability;

const MAX_PURPOSE_LEN: usize = 255;

/// The entities a request was validated against, handed back so the
/// caller does not re-fetch them for audit details and notifications.
#[derive(Debug)]
pub struct ValidatedRequest {
    pub guest_house: GuestHouse,
    pub room: Room,
    pub bed: Option<Bed>,
}

/// Check a booking request against the structural rules (all violations
/// reported together) and then the business rules, in order, stopping at
/// the first failure. `today` is the server's reference date, passed in
/// by the orchestrating operation.
pub fn validate_booking_request(
    conn: &Connection,
    req: &BookingRequest,
    today: NaiveDate,
    booking_window_days: i64,
) -> Result<ValidatedRequest, AppError> {
    let mut problems = Vec::new();

    if req.start_date >= req.end_date {
        problems.push("check-out must be after check-in".to_string());
    }
    if req.start_date < today {
        problems.push("cannot book past dates".to_string());
    }
    if req.start_date > today + Duration::days(booking_window_days) {
        problems.push(format!(
            "booking allowed only up to {booking_window_days} days in advance"
        ));
    }
    if matches!(req.start_date.weekday(), Weekday::Sat | Weekday::Sun) {
        problems.push("bookings may start Monday to Friday only".to_string());
    }
    if req.purpose_of_visit.trim().is_empty() {
        problems.push("purpose of visit is required".to_string());
    } else if req.purpose_of_visit.chars().count() > MAX_PURPOSE_LEN {
        problems.push(format!(
            "purpose of visit must be at most {MAX_PURPOSE_LEN} characters"
        ));
    }

    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join("; ")));
    }

    let guest_house = match queries::get_guest_house(conn, req.guest_house_id)? {
        Some(gh) if gh.is_available => gh,
        _ => {
            return Err(AppError::Validation(
                "guest house is not available".to_string(),
            ))
        }
    };

    let room = match queries::get_room(conn, req.room_id)? {
        Some(room) if room.guest_house_id == req.guest_house_id => room,
        _ => return Err(AppError::Validation("invalid room".to_string())),
    };

    // Guard against drift between the declared capacity and the beds that
    // actually exist; the master operations keep this from happening, but
    // the booking path still refuses to work off inconsistent data.
    let active_beds = queries::count_active_beds(conn, room.id)?;
    if active_beds != room.capacity {
        return Err(AppError::Validation(format!(
            "room capacity mismatch: capacity = {}, active beds = {active_beds}",
            room.capacity
        )));
    }
    if active_beds == 0 {
        return Err(AppError::Validation(
            "no active beds available in this room".to_string(),
        ));
    }

    let bed = match req.bed_id {
        Some(bed_id) => match queries::get_bed(conn, bed_id)? {
            Some(bed) if bed.room_id == room.id && bed.is_active => Some(bed),
            _ => {
                return Err(AppError::Validation(
                    "invalid or inactive bed".to_string(),
                ))
            }
        },
        None => None,
    };

    if let Some(bed) = &bed {
        let beds =
            availability::compute_availability(conn, room.id, req.start_date, req.end_date)?;
        let free = beds
            .iter()
            .any(|b| b.bed_id == bed.id && b.is_available);
        if !free {
            return Err(AppError::Validation(
                "selected bed is not available for the given dates".to_string(),
            ));
        }
    }

    Ok(ValidatedRequest {
        guest_house,
        room,
        bed,
    })
}
