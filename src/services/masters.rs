//! Admin mutations over guest houses, rooms, beds and users. Every
//! operation writes its audit entry in the same transaction as the
//! mutation, and bed/room changes may never leave a room with more
//! active beds than its declared capacity.

use chrono::Utc;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Bed, GuestHouse, LogAction, NewBed, NewGuestHouse, NewRoom, Room, UpdateBed,
    UpdateGuestHouse, UpdateRoom, UpdateUser,
};
use crate::services::actor::Actor;
use crate::services::audit;
use crate::state::AppState;

const MAX_BED_LABEL_LEN: usize = 50;

// ── Guest houses ──

pub fn create_guest_house(
    state: &AppState,
    actor: &Actor,
    gh: &NewGuestHouse,
) -> Result<GuestHouse, AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let id = queries::insert_guest_house(&tx, gh, Some(actor.display_name.as_str()))?;
    let detail = format!(
        "Guest house '{}' ({}) created by {}",
        gh.name, gh.city, actor.display_name,
    );
    audit::append(
        &tx,
        audit::LOG_TYPE_GUEST_HOUSE,
        LogAction::Create,
        &detail,
        actor,
        None,
        now,
    )?;
    tx.commit()?;

    queries::get_guest_house(&conn, id)?
        .ok_or_else(|| AppError::Database(format!("guest house {id} missing after insert")))
}

pub fn update_guest_house(
    state: &AppState,
    actor: &Actor,
    id: i64,
    update: &UpdateGuestHouse,
) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let gh = queries::get_guest_house(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("guest house {id}")))?;
    queries::update_guest_house(&tx, gh.id, update)?;

    let detail = format!("Guest house '{}' updated by {}", update.name, actor.display_name);
    audit::append(
        &tx,
        audit::LOG_TYPE_GUEST_HOUSE,
        LogAction::Update,
        &detail,
        actor,
        None,
        now,
    )?;
    tx.commit()?;
    Ok(())
}

/// Soft delete: the guest house stays in storage, marked unavailable.
pub fn deactivate_guest_house(state: &AppState, actor: &Actor, id: i64) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let gh = queries::get_guest_house(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("guest house {id}")))?;
    if !gh.is_available {
        return Err(AppError::Validation(
            "guest house is already deactivated".to_string(),
        ));
    }
    queries::deactivate_guest_house(&tx, gh.id, &actor.display_name)?;

    let detail = format!("Guest house '{}' deactivated by {}", gh.name, actor.display_name);
    audit::append(
        &tx,
        audit::LOG_TYPE_GUEST_HOUSE,
        LogAction::Delete,
        &detail,
        actor,
        None,
        now,
    )?;
    tx.commit()?;
    Ok(())
}

// ── Rooms ──

pub fn add_room(
    state: &AppState,
    actor: &Actor,
    guest_house_id: i64,
    room: &NewRoom,
) -> Result<Room, AppError> {
    if room.capacity < 0 {
        return Err(AppError::Validation(
            "room capacity cannot be negative".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let gh = queries::get_guest_house(&tx, guest_house_id)?
        .ok_or_else(|| AppError::NotFound(format!("guest house {guest_house_id}")))?;

    let id = queries::insert_room(&tx, gh.id, room, Some(actor.display_name.as_str()))?;
    let detail = format!(
        "Room {} (capacity {}) added to guest house '{}' by {}",
        room.room_number, room.capacity, gh.name, actor.display_name,
    );
    audit::append(&tx, audit::LOG_TYPE_ROOM, LogAction::Create, &detail, actor, None, now)?;
    tx.commit()?;

    queries::get_room(&conn, id)?
        .ok_or_else(|| AppError::Database(format!("room {id} missing after insert")))
}

pub fn update_room(
    state: &AppState,
    actor: &Actor,
    id: i64,
    update: &UpdateRoom,
) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let room =
        queries::get_room(&tx, id)?.ok_or_else(|| AppError::NotFound(format!("room {id}")))?;

    if let Some(capacity) = update.capacity {
        if capacity < 0 {
            return Err(AppError::Validation(
                "room capacity cannot be negative".to_string(),
            ));
        }
        let active_beds = queries::count_active_beds(&tx, room.id)?;
        if capacity < active_beds {
            return Err(AppError::Validation(format!(
                "capacity {capacity} is below the {active_beds} active beds in room {}",
                room.room_number
            )));
        }
    }

    queries::update_room(&tx, room.id, update, &actor.display_name, now)?;

    let detail = format!("Room {} updated by {}", room.room_number, actor.display_name);
    audit::append(&tx, audit::LOG_TYPE_ROOM, LogAction::Update, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

pub fn deactivate_room(state: &AppState, actor: &Actor, id: i64) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let room =
        queries::get_room(&tx, id)?.ok_or_else(|| AppError::NotFound(format!("room {id}")))?;
    if !room.is_active {
        return Err(AppError::Validation("room is already deactivated".to_string()));
    }
    queries::deactivate_room(&tx, room.id, &actor.display_name, now)?;

    let detail = format!("Room {} deactivated by {}", room.room_number, actor.display_name);
    audit::append(&tx, audit::LOG_TYPE_ROOM, LogAction::Delete, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

// ── Beds ──

pub fn add_bed(
    state: &AppState,
    actor: &Actor,
    room_id: i64,
    bed: &NewBed,
) -> Result<Bed, AppError> {
    let label = bed.label.trim();
    if label.is_empty() {
        return Err(AppError::Validation("bed label is required".to_string()));
    }
    if label.chars().count() > MAX_BED_LABEL_LEN {
        return Err(AppError::Validation(format!(
            "bed label must be at most {MAX_BED_LABEL_LEN} characters"
        )));
    }

    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let room = queries::get_room(&tx, room_id)?
        .ok_or_else(|| AppError::NotFound(format!("room {room_id}")))?;

    if queries::bed_label_exists(&tx, room.id, label, None)? {
        return Err(AppError::Validation(format!(
            "bed label '{label}' already exists in room {}",
            room.room_number
        )));
    }
    if bed.is_active {
        ensure_capacity_for_one_more(&tx, &room)?;
    }

    let id = queries::insert_bed(
        &tx,
        room.id,
        &NewBed {
            label: label.to_string(),
            status: bed.status,
            is_active: bed.is_active,
        },
    )?;
    let detail = format!(
        "Bed '{label}' added to room {} by {}",
        room.room_number, actor.display_name,
    );
    audit::append(&tx, audit::LOG_TYPE_BED, LogAction::Create, &detail, actor, None, now)?;
    tx.commit()?;

    queries::get_bed(&conn, id)?
        .ok_or_else(|| AppError::Database(format!("bed {id} missing after insert")))
}

pub fn update_bed(
    state: &AppState,
    actor: &Actor,
    id: i64,
    update: &UpdateBed,
) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let bed = queries::get_bed(&tx, id)?.ok_or_else(|| AppError::NotFound(format!("bed {id}")))?;
    let room = queries::get_room(&tx, bed.room_id)?
        .ok_or_else(|| AppError::NotFound(format!("room {}", bed.room_id)))?;

    if let Some(label) = update.label.as_deref() {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::Validation("bed label is required".to_string()));
        }
        if label.chars().count() > MAX_BED_LABEL_LEN {
            return Err(AppError::Validation(format!(
                "bed label must be at most {MAX_BED_LABEL_LEN} characters"
            )));
        }
        if queries::bed_label_exists(&tx, room.id, label, Some(bed.id))? {
            return Err(AppError::Validation(format!(
                "bed label '{label}' already exists in room {}",
                room.room_number
            )));
        }
    }

    let activating = update.is_active == Some(true) && !bed.is_active;
    if activating {
        ensure_capacity_for_one_more(&tx, &room)?;
    }

    queries::update_bed(&tx, bed.id, update, now)?;

    let detail = format!(
        "Bed '{}' in room {} updated by {}",
        bed.label, room.room_number, actor.display_name,
    );
    audit::append(&tx, audit::LOG_TYPE_BED, LogAction::Update, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

pub fn deactivate_bed(state: &AppState, actor: &Actor, id: i64) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let bed = queries::get_bed(&tx, id)?.ok_or_else(|| AppError::NotFound(format!("bed {id}")))?;
    if !bed.is_active {
        return Err(AppError::Validation("bed is already deactivated".to_string()));
    }
    queries::update_bed(
        &tx,
        bed.id,
        &UpdateBed {
            is_active: Some(false),
            ..Default::default()
        },
        now,
    )?;

    let detail = format!("Bed '{}' deactivated by {}", bed.label, actor.display_name);
    audit::append(&tx, audit::LOG_TYPE_BED, LogAction::Delete, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

fn ensure_capacity_for_one_more(
    conn: &rusqlite::Connection,
    room: &Room,
) -> Result<(), AppError> {
    let active_beds = queries::count_active_beds(conn, room.id)?;
    if active_beds + 1 > room.capacity {
        return Err(AppError::Validation(format!(
            "room {} already has {active_beds} active beds for capacity {}",
            room.room_number, room.capacity
        )));
    }
    Ok(())
}

// ── Users ──

pub fn update_user(
    state: &AppState,
    actor: &Actor,
    id: i64,
    update: &UpdateUser,
) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let user = queries::get_user(&tx, id, false)?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    queries::update_user(&tx, user.id, update, now)?;

    let detail = format!("User '{}' updated by {}", user.username, actor.display_name);
    audit::append(&tx, audit::LOG_TYPE_USER, LogAction::Update, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

/// Soft delete: the row stays for audit resolution and history.
pub fn deactivate_user(state: &AppState, actor: &Actor, id: i64) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();
    let mut conn = state.db.lock().unwrap();
    let tx = conn.transaction()?;

    let user = queries::get_user(&tx, id, false)?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    queries::soft_delete_user(&tx, user.id, now)?;

    let detail = format!("User '{}' deactivated by {}", user.username, actor.display_name);
    audit::append(&tx, audit::LOG_TYPE_USER, LogAction::Delete, &detail, actor, None, now)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db;
    use crate::models::{BedStatus, NewUser, Role};
    use crate::services::audit;
    use crate::services::notify::NoopNotifier;

    fn test_state() -> AppState {
        let conn = db::init_db(":memory:").unwrap();
        AppState::new(
            conn,
            AppConfig {
                database_url: ":memory:".to_string(),
                booking_window_days: 30,
            },
            Box::new(NoopNotifier),
        )
    }

    fn admin_actor(state: &AppState) -> Actor {
        let conn = state.db.lock().unwrap();
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
        Actor {
            user_id: Some(id),
            display_name: "Asha Rao".into(),
        }
    }

    fn new_bed(label: &str) -> NewBed {
        NewBed {
            label: label.into(),
            status: BedStatus::Vacant,
            is_active: true,
        }
    }

    fn seed_room(state: &AppState, actor: &Actor, capacity: i64) -> (GuestHouse, Room) {
        let gh = create_guest_house(
            state,
            actor,
            &NewGuestHouse {
                name: "Hill View".into(),
                address: "1 Ridge Road".into(),
                city: "Shimla".into(),
                contact: None,
                is_available: true,
            },
        )
        .unwrap();
        let room = add_room(
            state,
            actor,
            gh.id,
            &NewRoom {
                room_number: "101".into(),
                floor: "1".into(),
                capacity,
            },
        )
        .unwrap();
        (gh, room)
    }

    #[test]
    fn test_bed_beyond_capacity_is_refused() {
        let state = test_state();
        let actor = admin_actor(&state);
        let (_, room) = seed_room(&state, &actor, 1);

        add_bed(&state, &actor, room.id, &new_bed("A")).unwrap();
        let result = add_bed(&state, &actor, room.id, &new_bed("B"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_duplicate_label_is_refused() {
        let state = test_state();
        let actor = admin_actor(&state);
        let (_, room) = seed_room(&state, &actor, 2);

        add_bed(&state, &actor, room.id, &new_bed("A")).unwrap();
        let result = add_bed(&state, &actor, room.id, &new_bed("A"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_capacity_cannot_drop_below_active_beds() {
        let state = test_state();
        let actor = admin_actor(&state);
        let (_, room) = seed_room(&state, &actor, 2);
        add_bed(&state, &actor, room.id, &new_bed("A")).unwrap();
        add_bed(&state, &actor, room.id, &new_bed("B")).unwrap();

        let result = update_room(
            &state,
            &actor,
            room.id,
            &UpdateRoom {
                capacity: Some(1),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_reactivating_bed_respects_capacity() {
        let state = test_state();
        let actor = admin_actor(&state);
        let (_, room) = seed_room(&state, &actor, 1);
        let bed_a = add_bed(&state, &actor, room.id, &new_bed("A")).unwrap();
        deactivate_bed(&state, &actor, bed_a.id).unwrap();
        let bed_b = add_bed(&state, &actor, room.id, &new_bed("B")).unwrap();
        assert!(bed_b.is_active);

        // Room is full again; bringing A back would exceed capacity.
        let result = update_bed(
            &state,
            &actor,
            bed_a.id,
            &UpdateBed {
                is_active: Some(true),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_mutations_are_audited_with_their_log_types() {
        let state = test_state();
        let actor = admin_actor(&state);
        let (gh, room) = seed_room(&state, &actor, 1);
        add_bed(&state, &actor, room.id, &new_bed("A")).unwrap();
        deactivate_guest_house(&state, &actor, gh.id).unwrap();

        let conn = state.db.lock().unwrap();
        let entries = audit::list_recent(&conn, 10).unwrap();
        let types: Vec<&str> = entries.iter().map(|e| e.log_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                audit::LOG_TYPE_GUEST_HOUSE, // deactivated
                audit::LOG_TYPE_BED,
                audit::LOG_TYPE_ROOM,
                audit::LOG_TYPE_GUEST_HOUSE, // created
            ]
        );
        assert!(entries.iter().all(|e| e.actor_name == "Asha Rao"));
    }

    #[test]
    fn test_deactivated_user_leaves_admin_list() {
        let state = test_state();
        let actor = admin_actor(&state);
        let admin_id = actor.user_id.unwrap();

        deactivate_user(&state, &Actor::system(), admin_id).unwrap();

        let conn = state.db.lock().unwrap();
        assert!(queries::list_admins(&conn, false).unwrap().is_empty());
        assert_eq!(queries::list_admins(&conn, true).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_room_is_not_found() {
        let state = test_state();
        let actor = admin_actor(&state);
        let result = add_bed(&state, &actor, 99, &new_bed("A"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
