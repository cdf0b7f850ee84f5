use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;

/// The identity performing an operation. Resolved by the caller's auth
/// layer and passed explicitly into every mutating entry point, so the
/// core never reads ambient request context.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Option<i64>,
    pub display_name: String,
}

impl Actor {
    pub fn system() -> Self {
        Self {
            user_id: None,
            display_name: "System".to_string(),
        }
    }
}

/// Look up the display identity for an authenticated user id. Falls back
/// to "System" when the id is absent or does not resolve to a live user.
pub fn resolve_actor(conn: &Connection, user_id: Option<i64>) -> Result<Actor, AppError> {
    let Some(id) = user_id else {
        return Ok(Actor::system());
    };

    match queries::get_user(conn, id, false)? {
        Some(user) => Ok(Actor {
            user_id: Some(user.id),
            display_name: user.emp_name,
        }),
        None => Ok(Actor::system()),
    }
}
