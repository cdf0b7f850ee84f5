use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Create => "create",
            LogAction::Update => "update",
            LogAction::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "update" => LogAction::Update,
            "delete" => LogAction::Delete,
            _ => LogAction::Create,
        }
    }
}

/// One append-only audit record. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub booking_id: Option<i64>,
    pub user_id: Option<i64>,
    /// Freeform category: "Booking", "Room Master", "Guest House Master",
    /// "Bed Master", "User".
    pub log_type: String,
    pub action: LogAction,
    pub detail: String,
    pub created_by: Option<String>,
    pub logged_at: NaiveDateTime,
}
