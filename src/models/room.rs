use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub guest_house_id: i64,
    pub room_number: String,
    /// Freeform: "2", "Ground", "Mezzanine".
    pub floor: String,
    /// Invariant: equals the number of active beds. Checked exactly at
    /// booking time; bed/room mutations may not push active beds above it.
    pub capacity: i64,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub modified_by: Option<String>,
    pub modified_at: Option<NaiveDateTime>,
    pub deleted_by: Option<String>,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub floor: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoom {
    pub room_number: Option<String>,
    pub floor: Option<String>,
    pub capacity: Option<i64>,
}
