use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedStatus {
    Vacant,
    Occupied,
}

impl BedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Vacant => "vacant",
            BedStatus::Occupied => "occupied",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "occupied" => BedStatus::Occupied,
            _ => BedStatus::Vacant,
        }
    }
}

/// Smallest bookable unit within a room.
///
/// `status` is a display hint only: it is flipped to Occupied when a
/// booking on the bed is accepted and never flipped back. Whether a bed
/// is free for a date range is always recomputed from accepted-booking
/// overlap, never read from this field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bed {
    pub id: i64,
    pub room_id: i64,
    pub label: String,
    pub status: BedStatus,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub modified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBed {
    pub label: String,
    pub status: BedStatus,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBed {
    pub label: Option<String>,
    pub status: Option<BedStatus>,
    pub is_active: Option<bool>,
}
