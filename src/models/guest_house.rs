use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestHouse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub contact: Option<String>,
    pub is_available: bool,
    pub created_by: Option<String>,
    pub deleted_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGuestHouse {
    pub name: String,
    pub address: String,
    pub city: String,
    pub contact: Option<String>,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGuestHouse {
    pub name: String,
    pub address: String,
    pub city: String,
    pub contact: Option<String>,
    pub is_available: bool,
}
