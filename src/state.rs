use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::notify::Notifier;

/// Shared application state. The single SQLite connection is the only
/// source of truth for bed/room state; nothing is cached across requests.
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub notifier: Box<dyn Notifier>,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig, notifier: Box<dyn Notifier>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            notifier,
        }
    }
}
