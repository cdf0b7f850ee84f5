use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    /// How far ahead of today a booking may start, in days.
    pub booking_window_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "guesthouse.db".to_string()),
            booking_window_days: env::var("BOOKING_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}
