//! Guest-house booking administration core.
//!
//! The crate owns the booking-availability computation, the request
//! validator, the Pending -> Accepted/Rejected state machine and the
//! append-only audit log, all backed by an embedded SQLite store.
//! Transport concerns (HTTP routing, authentication, email delivery)
//! live outside: callers hand every mutating operation an explicit
//! [`services::actor::Actor`] and a [`services::notify::Notifier`]
//! implementation, and get plain data or an [`errors::AppError`] back.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
