//! Request handlers.
//!
//! Handlers validate input via `fleetpulse_core`, delegate persistence to
//! the repositories in `fleetpulse_db`, and map errors via [`crate::error::AppError`].

pub mod status;
