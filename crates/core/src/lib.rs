//! Pure domain logic for the fleetpulse device-status service.
//!
//! Everything in this crate is deterministic and side-effect-free: the
//! health evaluator and the payload validator take all of their inputs
//! (including "now") as parameters, so callers own the clock and any I/O.

pub mod error;
pub mod health;
pub mod payload;
pub mod types;
