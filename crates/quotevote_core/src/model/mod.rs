//! Domain model for quotes, authors and visitor votes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Define the vote vocabulary (direction, outcome, counters) shared by the
//!   ledger and the tally engine.
//!
//! # Invariants
//! - Quote counters never go negative.
//! - Net score is derived from counters, never stored.

pub mod quote;
pub mod vote;
