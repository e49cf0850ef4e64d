//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - The vote ledger exclusively writes `user_votes`; the tally engine
//!   exclusively writes quote counters.
//! - Repository APIs return semantic errors (`QuoteNotFound`) in addition to
//!   DB transport errors.

pub mod quote_repo;
pub mod tally;
pub mod vote_ledger;
