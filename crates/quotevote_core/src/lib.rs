//! Core domain logic for the quote voting service.
//! This crate is the single source of truth for vote and ranking invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, open_db_with, seed_sample_data, DbError, DbOptions, Store};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingStatus};
pub use model::quote::{
    Author, AuthorId, AuthorSummary, CatalogValidationError, FeaturedQuote, NewQuote, Quote,
    QuoteId, RankedQuote, DEFAULT_CATEGORY,
};
pub use model::vote::{Counters, Direction, VoteOutcome, VoteRecord};
pub use repo::quote_repo::{
    QuoteListQuery, QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository, StoreCounts,
};
pub use repo::tally::{SqliteTallyEngine, TallyEngine};
pub use repo::vote_ledger::{SqliteVoteLedger, VoteLedger};
pub use service::error::{ErrorKind, ServiceError, ServiceResult};
pub use service::quote_service::QuoteService;
pub use service::vote_service::{cast_vote, VoteReceipt, VoteRequest, VoteService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
