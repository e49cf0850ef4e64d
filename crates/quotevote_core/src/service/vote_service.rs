//! Vote use-case service: ledger and tally under one transaction.
//!
//! # Responsibility
//! - Validate raw vote input into a typed [`VoteRequest`].
//! - Run ledger resolution and tally delta as one all-or-nothing unit.
//! - Acquire one connection per attempt and retry contention a bounded number
//!   of times.
//!
//! # Invariants
//! - Each attempt uses `BEGIN IMMEDIATE`, which takes the database write lock
//!   before the uniqueness check, so concurrent votes serialize.
//! - Any error before commit drops the transaction, rolling back both the
//!   vote record and the counter delta.
//! - Only `Conflict` is retried.

use crate::db::Store;
use crate::model::quote::QuoteId;
use crate::model::vote::{Counters, Direction, VoteOutcome};
use crate::repo::tally::{SqliteTallyEngine, TallyEngine};
use crate::repo::vote_ledger::{SqliteVoteLedger, VoteLedger};
use crate::service::error::{ErrorKind, ServiceError, ServiceResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::time::Instant;

const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Validated vote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub quote_id: QuoteId,
    /// Opaque visitor identity (the caller's network address).
    pub visitor_id: String,
    pub direction: Direction,
}

impl VoteRequest {
    /// Builds a request from untrusted input.
    ///
    /// # Errors
    /// - `InvalidArgument` when `quote_id` is missing or non-positive.
    /// - `InvalidArgument` when `direction` is not `up` or `down`.
    pub fn parse(
        quote_id: Option<i64>,
        direction: Option<&str>,
        visitor_id: impl Into<String>,
    ) -> ServiceResult<Self> {
        let quote_id = match quote_id {
            Some(id) if id > 0 => id,
            Some(id) => {
                return Err(ServiceError::InvalidArgument(format!(
                    "quote_id must be positive, got {id}"
                )))
            }
            None => {
                return Err(ServiceError::InvalidArgument(
                    "quote_id is required".to_string(),
                ))
            }
        };

        let direction = direction
            .ok_or_else(|| ServiceError::InvalidArgument("vote_type is required".to_string()))?
            .parse::<Direction>()
            .map_err(|err| ServiceError::InvalidArgument(err.to_string()))?;

        Ok(Self {
            quote_id,
            visitor_id: visitor_id.into(),
            direction,
        })
    }
}

/// Result of a committed (or no-op) vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    pub quote_id: QuoteId,
    pub outcome: VoteOutcome,
    /// Counters as of commit.
    pub counters: Counters,
}

/// Runs one vote attempt on `conn` inside a single immediate transaction.
///
/// The connection must not have an open transaction.
pub fn cast_vote(conn: &mut Connection, request: &VoteRequest) -> ServiceResult<VoteReceipt> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let outcome = SqliteVoteLedger::new(&tx).resolve_and_record(
        request.quote_id,
        &request.visitor_id,
        request.direction,
    )?;
    let counters = SqliteTallyEngine::new(&tx).apply(request.quote_id, outcome)?;

    tx.commit()?;

    Ok(VoteReceipt {
        quote_id: request.quote_id,
        outcome,
        counters,
    })
}

/// Vote service bound to a store handle.
#[derive(Debug, Clone)]
pub struct VoteService {
    store: Store,
    max_attempts: u32,
}

impl VoteService {
    /// Creates a service that retries a conflicting vote once.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the total attempt budget. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Records one vote, acquiring and releasing a connection per attempt.
    pub fn cast_vote(&self, request: &VoteRequest) -> ServiceResult<VoteReceipt> {
        let started_at = Instant::now();
        let mut attempt = 1;

        loop {
            let result = self
                .store
                .connect()
                .map_err(ServiceError::from)
                .and_then(|mut conn| cast_vote(&mut conn, request));

            match result {
                Ok(receipt) => {
                    info!(
                        "event=vote_cast module=service status=ok quote_id={} outcome={} attempt={} duration_ms={}",
                        receipt.quote_id,
                        receipt.outcome.label(),
                        attempt,
                        started_at.elapsed().as_millis()
                    );
                    return Ok(receipt);
                }
                Err(err) if err.kind() == ErrorKind::Conflict && attempt < self.max_attempts => {
                    warn!(
                        "event=vote_cast module=service status=retry quote_id={} attempt={} error={}",
                        request.quote_id, attempt, err
                    );
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        "event=vote_cast module=service status=error quote_id={} attempt={} error_kind={} duration_ms={} error={}",
                        request.quote_id,
                        attempt,
                        err.kind(),
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{cast_vote, VoteRequest};
    use crate::db::open_db_in_memory;
    use crate::model::quote::NewQuote;
    use crate::model::vote::Direction;
    use crate::repo::quote_repo::{QuoteRepository, SqliteQuoteRepository};
    use crate::service::error::ErrorKind;

    #[test]
    fn parse_rejects_missing_or_bad_fields() {
        let cases = [
            (None, Some("up")),
            (Some(0), Some("up")),
            (Some(-4), Some("down")),
            (Some(1), None),
            (Some(1), Some("sideways")),
        ];
        for (quote_id, direction) in cases {
            let err = VoteRequest::parse(quote_id, direction, "10.0.0.1").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        let ok = VoteRequest::parse(Some(3), Some("down"), "10.0.0.1").unwrap();
        assert_eq!(ok.quote_id, 3);
        assert_eq!(ok.direction, Direction::Down);
    }

    #[test]
    fn failed_attempt_leaves_connection_reusable() {
        let mut conn = open_db_in_memory().unwrap();
        let quote_id = {
            let repo = SqliteQuoteRepository::new(&conn);
            let author = repo.create_author("Ada", "").unwrap();
            repo.create_quote(&NewQuote {
                author_id: author,
                text: "Hello".to_string(),
                category: None,
            })
            .unwrap()
        };

        let missing = VoteRequest::parse(Some(quote_id + 100), Some("up"), "v").unwrap();
        assert_eq!(
            cast_vote(&mut conn, &missing).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let request = VoteRequest::parse(Some(quote_id), Some("up"), "v").unwrap();
        let receipt = cast_vote(&mut conn, &request).unwrap();
        assert_eq!(receipt.counters.upvotes, 1);
    }
}
