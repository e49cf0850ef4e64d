//! Tally engine: cumulative up/down counters per quote.
//!
//! # Responsibility
//! - Own `quotes.upvotes` / `quotes.downvotes`.
//! - Apply the counter delta implied by a ledger outcome.
//!
//! # Invariants
//! - A delta is applied as one `UPDATE ... RETURNING` statement, never as a
//!   separate read and write.
//! - Counters never go negative (schema `CHECK` rejects it).
//! - The engine does not judge whether an outcome is correct; the ledger does.

use crate::model::quote::QuoteId;
use crate::model::vote::{Counters, VoteOutcome};
use crate::repo::quote_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for quote counters.
pub trait TallyEngine {
    /// Applies the delta for `outcome` and returns the post-update counters.
    ///
    /// # Errors
    /// - `RepoError::QuoteNotFound` when `quote_id` does not exist.
    fn apply(&self, quote_id: QuoteId, outcome: VoteOutcome) -> RepoResult<Counters>;
    /// Reads current counters without modifying them.
    fn counters(&self, quote_id: QuoteId) -> RepoResult<Option<Counters>>;
}

/// SQLite-backed tally engine bound to an open transaction or connection.
pub struct SqliteTallyEngine<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTallyEngine<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TallyEngine for SqliteTallyEngine<'_> {
    fn apply(&self, quote_id: QuoteId, outcome: VoteOutcome) -> RepoResult<Counters> {
        let delta = outcome.delta();
        let counters = if delta.is_zero() {
            self.counters(quote_id)?
        } else {
            self.conn
                .query_row(
                    "UPDATE quotes
                     SET
                        upvotes = upvotes + ?2,
                        downvotes = downvotes + ?3
                     WHERE id = ?1
                     RETURNING upvotes, downvotes;",
                    params![quote_id, delta.upvotes, delta.downvotes],
                    |row| {
                        Ok(Counters {
                            upvotes: row.get(0)?,
                            downvotes: row.get(1)?,
                        })
                    },
                )
                .optional()?
        };

        counters.ok_or(RepoError::QuoteNotFound(quote_id))
    }

    fn counters(&self, quote_id: QuoteId) -> RepoResult<Option<Counters>> {
        let counters = self
            .conn
            .query_row(
                "SELECT upvotes, downvotes FROM quotes WHERE id = ?1;",
                [quote_id],
                |row| {
                    Ok(Counters {
                        upvotes: row.get(0)?,
                        downvotes: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(counters)
    }
}
