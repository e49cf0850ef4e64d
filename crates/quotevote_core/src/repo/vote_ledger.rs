//! Vote ledger: who voted which way on which quote.
//!
//! # Responsibility
//! - Own `user_votes` rows and the one-vote-per-visitor rule.
//! - Classify an incoming vote as new, unchanged or changed.
//!
//! # Invariants
//! - At most one row exists per `(quote_id, visitor_id)` (enforced by a
//!   `UNIQUE` constraint and by upsert-only writes).
//! - `Unchanged` outcomes perform no write.
//! - The ledger never commits. It runs inside the caller's transaction so the
//!   matching tally delta lands in the same unit.

use crate::model::quote::QuoteId;
use crate::model::vote::{Direction, VoteOutcome, VoteRecord};
use crate::repo::quote_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for visitor vote records.
pub trait VoteLedger {
    /// Loads the current vote of `visitor_id` on `quote_id`, if any.
    fn previous_vote(&self, quote_id: QuoteId, visitor_id: &str)
        -> RepoResult<Option<VoteRecord>>;
    /// Classifies the vote and upserts the record for `New`/`Changed`.
    ///
    /// # Errors
    /// - `RepoError::QuoteNotFound` when `quote_id` does not exist.
    fn resolve_and_record(
        &self,
        quote_id: QuoteId,
        visitor_id: &str,
        direction: Direction,
    ) -> RepoResult<VoteOutcome>;
    /// Lists all vote records for one quote ordered by visitor.
    fn votes_for_quote(&self, quote_id: QuoteId) -> RepoResult<Vec<VoteRecord>>;
}

/// SQLite-backed vote ledger bound to an open transaction or connection.
pub struct SqliteVoteLedger<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVoteLedger<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VoteLedger for SqliteVoteLedger<'_> {
    fn previous_vote(
        &self,
        quote_id: QuoteId,
        visitor_id: &str,
    ) -> RepoResult<Option<VoteRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT quote_id, visitor_id, direction, updated_at
                 FROM user_votes
                 WHERE quote_id = ?1 AND visitor_id = ?2;",
                params![quote_id, visitor_id],
                |row| Ok(read_vote_row(row)),
            )
            .optional()?;

        record.transpose()
    }

    fn resolve_and_record(
        &self,
        quote_id: QuoteId,
        visitor_id: &str,
        direction: Direction,
    ) -> RepoResult<VoteOutcome> {
        if !quote_exists(self.conn, quote_id)? {
            return Err(RepoError::QuoteNotFound(quote_id));
        }

        let previous = self
            .previous_vote(quote_id, visitor_id)?
            .map(|record| record.direction);
        let outcome = VoteOutcome::classify(previous, direction);

        if outcome.is_write() {
            self.conn.execute(
                "INSERT INTO user_votes (quote_id, visitor_id, direction, updated_at)
                 VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
                 ON CONFLICT (quote_id, visitor_id) DO UPDATE SET
                    direction = excluded.direction,
                    updated_at = excluded.updated_at;",
                params![quote_id, visitor_id, direction.as_str()],
            )?;
        }

        Ok(outcome)
    }

    fn votes_for_quote(&self, quote_id: QuoteId) -> RepoResult<Vec<VoteRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT quote_id, visitor_id, direction, updated_at
             FROM user_votes
             WHERE quote_id = ?1
             ORDER BY visitor_id ASC;",
        )?;
        let mut rows = stmt.query([quote_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(read_vote_row(row)?);
        }

        Ok(records)
    }
}

fn read_vote_row(row: &Row<'_>) -> RepoResult<VoteRecord> {
    let direction_text: String = row.get("direction")?;
    let direction = direction_text.parse::<Direction>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid direction `{direction_text}` in user_votes.direction"
        ))
    })?;

    Ok(VoteRecord {
        quote_id: row.get("quote_id")?,
        visitor_id: row.get("visitor_id")?,
        direction,
        updated_at: row.get("updated_at")?,
    })
}

fn quote_exists(conn: &Connection, quote_id: QuoteId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM quotes WHERE id = ?1);",
        [quote_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
