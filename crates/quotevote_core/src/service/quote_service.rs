//! Catalog read use-cases: ranked browse, quote of the day, authors.
//!
//! # Responsibility
//! - Expose catalog reads and administrative writes through a store handle.
//! - Map repository failures into the shared service error taxonomy.
//!
//! # Invariants
//! - Every call acquires its own connection and drops it before returning.
//! - The quote of the day is drawn fresh on every call; nothing is pinned per
//!   calendar day.

use crate::db::Store;
use crate::model::quote::{AuthorId, AuthorSummary, FeaturedQuote, NewQuote, QuoteId, RankedQuote};
use crate::repo::quote_repo::{QuoteListQuery, QuoteRepository, SqliteQuoteRepository, StoreCounts};
use crate::service::error::ServiceResult;
use rand::RngCore;

/// Catalog service bound to a store handle.
#[derive(Debug, Clone)]
pub struct QuoteService {
    store: Store,
}

impl QuoteService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Lists quotes ranked by net score, optionally restricted to one category.
    ///
    /// A blank category is treated as no filter.
    pub fn list_quotes(&self, category: Option<&str>) -> ServiceResult<Vec<RankedQuote>> {
        let query = QuoteListQuery {
            category: category
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        };
        let conn = self.store.connect()?;
        let quotes = SqliteQuoteRepository::new(&conn).list_ranked(&query)?;
        Ok(quotes)
    }

    /// Draws one quote uniformly at random using the thread RNG.
    pub fn quote_of_the_day(&self) -> ServiceResult<Option<FeaturedQuote>> {
        self.quote_of_the_day_with(&mut rand::thread_rng())
    }

    /// Draws one quote uniformly at random using `rng`.
    pub fn quote_of_the_day_with(
        &self,
        rng: &mut dyn RngCore,
    ) -> ServiceResult<Option<FeaturedQuote>> {
        let conn = self.store.connect()?;
        let quote = SqliteQuoteRepository::new(&conn).random_quote(rng)?;
        Ok(quote)
    }

    pub fn list_authors(&self) -> ServiceResult<Vec<AuthorSummary>> {
        let conn = self.store.connect()?;
        let authors = SqliteQuoteRepository::new(&conn).list_authors()?;
        Ok(authors)
    }

    pub fn create_author(&self, name: &str, bio: &str) -> ServiceResult<AuthorId> {
        let conn = self.store.connect()?;
        let id = SqliteQuoteRepository::new(&conn).create_author(name, bio)?;
        Ok(id)
    }

    pub fn create_quote(&self, quote: &NewQuote) -> ServiceResult<QuoteId> {
        let conn = self.store.connect()?;
        let id = SqliteQuoteRepository::new(&conn).create_quote(quote)?;
        Ok(id)
    }

    /// Opens a connection and counts rows; used as a liveness probe.
    pub fn counts(&self) -> ServiceResult<StoreCounts> {
        let conn = self.store.connect()?;
        let counts = SqliteQuoteRepository::new(&conn).counts()?;
        Ok(counts)
    }
}
