//! Quote/author catalog contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide administrative create APIs for authors and quotes.
//! - Provide the ranked listing, random pick and author summary reads.
//!
//! # Invariants
//! - Ranked listing is deterministic: net score DESC, then insertion order.
//! - Reads always hit the database; nothing is cached between calls.
//! - Write paths validate input before SQL mutations.

use crate::db::DbError;
use crate::model::quote::{
    validate_author_name, Author, AuthorId, AuthorSummary, CatalogValidationError, FeaturedQuote,
    NewQuote, Quote, QuoteId, RankedQuote,
};
use rand::{Rng, RngCore};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog, ledger and tally operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CatalogValidationError),
    Db(DbError),
    QuoteNotFound(QuoteId),
    AuthorNotFound(AuthorId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::QuoteNotFound(id) => write!(f, "quote not found: {id}"),
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::QuoteNotFound(_) => None,
            Self::AuthorNotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<CatalogValidationError> for RepoError {
    fn from(value: CatalogValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for the ranked quote listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteListQuery {
    /// Optional exact-match category filter.
    pub category: Option<String>,
}

/// Row counts across the three relations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub authors: i64,
    pub quotes: i64,
    pub votes: i64,
}

/// Repository interface for the quote/author catalog.
pub trait QuoteRepository {
    fn create_author(&self, name: &str, bio: &str) -> RepoResult<AuthorId>;
    fn create_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>>;
    /// Lists quotes by net score DESC; ties keep insertion order.
    fn list_ranked(&self, query: &QuoteListQuery) -> RepoResult<Vec<RankedQuote>>;
    /// Uniformly picks one quote, or `None` when the catalog is empty.
    fn random_quote(&self, rng: &mut dyn RngCore) -> RepoResult<Option<FeaturedQuote>>;
    fn list_authors(&self) -> RepoResult<Vec<AuthorSummary>>;
    fn counts(&self) -> RepoResult<StoreCounts>;
}

/// SQLite-backed catalog repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn create_author(&self, name: &str, bio: &str) -> RepoResult<AuthorId> {
        validate_author_name(name)?;

        self.conn.execute(
            "INSERT INTO authors (name, bio) VALUES (?1, ?2);",
            params![name.trim(), bio],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn create_quote(&self, quote: &NewQuote) -> RepoResult<QuoteId> {
        quote.validate()?;

        if !author_exists(self.conn, quote.author_id)? {
            return Err(RepoError::AuthorNotFound(quote.author_id));
        }

        self.conn.execute(
            "INSERT INTO quotes (author_id, text, category) VALUES (?1, ?2, ?3);",
            params![
                quote.author_id,
                quote.text.as_str(),
                quote.effective_category()
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                "SELECT id, name, bio FROM authors WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Author {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        bio: row.get("bio")?,
                    })
                },
            )
            .optional()?;

        Ok(author)
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        let quote = self
            .conn
            .query_row(
                "SELECT id, author_id, text, category, upvotes, downvotes
                 FROM quotes
                 WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Quote {
                        id: row.get("id")?,
                        author_id: row.get("author_id")?,
                        text: row.get("text")?,
                        category: row.get("category")?,
                        upvotes: row.get("upvotes")?,
                        downvotes: row.get("downvotes")?,
                    })
                },
            )
            .optional()?;

        Ok(quote)
    }

    fn list_ranked(&self, query: &QuoteListQuery) -> RepoResult<Vec<RankedQuote>> {
        let mut sql = String::from(
            "SELECT q.id, q.text, q.category, q.upvotes, q.downvotes, a.name AS author_name
             FROM quotes q
             INNER JOIN authors a ON a.id = q.author_id",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category.as_ref() {
            sql.push_str(" WHERE q.category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        sql.push_str(" ORDER BY (q.upvotes - q.downvotes) DESC, q.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut quotes = Vec::new();
        while let Some(row) = rows.next()? {
            quotes.push(parse_ranked_row(row)?);
        }

        Ok(quotes)
    }

    fn random_quote(&self, rng: &mut dyn RngCore) -> RepoResult<Option<FeaturedQuote>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes;", [], |row| row.get(0))?;
        if total <= 0 {
            return Ok(None);
        }

        let offset = rng.gen_range(0..total);
        let quote = self
            .conn
            .query_row(
                "SELECT q.id, q.text, q.category, q.upvotes, q.downvotes,
                        a.name AS author_name, a.bio AS author_bio
                 FROM quotes q
                 INNER JOIN authors a ON a.id = q.author_id
                 ORDER BY q.id ASC
                 LIMIT 1 OFFSET ?1;",
                [offset],
                |row| {
                    Ok(FeaturedQuote {
                        id: row.get("id")?,
                        text: row.get("text")?,
                        category: row.get("category")?,
                        upvotes: row.get("upvotes")?,
                        downvotes: row.get("downvotes")?,
                        author_name: row.get("author_name")?,
                        author_bio: row.get("author_bio")?,
                    })
                },
            )
            .optional()?;

        Ok(quote)
    }

    fn list_authors(&self) -> RepoResult<Vec<AuthorSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name, a.bio, COUNT(q.id) AS quote_count
             FROM authors a
             LEFT JOIN quotes q ON q.author_id = a.id
             GROUP BY a.id, a.name, a.bio
             ORDER BY quote_count DESC, a.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(AuthorSummary {
                id: row.get("id")?,
                name: row.get("name")?,
                bio: row.get("bio")?,
                quote_count: row.get("quote_count")?,
            });
        }

        Ok(authors)
    }

    fn counts(&self) -> RepoResult<StoreCounts> {
        let counts = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM authors),
                (SELECT COUNT(*) FROM quotes),
                (SELECT COUNT(*) FROM user_votes);",
            [],
            |row| {
                Ok(StoreCounts {
                    authors: row.get(0)?,
                    quotes: row.get(1)?,
                    votes: row.get(2)?,
                })
            },
        )?;

        Ok(counts)
    }
}

fn parse_ranked_row(row: &Row<'_>) -> RepoResult<RankedQuote> {
    let quote = RankedQuote {
        id: row.get("id")?,
        text: row.get("text")?,
        category: row.get("category")?,
        upvotes: row.get("upvotes")?,
        downvotes: row.get("downvotes")?,
        author_name: row.get("author_name")?,
    };

    if quote.upvotes < 0 || quote.downvotes < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative counters ({}, {}) on quote {}",
            quote.upvotes, quote.downvotes, quote.id
        )));
    }

    Ok(quote)
}

fn author_exists(conn: &Connection, id: AuthorId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
