//! Quote and author records.
//!
//! # Invariants
//! - `QuoteId` and `AuthorId` are stable and never reused.
//! - A quote references exactly one author.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::vote::Counters;

/// Stable identifier of a quote row.
pub type QuoteId = i64;

/// Stable identifier of an author row.
pub type AuthorId = i64;

/// Category assigned when a quote is created without one.
pub const DEFAULT_CATEGORY: &str = "wisdom";

/// Author reference data, created administratively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub bio: String,
}

/// Author listing row with the number of quotes attributed to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub name: String,
    pub bio: String,
    pub quote_count: i64,
}

/// Quote row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub author_id: AuthorId,
    pub text: String,
    pub category: String,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl Quote {
    pub fn counters(&self) -> Counters {
        Counters {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    pub fn net_score(&self) -> i64 {
        self.counters().net_score()
    }
}

/// Ranked listing row: a quote joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedQuote {
    pub id: QuoteId,
    pub text: String,
    pub category: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub author_name: String,
}

impl RankedQuote {
    pub fn net_score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Featured quote joined with the full author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedQuote {
    pub id: QuoteId,
    pub text: String,
    pub category: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub author_name: String,
    pub author_bio: String,
}

/// Input for administrative quote creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub author_id: AuthorId,
    pub text: String,
    /// Falls back to [`DEFAULT_CATEGORY`] when `None`.
    pub category: Option<String>,
}

/// Validation failure for administrative catalog writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyAuthorName,
    EmptyQuoteText,
    EmptyCategory,
}

impl Display for CatalogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAuthorName => write!(f, "author name cannot be empty"),
            Self::EmptyQuoteText => write!(f, "quote text cannot be empty"),
            Self::EmptyCategory => write!(f, "quote category cannot be empty"),
        }
    }
}

impl Error for CatalogValidationError {}

impl NewQuote {
    /// Category that will be persisted for this quote.
    pub fn effective_category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// Rejects blank text and explicitly blank categories.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.text.trim().is_empty() {
            return Err(CatalogValidationError::EmptyQuoteText);
        }
        if self.effective_category().trim().is_empty() {
            return Err(CatalogValidationError::EmptyCategory);
        }
        Ok(())
    }
}

/// Rejects blank author names.
pub fn validate_author_name(name: &str) -> Result<(), CatalogValidationError> {
    if name.trim().is_empty() {
        Err(CatalogValidationError::EmptyAuthorName)
    } else {
        Ok(())
    }
}
