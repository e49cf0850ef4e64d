//! Vote vocabulary shared by the ledger and the tally engine.
//!
//! # Responsibility
//! - Parse and render vote directions.
//! - Classify an incoming vote against the visitor's previous one.
//! - Map a classification to the counter delta it implies.
//!
//! # Invariants
//! - At most one [`VoteRecord`] exists per `(quote_id, visitor_id)`.
//! - `Unchanged` never implies a counter change.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::quote::QuoteId;

/// Polarity of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Stable storage/wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text is not exactly `up` or `down`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirection(pub String);

impl Display for InvalidDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid vote direction `{}`; expected up|down", self.0)
    }
}

impl Error for InvalidDirection {}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

/// Ledger classification of an incoming vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum VoteOutcome {
    /// The visitor had not voted on this quote before.
    New { direction: Direction },
    /// The visitor repeated their previous vote; nothing is written.
    Unchanged { direction: Direction },
    /// The visitor switched polarity.
    Changed { from: Direction, to: Direction },
}

impl VoteOutcome {
    /// Classifies `requested` against the visitor's previous direction.
    pub fn classify(previous: Option<Direction>, requested: Direction) -> Self {
        match previous {
            None => Self::New {
                direction: requested,
            },
            Some(old) if old == requested => Self::Unchanged {
                direction: requested,
            },
            Some(old) => Self::Changed {
                from: old,
                to: requested,
            },
        }
    }

    /// Direction the visitor holds after this outcome.
    pub fn direction(self) -> Direction {
        match self {
            Self::New { direction } | Self::Unchanged { direction } => direction,
            Self::Changed { to, .. } => to,
        }
    }

    /// Whether this outcome requires a ledger and tally write.
    pub fn is_write(self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }

    /// Counter delta implied by this outcome.
    pub fn delta(self) -> CounterDelta {
        match self {
            Self::Unchanged { .. } => CounterDelta::default(),
            Self::New { direction } => CounterDelta::default().plus(direction),
            Self::Changed { from, to } => CounterDelta::default().minus(from).plus(to),
        }
    }

    /// User-facing confirmation text.
    pub fn message(self) -> &'static str {
        match self {
            Self::New { .. } => "Vote recorded",
            Self::Changed { .. } => "Vote updated",
            Self::Unchanged { .. } => "Vote already exists",
        }
    }

    /// Stable log/metrics label.
    pub fn label(self) -> &'static str {
        match self {
            Self::New { .. } => "new",
            Self::Changed { .. } => "changed",
            Self::Unchanged { .. } => "unchanged",
        }
    }
}

/// Signed adjustment to a quote's counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl CounterDelta {
    fn plus(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.upvotes += 1,
            Direction::Down => self.downvotes += 1,
        }
        self
    }

    fn minus(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.upvotes -= 1,
            Direction::Down => self.downvotes -= 1,
        }
        self
    }

    pub fn is_zero(self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }
}

/// Post-update counter pair of one quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl Counters {
    pub fn net_score(self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Persisted ledger row for one `(quote_id, visitor_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub quote_id: QuoteId,
    pub visitor_id: String,
    pub direction: Direction,
    /// Epoch milliseconds of the last direction change.
    pub updated_at: i64,
}
