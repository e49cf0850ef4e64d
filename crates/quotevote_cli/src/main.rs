//! Operator CLI for a quote vote store.
//!
//! # Responsibility
//! - Verify `quotevote_core` linkage and inspect a database file.
//! - Cast votes and list rankings without running the HTTP server.

use clap::{Parser, Subcommand};
use quotevote_core::db::migrations::{latest_version, schema_version};
use quotevote_core::{seed_sample_data, DbOptions, QuoteService, Store, VoteRequest, VoteService};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "quotevote")]
#[command(about = "Quote vote store maintenance and smoke checks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core ping and version
    Ping,

    /// Open (and migrate) a database, then print schema version and row counts
    Check {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,
    },

    /// Insert the sample catalog into an empty database
    Seed {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,
    },

    /// Cast one vote on behalf of a visitor
    Vote {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,

        /// Quote id
        #[arg(short, long)]
        quote: i64,

        /// Visitor identity (usually an IP address)
        #[arg(long, default_value = "127.0.0.1")]
        visitor: String,

        /// `up` or `down`
        #[arg(short, long)]
        direction: String,

        /// Busy timeout in milliseconds
        #[arg(long, default_value = "5000")]
        busy_timeout_ms: u64,
    },

    /// List quotes ranked by net score
    Top {
        /// SQLite database file
        #[arg(long)]
        db: PathBuf,

        /// Only list this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ping => {
            handle_ping();
            Ok(())
        }
        Commands::Check { db } => handle_check(db),
        Commands::Seed { db } => handle_seed(db),
        Commands::Vote {
            db,
            quote,
            visitor,
            direction,
            busy_timeout_ms,
        } => handle_vote(db, quote, visitor, direction, busy_timeout_ms),
        Commands::Top {
            db,
            category,
            limit,
        } => handle_top(db, category, limit),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn handle_ping() {
    println!("quotevote_core ping={}", quotevote_core::ping());
    println!("quotevote_core version={}", quotevote_core::core_version());
}

fn open_store(db: PathBuf, options: DbOptions) -> Result<Store, String> {
    Store::open(db, options).map_err(|e| format!("cannot open store: {e}"))
}

fn handle_check(db: PathBuf) -> Result<(), String> {
    let store = open_store(db, DbOptions::default())?;
    let conn = store.connect().map_err(|e| e.to_string())?;
    let version = schema_version(&conn).map_err(|e| e.to_string())?;
    drop(conn);

    let counts = QuoteService::new(store.clone())
        .counts()
        .map_err(|e| e.to_string())?;

    println!("path={}", store.path().display());
    println!("schema_version={version} latest={}", latest_version());
    println!(
        "authors={} quotes={} votes={}",
        counts.authors, counts.quotes, counts.votes
    );
    Ok(())
}

fn handle_seed(db: PathBuf) -> Result<(), String> {
    let store = open_store(db, DbOptions::default())?;
    let mut conn = store.connect().map_err(|e| e.to_string())?;
    let inserted = seed_sample_data(&mut conn).map_err(|e| e.to_string())?;

    if inserted {
        println!("seeded sample catalog");
    } else {
        println!("catalog already has authors; nothing inserted");
    }
    Ok(())
}

fn handle_vote(
    db: PathBuf,
    quote: i64,
    visitor: String,
    direction: String,
    busy_timeout_ms: u64,
) -> Result<(), String> {
    let request = VoteRequest::parse(Some(quote), Some(&direction), visitor)
        .map_err(|e| e.to_string())?;
    let store = open_store(
        db,
        DbOptions {
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        },
    )?;

    let receipt = VoteService::new(store)
        .cast_vote(&request)
        .map_err(|e| format!("{} ({})", e, e.kind()))?;

    println!("{}", receipt.outcome.message());
    println!(
        "quote={} upvotes={} downvotes={} net={}",
        receipt.quote_id,
        receipt.counters.upvotes,
        receipt.counters.downvotes,
        receipt.counters.net_score()
    );
    Ok(())
}

fn handle_top(db: PathBuf, category: Option<String>, limit: usize) -> Result<(), String> {
    let store = open_store(db, DbOptions::default())?;
    let quotes = QuoteService::new(store)
        .list_quotes(category.as_deref())
        .map_err(|e| e.to_string())?;

    if quotes.is_empty() {
        println!("no quotes");
        return Ok(());
    }

    for (rank, quote) in quotes.iter().take(limit).enumerate() {
        println!(
            "{:>3}. [{:+}] #{} {} ({}, {})",
            rank + 1,
            quote.net_score(),
            quote.id,
            quote.text,
            quote.author_name,
            quote.category
        );
    }
    Ok(())
}
