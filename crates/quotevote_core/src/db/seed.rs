//! Sample catalog used by fresh deployments.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};

const SAMPLE_AUTHORS: &[(&str, &str)] = &[
    (
        "Albert Einstein",
        "Theoretical physicist known for the theory of relativity",
    ),
    (
        "Maya Angelou",
        "American poet, memoirist, and civil rights activist",
    ),
    ("Steve Jobs", "Co-founder of Apple Inc."),
    (
        "Nelson Mandela",
        "South African anti-apartheid leader and former president",
    ),
    ("Marie Curie", "Polish-French physicist and chemist"),
    ("Mark Twain", "American writer and humorist"),
    ("Oprah Winfrey", "American media executive and philanthropist"),
];

/// `(author index into SAMPLE_AUTHORS, text, category)`.
const SAMPLE_QUOTES: &[(usize, &str, &str)] = &[
    (0, "Imagination is more important than knowledge.", "wisdom"),
    (
        0,
        "Try not to become a person of success, but rather try to become a person of value.",
        "success",
    ),
    (
        1,
        "If you don't like something, change it. If you can't change it, change your attitude.",
        "attitude",
    ),
    (
        1,
        "I've learned that people will forget what you said, people will forget what you did, but people will never forget how you made them feel.",
        "relationships",
    ),
    (
        2,
        "Innovation distinguishes between a leader and a follower.",
        "innovation",
    ),
    (
        2,
        "Your work is going to fill a large part of your life, and the only way to be truly satisfied is to do what you believe is great work.",
        "work",
    ),
    (3, "It always seems impossible until it's done.", "perseverance"),
    (
        3,
        "Education is the most powerful weapon which you can use to change the world.",
        "education",
    ),
    (
        4,
        "Nothing in life is to be feared, it is only to be understood.",
        "knowledge",
    ),
    (5, "The secret of getting ahead is getting started.", "motivation"),
    (
        6,
        "The biggest adventure you can take is to live the life of your dreams.",
        "dreams",
    ),
];

/// Inserts the sample authors and quotes when no author exists yet.
///
/// Returns `true` when rows were inserted, `false` when the catalog already
/// had data. Runs in a single transaction.
pub fn seed_sample_data(conn: &mut Connection) -> DbResult<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let author_count: i64 = tx.query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))?;
    if author_count > 0 {
        info!("event=seed module=db status=skipped authors={author_count}");
        return Ok(false);
    }

    let mut author_ids = Vec::with_capacity(SAMPLE_AUTHORS.len());
    for (name, bio) in SAMPLE_AUTHORS {
        tx.execute(
            "INSERT INTO authors (name, bio) VALUES (?1, ?2);",
            params![name, bio],
        )?;
        author_ids.push(tx.last_insert_rowid());
    }

    for (author_index, text, category) in SAMPLE_QUOTES {
        tx.execute(
            "INSERT INTO quotes (author_id, text, category) VALUES (?1, ?2, ?3);",
            params![author_ids[*author_index], text, category],
        )?;
    }
    tx.commit()?;

    info!(
        "event=seed module=db status=ok authors={} quotes={}",
        SAMPLE_AUTHORS.len(),
        SAMPLE_QUOTES.len()
    );
    Ok(true)
}
