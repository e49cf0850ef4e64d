use quotevote_core::db::open_db_in_memory;
use quotevote_core::{
    cast_vote, Counters, Direction, ErrorKind, NewQuote, QuoteId, QuoteRepository,
    SqliteQuoteRepository, SqliteTallyEngine, SqliteVoteLedger, TallyEngine, VoteLedger,
    VoteOutcome, VoteRequest,
};
use rusqlite::Connection;

fn seed_quote(conn: &Connection, text: &str) -> QuoteId {
    let repo = SqliteQuoteRepository::new(conn);
    let author = repo.create_author("Marie Curie", "physicist").unwrap();
    repo.create_quote(&NewQuote {
        author_id: author,
        text: text.to_string(),
        category: Some("knowledge".to_string()),
    })
    .unwrap()
}

fn vote(conn: &mut Connection, quote_id: QuoteId, visitor: &str, direction: &str) -> VoteOutcome {
    let request = VoteRequest::parse(Some(quote_id), Some(direction), visitor).unwrap();
    cast_vote(conn, &request).unwrap().outcome
}

fn counters(conn: &Connection, quote_id: QuoteId) -> Counters {
    SqliteTallyEngine::new(conn)
        .counters(quote_id)
        .unwrap()
        .unwrap()
}

#[test]
fn first_vote_is_new_and_increments_matching_counter() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Be less curious about people.");

    let outcome = vote(&mut conn, quote_id, "1.2.3.4", "up");
    assert_eq!(
        outcome,
        VoteOutcome::New {
            direction: Direction::Up
        }
    );
    assert_eq!(outcome.message(), "Vote recorded");
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 1,
            downvotes: 0
        }
    );

    vote(&mut conn, quote_id, "5.6.7.8", "down");
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 1,
            downvotes: 1
        }
    );
}

#[test]
fn repeating_a_vote_is_unchanged_and_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Nothing in life is to be feared.");

    vote(&mut conn, quote_id, "1.2.3.4", "up");
    let updated_at_first = SqliteVoteLedger::new(&conn)
        .previous_vote(quote_id, "1.2.3.4")
        .unwrap()
        .unwrap()
        .updated_at;

    let outcome = vote(&mut conn, quote_id, "1.2.3.4", "up");
    assert_eq!(
        outcome,
        VoteOutcome::Unchanged {
            direction: Direction::Up
        }
    );
    assert_eq!(outcome.message(), "Vote already exists");
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 1,
            downvotes: 0
        }
    );

    let record = SqliteVoteLedger::new(&conn)
        .previous_vote(quote_id, "1.2.3.4")
        .unwrap()
        .unwrap();
    assert_eq!(record.updated_at, updated_at_first);
}

#[test]
fn switching_moves_one_count_and_keeps_single_record() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "It is only to be understood.");

    vote(&mut conn, quote_id, "1.2.3.4", "up");
    let outcome = vote(&mut conn, quote_id, "1.2.3.4", "down");
    assert_eq!(
        outcome,
        VoteOutcome::Changed {
            from: Direction::Up,
            to: Direction::Down
        }
    );
    assert_eq!(outcome.message(), "Vote updated");
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 0,
            downvotes: 1
        }
    );

    let records = SqliteVoteLedger::new(&conn)
        .votes_for_quote(quote_id)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::Down);
    assert_eq!(records[0].visitor_id, "1.2.3.4");

    vote(&mut conn, quote_id, "1.2.3.4", "up");
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 1,
            downvotes: 0
        }
    );
}

#[test]
fn vote_on_missing_quote_is_not_found_and_touches_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Existing quote.");
    vote(&mut conn, quote_id, "1.2.3.4", "up");

    let request = VoteRequest::parse(Some(quote_id + 41), Some("down"), "1.2.3.4").unwrap();
    let err = cast_vote(&mut conn, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 1,
            downvotes: 0
        }
    );
    let total_votes: i64 = conn
        .query_row("SELECT COUNT(*) FROM user_votes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total_votes, 1);
}

#[test]
fn tally_failure_rolls_back_ledger_write() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Rollback target.");
    vote(&mut conn, quote_id, "1.2.3.4", "up");

    // Corrupt the tally so a switch would drive upvotes below zero.
    conn.execute(
        "UPDATE quotes SET upvotes = 0 WHERE id = ?1;",
        [quote_id],
    )
    .unwrap();

    let request = VoteRequest::parse(Some(quote_id), Some("down"), "1.2.3.4").unwrap();
    let err = cast_vote(&mut conn, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

    let record = SqliteVoteLedger::new(&conn)
        .previous_vote(quote_id, "1.2.3.4")
        .unwrap()
        .unwrap();
    assert_eq!(record.direction, Direction::Up);
    assert_eq!(
        counters(&conn, quote_id),
        Counters {
            upvotes: 0,
            downvotes: 0
        }
    );
}

#[test]
fn ledger_rejects_unknown_quote_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let ledger = SqliteVoteLedger::new(&conn);
    let err = ledger
        .resolve_and_record(99, "1.2.3.4", Direction::Up)
        .unwrap_err();
    assert!(matches!(err, quotevote_core::RepoError::QuoteNotFound(99)));
}

#[test]
fn tally_apply_returns_post_update_counters() {
    let conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Counter target.");
    let engine = SqliteTallyEngine::new(&conn);

    let after_new = engine
        .apply(
            quote_id,
            VoteOutcome::New {
                direction: Direction::Down,
            },
        )
        .unwrap();
    assert_eq!(
        after_new,
        Counters {
            upvotes: 0,
            downvotes: 1
        }
    );

    let after_noop = engine
        .apply(
            quote_id,
            VoteOutcome::Unchanged {
                direction: Direction::Down,
            },
        )
        .unwrap();
    assert_eq!(after_noop, after_new);

    let missing = engine.apply(
        quote_id + 1,
        VoteOutcome::New {
            direction: Direction::Up,
        },
    );
    assert!(matches!(
        missing,
        Err(quotevote_core::RepoError::QuoteNotFound(_))
    ));
}

#[test]
fn vote_then_list_shows_exactly_one_more_upvote() {
    let mut conn = open_db_in_memory().unwrap();
    let quote_id = seed_quote(&conn, "Round trip.");

    let before = SqliteQuoteRepository::new(&conn)
        .get_quote(quote_id)
        .unwrap()
        .unwrap();
    vote(&mut conn, quote_id, "1.2.3.4", "up");
    let after = SqliteQuoteRepository::new(&conn)
        .get_quote(quote_id)
        .unwrap()
        .unwrap();

    assert_eq!(after.upvotes, before.upvotes + 1);
    assert_eq!(after.downvotes, before.downvotes);
    assert_eq!(after.net_score(), before.net_score() + 1);
}
