use std::sync::Arc;

use quotevote_core::{QuoteService, Store, VoteService};

use super::config::Config;

pub struct State {
    pub config: Config,
    pub votes: VoteService,
    pub quotes: QuoteService,
}

impl State {
    pub fn new(config: Config, store: Store) -> Arc<Self> {
        let votes = VoteService::new(store.clone()).with_max_attempts(config.vote_attempts);
        let quotes = QuoteService::new(store);

        Arc::new(Self {
            config,
            votes,
            quotes,
        })
    }
}
