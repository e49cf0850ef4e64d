//! HTTP boundary for the quote voting service.
//!
//! # Routes
//! - `POST /api/vote`: body `{quote_id, vote_type}`; the visitor is the peer
//!   address of the connection.
//! - `GET /api/quotes?category=`: quotes ranked by net score.
//! - `GET /api/quote-of-the-day`: one uniformly random quote with its author.
//! - `GET /api/authors`: authors with quote counts.
//! - `GET /api/health`: store liveness probe.
//!
//! # Configuration
//! All settings come from `QUOTEVOTE_*` environment variables, see [`config`].
//!
//! # Notes
//! Store calls run on tokio's blocking pool. Each request opens its own SQLite
//! connection and drops it before the response is sent.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use log::{error, info};
use quotevote_core::{init_logging, seed_sample_data, DbOptions, LogSettings, Store};
use tokio::{net::TcpListener, signal};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use error::ServerError;
use routes::{
    authors_handler, health_handler, quote_of_the_day_handler, quotes_handler, vote_handler,
};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    Router::new()
        .route("/api/vote", post(vote_handler))
        .route("/api/quotes", get(quotes_handler))
        .route("/api/quote-of-the-day", get(quote_of_the_day_handler))
        .route("/api/authors", get(authors_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Opens the store described by `config`, seeding sample data when enabled.
pub fn open_store(config: &Config) -> Result<Store, ServerError> {
    let store = Store::open(
        &config.db_path,
        DbOptions {
            busy_timeout: config.busy_timeout,
        },
    )?;

    if config.seed {
        let mut conn = store.connect()?;
        seed_sample_data(&mut conn)?;
    }

    Ok(store)
}

pub async fn start_server() -> Result<(), ServerError> {
    let config = Config::load()?;

    init_logging(&LogSettings {
        level: config.log_level.clone(),
        log_dir: config.log_dir.to_string_lossy().into_owned(),
        echo_stderr: true,
    })
    .map_err(ServerError::Logging)?;

    info!("event=server_init module=server status=start db_path={}", config.db_path.display());
    let store = open_store(&config)?;
    let state = State::new(config, store);

    let address = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("event=server_init module=server status=ok address={address}");

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("event=server_shutdown module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("event=signal module=server kind=ctrl_c"),
            Err(e) => {
                error!("event=signal module=server status=error kind=ctrl_c error={e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=signal module=server kind=terminate");
            }
            Err(e) => {
                error!("event=signal module=server status=error kind=terminate error={e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
