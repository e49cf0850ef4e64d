use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use quotevote_core::{AuthorSummary, FeaturedQuote, RankedQuote, ServiceResult, VoteRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::spawn_blocking;

use crate::{error::AppError, state::State};

#[derive(Deserialize)]
pub struct VotePayload {
    quote_id: Option<i64>,
    vote_type: Option<String>,
}

#[derive(Serialize)]
pub struct VoteResponse {
    success: bool,
    message: &'static str,
}

#[derive(Deserialize)]
pub struct QuotesParams {
    category: Option<String>,
}

/// Runs a store-bound closure on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

pub async fn vote_handler(
    AxumState(state): AxumState<Arc<State>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<VotePayload>, JsonRejection>,
) -> Result<Json<VoteResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("event=vote_rejected module=server status=error reason=malformed_json");
        AppError::MalformedPayload(rejection.body_text())
    })?;

    let request = VoteRequest::parse(
        payload.quote_id,
        payload.vote_type.as_deref(),
        peer.ip().to_string(),
    )?;

    let receipt = blocking(move || state.votes.cast_vote(&request)).await?;

    Ok(Json(VoteResponse {
        success: true,
        message: receipt.outcome.message(),
    }))
}

pub async fn quotes_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(params): Query<QuotesParams>,
) -> Result<Json<Vec<RankedQuote>>, AppError> {
    let quotes = blocking(move || state.quotes.list_quotes(params.category.as_deref())).await?;

    Ok(Json(quotes))
}

pub async fn quote_of_the_day_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Json<FeaturedQuote>, AppError> {
    blocking(move || state.quotes.quote_of_the_day())
        .await?
        .map(Json)
        .ok_or(AppError::NoQuotes)
}

pub async fn authors_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Json<Vec<AuthorSummary>>, AppError> {
    let authors = blocking(move || state.quotes.list_authors()).await?;

    Ok(Json(authors))
}

pub async fn health_handler(AxumState(state): AxumState<Arc<State>>) -> Response {
    match blocking(move || state.quotes.counts()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        )
            .into_response(),
        Err(e) => {
            warn!("event=health module=server status=error error={e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
