use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use outlet_core::normalize_search_results;
use serde::Deserialize;

use super::{AppState, ProxyError};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    query: Option<String>,
}

/// `GET /search?query=...`: forwards a free-text search upstream.
///
/// The response is always a JSON array, whichever of the two upstream result
/// shapes came back.
pub(super) async fn search_outlets(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ProxyError> {
    let upstream = state.upstream()?;

    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ProxyError::new(StatusCode::BAD_REQUEST, "Missing search query parameter"))?;

    let payload = upstream.search(&query).await.map_err(|e| {
        ProxyError::from_upstream(&e, |status| {
            format!("Failed to fetch search results: {status}")
        })
    })?;

    let results = normalize_search_results(payload);
    tracing::debug!(query = %query, results = results.len(), "search completed");

    Ok(([(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")], Json(results)))
}
