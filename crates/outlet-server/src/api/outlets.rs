use axum::{extract::State, Json};
use outlet_upstream::UpstreamError;

use super::{AppState, ProxyError};

/// Maps a failed `<base>/outlets` fetch to the proxy's error body.
pub(super) fn map_fetch_error(error: &UpstreamError) -> ProxyError {
    ProxyError::from_upstream(error, |status| {
        format!("Failed to fetch data: {}", status.as_u16())
    })
}

/// `GET /outlets`: forwards to `<base>/outlets` and returns the body verbatim.
pub(super) async fn list_outlets(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ProxyError> {
    let payload = state
        .upstream()?
        .fetch_outlets()
        .await
        .map_err(|e| map_fetch_error(&e))?;

    Ok(Json(payload))
}
