use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use outlet_core::{Neighbor, Outlet, SelectionController};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{outlets::map_fetch_error, ApiResponse, AppState, ProxyError, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NeighborParams {
    radius_km: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NeighborsData {
    pub selected: Outlet,
    pub neighbors: Vec<Neighbor>,
    pub radius_km: f64,
    pub radius_meters: f64,
    /// Upstream records dropped while building the snapshot.
    pub skipped: usize,
}

fn parse_radius(raw: Option<&str>, default_km: f64) -> Result<f64, ProxyError> {
    let Some(raw) = raw else {
        return Ok(default_km);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|km| km.is_finite() && *km >= 0.0)
        .ok_or_else(|| ProxyError::new(StatusCode::BAD_REQUEST, "Invalid radius_km parameter"))
}

/// `GET /outlets/{id}/neighbors`: focuses one outlet and lists the outlets
/// within the radius, nearest first.
pub(super) async fn list_neighbors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<NeighborParams>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<NeighborsData>>, ProxyError> {
    let upstream = state.upstream()?;
    let radius_km = parse_radius(params.radius_km.as_deref(), state.neighbor_radius_km)?;

    let snapshot = upstream
        .fetch_snapshot()
        .await
        .map_err(|e| map_fetch_error(&e))?;
    let skipped = snapshot.skipped();

    let mut controller = SelectionController::new(snapshot, radius_km);
    let selected = controller
        .select_entity(&id)
        .map_err(|_| ProxyError::new(StatusCode::NOT_FOUND, format!("Outlet not found: {id}")))?
        .selected()
        .cloned()
        .ok_or_else(ProxyError::internal)?;

    Ok(Json(ApiResponse {
        data: NeighborsData {
            selected,
            neighbors: controller.nearest(),
            radius_km,
            radius_meters: controller.radius_meters(),
            skipped,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
