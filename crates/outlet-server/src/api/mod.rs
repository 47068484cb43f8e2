mod neighbors;
mod outlets;
mod search;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use outlet_upstream::{UpstreamClient, UpstreamError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no upstream base URL is configured.
    pub upstream: Option<UpstreamClient>,
    pub neighbor_radius_km: f64,
}

impl AppState {
    fn upstream(&self) -> Result<&UpstreamClient, ProxyError> {
        self.upstream.as_ref().ok_or_else(ProxyError::missing_api_url)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Error returned to HTTP clients as `{ "error": "<message>" }`.
#[derive(Debug)]
pub struct ProxyError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    error: String,
}

impl ProxyError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn missing_api_url() -> Self {
        tracing::error!("upstream API URL is not configured");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing API URL in environment variables",
        )
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// Maps an upstream failure: non-2xx statuses pass through with `message`,
    /// everything else becomes a 500.
    fn from_upstream(
        error: &UpstreamError,
        message: impl FnOnce(StatusCode) -> String,
    ) -> Self {
        let passthrough = error
            .status()
            .and_then(|s| StatusCode::from_u16(s.as_u16()).ok());
        if let Some(status) = passthrough {
            return Self::new(status, message(status));
        }
        tracing::error!(error = %error, "upstream request failed");
        Self::internal()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorPayload {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    upstream: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/outlets", get(outlets::list_outlets))
        .route("/outlets/{id}/neighbors", get(neighbors::list_neighbors))
        .route("/search", get(search::search_outlets))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let upstream = if state.upstream.is_some() {
        "configured"
    } else {
        "missing"
    };

    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            upstream,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
