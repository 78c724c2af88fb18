//! HTTP handlers for the dashboard read API.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chainpulse_core::{
    cache::CacheError,
    metrics::{record_snapshot_read, MetricsCollector},
    store::StoreError,
    throughput::sum_in_window,
    types::WireMetric,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

type ApiResponse = (StatusCode, Json<Value>);

/// Liveness probe.
pub async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Prometheus exposition endpoint.
pub async fn handle_metrics() -> impl IntoResponse {
    MetricsCollector::render()
}

/// Serves the last-known throughput snapshot from the cache, without
/// touching the primary store.
///
/// A never-populated cache is `404` — distinct from an empty-but-valid
/// snapshot, which is `200` with an empty list. Decode and transport
/// failures surface as `500`; a read has no fallback stage to fail over to.
pub async fn handle_throughput(State(state): State<AppState>) -> ApiResponse {
    match state.cache.read().await {
        Ok(snapshot) => {
            record_snapshot_read("hit");
            let list: Vec<WireMetric> = snapshot.iter().map(WireMetric::from).collect();
            (StatusCode::OK, Json(json!({ "list": list })))
        }
        Err(CacheError::Miss) => {
            record_snapshot_read("miss");
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "throughput snapshot not yet populated"})),
            )
        }
        Err(err) => {
            record_snapshot_read("error");
            error!(error = %err, "snapshot read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": err.to_string()})))
        }
    }
}

/// Window query for [`handle_throughput_window`]. Bounds are unix seconds,
/// both exclusive.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: i64,
    pub end: i64,
    #[serde(default = "default_window_limit")]
    pub limit: u32,
}

fn default_window_limit() -> u32 {
    30
}

/// Sums transaction counts over recent blocks inside the requested window.
///
/// Loads fresh metrics (with timestamps) from the primary store — the cached
/// snapshot intentionally carries none.
pub async fn handle_throughput_window(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResponse {
    match state.source.load_recent(query.limit).await {
        Ok(metrics) => {
            let tx_count = sum_in_window(&metrics, query.start, query.end);
            (StatusCode::OK, Json(json!({ "tx_count": tx_count })))
        }
        Err(StoreError::InvalidLimit) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "limit must be greater than zero"})),
        ),
        Err(err) => {
            error!(error = %err, "windowed throughput load failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": err.to_string()})))
        }
    }
}
