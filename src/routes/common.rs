//! Liveness, readiness and version probes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<&'static str>,
}

async fn live() -> Json<Probe> {
    Json(Probe {
        status: "ok",
        store: None,
    })
}

/// 200 when the milestone store answers a round trip, 503 otherwise.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    match state.milestones.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Probe {
                status: "ok",
                store: Some("reachable"),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "milestone store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Probe {
                    status: "unavailable",
                    store: Some("unreachable"),
                }),
            )
        }
    }
}

async fn build_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn probe_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(live))
        .route("/ready", get(ready))
        .route("/version", get(build_info))
        .with_state(state)
}
