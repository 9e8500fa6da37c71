//! Router assembly.

pub mod common;
pub mod milestone;

pub use common::probe_routes;
pub use milestone::milestone_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full application router: probes at the root, resources under `/api`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(probe_routes(state.clone()))
        .nest("/api", milestone_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}
