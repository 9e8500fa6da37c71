//! Milestone routes.

use crate::handlers::milestone::{
    create_milestone, delete_milestone, delete_milestone_by_query, list_milestones, read_milestone,
    update_milestone, update_milestone_from_body,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn milestone_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/milestones",
            get(list_milestones)
                .post(create_milestone)
                .patch(update_milestone_from_body)
                .delete(delete_milestone_by_query),
        )
        .route(
            "/milestones/:id",
            get(read_milestone).patch(update_milestone).delete(delete_milestone),
        )
        .with_state(state)
}
