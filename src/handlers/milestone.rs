//! Milestone handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::Pagination;
use crate::models::{Merge, Milestone, MilestoneOrder, MilestoneQuery};
use crate::response::{created, ok, paginated, PaginationMeta};
use crate::service::MilestoneValidator;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

fn parse_id(raw: &str) -> Result<i64, AppError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid id '{}': {}", raw, e)))?;
    if id <= 0 {
        return Err(AppError::BadRequest(format!("invalid id '{}': must be positive", raw)));
    }
    Ok(id)
}

/// Decode a JSON body without requiring a content type. Unknown fields are ignored and
/// missing ones take their zero value.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("milestone {}", id))
}

pub async fn list_milestones(
    State(state): State<AppState>,
    pagination: Pagination,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let search = params.get("search").map(|s| s.trim().to_string()).unwrap_or_default();
    let raw_order = params.get("order_by").map(String::as_str).unwrap_or("");
    let order = MilestoneOrder::parse(raw_order).unwrap_or_else(|| {
        tracing::warn!(order_by = raw_order, "unsupported order_by, using default order");
        MilestoneOrder::default()
    });
    let query = MilestoneQuery {
        search,
        order,
        page: pagination.page,
        per_page: pagination.per_page,
    };
    let (total, rows) = state.milestones.list_milestones(&query).await?;
    Ok(paginated(rows, PaginationMeta::new(total, query.page, query.per_page)))
}

pub async fn read_milestone(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state.milestones.get_milestone(id).await?.ok_or_else(|| not_found(id))?;
    Ok(ok(row))
}

pub async fn create_milestone(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let milestone: Milestone = decode_body(&body)?;
    MilestoneValidator::validate(&milestone)?;
    let row = state.milestones.create_milestone(&milestone).await?;
    tracing::info!(id = row.id, program_id = row.program_id, "milestone created");
    Ok(created(row))
}

/// PATCH /milestones/:id. A path id that is not a positive integer falls back to the body id.
pub async fn update_milestone(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let row = apply_update(&state, Some(&id_str), &body).await?;
    Ok(ok(row))
}

/// PATCH /milestones with the id carried in the body.
pub async fn update_milestone_from_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let row = apply_update(&state, None, &body).await?;
    Ok(ok(row))
}

async fn apply_update(
    state: &AppState,
    path_id: Option<&str>,
    body: &Bytes,
) -> Result<Milestone, AppError> {
    let path_id = path_id.and_then(|raw| match parse_id(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::info!(raw, "no usable id in URL, checking request body");
            None
        }
    });
    let incoming: Milestone = decode_body(body)?;
    let id = path_id
        .or((incoming.id > 0).then_some(incoming.id))
        .ok_or_else(|| AppError::BadRequest("no id provided in URL or request body".into()))?;
    MilestoneValidator::validate_partial(&incoming)?;

    let mut stored = state.milestones.get_milestone(id).await?.ok_or_else(|| not_found(id))?;
    stored.merge_from(&incoming);
    let updated = state
        .milestones
        .update_milestone(&stored)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(updated)
}

pub async fn delete_milestone(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    delete_one(&state, id).await
}

/// DELETE /milestones?id=N
pub async fn delete_milestone_by_query(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let raw = params
        .get("id")
        .ok_or_else(|| AppError::BadRequest("no id provided".into()))?;
    let id = parse_id(raw)?;
    delete_one(&state, id).await
}

/// Deleting an id that does not exist is a 404, not a silent success.
async fn delete_one(state: &AppState, id: i64) -> Result<StatusCode, AppError> {
    let removed = state.milestones.delete_milestone(id).await?;
    if removed == 0 {
        return Err(not_found(id));
    }
    tracing::info!(id, "milestone deleted");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("5").unwrap(), 5);
        assert_eq!(parse_id(" 12 ").unwrap(), 12);
    }

    #[test]
    fn parse_id_rejects_garbage_and_non_positive() {
        for raw in ["abc", "", "1.5", "0", "-3"] {
            assert!(
                matches!(parse_id(raw), Err(AppError::BadRequest(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn decode_body_reports_syntax_errors() {
        let err = decode_body::<Milestone>(&Bytes::from_static(b"{\"name\":")).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.starts_with("invalid JSON body")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
