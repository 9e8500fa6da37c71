//! Response envelopes: paginated collections and their metadata.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Paging metadata returned next to every collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub per_page: u32,
    pub last_page: u64,
    pub current_page: u32,
    pub total: u64,
}

impl PaginationMeta {
    /// `last_page` is `ceil(total / per_page)`, so an empty collection reports `last_page = 0`.
    pub fn new(total: u64, current_page: u32, per_page: u32) -> Self {
        let last_page = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page))
        };
        PaginationMeta {
            per_page,
            last_page,
            current_page,
            total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResource<T> {
    pub meta: PaginationMeta,
    pub data: Vec<T>,
}

pub fn paginated<T: Serialize>(
    data: Vec<T>,
    meta: PaginationMeta,
) -> (StatusCode, Json<PaginatedResource<T>>) {
    (StatusCode::OK, Json(PaginatedResource { meta, data }))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(PaginationMeta::new(21, 1, 10).last_page, 3);
        assert_eq!(PaginationMeta::new(20, 1, 10).last_page, 2);
        assert_eq!(PaginationMeta::new(1, 1, 10).last_page, 1);
    }

    #[test]
    fn empty_collection_has_last_page_zero() {
        let meta = PaginationMeta::new(0, 1, 10);
        assert_eq!(meta.last_page, 0);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn meta_serializes_snake_case_keys() {
        let json = serde_json::to_value(PaginationMeta::new(35, 2, 10)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"per_page": 10, "last_page": 4, "current_page": 2, "total": 35})
        );
    }
}
