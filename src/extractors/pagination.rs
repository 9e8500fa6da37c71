//! Extract `page` / `per_page` from the query string.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Page number (1-based) and page size. Missing or unparseable values fall back to
/// the defaults; `per_page` is clamped to `1..=MAX_PER_PAGE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let page = params
            .get("page")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let per_page = params
            .get("per_page")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(MAX_PER_PAGE))
            .unwrap_or(DEFAULT_PER_PAGE);
        Pagination { page, per_page }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(p)| p)
            .unwrap_or_default();
        Ok(Pagination::from_params(&params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_absent() {
        assert_eq!(Pagination::from_params(&params(&[])), Pagination::default());
    }

    #[test]
    fn reads_page_and_per_page() {
        let p = Pagination::from_params(&params(&[("page", "3"), ("per_page", "25")]));
        assert_eq!(p, Pagination { page: 3, per_page: 25 });
    }

    #[test]
    fn garbage_and_zero_fall_back() {
        let p = Pagination::from_params(&params(&[("page", "abc"), ("per_page", "0")]));
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn per_page_is_clamped() {
        let p = Pagination::from_params(&params(&[("per_page", "5000")]));
        assert_eq!(p.per_page, MAX_PER_PAGE);
    }
}
