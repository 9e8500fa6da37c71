//! Request extractors shared by handlers.

pub mod pagination;
pub use pagination::Pagination;
