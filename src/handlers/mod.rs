//! HTTP handlers.

pub mod milestone;
pub use milestone::*;
