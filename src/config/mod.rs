pub mod dsn;
pub mod loader;
pub mod types;

pub use types::*;
