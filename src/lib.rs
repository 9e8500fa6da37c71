//! LearnTrack: milestone tracking REST backend library.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, DatabaseConfig, RunMode};
pub use error::{AppError, BootstrapError, ConfigError, SeedError};
pub use migration::apply_migrations;
pub use models::Milestone;
pub use response::{PaginatedResource, PaginationMeta};
pub use routes::build_router;
pub use state::AppState;
pub use store::{BootstrapRepository, MemoryStore, MilestoneRepository, PgStore};
