//! Persistence seams. Handlers only see `MilestoneRepository`; startup code uses
//! `BootstrapRepository` to migrate and seed. `PgStore` and `MemoryStore` implement both.
//!
//! Every operation either returns the requested data or a single `AppError` wrapping the
//! backend failure. Not-found is expressed as `None` / zero rows, never as an error.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{connect, PgStore};

use crate::error::AppError;
use crate::models::{
    Activity, Facility, LeftMenuLink, Milestone, MilestoneQuery, Outcome, Program, ProviderPlatform,
    ProviderUserMapping, Table, User,
};
use async_trait::async_trait;

#[async_trait]
pub trait MilestoneRepository: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    /// Insert a milestone; id and timestamps in the input are ignored. Returns the stored row.
    async fn create_milestone(&self, milestone: &Milestone) -> Result<Milestone, AppError>;

    async fn get_milestone(&self, id: i64) -> Result<Option<Milestone>, AppError>;

    /// Overwrite every mutable column of the row `milestone.id`. `None` when it does not exist.
    async fn update_milestone(&self, milestone: &Milestone) -> Result<Option<Milestone>, AppError>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_milestone(&self, id: i64) -> Result<u64, AppError>;

    /// Total matching rows (ignoring paging) and the requested page.
    async fn list_milestones(&self, query: &MilestoneQuery) -> Result<(u64, Vec<Milestone>), AppError>;
}

/// Schema creation and row inserts used only while seeding. Each `create_*` returns the
/// generated id.
#[async_trait]
pub trait BootstrapRepository: Send + Sync {
    async fn migrate(&self) -> Result<(), AppError>;
    async fn count_rows(&self, table: Table) -> Result<u64, AppError>;
    async fn user_exists(&self, id: i64) -> Result<bool, AppError>;
    async fn create_facility(&self, facility: &Facility) -> Result<i64, AppError>;
    async fn create_user(&self, user: &User) -> Result<i64, AppError>;
    async fn create_left_menu_links(&self, links: &[LeftMenuLink]) -> Result<(), AppError>;
    async fn create_provider_platform(&self, platform: &ProviderPlatform) -> Result<i64, AppError>;
    async fn create_provider_user_mapping(&self, mapping: &ProviderUserMapping) -> Result<i64, AppError>;
    async fn create_program(&self, program: &Program) -> Result<i64, AppError>;
    async fn create_milestone_record(&self, milestone: &Milestone) -> Result<i64, AppError>;
    async fn create_activity(&self, activity: &Activity) -> Result<i64, AppError>;
    async fn create_outcome(&self, outcome: &Outcome) -> Result<i64, AppError>;
}
