//! In-memory repositories: the test database used in testing mode and by the test suite.
//! Ids come from per-table sequences starting at 1, matching a freshly migrated database.

use super::{BootstrapRepository, MilestoneRepository};
use crate::error::AppError;
use crate::models::{
    Activity, Facility, LeftMenuLink, Milestone, MilestoneQuery, Outcome, Program, ProviderPlatform,
    ProviderUserMapping, Table, User,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    facilities: Vec<Facility>,
    users: Vec<User>,
    provider_platforms: Vec<ProviderPlatform>,
    provider_user_mappings: Vec<ProviderUserMapping>,
    left_menu_links: Vec<LeftMenuLink>,
    programs: Vec<Program>,
    milestones: Vec<Milestone>,
    outcomes: Vec<Outcome>,
    activities: Vec<Activity>,
    sequences: HashMap<Table, i64>,
}

impl Tables {
    fn next_id(&mut self, table: Table) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn len(&self, table: Table) -> usize {
        match table {
            Table::Facilities => self.facilities.len(),
            Table::Users => self.users.len(),
            Table::ProviderPlatforms => self.provider_platforms.len(),
            Table::ProviderUserMappings => self.provider_user_mappings.len(),
            Table::LeftMenuLinks => self.left_menu_links.len(),
            Table::Programs => self.programs.len(),
            Table::Milestones => self.milestones.len(),
            Table::Outcomes => self.outcomes.len(),
            Table::Activities => self.activities.len(),
        }
    }

    fn insert_milestone(&mut self, milestone: &Milestone) -> Milestone {
        let now = Utc::now();
        let row = Milestone {
            id: self.next_id(Table::Milestones),
            created_at: Some(now),
            updated_at: Some(now),
            ..milestone.clone()
        };
        self.milestones.push(row.clone());
        row
    }
}

fn duplicate_username(username: &str) -> AppError {
    AppError::Conflict(format!("username '{}' already exists", username))
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MilestoneRepository for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_milestone(&self, milestone: &Milestone) -> Result<Milestone, AppError> {
        Ok(self.tables.write().await.insert_milestone(milestone))
    }

    async fn get_milestone(&self, id: i64) -> Result<Option<Milestone>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.milestones.iter().find(|m| m.id == id).cloned())
    }

    async fn update_milestone(&self, milestone: &Milestone) -> Result<Option<Milestone>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.milestones.iter_mut().find(|m| m.id == milestone.id) else {
            return Ok(None);
        };
        *row = Milestone {
            id: row.id,
            created_at: row.created_at,
            updated_at: Some(Utc::now()),
            ..milestone.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn delete_milestone(&self, id: i64) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.milestones.len();
        tables.milestones.retain(|m| m.id != id);
        Ok((before - tables.milestones.len()) as u64)
    }

    async fn list_milestones(&self, query: &MilestoneQuery) -> Result<(u64, Vec<Milestone>), AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Milestone> = tables
            .milestones
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query.order.compare(a, b));
        let total = rows.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let page = rows
            .into_iter()
            .skip(offset)
            .take(query.per_page as usize)
            .collect();
        Ok((total, page))
    }
}

#[async_trait]
impl BootstrapRepository for MemoryStore {
    async fn migrate(&self) -> Result<(), AppError> {
        tracing::info!("using in-memory store, nothing to migrate");
        Ok(())
    }

    async fn count_rows(&self, table: Table) -> Result<u64, AppError> {
        Ok(self.tables.read().await.len(table) as u64)
    }

    async fn user_exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.read().await.users.iter().any(|u| u.id == id))
    }

    async fn create_facility(&self, facility: &Facility) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::Facilities);
        tables.facilities.push(Facility { id, ..facility.clone() });
        Ok(id)
    }

    async fn create_user(&self, user: &User) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(duplicate_username(&user.username));
        }
        let id = tables.next_id(Table::Users);
        tables.users.push(User { id, ..user.clone() });
        Ok(id)
    }

    async fn create_left_menu_links(&self, links: &[LeftMenuLink]) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        for link in links {
            let id = tables.next_id(Table::LeftMenuLinks);
            tables.left_menu_links.push(LeftMenuLink { id, ..link.clone() });
        }
        Ok(())
    }

    async fn create_provider_platform(&self, platform: &ProviderPlatform) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::ProviderPlatforms);
        tables.provider_platforms.push(ProviderPlatform { id, ..platform.clone() });
        Ok(id)
    }

    async fn create_provider_user_mapping(&self, mapping: &ProviderUserMapping) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::ProviderUserMappings);
        tables.provider_user_mappings.push(ProviderUserMapping { id, ..mapping.clone() });
        Ok(id)
    }

    async fn create_program(&self, program: &Program) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::Programs);
        tables.programs.push(Program { id, ..program.clone() });
        Ok(id)
    }

    async fn create_milestone_record(&self, milestone: &Milestone) -> Result<i64, AppError> {
        Ok(self.tables.write().await.insert_milestone(milestone).id)
    }

    async fn create_activity(&self, activity: &Activity) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::Activities);
        tables.activities.push(Activity { id, ..activity.clone() });
        Ok(id)
    }

    async fn create_outcome(&self, outcome: &Outcome) -> Result<i64, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(Table::Outcomes);
        tables.outcomes.push(Outcome { id, ..outcome.clone() });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MilestoneOrder;

    fn named(name: &str, program_id: i64) -> Milestone {
        Milestone {
            name: name.into(),
            program_id,
            ..Default::default()
        }
    }

    fn page(search: &str, order: &str, page: u32, per_page: u32) -> MilestoneQuery {
        MilestoneQuery {
            search: search.into(),
            order: MilestoneOrder::parse(order).unwrap(),
            page,
            per_page,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create_milestone(&named("a", 1)).await.unwrap();
        let b = store.create_milestone(&named("b", 1)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(a.created_at.is_some());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = store.create_milestone(&named("a", 1)).await.unwrap();
        assert_eq!(store.delete_milestone(a.id).await.unwrap(), 1);
        assert_eq!(store.delete_milestone(a.id).await.unwrap(), 0);
        assert!(store.get_milestone(a.id).await.unwrap().is_none());
        let b = store.create_milestone(&named("b", 1)).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn update_missing_row_is_none() {
        let store = MemoryStore::new();
        let ghost = Milestone { id: 42, ..named("ghost", 1) };
        assert!(store.update_milestone(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_orders_and_pages() {
        let store = MemoryStore::new();
        for (name, program) in [("Quiz 1", 2), ("Module A", 1), ("Module B", 3), ("module c", 2)] {
            store.create_milestone(&named(name, program)).await.unwrap();
        }
        let (total, rows) = store.list_milestones(&page("module", "name desc", 1, 2)).await.unwrap();
        assert_eq!(total, 3);
        let names: Vec<&str> = rows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["module c", "Module B"]);

        let (total, rows) = store.list_milestones(&page("module", "name desc", 2, 2)).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Module A");
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        let user = User {
            username: "jdoe".into(),
            ..Default::default()
        };
        assert_eq!(store.create_user(&user).await.unwrap(), 1);
        let err = store.create_user(&user).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
        assert_eq!(store.count_rows(Table::Users).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn counts_per_table() {
        let store = MemoryStore::new();
        store.create_facility(&Facility { id: 0, name: "Default".into() }).await.unwrap();
        store.create_user(&User::default()).await.unwrap();
        assert_eq!(store.count_rows(Table::Facilities).await.unwrap(), 1);
        assert_eq!(store.count_rows(Table::Users).await.unwrap(), 1);
        assert_eq!(store.count_rows(Table::Milestones).await.unwrap(), 0);
        assert!(store.user_exists(1).await.unwrap());
        assert!(!store.user_exists(2).await.unwrap());
    }
}
