//! PostgreSQL-backed repositories on a shared `PgPool`.

use super::{BootstrapRepository, MilestoneRepository};
use crate::config::{PostgresConfig, PostgresSource};
use crate::error::AppError;
use crate::migration::apply_migrations;
use crate::models::{
    Activity, Facility, LeftMenuLink, Milestone, MilestoneQuery, Outcome, Program, ProviderPlatform,
    ProviderUserMapping, Table, User,
};
use crate::sql::{column_list, count_milestones, quoted, select_milestone_page, MILESTONE_COLUMNS};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

/// Open a pool from config. URL DSNs are parsed by sqlx; parts (from `DB_*` or a keyword/value
/// `APP_DSN`) are assembled into options.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let options = match &config.source {
        PostgresSource::Dsn(dsn) => PgConnectOptions::from_str(dsn)?,
        PostgresSource::Parts {
            host,
            port,
            user,
            password,
            name,
            ssl_mode,
        } => {
            let options = PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .database(name)
                .ssl_mode(ssl_mode.parse::<PgSslMode>()?);
            match password {
                Some(p) => options.password(p),
                None => options,
            }
        }
    };
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique-constraint violations surface as `Conflict`; everything else stays a database error.
fn conflict_or_db(err: sqlx::Error, what: impl FnOnce() -> String) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        AppError::Conflict(what())
    } else {
        AppError::Db(err)
    }
}

/// Foreign keys of 0 are stored as NULL.
fn nullable_id(id: i64) -> Option<i64> {
    (id != 0).then_some(id)
}

#[async_trait]
impl MilestoneRepository for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_milestone(&self, milestone: &Milestone) -> Result<Milestone, AppError> {
        let sql = format!(
            "INSERT INTO {} (program_id, user_id, name, description, milestone_type, external_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            quoted(Table::Milestones.as_str()),
            column_list(MILESTONE_COLUMNS)
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Milestone>(&sql)
            .bind(milestone.program_id)
            .bind(milestone.user_id)
            .bind(&milestone.name)
            .bind(&milestone.description)
            .bind(&milestone.milestone_type)
            .bind(&milestone.external_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_milestone(&self, id: i64) -> Result<Option<Milestone>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            column_list(MILESTONE_COLUMNS),
            quoted(Table::Milestones.as_str())
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Milestone>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_milestone(&self, milestone: &Milestone) -> Result<Option<Milestone>, AppError> {
        let sql = format!(
            "UPDATE {} SET program_id = $1, user_id = $2, name = $3, description = $4, \
             milestone_type = $5, external_id = $6, updated_at = NOW() WHERE id = $7 RETURNING {}",
            quoted(Table::Milestones.as_str()),
            column_list(MILESTONE_COLUMNS)
        );
        tracing::debug!(sql = %sql, id = milestone.id, "query");
        let row = sqlx::query_as::<_, Milestone>(&sql)
            .bind(milestone.program_id)
            .bind(milestone.user_id)
            .bind(&milestone.name)
            .bind(&milestone.description)
            .bind(&milestone.milestone_type)
            .bind(&milestone.external_id)
            .bind(milestone.id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_milestone(&self, id: i64) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", quoted(Table::Milestones.as_str()));
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_milestones(&self, query: &MilestoneQuery) -> Result<(u64, Vec<Milestone>), AppError> {
        let count = count_milestones(query);
        tracing::debug!(sql = %count.sql, params = ?count.params, "query");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count.sql);
        for p in &count.params {
            count_query = count_query.bind(p);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let page = select_milestone_page(query);
        tracing::debug!(sql = %page.sql, params = ?page.params, "query");
        let mut page_query = sqlx::query_as::<_, Milestone>(&page.sql);
        for p in &page.params {
            page_query = page_query.bind(p);
        }
        let rows = page_query.fetch_all(&self.pool).await?;
        Ok((u64::try_from(total).unwrap_or(0), rows))
    }
}

#[async_trait]
impl BootstrapRepository for PgStore {
    async fn migrate(&self) -> Result<(), AppError> {
        apply_migrations(&self.pool).await
    }

    async fn count_rows(&self, table: Table) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quoted(table.as_str()));
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn user_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_facility(&self, facility: &Facility) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO facilities (name) VALUES ($1) RETURNING id")
            .bind(&facility.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_user(&self, user: &User) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, name_first, name_last, email, password, password_reset, role, facility_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.name_first)
        .bind(&user.name_last)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.password_reset)
        .bind(&user.role)
        .bind(nullable_id(user.facility_id))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, || format!("username '{}' already exists", user.username)))?;
        Ok(id)
    }

    async fn create_left_menu_links(&self, links: &[LeftMenuLink]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for link in links {
            sqlx::query("INSERT INTO left_menu_links (name, rank, links) VALUES ($1, $2, $3)")
                .bind(&link.name)
                .bind(link.rank)
                .bind(sqlx::types::Json(&link.links))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_provider_platform(&self, platform: &ProviderPlatform) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO provider_platforms (name, type, description, icon_url, account_id, access_key, base_url, state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&platform.name)
        .bind(&platform.platform_type)
        .bind(&platform.description)
        .bind(&platform.icon_url)
        .bind(&platform.account_id)
        .bind(&platform.access_key)
        .bind(&platform.base_url)
        .bind(&platform.state)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_provider_user_mapping(&self, mapping: &ProviderUserMapping) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO provider_user_mappings (user_id, provider_platform_id, external_username, external_user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(mapping.user_id)
        .bind(mapping.provider_platform_id)
        .bind(&mapping.external_username)
        .bind(&mapping.external_user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_program(&self, program: &Program) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO programs (provider_platform_id, name, description, external_id, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(nullable_id(program.provider_platform_id))
        .bind(&program.name)
        .bind(&program.description)
        .bind(&program.external_id)
        .bind(&program.thumbnail_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_milestone_record(&self, milestone: &Milestone) -> Result<i64, AppError> {
        let row = MilestoneRepository::create_milestone(self, milestone).await?;
        Ok(row.id)
    }

    async fn create_activity(&self, activity: &Activity) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO activities (user_id, program_id, type, total_time, time_delta, external_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(activity.user_id)
        .bind(activity.program_id)
        .bind(&activity.activity_type)
        .bind(activity.total_time)
        .bind(activity.time_delta)
        .bind(&activity.external_id)
        .bind(activity.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_outcome(&self, outcome: &Outcome) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO outcomes (user_id, program_id, type) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(outcome.user_id)
        .bind(outcome.program_id)
        .bind(outcome.outcome_type.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
