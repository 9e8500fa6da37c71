//! PostgreSQL DDL for the fixed table list. Every statement is `IF NOT EXISTS`, so
//! migrating an already-migrated database is a no-op.

use crate::error::AppError;
use crate::models::Table;
use sqlx::PgPool;

fn table_ddl(table: Table) -> &'static str {
    match table {
        Table::Facilities => {
            r#"
            CREATE TABLE IF NOT EXISTS facilities (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::Users => {
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                name_first TEXT NOT NULL DEFAULT '',
                name_last TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                password TEXT NOT NULL DEFAULT '',
                password_reset BOOLEAN NOT NULL DEFAULT TRUE,
                role TEXT NOT NULL DEFAULT 'student',
                facility_id BIGINT REFERENCES facilities (id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::ProviderPlatforms => {
            r#"
            CREATE TABLE IF NOT EXISTS provider_platforms (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                icon_url TEXT NOT NULL DEFAULT '',
                account_id TEXT NOT NULL DEFAULT '',
                access_key TEXT NOT NULL DEFAULT '',
                base_url TEXT NOT NULL DEFAULT '',
                state TEXT NOT NULL DEFAULT 'enabled',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::ProviderUserMappings => {
            r#"
            CREATE TABLE IF NOT EXISTS provider_user_mappings (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                provider_platform_id BIGINT NOT NULL REFERENCES provider_platforms (id) ON DELETE CASCADE,
                external_username TEXT NOT NULL DEFAULT '',
                external_user_id TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::LeftMenuLinks => {
            r#"
            CREATE TABLE IF NOT EXISTS left_menu_links (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                rank INTEGER NOT NULL DEFAULT 0,
                links JSONB NOT NULL DEFAULT '[]'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::Programs => {
            r#"
            CREATE TABLE IF NOT EXISTS programs (
                id BIGSERIAL PRIMARY KEY,
                provider_platform_id BIGINT REFERENCES provider_platforms (id) ON DELETE SET NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                external_id TEXT NOT NULL DEFAULT '',
                thumbnail_url TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::Milestones => {
            r#"
            CREATE TABLE IF NOT EXISTS milestones (
                id BIGSERIAL PRIMARY KEY,
                program_id BIGINT NOT NULL DEFAULT 0,
                user_id BIGINT NOT NULL DEFAULT 0,
                name TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                milestone_type TEXT NOT NULL DEFAULT '',
                external_id TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ DEFAULT NOW(),
                updated_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#
        }
        Table::Outcomes => {
            r#"
            CREATE TABLE IF NOT EXISTS outcomes (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL DEFAULT 0,
                program_id BIGINT NOT NULL DEFAULT 0,
                type TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
        Table::Activities => {
            r#"
            CREATE TABLE IF NOT EXISTS activities (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                program_id BIGINT NOT NULL REFERENCES programs (id) ON DELETE CASCADE,
                type TEXT NOT NULL DEFAULT 'interaction',
                total_time BIGINT NOT NULL DEFAULT 0,
                time_delta BIGINT NOT NULL DEFAULT 0,
                external_id TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        }
    }
}

/// Create every table in `Table::ALL`, in order. Stops at the first failure.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for table in Table::ALL {
        tracing::info!(table = table.as_str(), "migrating table");
        sqlx::query(table_ddl(table)).execute(pool).await?;
    }
    sqlx::query("CREATE INDEX IF NOT EXISTS milestones_program_id_idx ON milestones (program_id)")
        .execute(pool)
        .await?;
    Ok(())
}
