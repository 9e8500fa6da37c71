//! Typed application configuration, built once at startup.

use std::fmt;
use std::path::PathBuf;

/// `Testing` runs against the in-memory store and seeds fixture data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Production,
    Testing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
    pub database: DatabaseConfig,
    pub fixtures_dir: PathBuf,
    /// Seed for the synthetic activity generator. `None` picks a random seed.
    pub test_data_seed: Option<u64>,
}

impl AppConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_testing(&self) -> bool {
        self.mode == RunMode::Testing
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DatabaseConfig {
    Memory,
    Postgres(PostgresConfig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostgresConfig {
    pub source: PostgresSource,
    pub max_connections: u32,
}

#[derive(Clone, PartialEq)]
pub enum PostgresSource {
    /// A full connection string from `APP_DSN`, used verbatim.
    Dsn(String),
    /// Individual `DB_*` settings, or a keyword/value `APP_DSN` split into its parts.
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        name: String,
        /// libpq `sslmode` spelling; `allow` unless the DSN says otherwise.
        ssl_mode: String,
    },
}

impl fmt::Debug for PostgresSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostgresSource::Dsn(_) => f.write_str("Dsn(<redacted>)"),
            PostgresSource::Parts {
                host,
                port,
                user,
                name,
                ssl_mode,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("name", name)
                .field("ssl_mode", ssl_mode)
                .finish_non_exhaustive(),
        }
    }
}
