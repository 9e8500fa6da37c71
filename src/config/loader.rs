//! Load and validate `AppConfig` from environment variables.

use crate::config::dsn::{parse_dsn, DEFAULT_DB_PORT, DEFAULT_SSL_MODE};
use crate::config::types::*;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_FIXTURES_DIR: &str = "test_data";

impl AppConfig {
    /// Read `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mode = match get("APP_ENV").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("testing") | Some("test") => RunMode::Testing,
            _ => RunMode::Production,
        };
        let host = get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = parse_or("APP_PORT", get("APP_PORT"), DEFAULT_PORT)?;
        let fixtures_dir = PathBuf::from(get("FIXTURES_DIR").unwrap_or_else(|| DEFAULT_FIXTURES_DIR.into()));
        let test_data_seed = get("TEST_DATA_SEED")
            .map(|v| parse("TEST_DATA_SEED", &v))
            .transpose()?;

        let database = match mode {
            RunMode::Testing => DatabaseConfig::Memory,
            RunMode::Production => {
                let max_connections =
                    parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
                if max_connections == 0 {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        reason: "must be at least 1".into(),
                    });
                }
                let source = match get("APP_DSN") {
                    Some(dsn) => parse_dsn(&dsn)?,
                    None => PostgresSource::Parts {
                        host: get("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?,
                        port: parse_or("DB_PORT", get("DB_PORT"), DEFAULT_DB_PORT)?,
                        user: get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                        password: get("DB_PASSWORD"),
                        name: get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
                        ssl_mode: DEFAULT_SSL_MODE.into(),
                    },
                };
                DatabaseConfig::Postgres(PostgresConfig {
                    source,
                    max_connections,
                })
            }
        };

        Ok(AppConfig {
            host,
            port,
            mode,
            database,
            fixtures_dir,
            test_data_seed,
        })
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("'{}': {}", raw, e),
    })
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => parse(name, &v),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn testing_mode_uses_memory_store() {
        let cfg = load(&[("APP_ENV", "testing"), ("TEST_DATA_SEED", "42")]).unwrap();
        assert_eq!(cfg.mode, RunMode::Testing);
        assert_eq!(cfg.database, DatabaseConfig::Memory);
        assert_eq!(cfg.test_data_seed, Some(42));
        assert_eq!(cfg.fixtures_dir, PathBuf::from("test_data"));
        assert_eq!(cfg.address(), "0.0.0.0:8080");
    }

    #[test]
    fn app_dsn_wins_over_parts() {
        let cfg = load(&[
            ("APP_DSN", "postgres://u:p@db:5432/learn"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        match cfg.database {
            DatabaseConfig::Postgres(pg) => {
                assert_eq!(pg.source, PostgresSource::Dsn("postgres://u:p@db:5432/learn".into()));
                assert_eq!(pg.max_connections, 10);
            }
            other => panic!("unexpected database config: {:?}", other),
        }
    }

    #[test]
    fn parts_fallback() {
        let cfg = load(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_NAME", "learn"),
            ("APP_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(cfg.mode, RunMode::Production);
        assert_eq!(cfg.port, 9000);
        let DatabaseConfig::Postgres(pg) = cfg.database else {
            panic!("expected postgres config");
        };
        assert_eq!(
            pg.source,
            PostgresSource::Parts {
                host: "db".into(),
                port: 6543,
                user: "app".into(),
                password: None,
                name: "learn".into(),
                ssl_mode: "allow".into(),
            }
        );
    }

    #[test]
    fn missing_host_is_reported() {
        let err = load(&[("DB_USER", "app"), ("DB_NAME", "learn")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_HOST")));
    }

    #[test]
    fn bad_port_is_reported() {
        let err = load(&[("APP_ENV", "test"), ("APP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "APP_PORT", .. }));
    }

    #[test]
    fn keyword_app_dsn_is_accepted() {
        let cfg = load(&[("APP_DSN", "host=db port=5432 user=app password=x dbname=learn sslmode=allow")])
            .unwrap();
        let DatabaseConfig::Postgres(pg) = cfg.database else {
            panic!("expected postgres config");
        };
        assert!(matches!(pg.source, PostgresSource::Parts { ref host, ref name, .. } if host == "db" && name == "learn"));
    }

    #[test]
    fn unusable_app_dsn_fails_at_load() {
        let err = load(&[("APP_DSN", "db.internal:5432/learn")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "APP_DSN", .. }));
    }

    #[test]
    fn dsn_is_redacted_in_debug() {
        let source = PostgresSource::Dsn("postgres://u:secret@db/learn".into());
        assert!(!format!("{:?}", source).contains("secret"));
    }
}
