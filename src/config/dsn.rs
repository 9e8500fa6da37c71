//! `APP_DSN` parsing. URL DSNs (`postgres://...`) are checked and kept verbatim; libpq
//! keyword/value strings (`host=db port=5432 user=app dbname=learn sslmode=allow`) are
//! split into `PostgresSource::Parts`.

use super::types::PostgresSource;
use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_SSL_MODE: &str = "allow";

/// Values accepted for `sslmode`, as libpq spells them.
pub const SSL_MODES: &[&str] = &["disable", "allow", "prefer", "require", "verify-ca", "verify-full"];

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name: "APP_DSN",
        reason: reason.into(),
    }
}

pub fn parse_dsn(dsn: &str) -> Result<PostgresSource, ConfigError> {
    if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
        PgConnectOptions::from_str(dsn).map_err(|e| invalid(e.to_string()))?;
        return Ok(PostgresSource::Dsn(dsn.to_string()));
    }

    let mut pairs = parse_keyword_pairs(dsn).map_err(invalid)?;
    let mut required = |key: &str| {
        pairs
            .remove(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid(format!("missing '{}'", key)))
    };
    let host = required("host")?;
    let user = required("user")?;
    let name = required("dbname")?;

    let port = match pairs.remove("port") {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| invalid(format!("port '{}': {}", raw, e)))?,
        None => DEFAULT_DB_PORT,
    };
    let ssl_mode = pairs
        .remove("sslmode")
        .unwrap_or_else(|| DEFAULT_SSL_MODE.to_string());
    if !SSL_MODES.contains(&ssl_mode.as_str()) {
        return Err(invalid(format!("unsupported sslmode '{}'", ssl_mode)));
    }
    let password = pairs.remove("password").filter(|v| !v.is_empty());

    for key in pairs.keys() {
        tracing::warn!(key = %key, "ignoring unsupported APP_DSN keyword");
    }

    Ok(PostgresSource::Parts {
        host,
        port,
        user,
        password,
        name,
        ssl_mode,
    })
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

/// Split `key=value` pairs separated by whitespace. Spaces around `=` are allowed; a value
/// may be single-quoted, with `\'` and `\\` escapes.
fn parse_keyword_pairs(raw: &str) -> Result<HashMap<String, String>, String> {
    let mut pairs = HashMap::new();
    let mut chars = raw.chars().peekable();
    loop {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        skip_whitespace(&mut chars);
        if chars.next() != Some('=') {
            return Err(format!("expected '=' after '{}'", key));
        }
        if key.is_empty() {
            return Err("empty keyword".into());
        }
        skip_whitespace(&mut chars);

        let mut value = String::new();
        if chars.next_if_eq(&'\'').is_some() {
            loop {
                match chars.next() {
                    Some('\'') => break,
                    Some('\\') => match chars.next() {
                        Some(c) => value.push(c),
                        None => return Err(format!("unterminated quoted value for '{}'", key)),
                    },
                    Some(c) => value.push(c),
                    None => return Err(format!("unterminated quoted value for '{}'", key)),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        value.push(escaped);
                    }
                } else {
                    value.push(c);
                }
            }
        }
        pairs.insert(key, value);
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_dsn_becomes_parts() {
        let source =
            parse_dsn("host=db port=6543 user=app password=x dbname=learn sslmode=require").unwrap();
        assert_eq!(
            source,
            PostgresSource::Parts {
                host: "db".into(),
                port: 6543,
                user: "app".into(),
                password: Some("x".into()),
                name: "learn".into(),
                ssl_mode: "require".into(),
            }
        );
    }

    #[test]
    fn keyword_dsn_defaults_and_quoting() {
        let source = parse_dsn("host = db user=app dbname=learn password='it\\'s secret'").unwrap();
        let PostgresSource::Parts {
            port,
            password,
            ssl_mode,
            ..
        } = source
        else {
            panic!("expected parts");
        };
        assert_eq!(port, DEFAULT_DB_PORT);
        assert_eq!(password.as_deref(), Some("it's secret"));
        assert_eq!(ssl_mode, "allow");
    }

    #[test]
    fn url_dsn_is_kept_verbatim() {
        let dsn = "postgres://app:x@db:5432/learn?sslmode=allow";
        assert_eq!(parse_dsn(dsn).unwrap(), PostgresSource::Dsn(dsn.into()));
    }

    #[test]
    fn malformed_dsns_name_the_variable() {
        for raw in [
            "host=db user=app",
            "host=db user=app dbname=learn port=abc",
            "host=db user=app dbname=learn sslmode=sometimes",
            "host=db user=app dbname='learn",
            "just some words",
            "postgres://app@db:notaport/learn",
        ] {
            let err = parse_dsn(raw).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "APP_DSN", .. }),
                "{raw} gave {err:?}"
            );
        }
    }
}
