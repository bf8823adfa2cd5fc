//! Runtime settings from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Server settings, read once at startup. `.env` is honored via dotenvy in main.
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        let max_connections = match env::var("MAX_CONNECTIONS") {
            Ok(raw) => parse_or("MAX_CONNECTIONS", &raw, 5),
            Err(_) => 5,
        };
        Settings {
            database_url: env_or("DATABASE_URL", "postgres://localhost/inventory"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            max_connections,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `raw` for `key`, falling back to `default` with a warning on bad input.
fn parse_or<T: FromStr + Copy>(key: &str, raw: &str, default: T) -> T
where
    T::Err: Display,
{
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!("invalid {} value {:?}: {}, using default", key, raw, e);
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_accepts_valid_input() {
        assert_eq!(parse_or::<u32>("MAX_CONNECTIONS", "12", 5), 12);
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or::<u32>("MAX_CONNECTIONS", "many", 5), 5);
        assert_eq!(parse_or::<u32>("MAX_CONNECTIONS", "", 5), 5);
    }
}
