use anyhow::{bail, Context, Result};

use crate::settings::{COOLDOWN_DAYS_RANGE, DEFAULT_COOLDOWN_DAYS};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Cooldown used when the settings row has never been written.
    pub default_cooldown_days: i32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: optional_env("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            default_cooldown_days: parse_cooldown(&optional_env(
                "DEFAULT_COOLDOWN_DAYS",
                &DEFAULT_COOLDOWN_DAYS.to_string(),
            ))?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_cooldown(raw: &str) -> Result<i32> {
    let days = raw
        .trim()
        .parse::<i32>()
        .context("DEFAULT_COOLDOWN_DAYS must be an integer")?;
    if !COOLDOWN_DAYS_RANGE.contains(&days) {
        bail!(
            "DEFAULT_COOLDOWN_DAYS must be between {} and {}",
            COOLDOWN_DAYS_RANGE.start(),
            COOLDOWN_DAYS_RANGE.end()
        );
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cooldown_accepts_range() {
        assert_eq!(parse_cooldown("21").unwrap(), 21);
        assert_eq!(parse_cooldown(" 1 ").unwrap(), 1);
        assert_eq!(parse_cooldown("365").unwrap(), 365);
    }

    #[test]
    fn test_parse_cooldown_rejects_out_of_range() {
        assert!(parse_cooldown("0").is_err());
        assert!(parse_cooldown("366").is_err());
        assert!(parse_cooldown("-3").is_err());
    }

    #[test]
    fn test_parse_cooldown_rejects_garbage() {
        assert!(parse_cooldown("three weeks").is_err());
    }
}
