use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Notices are transient; anything beyond a day is a misconfiguration
const MAX_NOTICE_TTL_SECS: u64 = 60 * 60 * 24;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub controller: ControllerConfig,
}

/// Settings the view controllers need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How long success/failure notices stay visible
    pub notice_ttl: Duration,
    /// Edit page; the listing id is appended as `?listingId=<id>`
    pub edit_listing_path: String,
    /// Where the detail view goes after deleting its listing
    pub home_path: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            notice_ttl: Duration::from_secs(3),
            edit_listing_path: "/edit-listing".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ControllerConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            controller: ControllerConfig {
                notice_ttl: parse_notice_ttl(
                    &env::var("NOTICE_TTL_SECS").unwrap_or_else(|_| "3".to_string()),
                )?,
                edit_listing_path: env::var("EDIT_LISTING_PATH")
                    .unwrap_or(defaults.edit_listing_path),
                home_path: env::var("HOME_PATH").unwrap_or(defaults.home_path),
            },
        })
    }
}

fn parse_notice_ttl(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("NOTICE_TTL_SECS must be a valid number of seconds")?;
    ensure!(
        secs <= MAX_NOTICE_TTL_SECS,
        "NOTICE_TTL_SECS must be at most {} seconds, got {}",
        MAX_NOTICE_TTL_SECS,
        secs
    );
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_ttl_parses_seconds() {
        assert_eq!(parse_notice_ttl("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_notice_ttl(" 10 ").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_notice_ttl_rejects_out_of_range_values() {
        assert!(parse_notice_ttl(&u64::MAX.to_string()).is_err());
        assert!(parse_notice_ttl("86401").is_err());
        assert!(parse_notice_ttl("-1").is_err());
        assert!(parse_notice_ttl("soon").is_err());
    }
}
