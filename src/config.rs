// src/config.rs
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::proximity::SearchConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub db_pool_max_size: u32,

    // Server configuration
    pub listen_addr: String,
    pub listen_port: u16,

    // Proximity search
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        let radius_tiers_m = parse_radius_tiers(
            &env::var("SEARCH_RADIUS_TIERS_M")
                .unwrap_or_else(|_| "1000,10000,25000,50000,100000".to_string()),
        )?;
        let early_stop_threshold: usize = env::var("SEARCH_EARLY_STOP_THRESHOLD")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .context("SEARCH_EARLY_STOP_THRESHOLD must be an integer")?;
        let deadline_ms: u64 = env::var("SEARCH_DEADLINE_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .context("SEARCH_DEADLINE_MS must be an integer")?;
        // 0 disables the deadline
        let deadline = (deadline_ms > 0).then(|| Duration::from_millis(deadline_ms));
        let search = SearchConfig::new(radius_tiers_m, early_stop_threshold, deadline)
            .context("Invalid proximity search configuration")?;

        Ok(AppConfig {
            postgres_host: env::var("POSTGRES_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            postgres_port: env::var("POSTGRES_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()?,
            postgres_db: env::var("POSTGRES_DB").unwrap_or_else(|_| "pairent".to_string()),
            postgres_user: env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string()),
            postgres_password: env::var("POSTGRES_PASSWORD").unwrap_or_default(),
            db_pool_max_size: env::var("DB_POOL_MAX_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,

            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            listen_port: env::var("LISTEN_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            search,
        })
    }
}

/// Parses a comma-separated list of radii in meters, e.g. "1000,10000,25000".
pub fn parse_radius_tiers(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("Invalid radius tier '{}'", s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_tiers() {
        let tiers = parse_radius_tiers("1000,10000, 25000 ,50000,100000").unwrap();
        assert_eq!(tiers, vec![1_000.0, 10_000.0, 25_000.0, 50_000.0, 100_000.0]);
    }

    #[test]
    fn rejects_garbage_tier() {
        assert!(parse_radius_tiers("1000,ten").is_err());
    }
}
