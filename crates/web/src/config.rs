use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a number")?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(max) => max
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let store_timeout_ms = match lookup("STORE_TIMEOUT_MS") {
            Some(ms) => ms.parse().context("STORE_TIMEOUT_MS must be a number")?,
            None => DEFAULT_STORE_TIMEOUT_MS,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?,
            max_connections,
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }

    /// Database URL with credentials stripped, for logging.
    pub fn redacted_database_url(&self) -> &str {
        self.database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/ratings")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(config(&[("PORT", "8080")]).is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = config(&[("DATABASE_URL", "postgres://db"), ("PORT", "eighty")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("STORE_TIMEOUT_MS", "250"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_redacted_database_url_drops_credentials() {
        let config = config(&[("DATABASE_URL", "postgres://user:secret@db:5432/ratings")]).unwrap();
        assert_eq!(config.redacted_database_url(), "db:5432/ratings");
    }
}
