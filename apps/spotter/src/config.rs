use anyhow::{Context, Result};

pub const DEFAULT_SCORING_SERVICE_URL: &str = "http://127.0.0.1:5000/upload";

/// Application configuration loaded from environment variables.
/// Every setting has a default; invalid values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub scoring_service_url: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring_service_url: DEFAULT_SCORING_SERVICE_URL.to_string(),
            port: 5000,
            max_upload_bytes: 50 * 1024 * 1024,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_MB") {
            Some(v) => v
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
                .checked_mul(1024 * 1024)
                .context("MAX_UPLOAD_MB is too large")?,
            None => defaults.max_upload_bytes,
        };

        Ok(Config {
            scoring_service_url: lookup("SCORING_SERVICE_URL")
                .unwrap_or(defaults.scoring_service_url),
            port,
            max_upload_bytes,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.scoring_service_url, DEFAULT_SCORING_SERVICE_URL);
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("SCORING_SERVICE_URL", "http://scorer:9000/upload"),
            ("PORT", "9000"),
            ("MAX_UPLOAD_MB", "5"),
        ]))
        .unwrap();
        assert_eq!(config.scoring_service_url, "http://scorer:9000/upload");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_oversized_upload_limit_is_an_error() {
        let limit = usize::MAX.to_string();
        let err = Config::from_lookup(lookup(&[("MAX_UPLOAD_MB", limit.as_str())])).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB"));
    }
}
