use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub yahoo_base_url: String,
    /// Upper bound on in-flight requests to the market data provider
    pub provider_max_concurrent: usize,
    /// Minimum spacing between provider calls; 0 disables spacing
    pub provider_requests_per_minute: u32,
    /// TTL of the market response cache; 0 disables caching
    pub market_cache_ttl_secs: u64,
    pub sentiment_service_url: Option<String>,
    pub cors_allowed_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            port: parse_var("PORT", 4000)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            yahoo_base_url: std::env::var("YAHOO_BASE_URL")
                .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
            provider_max_concurrent: parse_var("PROVIDER_MAX_CONCURRENT", 8)?,
            provider_requests_per_minute: parse_var("PROVIDER_REQUESTS_PER_MINUTE", 1200)?,
            market_cache_ttl_secs: parse_var("MARKET_CACHE_TTL_SECS", 5)?,
            sentiment_service_url: std::env::var("SENTIMENT_SERVICE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_padded_numbers() {
        let port: u16 = parse_value("PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let result: Result<u32, _> = parse_value("PROVIDER_MAX_CONCURRENT", "eight");
        match result {
            Err(ConfigError::Invalid { name, value }) => {
                assert_eq!(name, "PROVIDER_MAX_CONCURRENT");
                assert_eq!(value, "eight");
            }
            other => panic!("expected invalid value error, got {:?}", other),
        }
    }
}
