//! Application configuration loaded from environment variables.
//!
//! Provider tokens are optional; they only raise upstream rate limits.

use std::env;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";
const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GitHub REST API base URL
    pub github_api_url: String,
    /// Bitbucket REST API base URL
    pub bitbucket_api_url: String,
    /// Optional GitHub token, sent as a bearer header
    pub github_token: Option<String>,
    /// Optional Bitbucket token, sent as a bearer header
    pub bitbucket_token: Option<String>,
    /// Max in-flight per-repository requests within one aggregation
    pub fetch_concurrency: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            bitbucket_api_url: DEFAULT_BITBUCKET_API_URL.to_string(),
            github_token: None,
            bitbucket_token: None,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let fetch_concurrency = match env::var("FETCH_CONCURRENCY") {
            Ok(raw) => parse_concurrency(&raw)?,
            Err(_) => DEFAULT_FETCH_CONCURRENCY,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            github_api_url: env::var("GITHUB_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            bitbucket_api_url: env::var("BITBUCKET_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BITBUCKET_API_URL.to_string()),
            github_token: optional_secret("GITHUB_OAUTH_TOKEN"),
            bitbucket_token: optional_secret("BITBUCKET_TOKEN"),
            fetch_concurrency,
        })
    }
}

/// Read a secret, treating unset and blank the same.
fn optional_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_concurrency(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::Invalid {
            name: "FETCH_CONCURRENCY",
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GITHUB_API_URL", "http://localhost:9999/");
        env::set_var("GITHUB_OAUTH_TOKEN", "  ");
        env::set_var("BITBUCKET_TOKEN", "bb-token");
        env::remove_var("FETCH_CONCURRENCY");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.github_api_url, "http://localhost:9999");
        assert_eq!(config.github_token, None);
        assert_eq!(config.bitbucket_token.as_deref(), Some("bb-token"));
        assert_eq!(config.fetch_concurrency, 8);
    }

    #[test]
    fn test_parse_concurrency() {
        assert_eq!(parse_concurrency("4").unwrap(), 4);
        assert_eq!(parse_concurrency(" 16 ").unwrap(), 16);
        assert!(parse_concurrency("0").is_err());
        assert!(parse_concurrency("many").is_err());
    }
}
