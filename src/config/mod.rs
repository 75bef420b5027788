use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all recipe endpoints are joined onto; must end with a slash
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub page_size: usize,
}

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com/recipes/";

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            connect_timeout_ms: 15_000,
            request_timeout_ms: 30_000,
            read_timeout_ms: 20_000,
            user_agent: format!("CookHelp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let mut base_url =
            std::env::var("SPOONACULAR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let api_key = std::env::var("SPOONACULAR_API_KEY").unwrap_or_default();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/cookhelp.db".to_string());

        Ok(Settings {
            api: ApiConfig {
                base_url,
                api_key,
                connect_timeout_ms: env_or("CONNECT_TIMEOUT_MS", "15000")?,
                request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", "30000")?,
                read_timeout_ms: env_or("READ_TIMEOUT_MS", "20000")?,
                user_agent: format!("CookHelp/{}", env!("CARGO_PKG_VERSION")),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "5")?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "1")?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", "30")?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", "600")?,
            },
            search: SearchConfig {
                page_size: env_or("SEARCH_PAGE_SIZE", "20")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(Error::Config("Page size must be non-zero".to_string()));
        }

        if self.api.connect_timeout_ms == 0
            || self.api.request_timeout_ms == 0
            || self.api.read_timeout_ms == 0
        {
            return Err(Error::Config("Timeouts must be non-zero".to_string()));
        }

        url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::Config(format!("Invalid SPOONACULAR_BASE_URL: {e}")))?;

        if self.database.min_connections > self.database.max_connections {
            return Err(Error::Config(
                "DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }
}
