use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request timed out: {0}")]
    NetworkTimeout(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid search filters: {0}")]
    InvalidFilter(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure category surfaced to sessions and the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkTimeout,
    NetworkFailure,
    Api,
    InvalidFilter,
    Persistence,
    Internal,
}

/// Tagged failure with a human-readable reason.
///
/// Unlike [`Error`] this is cheap to clone, so it can live inside state
/// snapshots that are handed out to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub reason: String,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NetworkTimeout(_) => ErrorKind::NetworkTimeout,
            Error::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Error::Api(_) | Error::NotFound(_) => ErrorKind::Api,
            Error::InvalidFilter(_) => ErrorKind::InvalidFilter,
            Error::Database(_) | Error::Migration(_) => ErrorKind::Persistence,
            Error::InvalidUrl(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Database errors might contain schema details
            Error::Database(_) => "Database operation failed".to_string(),
            Error::Migration(_) => "Database migration failed".to_string(),

            // Transport errors carry the request URL, which includes the API key
            Error::NetworkTimeout(_) => "External request timed out".to_string(),
            Error::NetworkFailure(_) => "External request failed".to_string(),

            Error::Internal(msg) | Error::Config(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("secret") || lower.contains("token") || lower.contains("key") {
                    "Internal error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Api(msg) => format!("API error: {msg}"),
            Error::InvalidFilter(msg) => format!("Invalid search filters: {msg}"),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::NotFound(msg) => format!("Not found: {msg}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest embeds the full URL (and so the apiKey parameter) in Display
        let err = err.without_url();
        if err.is_timeout() {
            Error::NetworkTimeout(err.to_string())
        } else if err.is_decode() {
            Error::Api(format!("Malformed response body: {err}"))
        } else if let Some(status) = err.status() {
            Error::Api(format!("HTTP {status}"))
        } else {
            Error::NetworkFailure(err.to_string())
        }
    }
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Failure {
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::from(&err)
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}
