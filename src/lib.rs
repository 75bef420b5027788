pub mod config;
pub mod db;
pub mod error;
pub mod models;

// Remote recipe API
pub mod remote;

// Local favorites
pub mod favorites;

// Search sessions and recipe details
pub mod detail;
pub mod search;

pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
