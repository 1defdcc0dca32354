//! Configuration and durable local storage for the console.
//!
//! - [`LocalStore`]: origin-scoped key-value storage that outlives the process
//!   (signed-in phone number, cached display name).
//! - [`ConsoleConfig`]: environment-driven settings.

mod console;
mod local_store;

pub use console::ConsoleConfig;
pub use local_store::{keys, FileLocalStore, LocalStore, MemoryLocalStore};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read local storage: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse local storage: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Local storage file must contain a JSON object of strings")]
    InvalidLayout,
    #[error("No home directory found; set RPA_DATA_DIR")]
    NoHomeDir,
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}
