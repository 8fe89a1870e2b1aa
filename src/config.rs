// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything except the listening port and the base directory is a fixed
//! path relative to that base directory.

use std::env;
use std::path::{Path, PathBuf};

/// Raw event feed, relative to the base directory.
pub const RAW_EVENTS_PATH: &str = "data/raw/gym_events.csv";
/// Cleaned dataset written by the cleaner and read by the loader.
pub const CLEAN_EVENTS_PATH: &str = "data/processed/clean_gym_events.csv";
/// SQLite store written by the loader and read by the API.
pub const DB_PATH: &str = "api/app.db";

const DEFAULT_PORT: u16 = 8000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory all data paths are resolved against
    pub base_dir: PathBuf,
    /// Server port
    pub port: u16,
    /// Raw check-in feed (cleaner input)
    pub raw_events_path: PathBuf,
    /// Cleaned dataset (cleaner output, loader input)
    pub clean_events_path: PathBuf,
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self::for_base_dir(".")
    }
}

impl Config {
    /// Build the fixed file layout under `base_dir`.
    pub fn for_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            raw_events_path: base_dir.join(RAW_EVENTS_PATH),
            clean_events_path: base_dir.join(CLEAN_EVENTS_PATH),
            db_path: base_dir.join(DB_PATH),
            base_dir,
            port: DEFAULT_PORT,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `GYM_OPS_BASE_DIR` defaults to the working directory and `PORT` to 8000.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_dir = env::var("GYM_OPS_BASE_DIR").unwrap_or_else(|_| ".".to_string());
        if base_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("GYM_OPS_BASE_DIR"));
        }

        let mut config = Self::for_base_dir(base_dir.trim());
        config.port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .unwrap_or(DEFAULT_PORT);
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
