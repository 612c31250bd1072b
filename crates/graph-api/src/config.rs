//! Service configuration from environment variables.

use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8001";
pub const DEFAULT_DATA_FILE: &str = "data/graphs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Socket address to bind, parsed at startup.
    pub listen: String,
    /// JSON file holding saved graph records.
    pub data_file: PathBuf,
}

impl ApiConfig {
    /// Reads `GRAPHWALK_LISTEN` and `GRAPHWALK_DATA_FILE`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        Self {
            listen: non_blank("GRAPHWALK_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            data_file: non_blank("GRAPHWALK_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
