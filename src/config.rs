//! Runtime configuration shared by the binary and the advisory client.

use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "firma-asistan-data";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the three ledger blobs.
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}
