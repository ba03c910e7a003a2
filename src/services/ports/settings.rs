use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS_MESSAGE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default = "default_status_message_timeout_ms")]
    pub status_message_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            status_message_timeout_ms: DEFAULT_STATUS_MESSAGE_TIMEOUT_MS,
        }
    }
}

fn default_status_message_timeout_ms() -> u64 {
    DEFAULT_STATUS_MESSAGE_TIMEOUT_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSettings {
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,
    #[serde(default = "default_true")]
    pub use_ripgrep: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            use_ripgrep: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-folder configuration lookup.
pub trait ConfigurationProvider: Send + Sync {
    fn search_settings(&self, folder: &Path) -> SearchSettings;
}
