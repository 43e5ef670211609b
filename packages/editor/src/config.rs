use serde::{Deserialize, Serialize};
use std::time::Duration;

/// History and debounce settings for a builder session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum snapshots kept for undo (0 = unlimited)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Idle time before pending edits become a snapshot
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_max_entries() -> usize {
    100
}

fn default_debounce_ms() -> u64 {
    500
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            debounce_ms: default_debounce_ms(),
        }
    }
}
