use crate::constants::DEFAULT_TIMEOUT_MS;
use serde::Deserialize;
use std::time::Duration;

/// Client settings as they appear in a host configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyClientConfig {
    /// Bound applied to connect, pool acquisition and socket reads.
    pub timeout_ms: u64,
    pub follow_redirects: bool,
    pub user_agent: Option<String>,
}

impl Default for PolicyClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            follow_redirects: false,
            user_agent: None,
        }
    }
}

impl PolicyClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
