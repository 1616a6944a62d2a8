//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default attempts for retryable allocation failures.
const fn default_retry_attempts() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Attempts (including the first) the CLI makes when an allocation hits
    /// lock contention or a uniqueness conflict.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Actor recorded when `--actor` is not given. Empty means system action.
    #[serde(default)]
    pub default_actor: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            default_actor: String::new(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub fn default_actor(&self) -> Option<&str> {
        if self.default_actor.is_empty() {
            None
        } else {
            Some(&self.default_actor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.default_actor(), None);
    }
}
