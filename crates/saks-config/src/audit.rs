//! Audit log listing configuration.

use serde::{Deserialize, Serialize};

const fn default_take() -> u32 {
    200
}

const fn default_min_take() -> u32 {
    50
}

const fn default_max_take() -> u32 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Number of records listed when no limit is given.
    #[serde(default = "default_take")]
    pub default_take: u32,

    /// Smallest page a listing may request.
    #[serde(default = "default_min_take")]
    pub min_take: u32,

    /// Largest page a listing may request.
    #[serde(default = "default_max_take")]
    pub max_take: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_take: default_take(),
            min_take: default_min_take(),
            max_take: default_max_take(),
        }
    }
}

impl AuditConfig {
    /// Clamp a requested page size into `[min_take, max_take]`.
    #[must_use]
    pub fn clamp_take(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_take)
            .clamp(self.min_take, self.max_take.max(self.min_take))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuditConfig::default();
        assert_eq!(config.default_take, 200);
        assert_eq!(config.min_take, 50);
        assert_eq!(config.max_take, 1000);
    }

    #[test]
    fn clamp_take_bounds() {
        let config = AuditConfig::default();
        assert_eq!(config.clamp_take(None), 200);
        assert_eq!(config.clamp_take(Some(10)), 50);
        assert_eq!(config.clamp_take(Some(5000)), 1000);
        assert_eq!(config.clamp_take(Some(300)), 300);
    }
}
