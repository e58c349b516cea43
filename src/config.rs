//! Engine configuration, loaded from environment variables.
//!
//! Mirrors the `ServerConfig::from_env()` pattern used elsewhere in this
//! codebase for TLS/ACL settings: defaults baked in, environment variables
//! override when present and parse cleanly.

/// Tuning knobs for an [`crate::iol::IndexedOrderedList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IolConfig {
    /// Maximum number of levels a node may occupy. 32 in the reference design.
    pub max_level: usize,
    /// Promotion probability used by the level generator. 0.25 in the reference design.
    pub p: f64,
}

impl Default for IolConfig {
    fn default() -> Self {
        IolConfig {
            max_level: 32,
            p: 0.25,
        }
    }
}

impl IolConfig {
    /// Load configuration from `EZSET_MAX_LEVEL` / `EZSET_PROMOTION_P`, falling back to
    /// defaults for variables that are unset or fail to parse.
    pub fn from_env() -> Self {
        let default = Self::default();
        let max_level = std::env::var("EZSET_MAX_LEVEL")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| v >= 1)
            .unwrap_or(default.max_level);
        let p = std::env::var("EZSET_PROMOTION_P")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|&v| v > 0.0 && v < 1.0)
            .unwrap_or(default.p);
        IolConfig { max_level, p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IolConfig::default();
        assert_eq!(config.max_level, 32);
        assert_eq!(config.p, 0.25);
    }

    #[test]
    fn test_from_env_falls_back_to_defaults() {
        std::env::remove_var("EZSET_MAX_LEVEL");
        std::env::remove_var("EZSET_PROMOTION_P");
        let config = IolConfig::from_env();
        assert_eq!(config, IolConfig::default());
    }
}
