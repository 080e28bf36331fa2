//! Configuration for building modify updates

use serde::{Deserialize, Serialize};

/// How repeated cell addresses within one update are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateCells {
    /// Later cell overwrites earlier
    #[default]
    LastWins,
    /// Repeated address is malformed input
    Reject,
}

/// Update builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    /// Maximum cells in one update
    pub max_cells: usize,
    /// Repeated address handling
    pub duplicate_cells: DuplicateCells,
}

impl UpdateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max cells per update
    #[inline]
    #[must_use]
    pub fn with_max_cells(mut self, max: usize) -> Self {
        self.max_cells = max;
        self
    }

    /// With duplicate address handling
    #[inline]
    #[must_use]
    pub fn with_duplicate_cells(mut self, policy: DuplicateCells) -> Self {
        self.duplicate_cells = policy;
        self
    }

    /// Load from TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// Returns error on invalid TOML, unknown keys, or a zero `max_cells`
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if config.max_cells == 0 {
            return Err(ConfigError::ZeroMaxCells);
        }
        Ok(config)
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            max_cells: 1_000_000,
            duplicate_cells: DuplicateCells::LastWins,
        }
    }
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse or schema error
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// `max_cells` set to zero
    #[error("max_cells must be positive")]
    ZeroMaxCells,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = UpdateConfig::new();
        assert_eq!(config.max_cells, 1_000_000);
        assert_eq!(config.duplicate_cells, DuplicateCells::LastWins);
    }

    #[test]
    fn builder_methods() {
        let config = UpdateConfig::new()
            .with_max_cells(10)
            .with_duplicate_cells(DuplicateCells::Reject);
        assert_eq!(config.max_cells, 10);
        assert_eq!(config.duplicate_cells, DuplicateCells::Reject);
    }

    #[test]
    fn from_toml_partial() {
        let config = UpdateConfig::from_toml_str("duplicate_cells = \"reject\"").unwrap();
        assert_eq!(config.duplicate_cells, DuplicateCells::Reject);
        assert_eq!(config.max_cells, 1_000_000);
    }

    #[test]
    fn from_toml_empty_is_default() {
        assert_eq!(UpdateConfig::from_toml_str("").unwrap(), UpdateConfig::default());
    }

    #[test]
    fn from_toml_rejects_unknown_keys_and_zero_limit() {
        assert!(matches!(
            UpdateConfig::from_toml_str("max_celss = 3"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            UpdateConfig::from_toml_str("max_cells = 0"),
            Err(ConfigError::ZeroMaxCells)
        ));
    }
}
