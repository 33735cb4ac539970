//! Scanner configuration.

use crate::error::ScannerError;
use serde::{Deserialize, Serialize};

/// Default number of chars kept in the window buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2000;

/// Tunables of a [`ScannerRange`](crate::ScannerRange).
///
/// Loadable from YAML, e.g. `buffer_capacity: 4096`; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Chars cached around the scan position. Must be positive.
    pub buffer_capacity: usize,
}

impl ScannerConfig {
    /// Config with an explicit buffer capacity.
    pub fn new(buffer_capacity: usize) -> Result<Self, ScannerError> {
        let config = Self { buffer_capacity };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScannerError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.buffer_capacity == 0 {
            return Err(ScannerError::InvalidConfiguration(
                "buffer_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(ScannerConfig::default().buffer_capacity, 2000);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            ScannerConfig::new(0),
            Err(ScannerError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ScannerConfig::from_yaml_str("buffer_capacity: 0"),
            Err(ScannerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_yaml() {
        let config = ScannerConfig::from_yaml_str("buffer_capacity: 64").unwrap();
        assert_eq!(config.buffer_capacity, 64);

        let config = ScannerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ScannerConfig::default());

        assert!(matches!(
            ScannerConfig::from_yaml_str("buffer_capacity: lots"),
            Err(ScannerError::Config(_))
        ));
    }
}
