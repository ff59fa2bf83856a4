//! Resolver configuration

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Memory mapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Provider name served by the built-in local mapper
    pub default_provider: String,
    /// Map the default provider locally when no mapper service is found
    pub enable_local_fallback: bool,
    /// Upper bound on mapping size in bytes; the platform limit always applies
    pub max_mapping_size: Option<u64>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            default_provider: crate::DEFAULT_PROVIDER_NAME.to_string(),
            enable_local_fallback: true,
            max_mapping_size: None,
        }
    }
}

impl MapperConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_provider.is_empty() {
            return Err(ConfigError::Invalid("default_provider must not be empty".to_string()));
        }

        if self.max_mapping_size == Some(0) {
            return Err(ConfigError::Invalid("max_mapping_size must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Effective size limit given the platform's own limit
    pub fn effective_max_mapping_size(&self, platform_max: u64) -> u64 {
        self.max_mapping_size
            .map_or(platform_max, |max| max.min(platform_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.default_provider, "ashmem");
        assert!(config.enable_local_fallback);
        assert_eq!(config.max_mapping_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MapperConfig::from_json(r#"{ "max_mapping_size": 65536 }"#).unwrap();
        assert_eq!(config.default_provider, "ashmem");
        assert!(config.enable_local_fallback);
        assert_eq!(config.max_mapping_size, Some(65536));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            MapperConfig::from_json(r#"{ "default_provider": "" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapperConfig::from_json(r#"{ "max_mapping_size": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapperConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_effective_max_mapping_size() {
        let mut config = MapperConfig::default();
        assert_eq!(config.effective_max_mapping_size(1 << 20), 1 << 20);

        config.max_mapping_size = Some(4096);
        assert_eq!(config.effective_max_mapping_size(1 << 20), 4096);

        config.max_mapping_size = Some(u64::MAX);
        assert_eq!(config.effective_max_mapping_size(1 << 20), 1 << 20);
    }

    #[test]
    fn test_config_round_trip_through_json() {
        let config = MapperConfig {
            default_provider: "ashmem".to_string(),
            enable_local_fallback: false,
            max_mapping_size: Some(1024),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(MapperConfig::from_json(&json).unwrap(), config);
    }
}
