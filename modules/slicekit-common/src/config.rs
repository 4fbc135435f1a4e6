use std::env;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, SlicekitError};
use crate::types::DEFAULT_FEATURE;

/// Runtime knobs shared by the store and the injectors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlicekitConfig {
    /// Separator between a declared key and its instance suffix.
    pub key_delimiter: String,
    pub default_feature: String,
    /// Upper bound on actions processed by one `dispatch` call.
    pub max_dispatch_cascade: usize,
    pub warn_on_missing_namespace: bool,
}

impl Default for SlicekitConfig {
    fn default() -> Self {
        Self {
            key_delimiter: "__".to_string(),
            default_feature: DEFAULT_FEATURE.to_string(),
            max_dispatch_cascade: 1024,
            warn_on_missing_namespace: true,
        }
    }
}

impl SlicekitConfig {
    /// Load configuration from `SLICEKIT_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Self {
            key_delimiter: env::var("SLICEKIT_KEY_DELIMITER").unwrap_or(defaults.key_delimiter),
            default_feature: env::var("SLICEKIT_DEFAULT_FEATURE")
                .unwrap_or(defaults.default_feature),
            max_dispatch_cascade: parsed_env(
                "SLICEKIT_MAX_DISPATCH_CASCADE",
                defaults.max_dispatch_cascade,
            )?,
            warn_on_missing_namespace: parsed_env(
                "SLICEKIT_WARN_ON_MISSING_NAMESPACE",
                defaults.warn_on_missing_namespace,
            )?,
        }
        .validated()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SlicekitError::Config(e.to_string()))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.key_delimiter.is_empty() {
            return Err(SlicekitError::Config("key_delimiter must not be empty".into()));
        }
        if self.default_feature.is_empty() {
            return Err(SlicekitError::Config("default_feature must not be empty".into()));
        }
        if self.max_dispatch_cascade == 0 {
            return Err(SlicekitError::Config("max_dispatch_cascade must be at least 1".into()));
        }
        Ok(self)
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> anyhow::Result<SlicekitConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = SlicekitConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    info!(path = %path.display(), "Loaded slicekit config");
    Ok(config)
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SlicekitError::Config(format!("{key} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SlicekitConfig::from_toml_str("key_delimiter = \"$\"").unwrap();
        assert_eq!(config.key_delimiter, "$");
        assert_eq!(config.default_feature, DEFAULT_FEATURE);
        assert_eq!(config.max_dispatch_cascade, 1024);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SlicekitConfig::from_toml_str("delimiter = \"$\"").unwrap_err();
        assert!(matches!(err, SlicekitError::Config(_)));
    }

    #[test]
    fn zero_cascade_is_invalid() {
        let err = SlicekitConfig::from_toml_str("max_dispatch_cascade = 0").unwrap_err();
        assert!(err.to_string().contains("max_dispatch_cascade"));
    }
}
