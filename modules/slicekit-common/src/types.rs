//! Entry model shared by the registry, the store and the injectors.

use serde::{Deserialize, Serialize};

/// Feature used when an injection does not name one.
pub const DEFAULT_FEATURE: &str = "namespaces";

/// Where and under which version an injection (or ejection) applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectOptions {
    pub namespace: Option<String>,
    pub feature: Option<String>,
    pub version: Option<u64>,
}

impl InjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// The named feature, or `default_feature` when none is named.
    pub fn feature_or<'a>(&'a self, default_feature: &'a str) -> &'a str {
        self.feature.as_deref().unwrap_or(default_feature)
    }

    /// Copy with the feature filled in from `default_feature` when unset.
    pub fn resolved(&self, default_feature: &str) -> Self {
        Self {
            feature: Some(self.feature_or(default_feature).to_string()),
            ..self.clone()
        }
    }
}

/// One injectable unit held by a registry.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    pub key: String,
    pub namespace: Option<String>,
    pub feature: String,
    pub version: Option<u64>,
    pub value: V,
}

impl<V> Entry<V> {
    pub fn new(key: impl Into<String>, value: V, options: &InjectOptions) -> Self {
        Self {
            key: key.into(),
            namespace: options.namespace.clone(),
            feature: options.feature_or(DEFAULT_FEATURE).to_string(),
            version: options.version,
            value,
        }
    }

    /// True when this entry lives in the bucket addressed by `options`.
    pub fn is_in_bucket(&self, options: &InjectOptions) -> bool {
        self.feature == options.feature_or(DEFAULT_FEATURE) && self.namespace == options.namespace
    }

    pub fn is_global(&self) -> bool {
        self.namespace.is_none()
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            namespace: self.namespace.clone(),
            feature: self.feature.clone(),
            version: self.version,
        }
    }
}

/// Value-free view of an entry, for inspection and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub key: String,
    pub namespace: Option<String>,
    pub feature: String,
    pub version: Option<u64>,
}

/// Whether an eject carrying `ejecting` may remove an entry stored with `stored`.
///
/// Unversioned ejects only remove unversioned entries and vice versa. Between
/// two versions, the eject must be at least as new as the stored injection.
pub fn is_version_ejectable(ejecting: Option<u64>, stored: Option<u64>) -> bool {
    match (ejecting, stored) {
        (None, None) => true,
        (Some(ejecting), Some(stored)) => stored <= ejecting,
        _ => false,
    }
}

/// Per-key result of an eject call. Ejection is best-effort: keys that were
/// missing or carried a newer version end up in `retained`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EjectOutcome {
    pub ejected: Vec<String>,
    pub retained: Vec<String>,
}

impl EjectOutcome {
    pub fn was_ejected(&self, key: &str) -> bool {
        self.ejected.iter().any(|k| k == key)
    }

    pub fn is_complete(&self) -> bool {
        self.retained.is_empty()
    }
}
