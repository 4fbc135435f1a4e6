use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use slicekit_common::SlicekitConfig;

/// Hands out instance numbers for key suffixes. Starts at 0.
#[derive(Debug, Default)]
pub struct InstanceCounter {
    next: AtomicU64,
}

impl InstanceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// How many instance numbers have been handed out.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Everything an injector reads from its surroundings: the instance counter,
/// the ambient namespace and feature, and the key delimiter.
///
/// Clones share the counter, so a nested context (`ctx.clone().with_namespace(..)`)
/// never hands out a suffix its parent already used.
#[derive(Debug, Clone)]
pub struct InjectionContext {
    counter: Arc<InstanceCounter>,
    namespace: Option<String>,
    feature: Option<String>,
    key_delimiter: String,
    warn_on_missing_namespace: bool,
}

impl InjectionContext {
    pub fn new(config: &SlicekitConfig) -> Self {
        Self {
            counter: Arc::new(InstanceCounter::new()),
            namespace: None,
            feature: None,
            key_delimiter: config.key_delimiter.clone(),
            warn_on_missing_namespace: config.warn_on_missing_namespace,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    pub fn key_delimiter(&self) -> &str {
        &self.key_delimiter
    }

    pub fn warn_on_missing_namespace(&self) -> bool {
        self.warn_on_missing_namespace
    }

    pub fn counter(&self) -> &InstanceCounter {
        &self.counter
    }

    /// `{delimiter}{n}` for the next instance.
    pub(crate) fn next_suffix(&self) -> String {
        format!("{}{}", self.key_delimiter, self.counter.next())
    }
}

impl Default for InjectionContext {
    fn default() -> Self {
        Self::new(&SlicekitConfig::default())
    }
}
