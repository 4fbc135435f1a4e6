//! Entry storage for one injectable kind.

use slicekit_common::{
    is_version_ejectable, EjectOutcome, Entry, EntryInfo, InjectOptions, Result, SlicekitError,
    DEFAULT_FEATURE,
};
use tracing::{debug, warn};

/// Insertion-ordered entries, unique per (feature, namespace, key).
#[derive(Debug, Clone)]
pub struct Registry<V> {
    kind: String,
    default_feature: String,
    entries: Vec<Entry<V>>,
}

impl<V> Registry<V> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            default_feature: DEFAULT_FEATURE.to_string(),
            entries: Vec::new(),
        }
    }

    /// Feature for options that name none. Defaults to [`DEFAULT_FEATURE`].
    pub fn with_default_feature(mut self, feature: impl Into<String>) -> Self {
        self.default_feature = feature.into();
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn default_feature(&self) -> &str {
        &self.default_feature
    }

    /// `options` with this registry's default feature filled in. Every
    /// bucket lookup goes through here.
    pub fn resolve(&self, options: &InjectOptions) -> InjectOptions {
        options.resolved(&self.default_feature)
    }

    /// Store every `(key, value)` in the bucket addressed by `options`,
    /// replacing entries with the same key. Keys are validated before any
    /// entry is touched.
    pub fn inject(&mut self, entries: Vec<(String, V)>, options: &InjectOptions) -> Result<()> {
        let options = &self.resolve(options);
        if entries.iter().any(|(key, _)| key.is_empty()) {
            return Err(SlicekitError::MissingKey {
                kind: self.kind.clone(),
            });
        }

        for (key, value) in entries {
            match self.position(&key, options) {
                Some(index) => {
                    let existing = &mut self.entries[index];
                    existing.value = value;
                    existing.version = options.version;
                    debug!(
                        kind = %self.kind,
                        key = %key,
                        feature = %existing.feature,
                        "Replaced entry"
                    );
                }
                None => {
                    let entry = Entry::new(key, value, options);
                    debug!(
                        kind = %self.kind,
                        key = %entry.key,
                        feature = %entry.feature,
                        namespace = ?entry.namespace,
                        "Injected entry"
                    );
                    self.entries.push(entry);
                }
            }
        }
        Ok(())
    }

    /// Remove the named keys from the bucket addressed by `options` where the
    /// stored version allows it. Never fails; the outcome says what stayed.
    pub fn eject(&mut self, keys: &[String], options: &InjectOptions) -> EjectOutcome {
        let options = &self.resolve(options);
        let mut outcome = EjectOutcome::default();

        for key in keys {
            let ejectable = self.position(key, options).filter(|&index| {
                is_version_ejectable(options.version, self.entries[index].version)
            });

            match ejectable {
                Some(index) => {
                    self.entries.remove(index);
                    debug!(kind = %self.kind, key = %key, "Ejected entry");
                    outcome.ejected.push(key.clone());
                }
                None => {
                    if self.position(key, options).is_some() {
                        warn!(
                            kind = %self.kind,
                            key = %key,
                            version = ?options.version,
                            "Entry kept: stored version is not ejectable by this call"
                        );
                    }
                    outcome.retained.push(key.clone());
                }
            }
        }

        outcome
    }

    /// Live entries in insertion order, optionally limited to one feature.
    pub fn get_entries(&self, feature: Option<&str>) -> Vec<&Entry<V>> {
        self.entries
            .iter()
            .filter(|entry| feature.map_or(true, |f| entry.feature == f))
            .collect()
    }

    /// Entries of exactly one (feature, namespace) bucket.
    pub fn get_bucket(&self, options: &InjectOptions) -> Vec<&Entry<V>> {
        let options = self.resolve(options);
        self.entries
            .iter()
            .filter(|entry| entry.is_in_bucket(&options))
            .collect()
    }

    pub fn infos(&self, feature: Option<&str>) -> Vec<EntryInfo> {
        self.get_entries(feature).into_iter().map(Entry::info).collect()
    }

    pub fn contains(&self, key: &str, options: &InjectOptions) -> bool {
        self.position(key, options).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str, options: &InjectOptions) -> Option<usize> {
        let options = self.resolve(options);
        self.entries
            .iter()
            .position(|entry| entry.key == key && entry.is_in_bucket(&options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(entries: &[&Entry<&'static str>]) -> Vec<String> {
        entries.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn inject_then_eject_round_trip() {
        let mut registry = Registry::new("reducers");
        let options = InjectOptions::new().with_namespace("todos");

        registry.inject(vec![("list".into(), "r1")], &options).unwrap();
        assert_eq!(keys(&registry.get_entries(None)), vec!["list"]);

        let outcome = registry.eject(&["list".to_string()], &options);
        assert!(outcome.was_ejected("list"));
        assert!(registry.get_entries(None).is_empty());
    }

    #[test]
    fn namespaces_are_isolated() {
        let mut registry = Registry::new("reducers");
        let a = InjectOptions::new().with_namespace("A");
        let b = InjectOptions::new().with_namespace("B");

        registry.inject(vec![("list".into(), "r1")], &a).unwrap();

        assert_eq!(registry.get_bucket(&a).len(), 1);
        assert!(registry.get_bucket(&b).is_empty());
        assert!(!registry.contains("list", &b));

        let outcome = registry.eject(&["list".to_string()], &b);
        assert_eq!(outcome.retained, vec!["list"]);
        assert!(registry.contains("list", &a));
    }

    #[test]
    fn reinjection_replaces_value_in_place() {
        let mut registry = Registry::new("reducers");
        let options = InjectOptions::new();

        registry
            .inject(vec![("a".into(), "v1"), ("b".into(), "v1")], &options)
            .unwrap();
        registry.inject(vec![("a".into(), "v2")], &options).unwrap();

        let entries = registry.get_entries(None);
        assert_eq!(keys(&entries), vec!["a", "b"]);
        assert_eq!(entries[0].value, "v2");
    }

    #[test]
    fn empty_key_rejects_whole_batch() {
        let mut registry = Registry::new("epics");
        let err = registry
            .inject(vec![("ok".into(), "v"), (String::new(), "v")], &InjectOptions::new())
            .unwrap_err();

        assert!(matches!(err, SlicekitError::MissingKey { ref kind } if kind == "epics"));
        assert!(registry.is_empty());
    }

    #[test]
    fn newer_injection_survives_older_eject() {
        let mut registry = Registry::new("reducers");
        registry
            .inject(vec![("a".into(), "v")], &InjectOptions::new().with_version(6))
            .unwrap();

        let stale = registry.eject(&["a".to_string()], &InjectOptions::new().with_version(5));
        assert!(!stale.was_ejected("a"));

        let unversioned = registry.eject(&["a".to_string()], &InjectOptions::new());
        assert!(!unversioned.was_ejected("a"));

        let current = registry.eject(&["a".to_string()], &InjectOptions::new().with_version(6));
        assert!(current.was_ejected("a"));
    }

    #[test]
    fn feature_filter_limits_entries() {
        let mut registry = Registry::new("reducers");
        registry
            .inject(vec![("a".into(), "v")], &InjectOptions::new().with_feature("grids"))
            .unwrap();
        registry.inject(vec![("b".into(), "v")], &InjectOptions::new()).unwrap();

        assert_eq!(keys(&registry.get_entries(Some("grids"))), vec!["a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn configured_default_feature_places_and_finds_entries() {
        let mut registry = Registry::new("reducers").with_default_feature("modules");
        let options = InjectOptions::new().with_namespace("todos");

        registry.inject(vec![("list".into(), "r1")], &options).unwrap();

        assert_eq!(registry.get_entries(None)[0].feature, "modules");
        assert!(registry.get_entries(Some(DEFAULT_FEATURE)).is_empty());
        assert_eq!(registry.get_bucket(&options).len(), 1);
        assert!(registry.contains("list", &options.clone().with_feature("modules")));

        let outcome = registry.eject(&["list".to_string()], &options);
        assert!(outcome.was_ejected("list"));
    }
}
