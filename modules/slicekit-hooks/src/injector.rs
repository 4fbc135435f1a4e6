//! Mount / update / unmount lifecycle around a store interface.

use sha2::{Digest, Sha256};
use slicekit_common::{InjectOptions, Result, SlicekitError};
use slicekit_registry::{InjectionHost, StoreInterface};
use tracing::{debug, warn};

use crate::context::InjectionContext;

/// How an [`Injector`] places its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorOptions {
    pub namespace: Option<String>,
    pub feature: Option<String>,
    pub is_global: bool,
    pub is_persistent: bool,
    pub version: Option<u64>,
    global_alias: Option<bool>,
    persist_alias: Option<bool>,
}

impl InjectorOptions {
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

    /// Inject without a namespace, even inside a namespaced context.
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Leave the values in the store after unmount.
    pub fn persistent(mut self) -> Self {
        self.is_persistent = true;
        self
    }

    #[deprecated(note = "use `InjectorOptions::global`")]
    pub fn with_global(mut self, global: bool) -> Self {
        self.global_alias = Some(global);
        self
    }

    #[deprecated(note = "use `InjectorOptions::persistent`")]
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist_alias = Some(persist);
        self
    }

    fn resolved_global(&self) -> bool {
        self.is_global || self.global_alias.unwrap_or(false)
    }

    fn resolved_persistent(&self) -> bool {
        self.is_persistent || self.persist_alias.unwrap_or(false)
    }

    fn warn_deprecated(&self, kind: &str) {
        if self.global_alias.is_some() {
            warn!(kind, "Option `global` is deprecated, use `is_global`");
        }
        if self.persist_alias.is_some() {
            warn!(kind, "Option `persist` is deprecated, use `is_persistent`");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorState {
    Uninitialized,
    Injected,
    Ejected,
    Persisted,
}

/// Hex SHA-256 over the sorted key names. Values do not contribute.
pub fn key_set_hash<V>(injectables: &[(String, V)]) -> String {
    let mut keys: Vec<&str> = injectables.iter().map(|(key, _)| key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();

    let mut hasher = Sha256::new();
    for key in keys {
        hasher.update(key.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Injects a declared set of values once per mount and ejects them again on
/// unmount unless persistent.
pub struct Injector<V> {
    interface: StoreInterface<V>,
    injectables: Vec<(String, V)>,
    options: InjectorOptions,
    state: InjectorState,
    key_set_hash: String,
    suffix: Option<String>,
    placement: Option<InjectOptions>,
    suffixed_keys: Vec<String>,
}

impl<V: Clone> Injector<V> {
    pub fn new(
        interface: StoreInterface<V>,
        injectables: Vec<(String, V)>,
        options: InjectorOptions,
    ) -> Self {
        let key_set_hash = key_set_hash(&injectables);
        Self {
            interface,
            injectables,
            options,
            state: InjectorState::Uninitialized,
            key_set_hash,
            suffix: None,
            placement: None,
            suffixed_keys: Vec::new(),
        }
    }

    pub fn state(&self) -> InjectorState {
        self.state
    }

    pub fn key_set_hash(&self) -> &str {
        &self.key_set_hash
    }

    /// Keys as they are stored in the host. Empty before mount.
    pub fn suffixed_keys(&self) -> &[String] {
        &self.suffixed_keys
    }

    /// Namespace, feature and version the values were injected with.
    pub fn placement(&self) -> Option<&InjectOptions> {
        self.placement.as_ref()
    }

    pub fn mount<H>(&mut self, host: &mut H, ctx: &InjectionContext) -> Result<()>
    where
        H: InjectionHost<V> + ?Sized,
    {
        if self.state != InjectorState::Uninitialized {
            return Err(SlicekitError::AlreadyMounted {
                kind: self.interface.kind().to_string(),
            });
        }

        self.check_keys(&self.injectables)?;
        let kind = self.interface.kind().name().to_string();
        self.options.warn_deprecated(&kind);
        let placement = self.resolve_placement(ctx);
        if placement.namespace.is_none()
            && !self.options.resolved_global()
            && ctx.warn_on_missing_namespace()
        {
            warn!(
                kind = %kind,
                "No namespace resolved for injection; mark the injector global to silence this"
            );
        }

        let suffix = ctx.next_suffix();
        let entries = self.suffixed_entries(&suffix);
        self.interface.inject(host, entries, &placement)?;

        debug!(kind = %kind, suffix = %suffix, keys = ?self.suffixed_keys, "Mounted injector");
        self.suffix = Some(suffix);
        self.placement = Some(placement);
        self.state = InjectorState::Injected;
        Ok(())
    }

    /// Swap the declared values. Re-injects only when the set of key names
    /// changed; returns whether it did.
    pub fn update<H>(&mut self, host: &mut H, injectables: Vec<(String, V)>) -> Result<bool>
    where
        H: InjectionHost<V> + ?Sized,
    {
        self.check_keys(&injectables)?;
        let hash = key_set_hash(&injectables);
        if hash == self.key_set_hash {
            return Ok(false);
        }
        self.injectables = injectables;
        self.key_set_hash = hash;

        let (Some(suffix), Some(placement)) = (self.suffix.clone(), self.placement.clone()) else {
            return Ok(false);
        };
        if self.state != InjectorState::Injected {
            return Ok(false);
        }

        if !self.options.resolved_persistent() {
            self.interface.eject(host, &self.suffixed_keys, &placement)?;
        }
        let entries = self.suffixed_entries(&suffix);
        self.interface.inject(host, entries, &placement)?;
        debug!(keys = ?self.suffixed_keys, "Re-injected changed key set");
        Ok(true)
    }

    pub fn unmount<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: InjectionHost<V> + ?Sized,
    {
        if self.state != InjectorState::Injected {
            return Ok(());
        }
        if self.options.resolved_persistent() {
            self.state = InjectorState::Persisted;
            return Ok(());
        }

        let placement = self.placement.clone().unwrap_or_default();
        let outcome = self.interface.eject(host, &self.suffixed_keys, &placement)?;
        if !outcome.is_complete() {
            debug!(retained = ?outcome.retained, "Some keys stayed injected after unmount");
        }
        self.state = InjectorState::Ejected;
        Ok(())
    }

    /// Declared keys must be non-empty before a suffix is appended.
    fn check_keys(&self, injectables: &[(String, V)]) -> Result<()> {
        if injectables.iter().any(|(key, _)| key.is_empty()) {
            return Err(SlicekitError::MissingKey {
                kind: self.interface.kind().name().to_string(),
            });
        }
        Ok(())
    }

    fn resolve_placement(&self, ctx: &InjectionContext) -> InjectOptions {
        let namespace = if self.options.resolved_global() {
            None
        } else {
            self.options
                .namespace
                .clone()
                .or_else(|| ctx.namespace().map(str::to_string))
        };
        let feature = self
            .options
            .feature
            .clone()
            .or_else(|| ctx.feature().map(str::to_string));

        InjectOptions {
            namespace,
            feature,
            version: self.options.version,
        }
    }

    fn suffixed_entries(&mut self, suffix: &str) -> Vec<(String, V)> {
        let entries: Vec<(String, V)> = self
            .injectables
            .iter()
            .map(|(key, value)| (format!("{key}{suffix}"), value.clone()))
            .collect();
        self.suffixed_keys = entries.iter().map(|(key, _)| key.clone()).collect();
        entries
    }
}
