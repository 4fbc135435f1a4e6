//! The store contract injectors rely on.

use std::fmt;
use std::marker::PhantomData;

use slicekit_common::{EjectOutcome, EntryInfo, InjectOptions, Result, SlicekitError};
use tracing::debug;

use crate::registry::Registry;

/// Name of an injectable kind plus the store methods derived from it:
/// `reducers` → `injectReducers` / `ejectReducers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectableKind {
    name: String,
    inject_method: String,
    eject_method: String,
}

impl InjectableKind {
    pub const REDUCERS: &'static str = "reducers";
    pub const EPICS: &'static str = "epics";
    pub const MIDDLEWARE: &'static str = "middleware";

    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(SlicekitError::MissingType);
        };
        let capitalized: String = first.to_uppercase().chain(chars).collect();

        Ok(Self {
            name: name.to_string(),
            inject_method: format!("inject{capitalized}"),
            eject_method: format!("eject{capitalized}"),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inject_method(&self) -> &str {
        &self.inject_method
    }

    pub fn eject_method(&self) -> &str {
        &self.eject_method
    }
}

impl fmt::Display for InjectableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Anything that can hold injected values of type `V`.
///
/// A store implements this once per injectable kind; a bare [`Registry`] also
/// qualifies, which is handy when no store is involved.
pub trait InjectionHost<V> {
    fn inject(&mut self, entries: Vec<(String, V)>, options: &InjectOptions) -> Result<()>;

    /// Best-effort removal. Keys that stay are listed in the outcome.
    fn eject(&mut self, keys: &[String], options: &InjectOptions) -> Result<EjectOutcome>;

    fn entries(&self, feature: Option<&str>) -> Vec<EntryInfo>;
}

impl<V> InjectionHost<V> for Registry<V> {
    fn inject(&mut self, entries: Vec<(String, V)>, options: &InjectOptions) -> Result<()> {
        Registry::inject(self, entries, options)
    }

    fn eject(&mut self, keys: &[String], options: &InjectOptions) -> Result<EjectOutcome> {
        Ok(Registry::eject(self, keys, options))
    }

    fn entries(&self, feature: Option<&str>) -> Vec<EntryInfo> {
        self.infos(feature)
    }
}

/// Per-kind handle onto an [`InjectionHost`].
pub struct StoreInterface<V> {
    kind: InjectableKind,
    _value: PhantomData<fn(V)>,
}

impl<V> StoreInterface<V> {
    pub fn new(kind: &str) -> Result<Self> {
        Ok(Self {
            kind: InjectableKind::new(kind)?,
            _value: PhantomData,
        })
    }

    pub fn kind(&self) -> &InjectableKind {
        &self.kind
    }

    pub fn inject<H>(
        &self,
        host: &mut H,
        entries: Vec<(String, V)>,
        options: &InjectOptions,
    ) -> Result<()>
    where
        H: InjectionHost<V> + ?Sized,
    {
        debug!(
            method = self.kind.inject_method(),
            count = entries.len(),
            namespace = ?options.namespace,
            "Injecting"
        );
        host.inject(entries, options)
    }

    pub fn eject<H>(
        &self,
        host: &mut H,
        keys: &[String],
        options: &InjectOptions,
    ) -> Result<EjectOutcome>
    where
        H: InjectionHost<V> + ?Sized,
    {
        debug!(
            method = self.kind.eject_method(),
            count = keys.len(),
            namespace = ?options.namespace,
            "Ejecting"
        );
        host.eject(keys, options)
    }

    pub fn get_entries<H>(&self, host: &H, feature: Option<&str>) -> Vec<EntryInfo>
    where
        H: InjectionHost<V> + ?Sized,
    {
        host.entries(feature)
    }
}

impl<V> Clone for StoreInterface<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> fmt::Debug for StoreInterface<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreInterface").field("kind", &self.kind).finish()
    }
}
