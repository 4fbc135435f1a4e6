//! The store and its dispatch loop.

use std::collections::VecDeque;

use serde_json::{json, Map, Value};
use slicekit_common::{
    Action, EjectOutcome, EntryInfo, InjectOptions, Result, SlicekitConfig, SlicekitError,
};
use slicekit_reducers::{combine_reducers, compose_reducers, Reducer, SharedReducer};
use slicekit_registry::{InjectableKind, InjectionHost, Registry, StoreInterface};
use tracing::{debug, info, warn};

use crate::middleware::MiddlewareChain;
use crate::traits::{EpicContext, MiddlewareApi, SharedEpic, SharedMiddleware};

/// Action types the store dispatches on its own after injections change.
pub mod action_types {
    pub const REDUCERS_INJECTED: &str = "@slicekit/REDUCERS_INJECTED";
    pub const REDUCERS_EJECTED: &str = "@slicekit/REDUCERS_EJECTED";
    pub const EPICS_INJECTED: &str = "@slicekit/EPICS_INJECTED";
    pub const EPICS_EJECTED: &str = "@slicekit/EPICS_EJECTED";
    pub const MIDDLEWARE_INJECTED: &str = "@slicekit/MIDDLEWARE_INJECTED";
    pub const MIDDLEWARE_EJECTED: &str = "@slicekit/MIDDLEWARE_EJECTED";
}

/// Single-threaded store with injectable reducers, epics and middleware.
///
/// State is a JSON object. Global reducers own `state[key]`; the reducers of
/// one (feature, namespace) bucket are composed in injection order and own
/// `state[feature][namespace]`.
pub struct Store {
    state: Value,
    reducers: Registry<SharedReducer>,
    epics: Registry<SharedEpic>,
    middleware: Registry<SharedMiddleware>,
    config: SlicekitConfig,
}

impl Store {
    pub fn new(config: SlicekitConfig) -> Self {
        info!(
            max_dispatch_cascade = config.max_dispatch_cascade,
            "Store created"
        );
        let feature = config.default_feature.clone();
        Self {
            state: Value::Object(Map::new()),
            reducers: Registry::new(InjectableKind::REDUCERS).with_default_feature(&feature),
            epics: Registry::new(InjectableKind::EPICS).with_default_feature(&feature),
            middleware: Registry::new(InjectableKind::MIDDLEWARE).with_default_feature(feature),
            config,
        }
    }

    /// Start from preloaded state, e.g. state rendered elsewhere.
    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    pub fn config(&self) -> &SlicekitConfig {
        &self.config
    }

    pub fn get_state(&self) -> &Value {
        &self.state
    }

    /// `state[feature][namespace]`, with the configured default feature when
    /// `feature` is `None`.
    pub fn get_state_by_namespace(
        &self,
        feature: Option<&str>,
        namespace: &str,
    ) -> Option<&Value> {
        let feature = feature.unwrap_or(self.config.default_feature.as_str());
        self.state.get(feature)?.get(namespace)
    }

    pub fn reducers(&self) -> &Registry<SharedReducer> {
        &self.reducers
    }

    pub fn epics(&self) -> &Registry<SharedEpic> {
        &self.epics
    }

    pub fn middleware(&self) -> &Registry<SharedMiddleware> {
        &self.middleware
    }

    /// Dispatch an action. Runs it through middleware, reduces state, runs
    /// epics, and processes any actions they emit until the queue is empty.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let mut queue: VecDeque<Action> = VecDeque::new();
        queue.push_back(action);
        let mut processed = 0usize;

        while let Some(action) = queue.pop_front() {
            processed += 1;
            if processed > self.config.max_dispatch_cascade {
                return Err(SlicekitError::DispatchOverflow {
                    limit: self.config.max_dispatch_cascade,
                    action_type: action.action_type,
                });
            }
            debug!(
                action_type = %action.action_type,
                namespace = ?action.namespace(),
                "Dispatching"
            );

            // 1. Middleware (may rewrite, swallow, or queue more actions)
            let chain = MiddlewareChain::from_entries(self.middleware.get_entries(None));
            let api = MiddlewareApi::new(&self.state);
            let passed = chain.run(&api, action)?;
            queue.extend(api.into_dispatched());
            let Some(action) = passed else {
                debug!("Action swallowed by middleware");
                continue;
            };

            // 2. Reduce (pure state update)
            self.state = self.reduce_root(&action)?;

            // 3. Epics (may emit new actions, tagged with the epic's namespace)
            for entry in self.epics.get_entries(None) {
                let namespace = entry.namespace.as_deref();
                if !action.is_from_namespace(namespace) {
                    continue;
                }
                let ctx = EpicContext {
                    state: &self.state,
                    feature: &entry.feature,
                    namespace,
                };
                for emitted in entry.value.run(&action, &ctx)? {
                    queue.push_back(emitted.attach_namespace(namespace));
                }
            }
        }

        Ok(())
    }

    fn reduce_root(&self, action: &Action) -> Result<Value> {
        let globals: Vec<(String, SharedReducer)> = self
            .reducers
            .get_entries(None)
            .into_iter()
            .filter(|entry| entry.is_global())
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect();
        let mut root = combine_reducers(globals).reduce(Some(&self.state), action)?;

        if let Some(root_map) = root.as_object_mut() {
            for (feature, namespace, reducers) in self.namespaced_slices() {
                if !action.is_from_namespace(Some(&namespace)) {
                    continue;
                }
                let feature_state = root_map
                    .entry(feature)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !feature_state.is_object() {
                    *feature_state = Value::Object(Map::new());
                }
                if let Some(slices) = feature_state.as_object_mut() {
                    let slice =
                        compose_reducers(reducers).reduce(slices.get(&namespace), action)?;
                    slices.insert(namespace, slice);
                }
            }
        }

        Ok(root)
    }

    /// Namespaced reducers grouped by (feature, namespace), in the order
    /// each bucket was first injected.
    fn namespaced_slices(&self) -> Vec<(String, String, Vec<SharedReducer>)> {
        let mut slices: Vec<(String, String, Vec<SharedReducer>)> = Vec::new();
        for entry in self.reducers.get_entries(None) {
            let Some(namespace) = entry.namespace.as_deref() else {
                continue;
            };
            match slices
                .iter_mut()
                .find(|(f, n, _)| *f == entry.feature && n == namespace)
            {
                Some((_, _, reducers)) => reducers.push(entry.value.clone()),
                None => slices.push((
                    entry.feature.clone(),
                    namespace.to_string(),
                    vec![entry.value.clone()],
                )),
            }
        }
        slices
    }

    /// Drop state that no remaining reducer owns after `ejected` keys left
    /// the bucket addressed by `options`.
    fn prune_orphaned_state(&mut self, ejected: &[String], options: &InjectOptions) {
        let Some(root) = self.state.as_object_mut() else {
            return;
        };

        match options.namespace.as_deref() {
            None => {
                for key in ejected {
                    let still_owned = self
                        .reducers
                        .get_entries(None)
                        .iter()
                        .any(|entry| entry.is_global() && entry.key == *key);
                    if !still_owned {
                        root.remove(key);
                    }
                }
            }
            Some(namespace) => {
                if !self.reducers.get_bucket(options).is_empty() {
                    return;
                }
                let feature = options.feature_or(&self.config.default_feature);
                let emptied = match root.get_mut(feature).and_then(Value::as_object_mut) {
                    Some(slices) => {
                        slices.remove(namespace);
                        slices.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    root.remove(feature);
                }
                debug!(feature, namespace, "Pruned slice state");
            }
        }
    }

    fn announce(
        &mut self,
        action_type: &str,
        keys: &[String],
        options: &InjectOptions,
    ) -> Result<()> {
        self.dispatch(Action::new(action_type).with_payload(json!({
            "keys": keys,
            "namespace": options.namespace,
            "feature": options.feature_or(&self.config.default_feature),
        })))
    }

    /// Global reducer keys and feature slices share the root object, so
    /// neither may take a name the other already uses.
    fn check_state_keys(&self, keys: &[String], options: &InjectOptions) -> Result<()> {
        let entries = self.reducers.get_entries(None);
        let collision = match options.namespace {
            None => keys.iter().find(|key| {
                **key == self.config.default_feature
                    || entries.iter().any(|e| !e.is_global() && e.feature == **key)
            }),
            Some(_) => {
                let feature = options.feature_or(&self.config.default_feature);
                entries
                    .iter()
                    .find(|e| e.is_global() && e.key == feature)
                    .map(|e| &e.key)
            }
        };
        match collision {
            Some(key) => Err(SlicekitError::StateKeyCollision { key: key.clone() }),
            None => Ok(()),
        }
    }
}

impl Store {
    /// `injectReducers`: add or replace reducers, then initialize their slices.
    pub fn inject_reducers(
        &mut self,
        entries: Vec<(String, SharedReducer)>,
        options: &InjectOptions,
    ) -> Result<()> {
        let options = self.reducers.resolve(options);
        let keys: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();
        self.check_state_keys(&keys, &options)?;

        let snapshot = (self.reducers.clone(), self.state.clone());
        self.reducers.inject(entries, &options)?;
        if let Err(err) = self.announce(action_types::REDUCERS_INJECTED, &keys, &options) {
            warn!(error = %err, keys = ?keys, "Reducer injection rolled back");
            (self.reducers, self.state) = snapshot;
            return Err(err);
        }
        Ok(())
    }

    /// `ejectReducers`: remove reducers and any slice state left without one.
    pub fn eject_reducers(
        &mut self,
        keys: &[String],
        options: &InjectOptions,
    ) -> Result<EjectOutcome> {
        let options = self.reducers.resolve(options);
        let outcome = self.reducers.eject(keys, &options);
        if !outcome.ejected.is_empty() {
            self.prune_orphaned_state(&outcome.ejected, &options);
            self.announce(action_types::REDUCERS_EJECTED, &outcome.ejected, &options)?;
        }
        Ok(outcome)
    }

    pub fn inject_epics(
        &mut self,
        entries: Vec<(String, SharedEpic)>,
        options: &InjectOptions,
    ) -> Result<()> {
        let options = self.epics.resolve(options);
        let keys: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();

        let snapshot = (self.epics.clone(), self.state.clone());
        self.epics.inject(entries, &options)?;
        if let Err(err) = self.announce(action_types::EPICS_INJECTED, &keys, &options) {
            warn!(error = %err, keys = ?keys, "Epic injection rolled back");
            (self.epics, self.state) = snapshot;
            return Err(err);
        }
        Ok(())
    }

    pub fn eject_epics(
        &mut self,
        keys: &[String],
        options: &InjectOptions,
    ) -> Result<EjectOutcome> {
        let options = self.epics.resolve(options);
        let outcome = self.epics.eject(keys, &options);
        if !outcome.ejected.is_empty() {
            self.announce(action_types::EPICS_EJECTED, &outcome.ejected, &options)?;
        }
        Ok(outcome)
    }

    pub fn inject_middleware(
        &mut self,
        entries: Vec<(String, SharedMiddleware)>,
        options: &InjectOptions,
    ) -> Result<()> {
        let options = self.middleware.resolve(options);
        let keys: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();

        let snapshot = (self.middleware.clone(), self.state.clone());
        self.middleware.inject(entries, &options)?;
        if let Err(err) = self.announce(action_types::MIDDLEWARE_INJECTED, &keys, &options) {
            warn!(error = %err, keys = ?keys, "Middleware injection rolled back");
            (self.middleware, self.state) = snapshot;
            return Err(err);
        }
        Ok(())
    }

    pub fn eject_middleware(
        &mut self,
        keys: &[String],
        options: &InjectOptions,
    ) -> Result<EjectOutcome> {
        let options = self.middleware.resolve(options);
        let outcome = self.middleware.eject(keys, &options);
        if !outcome.ejected.is_empty() {
            self.announce(action_types::MIDDLEWARE_EJECTED, &outcome.ejected, &options)?;
        }
        Ok(outcome)
    }
}

impl InjectionHost<SharedReducer> for Store {
    fn inject(
        &mut self,
        entries: Vec<(String, SharedReducer)>,
        options: &InjectOptions,
    ) -> Result<()> {
        self.inject_reducers(entries, options)
    }

    fn eject(&mut self, keys: &[String], options: &InjectOptions) -> Result<EjectOutcome> {
        self.eject_reducers(keys, options)
    }

    fn entries(&self, feature: Option<&str>) -> Vec<EntryInfo> {
        self.reducers.infos(feature)
    }
}

impl InjectionHost<SharedEpic> for Store {
    fn inject(
        &mut self,
        entries: Vec<(String, SharedEpic)>,
        options: &InjectOptions,
    ) -> Result<()> {
        self.inject_epics(entries, options)
    }

    fn eject(&mut self, keys: &[String], options: &InjectOptions) -> Result<EjectOutcome> {
        self.eject_epics(keys, options)
    }

    fn entries(&self, feature: Option<&str>) -> Vec<EntryInfo> {
        self.epics.infos(feature)
    }
}

impl InjectionHost<SharedMiddleware> for Store {
    fn inject(
        &mut self,
        entries: Vec<(String, SharedMiddleware)>,
        options: &InjectOptions,
    ) -> Result<()> {
        self.inject_middleware(entries, options)
    }

    fn eject(&mut self, keys: &[String], options: &InjectOptions) -> Result<EjectOutcome> {
        self.eject_middleware(keys, options)
    }

    fn entries(&self, feature: Option<&str>) -> Vec<EntryInfo> {
        self.middleware.infos(feature)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(SlicekitConfig::default())
    }
}

/// Store interface for reducers (`injectReducers` / `ejectReducers`).
pub fn reducers_interface() -> Result<StoreInterface<SharedReducer>> {
    StoreInterface::new(InjectableKind::REDUCERS)
}

pub fn epics_interface() -> Result<StoreInterface<SharedEpic>> {
    StoreInterface::new(InjectableKind::EPICS)
}

pub fn middleware_interface() -> Result<StoreInterface<SharedMiddleware>> {
    StoreInterface::new(InjectableKind::MIDDLEWARE)
}
