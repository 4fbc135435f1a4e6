//! Namespaced injection registry.
//!
//! A [`Registry`] owns the entries of one injectable kind (reducers, epics or
//! middleware) bucketed by feature and namespace. [`StoreInterface`] is the
//! per-kind handle through which injectors talk to any [`InjectionHost`].

pub mod interface;
pub mod registry;

pub use interface::{InjectableKind, InjectionHost, StoreInterface};
pub use registry::Registry;
