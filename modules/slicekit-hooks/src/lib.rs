//! Injection lifecycle for components that bring their own reducers, epics
//! or middleware.
//!
//! An [`Injector`] is created with the values it declares, then driven
//! through `mount` / `update` / `unmount` against any
//! [`InjectionHost`](slicekit_registry::InjectionHost). Repeated mounts of the
//! same declaration stay apart because every mount takes a fresh suffix from
//! the [`InjectionContext`]'s counter.

pub mod context;
pub mod injector;

pub use context::{InjectionContext, InstanceCounter};
pub use injector::{key_set_hash, Injector, InjectorOptions, InjectorState};
