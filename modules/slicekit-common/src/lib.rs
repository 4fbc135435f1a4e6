//! Shared vocabulary for slicekit: actions, entries, options, errors and
//! configuration. Every other slicekit crate depends on this one.

pub mod action;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use action::{make_action_types, Action, ActionCreator, ActionMeta};
pub use config::SlicekitConfig;
pub use error::{Result, SlicekitError};
pub use types::*;
