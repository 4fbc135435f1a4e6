//! Actions and namespace attachment.
//!
//! An action without a namespace is global: every namespaced reducer, epic
//! and middleware sees it. A namespaced action is only seen by units
//! injected under the same namespace (and by global units).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Keeps an emitted action global even when it leaves a namespaced epic.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prevent_namespace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub meta: ActionMeta,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Value::Null,
            error: false,
            meta: ActionMeta::default(),
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.meta.namespace = Some(namespace.into());
        self
    }

    pub fn preventing_namespace(mut self) -> Self {
        self.meta.prevent_namespace = true;
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.meta.namespace.as_deref()
    }

    /// Tags the action with `namespace` unless it already carries one or
    /// opted out via `prevent_namespace`.
    pub fn attach_namespace(mut self, namespace: Option<&str>) -> Self {
        if self.meta.namespace.is_none() && !self.meta.prevent_namespace {
            self.meta.namespace = namespace.map(str::to_string);
        }
        self
    }

    /// Global actions belong to every namespace. A `None` namespace on the
    /// receiving side accepts everything.
    pub fn is_from_namespace(&self, namespace: Option<&str>) -> bool {
        match (self.namespace(), namespace) {
            (None, _) | (_, None) => true,
            (Some(own), Some(wanted)) => own == wanted,
        }
    }
}

/// Builds `{name: "prefix/name"}` constants for a group of action types.
pub fn make_action_types(prefix: &str, names: &[&str]) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|name| (name.to_string(), format!("{prefix}/{name}")))
        .collect()
}

/// Stamps out actions of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCreator {
    /// `{type}` only; any argument is ignored.
    Constant(String),
    /// `{type, payload}`.
    Payload(String),
    /// `{type, payload, error: true}`.
    Error(String),
}

impl ActionCreator {
    pub fn action_type(&self) -> &str {
        match self {
            Self::Constant(t) | Self::Payload(t) | Self::Error(t) => t,
        }
    }

    pub fn create(&self, payload: Value) -> Action {
        match self {
            Self::Constant(t) => Action::new(t.clone()),
            Self::Payload(t) => Action::new(t.clone()).with_payload(payload),
            Self::Error(t) => Action::new(t.clone()).with_payload(payload).with_error(true),
        }
    }
}
