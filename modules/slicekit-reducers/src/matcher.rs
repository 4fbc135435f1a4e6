//! Action matchers for [`make_reducer`](crate::make_reducer) cases.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use slicekit_common::{Action, Result, SlicekitError};

pub type Predicate<S> = Arc<dyn Fn(&S, &Action) -> bool + Send + Sync>;

/// Decides whether a case handles an action.
pub enum Matcher<S> {
    /// Exactly this action type.
    Type(String),
    /// Any of these action types.
    AnyOf(Vec<String>),
    /// Arbitrary test over the current state and the action.
    Predicate(Predicate<S>),
}

impl<S> Matcher<S> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&S, &Action) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Builds a matcher from a JSON description: a string or an array of
    /// strings. Anything else cannot name an action type and is rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(action_type) => Ok(Self::Type(action_type.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| SlicekitError::InvalidMatcher(item.to_string()))
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::AnyOf),
            other => Err(SlicekitError::InvalidMatcher(other.to_string())),
        }
    }
}

impl<S: 'static> Matcher<S> {
    /// Collapses every variant into one predicate so dispatch never has to
    /// look at the matcher's shape again.
    pub fn into_predicate(self) -> Predicate<S> {
        match self {
            Self::Type(expected) => {
                Arc::new(move |_: &S, action: &Action| action.action_type == expected)
            }
            Self::AnyOf(types) => {
                Arc::new(move |_: &S, action: &Action| {
                    types.iter().any(|t| *t == action.action_type)
                })
            }
            Self::Predicate(f) => f,
        }
    }
}

impl<S> fmt::Debug for Matcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => f.debug_tuple("Type").field(t).finish(),
            Self::AnyOf(types) => f.debug_tuple("AnyOf").field(types).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<S> From<&str> for Matcher<S> {
    fn from(action_type: &str) -> Self {
        Self::Type(action_type.to_string())
    }
}

impl<S> From<String> for Matcher<S> {
    fn from(action_type: String) -> Self {
        Self::Type(action_type)
    }
}

impl<S> From<Vec<&str>> for Matcher<S> {
    fn from(types: Vec<&str>) -> Self {
        Self::AnyOf(types.into_iter().map(str::to_string).collect())
    }
}

impl<S> From<Vec<String>> for Matcher<S> {
    fn from(types: Vec<String>) -> Self {
        Self::AnyOf(types)
    }
}

impl<S, const N: usize> From<[&str; N]> for Matcher<S> {
    fn from(types: [&str; N]) -> Self {
        Self::AnyOf(types.iter().map(|t| t.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_and_arrays_are_accepted() {
        let single = Matcher::<i64>::from_json(&json!("ADD")).unwrap();
        assert!(matches!(single, Matcher::Type(ref t) if t == "ADD"));

        let many = Matcher::<i64>::from_json(&json!(["A", "B"])).unwrap();
        assert!(matches!(many, Matcher::AnyOf(ref ts) if ts.len() == 2));
    }

    #[test]
    fn json_of_other_shapes_fails_fast() {
        for bad in [json!(42), json!({"type": "ADD"}), json!(["A", 1]), json!(null)] {
            let err = Matcher::<i64>::from_json(&bad).unwrap_err();
            assert!(matches!(err, SlicekitError::InvalidMatcher(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn predicates_see_state() {
        let predicate = Matcher::<i64>::predicate(|state, _| *state > 10).into_predicate();
        assert!(predicate(&11, &Action::new("ANY")));
        assert!(!predicate(&3, &Action::new("ANY")));
    }
}
