//! Sequential and keyed composition of JSON reducers.

use serde_json::{Map, Value};
use slicekit_common::{Action, Result};

use crate::reducer::{Reducer, SharedReducer};

/// Runs reducers one after another over the same slice.
pub struct ComposedReducers {
    reducers: Vec<SharedReducer>,
}

impl Reducer for ComposedReducers {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value> {
        let mut current: Option<Value> = state.cloned();
        for reducer in &self.reducers {
            current = Some(reducer.reduce(current.as_ref(), action)?);
        }
        Ok(current.unwrap_or(Value::Null))
    }
}

/// `compose_reducers([a, b])(s, x) == b(a(s, x), x)`.
pub fn compose_reducers(reducers: Vec<SharedReducer>) -> ComposedReducers {
    ComposedReducers { reducers }
}

/// Gives each reducer its own key inside an object slice.
pub struct CombinedReducers {
    reducers: Vec<(String, SharedReducer)>,
}

impl Reducer for CombinedReducers {
    /// Keys without a reducer are carried over untouched.
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value> {
        let mut next: Map<String, Value> = match state {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        for (key, reducer) in &self.reducers {
            let reduced = reducer.reduce(next.get(key), action)?;
            next.insert(key.clone(), reduced);
        }
        Ok(Value::Object(next))
    }
}

pub fn combine_reducers(reducers: Vec<(String, SharedReducer)>) -> CombinedReducers {
    CombinedReducers { reducers }
}
