//! The reducer trait used by the store and the case-based reducer builder.

use std::sync::Arc;

use serde_json::Value;
use slicekit_common::{Action, Result, SlicekitError};

use crate::matcher::{Matcher, Predicate};

/// Pure state update over a JSON slice.
///
/// `state` is `None` the first time a slice is reduced; the reducer supplies
/// its own initial value in that case.
pub trait Reducer: Send + Sync {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value>;
}

impl<F> Reducer for F
where
    F: Fn(Option<&Value>, &Action) -> Result<Value> + Send + Sync,
{
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value> {
        self(state, action)
    }
}

pub type SharedReducer = Arc<dyn Reducer>;

/// Wraps a closure as a shareable reducer.
pub fn reducer_fn<F>(f: F) -> SharedReducer
where
    F: Fn(Option<&Value>, &Action) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub type Handler<S> = Arc<dyn Fn(S, &Action) -> S + Send + Sync>;

/// One `(matcher, handler, error handler?)` tuple.
pub struct ReducerCase<S> {
    matcher: Matcher<S>,
    handler: Handler<S>,
    error_handler: Option<Handler<S>>,
}

impl<S> ReducerCase<S> {
    pub fn new<F>(matcher: impl Into<Matcher<S>>, handler: F) -> Self
    where
        F: Fn(S, &Action) -> S + Send + Sync + 'static,
    {
        Self {
            matcher: matcher.into(),
            handler: Arc::new(handler),
            error_handler: None,
        }
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(S, &Action) -> S + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }
}

struct CompiledCase<S> {
    matches: Predicate<S>,
    handler: Handler<S>,
    error_handler: Option<Handler<S>>,
}

/// Reducer assembled by [`make_reducer`].
pub struct CaseReducer<S> {
    cases: Vec<CompiledCase<S>>,
    initial: S,
}

/// Build a reducer from ordered cases. The first case whose matcher accepts
/// the action wins; actions flagged `error` go to that case's error handler.
pub fn make_reducer<S>(cases: Vec<ReducerCase<S>>, initial: S) -> CaseReducer<S>
where
    S: Clone + 'static,
{
    let cases = cases
        .into_iter()
        .map(|case| CompiledCase {
            matches: case.matcher.into_predicate(),
            handler: case.handler,
            error_handler: case.error_handler,
        })
        .collect();
    CaseReducer { cases, initial }
}

impl<S: Clone> CaseReducer<S> {
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Reduce `state` (or the initial value when `None`) by `action`.
    ///
    /// Fails with [`SlicekitError::MissingErrorReducer`] when the matching
    /// case has no error handler and the action is an error.
    pub fn apply(&self, state: Option<S>, action: &Action) -> Result<S> {
        let state = state.unwrap_or_else(|| self.initial.clone());

        let Some(case) = self.cases.iter().find(|case| (case.matches)(&state, action)) else {
            return Ok(state);
        };

        if !action.error {
            return Ok((case.handler)(state, action));
        }

        match &case.error_handler {
            Some(error_handler) => Ok(error_handler(state, action)),
            None => Err(SlicekitError::MissingErrorReducer {
                action_type: action.action_type.clone(),
            }),
        }
    }
}

impl Reducer for CaseReducer<Value> {
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Result<Value> {
        self.apply(state.cloned(), action)
    }
}
