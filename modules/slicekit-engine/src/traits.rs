//! Core traits for injectable epics and middleware.

use std::cell::RefCell;
use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use slicekit_common::Action;

use crate::middleware::Link;

/// What an epic can see while it reacts to an action.
pub struct EpicContext<'a> {
    /// Whole store state after the action was reduced.
    pub state: &'a Value,
    pub feature: &'a str,
    pub namespace: Option<&'a str>,
}

impl EpicContext<'_> {
    /// The slice owned by the epic's namespace, if it has one and it exists.
    pub fn namespaced_state(&self) -> Option<&Value> {
        let namespace = self.namespace?;
        self.state.get(self.feature)?.get(namespace)
    }
}

/// Reacts to reduced actions. May emit new actions, which are tagged with
/// the epic's namespace and re-enter the dispatch queue.
///
/// Called after reduction for every action visible to the epic's namespace.
pub trait Epic: Send + Sync {
    fn run(&self, action: &Action, ctx: &EpicContext<'_>) -> Result<Vec<Action>>;
}

impl<F> Epic for F
where
    F: Fn(&Action, &EpicContext<'_>) -> Result<Vec<Action>> + Send + Sync,
{
    fn run(&self, action: &Action, ctx: &EpicContext<'_>) -> Result<Vec<Action>> {
        self(action, ctx)
    }
}

pub type SharedEpic = Arc<dyn Epic>;

pub fn epic_fn<F>(f: F) -> SharedEpic
where
    F: Fn(&Action, &EpicContext<'_>) -> Result<Vec<Action>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Store access handed to middleware: read the state, queue more actions.
pub struct MiddlewareApi<'a> {
    state: &'a Value,
    dispatched: RefCell<Vec<Action>>,
}

impl<'a> MiddlewareApi<'a> {
    pub fn new(state: &'a Value) -> Self {
        Self {
            state,
            dispatched: RefCell::new(Vec::new()),
        }
    }

    pub fn get_state(&self) -> &Value {
        self.state
    }

    /// Queue an action behind the one currently being handled.
    pub fn dispatch(&self, action: Action) {
        self.dispatched.borrow_mut().push(action);
    }

    pub fn into_dispatched(self) -> Vec<Action> {
        self.dispatched.into_inner()
    }
}

/// The rest of the middleware chain. Calling [`Next::run`] hands the action
/// on; dropping it without calling swallows the action.
pub struct Next<'a> {
    pub(crate) links: &'a [Link],
    pub(crate) api: &'a MiddlewareApi<'a>,
}

impl<'a> Next<'a> {
    /// Returns the action that reached the reducers, or `None` if something
    /// further down swallowed it.
    pub fn run(self, action: Action) -> Result<Option<Action>> {
        let Some((link, rest)) = self.links.split_first() else {
            return Ok(Some(action));
        };
        let next = Next {
            links: rest,
            api: self.api,
        };
        if action.is_from_namespace(link.namespace.as_deref()) {
            link.middleware.handle(self.api, action, next)
        } else {
            next.run(action)
        }
    }
}

/// `store api → next → action → result`, in one call.
pub trait Middleware: Send + Sync {
    fn handle(&self, api: &MiddlewareApi<'_>, action: Action, next: Next<'_>)
        -> Result<Option<Action>>;
}

impl<F> Middleware for F
where
    F: Fn(&MiddlewareApi<'_>, Action, Next<'_>) -> Result<Option<Action>> + Send + Sync,
{
    fn handle(
        &self,
        api: &MiddlewareApi<'_>,
        action: Action,
        next: Next<'_>,
    ) -> Result<Option<Action>> {
        self(api, action, next)
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

pub fn middleware_fn<F>(f: F) -> SharedMiddleware
where
    F: Fn(&MiddlewareApi<'_>, Action, Next<'_>) -> Result<Option<Action>> + Send + Sync + 'static,
{
    Arc::new(f)
}
