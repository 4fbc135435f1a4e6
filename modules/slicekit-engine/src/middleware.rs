//! Middleware chain composition.

use anyhow::Result;
use slicekit_common::{Action, Entry};

use crate::traits::{Middleware, MiddlewareApi, Next, SharedMiddleware};

pub(crate) struct Link {
    pub(crate) namespace: Option<String>,
    pub(crate) middleware: SharedMiddleware,
}

/// Ordered middleware folded right to left: `compose([a, b])` behaves like
/// `a(b(terminal))`, where the terminal hands the action to the reducers.
pub struct MiddlewareChain {
    links: Vec<Link>,
}

impl MiddlewareChain {
    /// Chain of global middleware; every link sees every action.
    pub fn compose(middleware: Vec<SharedMiddleware>) -> Self {
        let links = middleware
            .into_iter()
            .map(|middleware| Link {
                namespace: None,
                middleware,
            })
            .collect();
        Self { links }
    }

    /// Chain built from injected entries. A namespaced link is skipped for
    /// actions from other namespaces.
    pub fn from_entries<'e>(
        entries: impl IntoIterator<Item = &'e Entry<SharedMiddleware>>,
    ) -> Self {
        let links = entries
            .into_iter()
            .map(|entry| Link {
                namespace: entry.namespace.clone(),
                middleware: entry.value.clone(),
            })
            .collect();
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Push `action` through the chain. `None` means a middleware swallowed it.
    pub fn run(&self, api: &MiddlewareApi<'_>, action: Action) -> Result<Option<Action>> {
        Next {
            links: &self.links,
            api,
        }
        .run(action)
    }
}

impl Middleware for MiddlewareChain {
    fn handle(
        &self,
        api: &MiddlewareApi<'_>,
        action: Action,
        next: Next<'_>,
    ) -> Result<Option<Action>> {
        match self.run(api, action)? {
            Some(action) => next.run(action),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};
    use slicekit_common::InjectOptions;

    use super::*;
    use crate::traits::middleware_fn;

    fn tracer(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> SharedMiddleware {
        middleware_fn(move |_api, action, next| {
            log.lock().unwrap().push(format!("{name}:before"));
            let result = next.run(action);
            log.lock().unwrap().push(format!("{name}:after"));
            result
        })
    }

    #[test]
    fn composes_outermost_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::compose(vec![
            tracer("a", log.clone()),
            tracer("b", log.clone()),
        ]);

        let state = json!({});
        let api = MiddlewareApi::new(&state);
        let reached = chain.run(&api, Action::new("PING")).unwrap();

        assert_eq!(reached.unwrap().action_type, "PING");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:before", "b:before", "b:after", "a:after"]
        );
    }

    #[test]
    fn middleware_can_rewrite_and_swallow() {
        let chain = MiddlewareChain::compose(vec![
            middleware_fn(|_api, action, next| {
                if action.action_type == "DROP" {
                    return Ok(None);
                }
                next.run(action.with_payload(json!("stamped")))
            }),
        ]);

        let state = Value::Null;
        let api = MiddlewareApi::new(&state);

        assert!(chain.run(&api, Action::new("DROP")).unwrap().is_none());
        let passed = chain.run(&api, Action::new("KEEP")).unwrap().unwrap();
        assert_eq!(passed.payload, json!("stamped"));
    }

    #[test]
    fn namespaced_links_skip_foreign_actions() {
        let hits = Arc::new(Mutex::new(0));
        let counter = {
            let hits = hits.clone();
            middleware_fn(move |_api, action, next| {
                *hits.lock().unwrap() += 1;
                next.run(action)
            })
        };
        let entry = Entry::new("count", counter, &InjectOptions::new().with_namespace("a"));
        let chain = MiddlewareChain::from_entries([&entry]);

        let state = Value::Null;
        let api = MiddlewareApi::new(&state);
        chain.run(&api, Action::new("X").with_namespace("b")).unwrap();
        chain.run(&api, Action::new("X").with_namespace("a")).unwrap();
        chain.run(&api, Action::new("X")).unwrap();

        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn api_dispatch_queues_actions() {
        let chain = MiddlewareChain::compose(vec![middleware_fn(|api, action, next| {
            api.dispatch(Action::new("AUDIT"));
            next.run(action)
        })]);

        let state = Value::Null;
        let api = MiddlewareApi::new(&state);
        chain.run(&api, Action::new("X")).unwrap();

        let queued = api.into_dispatched();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].action_type, "AUDIT");
    }

    #[test]
    fn chain_nests_as_middleware() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner: SharedMiddleware =
            Arc::new(MiddlewareChain::compose(vec![tracer("inner", log.clone())]));
        let outer = MiddlewareChain::compose(vec![tracer("outer", log.clone()), inner]);

        let state = Value::Null;
        let api = MiddlewareApi::new(&state);
        outer.run(&api, Action::new("X")).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer:before", "inner:before", "inner:after", "outer:after"]
        );
    }
}
