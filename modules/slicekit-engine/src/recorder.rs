//! Recording middleware.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use slicekit_common::Action;

use crate::traits::{Middleware, MiddlewareApi, Next, SharedMiddleware};

/// Middleware that keeps a copy of every action passing through it. Thread-safe;
/// share it with [`ActionRecorder::shared`] and read it back for assertions or
/// debugging.
#[derive(Default)]
pub struct ActionRecorder {
    actions: Mutex<Vec<Action>>,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorder plus the same recorder as injectable middleware.
    pub fn shared() -> (Arc<Self>, SharedMiddleware) {
        let recorder = Arc::new(Self::new());
        let middleware: SharedMiddleware = recorder.clone();
        (recorder, middleware)
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn action_types(&self) -> Vec<String> {
        self.actions().into_iter().map(|a| a.action_type).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.clear();
        }
    }
}

impl Middleware for ActionRecorder {
    fn handle(
        &self,
        _api: &MiddlewareApi<'_>,
        action: Action,
        next: Next<'_>,
    ) -> Result<Option<Action>> {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action.clone());
        }
        next.run(action)
    }
}
