//! Store with injectable reducers, epics and middleware.
//!
//! Dispatch runs a queue until settled: middleware → reduce → epics, with
//! every action emitted by an epic or middleware re-entering the queue.
//!
//! Consumers inject `Reducer`s (pure slice updates), `Epic`s (side effects
//! that emit new actions) and `Middleware` (interceptors around reduction)
//! under a feature and namespace, and eject them again when done.

pub mod middleware;
pub mod recorder;
pub mod store;
pub mod traits;

pub use middleware::MiddlewareChain;
pub use recorder::ActionRecorder;
pub use store::{
    action_types, epics_interface, middleware_interface, reducers_interface, Store,
};
pub use traits::{
    epic_fn, middleware_fn, Epic, EpicContext, Middleware, MiddlewareApi, Next, SharedEpic,
    SharedMiddleware,
};
