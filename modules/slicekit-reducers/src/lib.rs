//! Reducer composition.
//!
//! `make_reducer` builds one reducer out of ordered (matcher, handler,
//! error handler) cases. `compose_reducers` and `combine_reducers` glue
//! JSON reducers together the way the store builds its root reducer.

pub mod compose;
pub mod matcher;
pub mod reducer;

pub use compose::{combine_reducers, compose_reducers, CombinedReducers, ComposedReducers};
pub use matcher::Matcher;
pub use reducer::{
    make_reducer, reducer_fn, CaseReducer, Handler, Reducer, ReducerCase, SharedReducer,
};
