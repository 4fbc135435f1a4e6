//! A small todo-list slice assembled from cases, the way an application
//! would declare one.

use std::sync::Arc;

use serde_json::{json, Value};
use slicekit_common::{make_action_types, Action, ActionCreator, SlicekitError};
use slicekit_reducers::{
    combine_reducers, make_reducer, Matcher, Reducer, ReducerCase, SharedReducer,
};

fn push(mut state: Value, action: &Action) -> Value {
    if let Some(items) = state.get_mut("items").and_then(Value::as_array_mut) {
        items.push(action.payload.clone());
    }
    state
}

fn todos() -> SharedReducer {
    let types = make_action_types("todos", &["ADD", "CLEAR", "LOAD"]);
    let load_types = Matcher::from_json(&json!([types["LOAD"], "todos/RELOAD"]))
        .expect("string array is a valid matcher");

    Arc::new(make_reducer(
        vec![
            ReducerCase::new(types["ADD"].as_str(), push),
            ReducerCase::new(types["CLEAR"].as_str(), |_, _: &Action| {
                json!({ "items": [], "error": null })
            }),
            ReducerCase::new(load_types, |_, action: &Action| {
                json!({ "items": action.payload.clone(), "error": null })
            })
            .with_error_handler(|mut state: Value, action: &Action| {
                state["error"] = action.payload.clone();
                state
            }),
        ],
        json!({ "items": [], "error": null }),
    ))
}

#[test]
fn slice_starts_from_initial_state() {
    let state = todos().reduce(None, &Action::new("@@INIT")).unwrap();
    assert_eq!(state, json!({ "items": [], "error": null }));
}

#[test]
fn creators_drive_the_slice() {
    let reducer = todos();
    let add = ActionCreator::Payload("todos/ADD".to_string());
    let fail = ActionCreator::Error("todos/LOAD".to_string());

    let state = reducer.reduce(None, &add.create(json!("milk"))).unwrap();
    let state = reducer.reduce(Some(&state), &add.create(json!("eggs"))).unwrap();
    assert_eq!(state["items"], json!(["milk", "eggs"]));

    let state = reducer
        .reduce(Some(&state), &fail.create(json!("offline")))
        .unwrap();
    assert_eq!(state["error"], json!("offline"));
    assert_eq!(state["items"], json!(["milk", "eggs"]));
}

#[test]
fn either_load_type_replaces_items() {
    let reducer = todos();
    let reload = Action::new("todos/RELOAD").with_payload(json!(["a"]));
    let state = reducer.reduce(None, &reload).unwrap();
    assert_eq!(state["items"], json!(["a"]));
}

#[test]
fn error_without_handler_surfaces_through_combination() {
    let root = combine_reducers(vec![("todos".to_string(), todos())]);
    let err = root
        .reduce(None, &Action::new("todos/ADD").with_error(true))
        .unwrap_err();
    assert!(matches!(err, SlicekitError::MissingErrorReducer { .. }));
}

#[test]
fn object_payload_is_not_a_matcher() {
    let err = Matcher::<Value>::from_json(&json!({ "type": "ADD" })).unwrap_err();
    assert!(matches!(err, SlicekitError::InvalidMatcher(_)));
}
