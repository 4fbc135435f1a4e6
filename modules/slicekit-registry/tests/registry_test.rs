//! Registry behavior across features, namespaces and versions.

use slicekit_common::{InjectOptions, SlicekitError};
use slicekit_registry::{InjectableKind, InjectionHost, Registry, StoreInterface};

fn keys(registry: &Registry<&'static str>, feature: Option<&str>) -> Vec<String> {
    registry
        .get_entries(feature)
        .iter()
        .map(|entry| entry.key.clone())
        .collect()
}

#[test]
fn buckets_are_keyed_by_feature_and_namespace() {
    let mut registry = Registry::new(InjectableKind::REDUCERS);
    let grid_a = InjectOptions::new().with_feature("grids").with_namespace("a");
    let form_a = InjectOptions::new().with_feature("forms").with_namespace("a");

    registry.inject(vec![("rows".to_string(), "grid")], &grid_a).unwrap();
    registry.inject(vec![("rows".to_string(), "form")], &form_a).unwrap();
    registry
        .inject(vec![("session".to_string(), "global")], &InjectOptions::new())
        .unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(keys(&registry, Some("grids")), vec!["rows"]);
    assert_eq!(keys(&registry, Some("namespaces")), vec!["session"]);

    let outcome = registry.eject(&["rows".to_string()], &grid_a);
    assert!(outcome.was_ejected("rows"));
    assert!(registry.contains("rows", &form_a));
    assert!(!registry.contains("rows", &grid_a));
}

#[test]
fn eject_reports_unknown_and_protected_keys() {
    let mut registry = Registry::new(InjectableKind::EPICS);
    let v3 = InjectOptions::new().with_namespace("n").with_version(3);
    registry
        .inject(
            vec![("poll".to_string(), "p"), ("sync".to_string(), "s")],
            &v3,
        )
        .unwrap();

    let old = InjectOptions::new().with_namespace("n").with_version(2);
    let outcome = registry.eject(
        &["poll".to_string(), "missing".to_string()],
        &old,
    );
    assert!(outcome.ejected.is_empty());
    assert_eq!(outcome.retained, vec!["poll", "missing"]);

    let unversioned = InjectOptions::new().with_namespace("n");
    assert!(!registry.eject(&["poll".to_string()], &unversioned).was_ejected("poll"));

    let current = InjectOptions::new().with_namespace("n").with_version(3);
    let outcome = registry.eject(&["poll".to_string(), "sync".to_string()], &current);
    assert!(outcome.is_complete());
    assert!(registry.is_empty());
}

#[test]
fn reinjection_keeps_position_and_updates_version() {
    let mut registry = Registry::new(InjectableKind::MIDDLEWARE);
    let options = InjectOptions::new();
    registry
        .inject(vec![("log".to_string(), "v1"), ("auth".to_string(), "v1")], &options)
        .unwrap();
    registry
        .inject(vec![("log".to_string(), "v2")], &options.clone().with_version(7))
        .unwrap();

    let entries = registry.get_entries(None);
    assert_eq!(entries[0].key, "log");
    assert_eq!(entries[0].value, "v2");
    assert_eq!(entries[0].version, Some(7));
    assert_eq!(entries[1].value, "v1");
}

#[test]
fn host_trait_reports_entry_infos() {
    let interface = StoreInterface::<&'static str>::new("reducers").unwrap();
    let mut registry = Registry::new("reducers");
    interface
        .inject(
            &mut registry,
            vec![("todos".to_string(), "t")],
            &InjectOptions::new().with_namespace("list").with_version(1),
        )
        .unwrap();

    let infos = InjectionHost::entries(&registry, None);
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].namespace.as_deref(), Some("list"));
    assert_eq!(infos[0].feature, "namespaces");
    assert_eq!(infos[0].version, Some(1));
}

#[test]
fn blank_kind_and_blank_key_are_rejected() {
    assert!(matches!(
        StoreInterface::<u8>::new("  "),
        Err(SlicekitError::MissingType)
    ));

    let mut registry: Registry<u8> = Registry::new("reducers");
    let err = registry
        .inject(vec![("".to_string(), 1)], &InjectOptions::new())
        .unwrap_err();
    assert!(matches!(err, SlicekitError::MissingKey { ref kind } if kind == "reducers"));
}
