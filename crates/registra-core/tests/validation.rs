use registra_core::cascade::CascadeStore;
use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::{HierarchyLevel, LevelChain};
use registra_core::strictness::resolve_strictness;
use registra_core::validation::{FieldIssue, validate_all, validate_field};

fn store() -> CascadeStore {
    CascadeStore::new(
        LevelChain::new(vec![
            HierarchyLevel::new("country", "Country").required(),
            HierarchyLevel::new("state", "State").required(),
            HierarchyLevel::new("city", "City"),
        ])
        .unwrap(),
    )
}

#[test]
fn empty_form_reports_required_fields() {
    let store = store();
    let strictness = resolve_strictness(store.levels(), Some("state"));

    let errors = validate_all(&store, &strictness);

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.issue == FieldIssue::Required));
    assert_eq!(errors[0].field_key, "country");
    assert_eq!(errors[0].to_string(), "Country is required");
}

#[test]
fn free_text_in_strict_field_is_rejected() {
    let mut store = store();
    let strictness = resolve_strictness(store.levels(), Some("state"));
    store
        .select_entry("country", &HierarchyEntry::named("India").with_stable_id("c-1"))
        .unwrap();
    store.edit_freehand("state", "Maha").unwrap();

    let errors = validate_all(&store, &strictness);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field_key, "state");
    assert_eq!(errors[0].issue, FieldIssue::NotFromHierarchy);
}

#[test]
fn selected_and_loaded_values_pass() {
    let mut store = store();
    let strictness = resolve_strictness(store.levels(), Some("state"));
    store.bulk_set(
        [("country", Some("India".to_string()))]
            .into_iter()
            .collect(),
    );
    store
        .select_entry("state", &HierarchyEntry::named("Maharashtra").with_stable_id("s-1"))
        .unwrap();
    store.edit_freehand("city", "anything goes").unwrap();

    assert!(validate_all(&store, &strictness).is_empty());
}

#[test]
fn single_field_validation_matches_full_pass() {
    let mut store = store();
    let strictness = resolve_strictness(store.levels(), Some("state"));
    store.edit_freehand("state", "Maha").unwrap();

    let country = validate_field(&store, &strictness, "country").unwrap().unwrap();
    assert_eq!(country.issue, FieldIssue::Required);

    let state = validate_field(&store, &strictness, "state").unwrap().unwrap();
    assert_eq!(state.to_string(), "State: select a value from the list");

    assert!(validate_field(&store, &strictness, "city").unwrap().is_none());
    assert!(validate_field(&store, &strictness, "street").is_err());
}
