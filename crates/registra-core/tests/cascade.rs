use proptest::prelude::*;
use registra_core::cascade::CascadeStore;
use registra_core::error::CascadeError;
use registra_core::models::address::AddressValues;
use registra_core::models::entry::HierarchyEntry;
use registra_core::models::level::{HierarchyLevel, LevelChain};
use registra_core::models::metadata::FieldPhase;
use registra_core::strictness::resolve_strictness;

const KEYS: [&str; 5] = ["country", "state", "district", "city", "pincode"];

fn store() -> CascadeStore {
    CascadeStore::new(
        LevelChain::new(KEYS.iter().map(|k| HierarchyLevel::new(*k, *k)).collect()).unwrap(),
    )
}

fn values(pairs: &[(&str, &str)]) -> AddressValues {
    pairs
        .iter()
        .map(|(k, v)| (*k, Some(v.to_string())))
        .collect()
}

fn pune_city() -> HierarchyEntry {
    HierarchyEntry::named("Hadapsar").with_stable_id("city-1").with_parent(
        HierarchyEntry::named("Pune").with_stable_id("district-1").with_parent(
            HierarchyEntry::named("Maharashtra")
                .with_stable_id("state-1")
                .with_parent(HierarchyEntry::named("India").with_stable_id("country-1")),
        ),
    )
}

#[test]
fn select_populates_field_and_all_named_ancestors() {
    let mut store = store();
    let populated = store.select_entry("city", &pune_city()).unwrap();

    assert_eq!(populated, vec!["district", "state", "country"]);
    assert_eq!(store.value("city"), Some("Hadapsar"));
    assert_eq!(store.value("district"), Some("Pune"));
    assert_eq!(store.value("state"), Some("Maharashtra"));
    assert_eq!(store.value("country"), Some("India"));
    assert!(!store.values().is_touched("pincode"));

    let city = store.metadata("city").unwrap();
    assert_eq!(city.stable_id.as_deref(), Some("city-1"));
    assert_eq!(city.mirrored_value.as_deref(), Some("Hadapsar"));
    assert_eq!(city.phase, FieldPhase::Idle);

    let state = store.metadata("state").unwrap();
    assert_eq!(state.stable_id.as_deref(), Some("state-1"));
    assert_eq!(state.phase, FieldPhase::AutoPopulating);
}

#[test]
fn select_prefers_user_generated_id_as_value() {
    let mut store = store();
    let entry = HierarchyEntry::named("Pune")
        .with_stable_id("district-1")
        .with_user_generated_id("PUNE-411");
    store.select_entry("district", &entry).unwrap();

    assert_eq!(store.value("district"), Some("PUNE-411"));
    let metadata = store.metadata("district").unwrap();
    assert_eq!(metadata.user_generated_id.as_deref(), Some("PUNE-411"));
    assert_eq!(metadata.mirrored_value.as_deref(), Some("PUNE-411"));
}

#[test]
fn ancestor_population_stops_at_link_without_name_or_id() {
    let mut store = store();
    store.bulk_set(values(&[("country", "Nepal"), ("state", "Bagmati")]));

    let entry = HierarchyEntry::named("Hadapsar").with_stable_id("city-1").with_parent(
        HierarchyEntry::named("Pune")
            .with_stable_id("district-1")
            .with_parent(HierarchyEntry::default().with_parent(HierarchyEntry::named("India"))),
    );
    store.select_entry("city", &entry).unwrap();

    assert_eq!(store.value("city"), Some("Hadapsar"));
    assert_eq!(store.value("district"), Some("Pune"));
    assert_eq!(store.value("state"), Some("Bagmati"));
    assert_eq!(store.value("country"), Some("Nepal"));
}

#[test]
fn city_with_nameless_district_leaves_state_and_country_untouched() {
    let mut store = store();
    let entry = HierarchyEntry::named("Hadapsar")
        .with_stable_id("city-1")
        .with_parent(HierarchyEntry::default());
    store.select_entry("city", &entry).unwrap();

    assert_eq!(store.value("city"), Some("Hadapsar"));
    assert!(!store.values().is_touched("district"));
    assert!(!store.values().is_touched("state"));
    assert!(!store.values().is_touched("country"));
}

#[test]
fn nameless_link_with_stable_id_is_skipped_not_terminal() {
    let mut store = store();
    store.bulk_set(values(&[("state", "Typed State")]));

    let entry = HierarchyEntry::named("Pune").with_stable_id("district-1").with_parent(
        HierarchyEntry::default()
            .with_stable_id("state-1")
            .with_parent(HierarchyEntry::named("India").with_stable_id("country-1")),
    );
    let populated = store.select_entry("district", &entry).unwrap();

    assert_eq!(store.value("state"), Some("Typed State"));
    assert_eq!(store.value("country"), Some("India"));
    assert_eq!(populated, vec!["country"]);
}

#[test]
fn select_never_touches_descendants() {
    let mut store = store();
    store.bulk_set(values(&[("district", "Pune"), ("city", "Hadapsar")]));

    let state = HierarchyEntry::named("Karnataka")
        .with_stable_id("state-2")
        .with_parent(HierarchyEntry::named("India").with_stable_id("country-1"));
    store.select_entry("state", &state).unwrap();

    assert_eq!(store.value("state"), Some("Karnataka"));
    assert_eq!(store.value("district"), Some("Pune"));
    assert_eq!(store.value("city"), Some("Hadapsar"));
}

#[test]
fn parent_chain_longer_than_levels_is_truncated() {
    let mut store = store();
    let entry = HierarchyEntry::named("Maharashtra").with_parent(
        HierarchyEntry::named("India").with_parent(HierarchyEntry::named("Asia")),
    );
    store.select_entry("state", &entry).unwrap();

    assert_eq!(store.value("country"), Some("India"));
    assert_eq!(store.values().len(), 2);
}

#[test]
fn freehand_edit_of_ancestor_keeps_descendants() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();

    store.edit_freehand("state", "Maha").unwrap();

    assert_eq!(store.value("state"), Some("Maha"));
    assert_eq!(store.value("district"), Some("Pune"));
    assert_eq!(store.value("city"), Some("Hadapsar"));
}

#[test]
fn divergent_freehand_edit_drops_identifiers() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();

    store.edit_freehand("district", "Pune East").unwrap();

    let metadata = store.metadata("district").unwrap();
    assert!(metadata.stable_id.is_none());
    assert!(metadata.user_generated_id.is_none());
    assert!(metadata.mirrored_value.is_none());
    assert_eq!(metadata.phase, FieldPhase::UserEditing);
}

#[test]
fn matching_freehand_edit_keeps_identifiers() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();

    store.edit_freehand("district", "Pune").unwrap();

    let metadata = store.metadata("district").unwrap();
    assert_eq!(metadata.stable_id.as_deref(), Some("district-1"));
    assert_eq!(metadata.phase, FieldPhase::UserEditing);
}

#[test]
fn identifiers_do_not_return_after_retyping_original_text() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();

    store.edit_freehand("district", "Pun").unwrap();
    store.edit_freehand("district", "Pune").unwrap();

    assert!(!store.metadata("district").unwrap().is_authoritative());
}

#[test]
fn clear_descendants_clears_only_more_specific_levels() {
    let mut store = store();
    store.bulk_set(values(&[
        ("country", "India"),
        ("state", "MH"),
        ("district", "Pune"),
        ("city", "X"),
    ]));

    store.clear_descendants("state").unwrap();

    assert_eq!(store.value("country"), Some("India"));
    assert_eq!(store.value("state"), Some("MH"));
    assert_eq!(store.values().slot("district"), Some(&None));
    assert_eq!(store.values().slot("city"), Some(&None));
    assert_eq!(store.values().slot("pincode"), Some(&None));
    assert!(!store.metadata("district").unwrap().has_identifier());
}

#[test]
fn clear_field_marks_value_cleared_not_untouched() {
    let mut store = store();
    store.edit_freehand("city", "X").unwrap();
    store.clear_field("city").unwrap();

    assert!(store.values().is_touched("city"));
    assert_eq!(store.value("city"), None);
}

#[test]
fn acknowledge_settles_auto_populated_fields_only() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();
    store.edit_freehand("pincode", "411028").unwrap();

    store.acknowledge("state").unwrap();
    store.acknowledge("pincode").unwrap();

    assert_eq!(store.phase("state"), FieldPhase::Idle);
    assert_eq!(store.phase("district"), FieldPhase::AutoPopulating);
    assert_eq!(store.phase("pincode"), FieldPhase::UserEditing);
}

#[test]
fn reset_all_empties_values_and_metadata() {
    let mut store = store();
    store.select_entry("city", &pune_city()).unwrap();
    store.reset_all();

    assert!(store.values().is_empty());
    assert!(store.metadata("city").is_none());
}

#[test]
fn bulk_set_marks_loaded_values_with_user_generated_id() {
    let mut store = store();
    store.bulk_set(
        [
            ("country", Some("India".to_string())),
            ("state", None),
            ("city", Some(String::new())),
        ]
        .into_iter()
        .collect(),
    );

    let country = store.metadata("country").unwrap();
    assert_eq!(country.user_generated_id.as_deref(), Some("India"));
    assert!(country.stable_id.is_none());
    assert!(store.metadata("state").is_none());
    assert!(store.metadata("city").is_none());
}

#[test]
fn bulk_set_drops_unconfigured_keys() {
    let mut store = store();
    store.bulk_set(values(&[("country", "India"), ("street", "MG Road")]));

    assert!(!store.values().is_touched("street"));
    assert_eq!(store.values().len(), 1);
}

#[test]
fn snapshots_do_not_change_after_later_writes() {
    let mut store = store();
    store.edit_freehand("city", "Pune").unwrap();
    let before = store.snapshot();

    store.edit_freehand("city", "Mumbai").unwrap();

    assert_eq!(before.values.get("city"), Some("Pune"));
    assert_eq!(store.snapshot().values.get("city"), Some("Mumbai"));
}

#[test]
fn unknown_field_is_rejected_by_every_operation() {
    let mut store = store();
    let entry = HierarchyEntry::named("X");

    assert!(matches!(store.select_entry("street", &entry), Err(CascadeError::UnknownField(_))));
    assert!(matches!(store.edit_freehand("street", "X"), Err(CascadeError::UnknownField(_))));
    assert!(matches!(store.clear_descendants("street"), Err(CascadeError::UnknownField(_))));
    assert!(matches!(store.clear_field("street"), Err(CascadeError::UnknownField(_))));
    assert!(matches!(store.acknowledge("street"), Err(CascadeError::UnknownField(_))));
    assert!(store.values().is_empty());
}

#[test]
fn resolution_query_checks_identifiers_on_strict_fields() {
    let mut store = store();
    let strictness = resolve_strictness(store.levels(), Some("district"));

    store.edit_freehand("state", "Somewhere").unwrap();
    store.edit_freehand("city", "Anything").unwrap();
    store
        .select_entry("district", &HierarchyEntry::named("Pune").with_stable_id("district-1"))
        .unwrap();

    assert!(!store.is_resolved("state", &strictness).unwrap());
    assert!(store.is_resolved("district", &strictness).unwrap());
    assert!(store.is_resolved("city", &strictness).unwrap());
    assert!(store.is_resolved("country", &strictness).unwrap());
}

proptest! {
    #[test]
    fn bulk_set_round_trips_configured_fields(
        slots in proptest::collection::vec(proptest::option::of("[A-Za-z ]{0,12}"), KEYS.len())
    ) {
        let input: AddressValues = KEYS.iter().copied().zip(slots).collect();
        let mut store = store();

        store.bulk_set(input.clone());

        for key in KEYS {
            prop_assert_eq!(store.values().slot(key), input.slot(key));
        }
    }
}
