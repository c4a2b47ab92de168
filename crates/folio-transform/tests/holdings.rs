//! Holdings resolver tests: reference-data lookups, call numbers, and
//! bound-with instance linking on top of the mapping-table fallback.

use std::collections::BTreeMap;

use folio_model::{
    InstanceIdEntry, InstanceIdMap, LegacyRecord, MappingRow, RecordMap, TransformationError,
    TransformationStats,
};
use folio_refdata::{KeyType, RefDataMapping, RefEntity};
use folio_transform::{HoldingsResolver, PropertyResolver, PropertyValue};

fn record_map() -> RecordMap {
    let rows = [
        ("permanentLocationId", "LOCATION", None),
        ("callNumber", "CALL_PREFIX", None),
        ("callNumber", "CALL_NO", None),
        ("callNumberTypeId", "CALL_TYPE", None),
        ("instanceId", "BIB_ID", None),
        ("notes[0].note", "NOTE1", None),
        ("notes[1].note", "NOTE2", None),
        ("holdingsTypeId", "", Some("ht-physical")),
        ("copyNumber", "COPY", None),
    ];
    RecordMap::new(
        rows.iter()
            .map(|(folio, legacy, value)| MappingRow {
                folio_field: (*folio).to_string(),
                legacy_field: (*legacy).to_string(),
                value: value.map(str::to_string),
            })
            .collect(),
    )
}

fn location_ref_data() -> Vec<RefEntity> {
    vec![
        RefEntity {
            id: "loc-main".to_string(),
            name: "Main Library".to_string(),
            code: Some("MAIN".to_string()),
        },
        RefEntity {
            id: "loc-unmapped".to_string(),
            name: "Unmapped location".to_string(),
            code: Some("UNMAPPED".to_string()),
        },
    ]
}

fn location_map_rows() -> Vec<BTreeMap<String, String>> {
    let rows = [
        [("LOCATION", "stacks"), ("folio_code", "MAIN")],
        [("LOCATION", "*"), ("folio_code", "UNMAPPED")],
    ];
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .collect()
}

fn location_mapping() -> RefDataMapping {
    RefDataMapping::new(
        "locations",
        location_ref_data(),
        location_map_rows(),
        KeyType::Code,
    )
    .expect("valid location mapping")
}

fn call_number_type_mapping() -> RefDataMapping {
    let ref_data = vec![
        RefEntity {
            id: "cnt-lc".to_string(),
            name: "Library of Congress classification".to_string(),
            code: None,
        },
        RefEntity {
            id: "cnt-other".to_string(),
            name: "Other scheme".to_string(),
            code: None,
        },
    ];
    let rows = [
        [("CALL_TYPE", "0"), ("folio_name", "Library of Congress classification")],
        [("CALL_TYPE", "*"), ("folio_name", "Other scheme")],
    ];
    let map_rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .collect();
    RefDataMapping::new("call number types", ref_data, map_rows, KeyType::Name)
        .expect("valid call number mapping")
}

fn instance_id_map() -> InstanceIdMap {
    let entries = [(".123", "inst-123"), ("A9", "inst-a9")]
        .iter()
        .map(|(legacy, folio)| {
            (
                legacy.to_string(),
                InstanceIdEntry {
                    folio_id: folio.to_string(),
                },
            )
        })
        .collect();
    InstanceIdMap::new(entries)
}

fn get(
    resolver: &mut HoldingsResolver<'_>,
    legacy: &LegacyRecord,
    path: &str,
    stats: &mut TransformationStats,
) -> folio_model::Result<PropertyValue> {
    resolver.get_value(legacy, path, "row 1", 0, stats)
}

#[test]
fn permanent_location_falls_back_to_the_default_row() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver =
        HoldingsResolver::new(&map, location_mapping(), Some(call_number_type_mapping()), &ids);
    let mut stats = TransformationStats::new();

    let mapped = LegacyRecord::from_pairs([("LOCATION", "Stacks")]);
    let value = get(&mut resolver, &mapped, "permanentLocationId", &mut stats).unwrap();
    assert_eq!(value, PropertyValue::Text("loc-main".to_string()));

    let unknown = LegacyRecord::from_pairs([("LOCATION", "basement")]);
    let value = get(&mut resolver, &unknown, "permanentLocationId", &mut stats).unwrap();
    assert_eq!(value, PropertyValue::Text("loc-unmapped".to_string()));
    assert_eq!(stats.report_sections()["Location mapping"]["Main Library"], 1);
    assert_eq!(
        stats.report_sections()["Location mapping"]["Unmapped location"],
        1
    );
}

#[test]
fn temporary_location_never_takes_the_default() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("LOCATION", "basement")]);
    let value = get(&mut resolver, &legacy, "temporaryLocationId", &mut stats).unwrap();
    assert!(value.is_empty());
    assert_eq!(
        stats.report_sections()["Location mapping"]["Unmapped temporary location"],
        1
    );
}

#[test]
fn call_number_joins_mapped_columns() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("CALL_PREFIX", "Folio"), ("CALL_NO", "QA 76.73")]);
    let value = get(&mut resolver, &legacy, "callNumber", &mut stats).unwrap();
    assert_eq!(value, PropertyValue::Text("Folio QA 76.73".to_string()));
}

#[test]
fn bracketed_call_number_is_counted_as_bound_with() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("CALL_PREFIX", "['QA 1', 'QB 2']")]);
    get(&mut resolver, &legacy, "callNumber", &mut stats).unwrap();
    assert_eq!(stats.general_count("Bound-with call numbers identified"), 1);
}

#[test]
fn call_number_type_resolves_by_name() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver =
        HoldingsResolver::new(&map, location_mapping(), Some(call_number_type_mapping()), &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("CALL_TYPE", "0")]);
    let value = get(&mut resolver, &legacy, "callNumberTypeId", &mut stats).unwrap();
    assert_eq!(value, PropertyValue::Text("cnt-lc".to_string()));
}

#[test]
fn missing_call_number_mapping_leaves_the_field_empty() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("CALL_TYPE", "0")]);
    let value = get(&mut resolver, &legacy, "callNumberTypeId", &mut stats).unwrap();
    assert!(value.is_empty());
    assert_eq!(
        stats.report_sections()["Call number type mapping"]["No mapping"],
        1
    );
}

#[test]
fn single_bib_reference_resolves_through_the_lookup_table() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("BIB_ID", "b123")]);
    let value = get(&mut resolver, &legacy, "instanceId", &mut stats).unwrap();
    assert_eq!(value, PropertyValue::List(vec!["inst-123".to_string()]));
    assert_eq!(stats.general_count("Instance IDs mapped"), 1);
}

#[test]
fn bound_with_list_resolves_hits_and_counts_misses() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("BIB_ID", "['b123', 'A9', 'b999']")]);
    let value = get(&mut resolver, &legacy, "instanceId", &mut stats).unwrap();
    assert_eq!(
        value,
        PropertyValue::List(vec!["inst-123".to_string(), "inst-a9".to_string()])
    );
    assert_eq!(stats.general_count("Bound-with items identified by bib id"), 1);
    assert_eq!(
        stats.general_count("Bib ids referenced in bound-with items"),
        3
    );
    assert_eq!(stats.general_count("Instance IDs not mapped"), 1);
}

#[test]
fn empty_lookup_table_fails_list_references() {
    let map = record_map();
    let ids = InstanceIdMap::default();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("BIB_ID", "['b123']")]);
    let error = get(&mut resolver, &legacy, "instanceId", &mut stats).unwrap_err();
    assert!(matches!(error, TransformationError::RecordFailed { .. }));
}

#[test]
fn unresolvable_bib_reference_fails_the_record() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("BIB_ID", "b555")]);
    let error = get(&mut resolver, &legacy, "instanceId", &mut stats).unwrap_err();
    assert!(matches!(error, TransformationError::RecordFailed { .. }));
}

#[test]
fn fallback_uses_slot_for_bracketed_paths() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let legacy = LegacyRecord::from_pairs([("NOTE1", "first"), ("NOTE2", "second")]);
    let first = resolver
        .get_value(&legacy, "notes[0].note", "row 1", 0, &mut stats)
        .unwrap();
    let second = resolver
        .get_value(&legacy, "notes[1].note", "row 1", 1, &mut stats)
        .unwrap();
    let beyond = resolver
        .get_value(&legacy, "notes[2].note", "row 1", 2, &mut stats)
        .unwrap();
    assert_eq!(first, PropertyValue::Text("first".to_string()));
    assert_eq!(second, PropertyValue::Text("second".to_string()));
    assert!(beyond.is_empty());
}

#[test]
fn fallback_honors_literal_overrides() {
    let map = record_map();
    let ids = instance_id_map();
    let mut resolver = HoldingsResolver::new(&map, location_mapping(), None, &ids);
    let mut stats = TransformationStats::new();
    let value = get(
        &mut resolver,
        &LegacyRecord::default(),
        "holdingsTypeId",
        &mut stats,
    )
    .unwrap();
    assert_eq!(value, PropertyValue::Text("ht-physical".to_string()));
}
