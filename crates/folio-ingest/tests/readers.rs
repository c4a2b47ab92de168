use folio_ingest::{
    read_instance_id_map, read_legacy_records, read_record_map, read_ref_data, read_ref_data_map,
    read_target_schema,
};
use folio_model::LegacyRecord;

#[test]
fn legacy_records_are_trimmed_and_header_keyed() {
    let tsv = "BIB_ID\tLOCATION\tCALL_NO\nb123\t stacks \tQA 76.73\nb124\tmain\t\n";
    let records = read_legacy_records(tsv.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value("LOCATION"), "stacks");
    assert_eq!(records[0].value("CALL_NO"), "QA 76.73");
    assert_eq!(records[1].value("CALL_NO"), "");
}

#[test]
fn short_legacy_rows_read_as_empty_trailing_columns() {
    let tsv = "A\tB\tC\n1\t2\n";
    let records = read_legacy_records(tsv.as_bytes()).unwrap();
    assert_eq!(records[0].value("B"), "2");
    assert_eq!(records[0].value("C"), "");
}

#[test]
fn record_map_rows_live_under_the_data_key() {
    let json = r#"{
        "data": [
            { "folio_field": "callNumber", "legacy_field": "CALL_NO" },
            { "folio_field": "holdingsTypeId", "legacy_field": "Not mapped", "value": "ht-1" }
        ]
    }"#;
    let map = read_record_map(json.as_bytes()).unwrap();
    assert_eq!(map.legacy_fields_for("callNumber"), ["CALL_NO"]);
    assert_eq!(map.literal_override("holdingsTypeId"), Some("ht-1"));
    let record = LegacyRecord::from_pairs([("CALL_NO", "x")]);
    assert!(map.has_property("callNumber", &record));
}

#[test]
fn malformed_mapping_file_is_an_error() {
    assert!(read_record_map(r#"{"rows": []}"#.as_bytes()).is_err());
    assert!(read_record_map("not json".as_bytes()).is_err());
}

#[test]
fn ref_data_accepts_a_bare_array() {
    let json = r#"[{ "id": "loc-1", "name": "Main", "code": "MAIN" }]"#;
    let entities = read_ref_data(json.as_bytes()).unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].id, "loc-1");
    assert_eq!(entities[0].code.as_deref(), Some("MAIN"));
}

#[test]
fn ref_data_accepts_the_api_response_shape() {
    let json = r#"{
        "locations": [
            { "id": "loc-1", "name": "Main", "code": "MAIN" },
            { "id": "loc-2", "name": "Annex" }
        ],
        "totalRecords": 2
    }"#;
    let entities = read_ref_data(json.as_bytes()).unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[1].code, None);
}

#[test]
fn ref_data_without_an_array_is_an_error() {
    assert!(read_ref_data(r#"{"totalRecords": 0}"#.as_bytes()).is_err());
    assert!(read_ref_data(r#""loc-1""#.as_bytes()).is_err());
}

#[test]
fn ref_data_map_rows_are_header_keyed() {
    let tsv = "LOCATION\tfolio_code\nstacks\tMAIN\n*\tUNMAPPED\n";
    let rows = read_ref_data_map(tsv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["LOCATION"], "stacks");
    assert_eq!(rows[1]["folio_code"], "UNMAPPED");
}

#[test]
fn instance_id_map_is_keyed_by_legacy_id() {
    let json = r#"{
        ".123": { "folio_id": "inst-123" },
        ".124": { "folio_id": "inst-124" }
    }"#;
    let map = read_instance_id_map(json.as_bytes()).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.folio_id(".123"), Some("inst-123"));
    assert_eq!(map.folio_id("missing"), None);
}

#[test]
fn target_schema_parses_from_json() {
    let json = r#"{
        "type": "object",
        "required": ["permanentLocationId"],
        "properties": {
            "callNumber": { "type": "string" },
            "notes": {
                "type": "array",
                "items": { "type": "object", "properties": { "note": { "type": "string" } } }
            }
        }
    }"#;
    let schema = read_target_schema(json.as_bytes()).unwrap();
    assert_eq!(schema.properties.len(), 2);
    assert_eq!(schema.required, ["permanentLocationId"]);
}
