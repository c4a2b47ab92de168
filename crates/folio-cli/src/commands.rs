use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use comfy_table::Table;
use serde_json::json;
use tracing::{error, info, info_span};

use folio_ingest::{
    read_instance_id_map_file, read_legacy_records_file, read_record_map_file,
    read_ref_data_file, read_ref_data_map_file, read_target_schema_file,
};
use folio_model::{PropertyDescriptor, PropertyKind, TransformationStats};
use folio_refdata::{KeyType, RefDataMapping};
use folio_report::{write_mapping_report, write_migration_report};
use folio_transform::{HoldingsResolver, MappingEngine, TraversalOptions};

use crate::cli::{HoldingsArgs, InspectSchemaArgs};
use crate::summary::apply_table_style;
use crate::types::RunResult;

/// General counters surfaced on the terminal after a run.
const HIGHLIGHTED_COUNTERS: [&str; 4] = [
    "Instance IDs mapped",
    "Instance IDs not mapped",
    "Bound-with items identified by bib id",
    "Data issues found",
];

pub fn run_holdings(args: &HoldingsArgs) -> Result<RunResult> {
    let span = info_span!("holdings", records = %args.records.display());
    let _guard = span.enter();
    let start = Instant::now();

    let schema = read_target_schema_file(&args.schema)?;
    let record_map = read_record_map_file(&args.map)?;
    let legacy_records = read_legacy_records_file(&args.records)?;
    let instance_ids = read_instance_id_map_file(&args.instance_id_map)?;
    info!(
        properties = schema.properties.len(),
        mapping_rows = record_map.rows().len(),
        legacy_records = legacy_records.len(),
        instance_ids = instance_ids.len(),
        "inputs loaded"
    );

    let location_mapping = RefDataMapping::new(
        "locations",
        read_ref_data_file(&args.location_ref_data)?,
        read_ref_data_map_file(&args.location_map)?,
        KeyType::Code,
    )?;
    let call_number_mapping = match (&args.call_number_type_ref_data, &args.call_number_type_map) {
        (Some(ref_data), Some(map)) => Some(RefDataMapping::new(
            "call number types",
            read_ref_data_file(ref_data)?,
            read_ref_data_map_file(map)?,
            KeyType::Name,
        )?),
        _ => None,
    };

    let metadata = json!({
        "createdDate": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "createdByUserId": args.created_by,
        "updatedDate": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "updatedByUserId": args.created_by,
    });
    let options = TraversalOptions {
        nested_slot_cap: args.nested_slot_cap,
        array_slot_cap: args.array_slot_cap,
        ..TraversalOptions::default()
    };
    let engine = MappingEngine::new(&schema, &record_map, metadata, options);
    let mut resolver =
        HoldingsResolver::new(&record_map, location_mapping, call_number_mapping, &instance_ids);

    let output_file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut output = BufWriter::new(output_file);

    let mut stats = TransformationStats::new();
    let mut transformed = 0usize;
    let mut failed = 0usize;
    for (index, legacy) in legacy_records.iter().enumerate() {
        let index_or_id = format!("row {}", index + 1);
        stats.add_general("Number of rows in legacy file");
        let record = match engine.map_record(&mut resolver, &mut stats, legacy, &index_or_id) {
            Ok(record) => record,
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                failed += 1;
                stats.add_general("Failed records");
                error!(record = %index_or_id, %err, "record failed");
                continue;
            }
        };
        if let Err(err) = engine.validate_required(&record, &index_or_id, &mut stats) {
            failed += 1;
            stats.add_general("Failed records");
            error!(record = %index_or_id, %err, "record failed validation");
            continue;
        }
        serde_json::to_writer(&mut output, &record)
            .with_context(|| format!("writing {}", args.output.display()))?;
        output.write_all(b"\n")?;
        transformed += 1;
        stats.add_general("Successfully transformed records");
    }
    output.flush()?;

    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| args.output.with_extension("report.md"));
    let report_file = File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    let mut report = BufWriter::new(report_file);
    write_migration_report(&mut report, &stats)?;
    write_mapping_report(&mut report, &stats, legacy_records.len() as u64)?;
    report.flush()?;

    info!(
        transformed,
        failed,
        duration_ms = start.elapsed().as_millis(),
        "holdings transformation complete"
    );

    let highlights = HIGHLIGHTED_COUNTERS
        .iter()
        .filter_map(|measure| {
            let count = stats.general_count(measure);
            (count > 0).then(|| ((*measure).to_string(), count))
        })
        .collect();
    Ok(RunResult {
        records_read: legacy_records.len(),
        transformed,
        failed,
        output: args.output.clone(),
        report: report_path,
        elapsed: start.elapsed(),
        highlights,
    })
}

pub fn run_inspect_schema(args: &InspectSchemaArgs) -> Result<()> {
    let schema = read_target_schema_file(&args.schema)?;
    let mut table = Table::new();
    table.set_header(vec!["Property", "Kind", "Flags"]);
    apply_table_style(&mut table);
    for prop in &schema.properties {
        push_property_rows(&mut table, prop, 0, &schema.required);
    }
    println!("{table}");
    println!("{} top-level properties", schema.properties.len());
    Ok(())
}

fn push_property_rows(
    table: &mut Table,
    prop: &PropertyDescriptor,
    depth: usize,
    required: &[String],
) {
    let indent = "  ".repeat(depth);
    let mut flags = Vec::new();
    if depth == 0 && required.contains(&prop.name) {
        flags.push("required");
    }
    if prop.is_virtual {
        flags.push("virtual");
    }
    if prop.is_deprecated {
        flags.push("deprecated");
    }
    table.add_row(vec![
        format!("{indent}{}", prop.name),
        kind_label(&prop.kind),
        flags.join(", "),
    ]);
    for child in prop.children() {
        push_property_rows(table, child, depth + 1, required);
    }
}

fn kind_label(kind: &PropertyKind) -> String {
    match kind {
        PropertyKind::Basic => "basic".to_string(),
        PropertyKind::Object(_) => "object".to_string(),
        PropertyKind::ArrayOfObject(_) => "array of objects".to_string(),
        PropertyKind::ArrayOfString => "array of strings".to_string(),
        PropertyKind::ArrayOfOther(item) => format!("array of {item}"),
    }
}
