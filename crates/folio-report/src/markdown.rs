//! Markdown rendering of the accumulated run statistics.
//!
//! Two documents: the migration report (general counters plus one
//! collapsible section per report topic) and the mapped-field report
//! (mapped/empty/unmapped rates per field against the record total).

use std::io::Write;

use anyhow::{Context, Result};

use folio_model::{FieldCounter, TransformationStats};

/// Write the sectioned migration report.
pub fn write_migration_report(out: &mut impl Write, stats: &TransformationStats) -> Result<()> {
    writeln!(out, "# Migration report").context("writing migration report")?;
    writeln!(out)?;
    writeln!(out, "## General statistics")?;
    writeln!(out, "Measure | Count")?;
    writeln!(out, "--- | ---:")?;
    for (measure, count) in stats.general() {
        writeln!(out, "{measure} | {count}")?;
    }
    for (section, measures) in stats.report_sections() {
        writeln!(out)?;
        writeln!(out, "## {section}")?;
        writeln!(
            out,
            "<details><summary>Click to expand all {} things</summary>",
            measures.len()
        )?;
        writeln!(out)?;
        writeln!(out, "Measure | Count")?;
        writeln!(out, "--- | ---:")?;
        for (measure, count) in measures {
            writeln!(out, "{measure} | {count}")?;
        }
        writeln!(out, "</details>")?;
    }
    Ok(())
}

/// Write the mapped-field tables, target fields first, then legacy.
pub fn write_mapping_report(
    out: &mut impl Write,
    stats: &TransformationStats,
    total_records: u64,
) -> Result<()> {
    writeln!(out).context("writing mapping report")?;
    writeln!(out, "## Mapped FOLIO fields")?;
    write_field_table(out, "FOLIO Field", stats.target_fields(), total_records)?;
    writeln!(out)?;
    writeln!(out, "## Mapped legacy fields")?;
    write_field_table(out, "Legacy Field", stats.legacy_fields(), total_records)?;
    Ok(())
}

fn write_field_table(
    out: &mut impl Write,
    heading: &str,
    fields: &std::collections::BTreeMap<String, FieldCounter>,
    total_records: u64,
) -> Result<()> {
    writeln!(out, "{heading} | Mapped | Empty | Unmapped")?;
    writeln!(out, "--- | ---: | ---: | ---:")?;
    for (field, counter) in fields {
        let mapped = counter.mapped.saturating_sub(counter.empty);
        let unmapped = total_records.saturating_sub(counter.mapped);
        writeln!(
            out,
            "{field} | {mapped} ({}) | {} | {unmapped} ({})",
            percentage(mapped, total_records),
            counter.empty,
            percentage(unmapped, total_records),
        )?;
    }
    Ok(())
}

fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", 100.0 * count as f64 / total as f64)
}
