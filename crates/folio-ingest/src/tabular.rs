//! Tab-separated inputs: the legacy record export and reference-data maps.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use folio_model::LegacyRecord;

/// Read a tab-separated legacy export with a header row.
///
/// Cell values are trimmed; short rows read as empty for the trailing
/// columns, matching what the legacy system emits.
pub fn read_legacy_records(input: impl Read) -> Result<Vec<LegacyRecord>> {
    let mut reader = tsv_reader(input);
    let headers = reader.headers().context("reading header row")?.clone();
    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("reading legacy record row {}", index + 1))?;
        let mut values = BTreeMap::new();
        for (header, value) in headers.iter().zip(row.iter()) {
            values.insert(header.trim().to_string(), value.trim().to_string());
        }
        records.push(LegacyRecord::new(values));
    }
    Ok(records)
}

pub fn read_legacy_records_file(path: &Path) -> Result<Vec<LegacyRecord>> {
    let file = open(path)?;
    read_legacy_records(file).with_context(|| format!("in {}", path.display()))
}

/// Read a tab-separated reference-data map into header-keyed rows, ready
/// for [`folio_refdata::RefDataMapping::new`].
pub fn read_ref_data_map(input: impl Read) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = tsv_reader(input);
    let headers = reader.headers().context("reading header row")?.clone();
    let mut rows = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("reading map row {}", index + 1))?;
        rows.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.trim().to_string(), value.trim().to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

pub fn read_ref_data_map_file(path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let file = open(path)?;
    read_ref_data_map(file).with_context(|| format!("in {}", path.display()))
}

fn tsv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))
}
