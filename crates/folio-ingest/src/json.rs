//! JSON inputs: the target schema, the mapping file, reference-data
//! snapshots, and the instance-id lookup table from the bib pass.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use folio_model::{InstanceIdEntry, InstanceIdMap, MappingRow, RecordMap, TargetSchema};
use folio_refdata::RefEntity;

pub fn read_target_schema(input: impl Read) -> Result<TargetSchema> {
    let value: Value = serde_json::from_reader(input).context("parsing target schema")?;
    Ok(TargetSchema::from_json(&value))
}

pub fn read_target_schema_file(path: &Path) -> Result<TargetSchema> {
    read_target_schema(open(path)?).with_context(|| format!("in {}", path.display()))
}

#[derive(Deserialize)]
struct MappingFile {
    data: Vec<MappingRow>,
}

/// Read a mapping file: a JSON object with the rows under `data`.
pub fn read_record_map(input: impl Read) -> Result<RecordMap> {
    let file: MappingFile = serde_json::from_reader(input).context("parsing mapping file")?;
    Ok(RecordMap::new(file.data))
}

pub fn read_record_map_file(path: &Path) -> Result<RecordMap> {
    read_record_map(open(path)?).with_context(|| format!("in {}", path.display()))
}

/// Read a reference-data snapshot.
///
/// Accepts either a bare JSON array of entities or the catalog API response
/// shape, an object wrapping the array under a collection key next to a
/// record count.
pub fn read_ref_data(input: impl Read) -> Result<Vec<RefEntity>> {
    let value: Value = serde_json::from_reader(input).context("parsing reference data")?;
    let array = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(map) => match map.into_iter().map(|(_, v)| v).find(Value::is_array) {
            Some(array) => array,
            None => bail!("reference data object carries no entity array"),
        },
        _ => bail!("reference data is neither an array nor a wrapping object"),
    };
    serde_json::from_value(array).context("parsing reference data entities")
}

pub fn read_ref_data_file(path: &Path) -> Result<Vec<RefEntity>> {
    read_ref_data(open(path)?).with_context(|| format!("in {}", path.display()))
}

/// Read the legacy-id to instance-id lookup table written by the bib pass.
pub fn read_instance_id_map(input: impl Read) -> Result<InstanceIdMap> {
    let entries: BTreeMap<String, InstanceIdEntry> =
        serde_json::from_reader(input).context("parsing instance id lookup table")?;
    Ok(InstanceIdMap::new(entries))
}

pub fn read_instance_id_map_file(path: &Path) -> Result<InstanceIdMap> {
    read_instance_id_map(open(path)?).with_context(|| format!("in {}", path.display()))
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))
}
