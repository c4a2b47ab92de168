//! Bound-with linking: legacy bib references to transformed instance ids.
//!
//! A legacy holdings row references its parent bib record either as a
//! single identifier or as a serialized list of identifiers (a bound-with
//! item). Parents were transformed in an earlier pass; the lookup table
//! from that pass is the only source of target ids here.

use tracing::error;

use folio_model::{InstanceIdMap, Result, TransformationError, TransformationStats};

pub struct InstanceLinker<'a> {
    map: &'a InstanceIdMap,
}

impl<'a> InstanceLinker<'a> {
    pub fn new(map: &'a InstanceIdMap) -> Self {
        Self { map }
    }

    /// Resolve one or more legacy bib ids to target instance ids.
    ///
    /// Individual misses are logged and counted without failing the
    /// record; zero hits fail the record. A partial result is returned
    /// as-is.
    pub fn resolve_instance_ids(
        &self,
        raw_value: &str,
        index_or_id: &str,
        stats: &mut TransformationStats,
    ) -> Result<Vec<String>> {
        let legacy_ids = parse_legacy_bib_ids(raw_value, index_or_id)?;
        if legacy_ids.len() > 1 {
            stats.add_general("Bound-with items identified by bib id");
            stats.add_general_by("Bib ids referenced in bound-with items", legacy_ids.len() as u64);
            stats.add_to_report("Bound-with mappings", "Items referencing multiple bib records");
        } else {
            stats.add_to_report("Bound-with mappings", "Items referencing a single bib record");
        }
        let mut resolved = Vec::new();
        for legacy_id in &legacy_ids {
            let probe = probe_key(legacy_id);
            match self
                .map
                .folio_id(&probe)
                .or_else(|| self.map.folio_id(legacy_id))
            {
                Some(folio_id) => {
                    stats.add_general("Instance IDs mapped");
                    resolved.push(folio_id.to_string());
                }
                None => {
                    stats.add_general("Instance IDs not mapped");
                    error!(
                        record = index_or_id,
                        legacy_id = %probe,
                        "bib id is not in the list of successfully transformed records"
                    );
                }
            }
        }
        if resolved.is_empty() {
            return Err(TransformationError::record_failed(
                index_or_id,
                "no instance id mapped",
                raw_value,
            ));
        }
        Ok(resolved)
    }
}

/// Legacy bib ids carry a leading letter; the lookup table keys them in
/// dotted form, so `b12345` is probed as `.12345` with the raw value as
/// fallback key.
fn probe_key(legacy_id: &str) -> String {
    match legacy_id.strip_prefix('b') {
        Some(rest) => format!(".{rest}"),
        None => legacy_id.to_string(),
    }
}

/// Split a raw legacy reference into individual bib ids.
///
/// Values not starting with the list-opening bracket are a single id.
/// Bracketed values must parse as a literal list of quoted strings; a
/// malformed list fails the whole record since it cannot be linked at all.
pub fn parse_legacy_bib_ids(raw_value: &str, index_or_id: &str) -> Result<Vec<String>> {
    let trimmed = raw_value.trim();
    if !trimmed.starts_with('[') {
        return Ok(vec![trimmed.to_string()]);
    }
    parse_quoted_list(trimmed).ok_or_else(|| {
        TransformationError::record_failed(
            index_or_id,
            "instance reference could not be parsed to a list of strings",
            raw_value,
        )
    })
}

fn parse_quoted_list(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut values = Vec::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let quote = rest.chars().next()?;
        if quote != '\'' && quote != '"' {
            return None;
        }
        let body = &rest[quote.len_utf8()..];
        let end = body.find(quote)?;
        values.push(body[..end].to_string());
        rest = body[end + quote.len_utf8()..].trim_start();
        match rest.strip_prefix(',') {
            Some(after) => rest = after.trim_start(),
            None if rest.is_empty() => break,
            None => return None,
        }
    }
    Some(values)
}
