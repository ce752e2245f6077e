use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FoodRecord;

/// Read the food dataset: a JSON array of [`FoodRecord`].
pub fn load_foods(path: &Path) -> Result<Vec<FoodRecord>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("cannot read {}: {}", path.display(), e)))?;
    let records = parse_foods(&raw).map_err(|e| match e {
        Error::Dataset(msg) => Error::Dataset(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

pub fn parse_foods(raw: &str) -> Result<Vec<FoodRecord>> {
    let records: Vec<FoodRecord> =
        serde_json::from_str(raw).map_err(|e| Error::Dataset(format!("invalid JSON: {e}")))?;
    let mut seen = HashSet::new();
    for record in &records {
        if record.id.trim().is_empty() {
            return Err(Error::Dataset("record with empty id".to_string()));
        }
        if !seen.insert(record.id.as_str()) {
            return Err(Error::Dataset(format!("duplicate record id {:?}", record.id)));
        }
    }
    Ok(records)
}
