//! Dataset fingerprints used to tell whether the index already holds exactly
//! the documents a dataset would produce.

use chrono::Utc;

use crate::enrich::FieldSet;
use crate::types::{EnrichedDocument, SyncMarker};

/// BLAKE3 over the canonical JSON of each document, in dataset order.
///
/// Metadata is a `BTreeMap`, so key order is fixed and equal inputs always
/// hash the same.
pub fn dataset_fingerprint(docs: &[EnrichedDocument]) -> String {
    let mut hasher = blake3::Hasher::new();
    for doc in docs {
        let line = serde_json::json!({
            "id": doc.id,
            "data": doc.text,
            "metadata": doc.metadata,
        });
        hasher.update(line.to_string().as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

pub fn marker_for(docs: &[EnrichedDocument], fields: &FieldSet) -> SyncMarker {
    SyncMarker {
        fingerprint: dataset_fingerprint(docs),
        record_count: docs.len() as u64,
        fields: fields.names(),
        written_at: Utc::now(),
    }
}

/// A marker that matches no dataset, written while the index is being rebuilt.
pub fn blank_marker(fields: &FieldSet) -> SyncMarker {
    SyncMarker {
        fingerprint: String::new(),
        record_count: 0,
        fields: fields.names(),
        written_at: Utc::now(),
    }
}
