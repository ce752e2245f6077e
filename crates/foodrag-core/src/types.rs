//! Domain types shared by the dataset loader, the index clients and the RAG
//! pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RecordId = String;

/// Flat string metadata stored next to every index entry. Ordered so that its
/// JSON form is stable, which the dataset fingerprint relies on.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key holding the un-enriched record text.
pub const ORIGINAL_TEXT_KEY: &str = "original_text";

/// One element of the food dataset.
///
/// Only `id` and `text` are required. Optional fields feed the enrichment
/// clauses and the per-entry metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: RecordId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_highlights: Option<String>,
}

impl FoodRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            region: None,
            kind: None,
            dietary: None,
            nutritional_highlights: None,
        }
    }
}

/// A record ready for upsert: the enriched text the index embeds plus the
/// metadata mirrored next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedDocument {
    pub id: RecordId,
    pub text: String,
    pub metadata: Metadata,
}

/// Vector count and shape reported by the index.
///
/// `vector_count` covers the document namespace only; entries kept in the
/// marker namespace are not counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub vector_count: u64,
    pub pending_vector_count: u64,
    pub dimension: Option<u64>,
    pub similarity_function: Option<String>,
}

/// A raw nearest-neighbour hit as returned by the index, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: RecordId,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

/// A validated hit carrying the original text handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDoc {
    pub id: RecordId,
    pub score: f32,
    pub original_text: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<RetrievedDoc>,
    pub prompt: String,
}

/// A chat message in the OpenAI-compatible `{role, content}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Records which dataset the index was last fully loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMarker {
    pub fingerprint: String,
    pub record_count: u64,
    pub fields: Vec<String>,
    pub written_at: DateTime<Utc>,
}

impl SyncMarker {
    pub fn matches(&self, fingerprint: &str, record_count: u64) -> bool {
        self.fingerprint == fingerprint && self.record_count == record_count
    }
}
