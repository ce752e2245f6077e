//! JSON shapes of the Upstash Vector REST API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use foodrag_core::types::{IndexInfo, Metadata};

/// Every Upstash response is either `{"result": ...}` or
/// `{"error": "...", "status": N}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InfoResult {
    pub vector_count: u64,
    #[serde(default)]
    pub pending_vector_count: u64,
    #[serde(default)]
    pub dimension: Option<u64>,
    #[serde(default)]
    pub similarity_function: Option<String>,
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NamespaceInfo {
    pub vector_count: u64,
    #[serde(default)]
    pub pending_vector_count: u64,
}

impl From<InfoResult> for IndexInfo {
    /// Counts come from the default namespace (`""`) when the index reports
    /// namespaces, so marker entries never inflate the document count.
    fn from(info: InfoResult) -> Self {
        let (vector_count, pending_vector_count) = match info.namespaces.get("") {
            Some(ns) => (ns.vector_count, ns.pending_vector_count),
            None if info.namespaces.is_empty() => (info.vector_count, info.pending_vector_count),
            None => (0, 0),
        };
        IndexInfo {
            vector_count,
            pending_vector_count,
            dimension: info.dimension,
            similarity_function: info.similarity_function,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertData<'a> {
    pub id: &'a str,
    pub data: &'a str,
    pub metadata: &'a Metadata,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkerUpsert<'a> {
    pub id: &'a str,
    pub data: &'a str,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryData<'a> {
    pub data: &'a str,
    pub top_k: usize,
    pub include_metadata: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FetchRequest<'a> {
    pub ids: Vec<&'a str>,
    pub include_metadata: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FetchedEntry {
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
