//! In-process [`VectorIndex`] with deterministic bag-of-words scoring.
//!
//! Stands in for the hosted index in tests and offline runs. Scores are the
//! cosine similarity of lowercase word counts, so identical text scores 1.0
//! and disjoint text scores 0.0; ties are broken by id.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use foodrag_core::error::{Error, Result};
use foodrag_core::traits::VectorIndex;
use foodrag_core::types::{EnrichedDocument, IndexInfo, QueryMatch, SyncMarker};

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, EnrichedDocument>,
    marker: Option<SyncMarker>,
    upsert_calls: usize,
    reset_calls: usize,
    query_calls: usize,
    fail_upserts_after: Option<usize>,
}

#[derive(Debug, Default)]
pub struct InMemoryIndex {
    state: Mutex<State>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upsert call after the first `calls` fail, to simulate an
    /// upload interrupted part way.
    pub fn fail_upserts_after(&self, calls: usize) -> Result<()> {
        self.lock()?.fail_upserts_after = Some(calls);
        Ok(())
    }

    pub fn heal(&self) -> Result<()> {
        self.lock()?.fail_upserts_after = None;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, id: &str) -> Result<Option<EnrichedDocument>> {
        Ok(self.lock()?.entries.get(id).cloned())
    }

    pub fn upsert_calls(&self) -> Result<usize> {
        Ok(self.lock()?.upsert_calls)
    }

    pub fn reset_calls(&self) -> Result<usize> {
        Ok(self.lock()?.reset_calls)
    }

    pub fn query_calls(&self) -> Result<usize> {
        Ok(self.lock()?.query_calls)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::Operation("in-memory index lock poisoned".to_string()))
    }
}

fn word_counts(text: &str) -> HashMap<String, f32> {
    let mut counts = HashMap::new();
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        *counts.entry(word.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

fn cosine(a: &HashMap<String, f32>, b: &HashMap<String, f32>) -> f32 {
    let dot: f32 = a.iter().filter_map(|(w, x)| b.get(w).map(|y| x * y)).sum();
    let norm = |m: &HashMap<String, f32>| m.values().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

impl VectorIndex for InMemoryIndex {
    async fn info(&self) -> Result<IndexInfo> {
        let state = self.lock()?;
        Ok(IndexInfo {
            vector_count: state.entries.len() as u64,
            pending_vector_count: 0,
            dimension: None,
            similarity_function: Some("BAG_OF_WORDS_COSINE".to_string()),
        })
    }

    async fn upsert(&self, docs: &[EnrichedDocument]) -> Result<()> {
        let mut state = self.lock()?;
        if state.fail_upserts_after.is_some_and(|limit| state.upsert_calls >= limit) {
            return Err(Error::Operation("simulated upsert failure".to_string()));
        }
        state.upsert_calls += 1;
        for doc in docs {
            state.entries.insert(doc.id.clone(), doc.clone());
        }
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize, include_metadata: bool) -> Result<Vec<QueryMatch>> {
        let mut state = self.lock()?;
        state.query_calls += 1;
        let query = word_counts(text);
        let mut hits: Vec<QueryMatch> = state
            .entries
            .values()
            .map(|doc| QueryMatch {
                id: doc.id.clone(),
                score: cosine(&query, &word_counts(&doc.text)),
                metadata: include_metadata.then(|| {
                    doc.metadata.iter().map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone()))).collect()
                }),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn reset(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.reset_calls += 1;
        state.entries.clear();
        Ok(())
    }

    async fn read_marker(&self) -> Result<Option<SyncMarker>> {
        Ok(self.lock()?.marker.clone())
    }

    async fn write_marker(&self, marker: &SyncMarker) -> Result<()> {
        self.lock()?.marker = Some(marker.clone());
        Ok(())
    }
}
