use std::future::Future;

use crate::error::Result;
use crate::types::{ChatMessage, EnrichedDocument, IndexInfo, QueryMatch, SyncMarker};

/// A hosted vector index that embeds text on its side.
pub trait VectorIndex: Send + Sync {
    fn info(&self) -> impl Future<Output = Result<IndexInfo>> + Send;

    /// Insert or overwrite entries keyed by id.
    fn upsert(&self, docs: &[EnrichedDocument]) -> impl Future<Output = Result<()>> + Send;

    /// Nearest neighbours of `text`, best first, at most `top_k`.
    fn query(
        &self,
        text: &str,
        top_k: usize,
        include_metadata: bool,
    ) -> impl Future<Output = Result<Vec<QueryMatch>>> + Send;

    /// Remove every document entry. Markers are left alone.
    fn reset(&self) -> impl Future<Output = Result<()>> + Send;

    fn read_marker(&self) -> impl Future<Output = Result<Option<SyncMarker>>> + Send;

    fn write_marker(&self, marker: &SyncMarker) -> impl Future<Output = Result<()>> + Send;
}

/// A chat-completion model with fixed sampling parameters.
pub trait ChatModel: Send + Sync {
    /// Returns the assistant message content of the first choice.
    fn complete(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send;
}
