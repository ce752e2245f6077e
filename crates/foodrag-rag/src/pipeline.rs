use foodrag_core::error::{Error, Result};
use foodrag_core::traits::{ChatModel, VectorIndex};
use foodrag_core::types::{QueryMatch, RagAnswer, RetrievedDoc, ORIGINAL_TEXT_KEY};

use crate::prompt::{build_context, build_messages, build_prompt};

/// Retrieval followed by generation, over borrowed service clients.
pub struct RagPipeline<'a, V, M> {
    index: &'a V,
    model: &'a M,
    top_k: usize,
}

impl<'a, V, M> RagPipeline<'a, V, M>
where
    V: VectorIndex,
    M: ChatModel,
{
    pub fn new(index: &'a V, model: &'a M, top_k: usize) -> Self {
        Self { index, model, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Top matches for `question`, in the order the index ranked them.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedDoc>> {
        let matches = self.index.query(question, self.top_k, true).await?;
        tracing::debug!(question, hits = matches.len(), "retrieved");
        validate_matches(matches)
    }

    /// Ask the model to answer `question` from `sources`.
    pub async fn generate(&self, question: &str, sources: Vec<RetrievedDoc>) -> Result<RagAnswer> {
        let prompt = build_prompt(&build_context(&sources), question);
        let answer = self.model.complete(&build_messages(prompt.clone())).await?;
        Ok(RagAnswer { answer: answer.trim().to_string(), sources, prompt })
    }

    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        let sources = self.retrieve(question).await?;
        self.generate(question, sources).await
    }
}

/// Every match must carry a string `original_text` in its metadata.
pub fn validate_matches(matches: Vec<QueryMatch>) -> Result<Vec<RetrievedDoc>> {
    matches
        .into_iter()
        .map(|m| {
            let text = m
                .metadata
                .as_ref()
                .ok_or_else(|| Error::malformed(format!("match {:?} has no metadata", m.id)))?
                .get(ORIGINAL_TEXT_KEY)
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::malformed(format!("match {:?} has no string {ORIGINAL_TEXT_KEY}", m.id)))?
                .to_string();
            Ok(RetrievedDoc { id: m.id, score: m.score, original_text: text })
        })
        .collect()
}
