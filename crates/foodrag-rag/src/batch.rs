use std::io::Write;

use foodrag_core::error::Result;
use foodrag_core::traits::{ChatModel, VectorIndex};
use foodrag_core::types::RetrievedDoc;

use crate::pipeline::RagPipeline;

pub const TEST_QUERIES: [&str; 5] = [
    "How is Biryani prepared and what are its ingredients?",
    "What are some high-protein vegetarian Indian dishes?",
    "Which foods are popular in South India?",
    "What are good vegan options in Indian cuisine?",
    "Tell me about desserts with cardamom",
];

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub answered: usize,
    pub failed: usize,
}

/// First 100 characters of a source, for the context listing.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

fn write_context<W: Write>(out: &mut W, sources: &[RetrievedDoc]) -> std::io::Result<()> {
    writeln!(out, "\n📚 Retrieved Context:")?;
    for doc in sources {
        writeln!(out, "   [{}] {}...", doc.id, preview(&doc.original_text))?;
    }
    Ok(())
}

/// Answer every question in order, reporting failures inline.
pub async fn run_batch<V, M, W>(
    pipeline: &RagPipeline<'_, V, M>,
    questions: &[&str],
    out: &mut W,
) -> Result<BatchSummary>
where
    V: VectorIndex,
    M: ChatModel,
    W: Write,
{
    let rule = "=".repeat(70);
    let mut summary = BatchSummary::default();
    tracing::info!(questions = questions.len(), top_k = pipeline.top_k(), "batch started");

    writeln!(out, "{rule}")?;
    writeln!(out, "🧪 RAG FOOD SYSTEM - TEST RESULTS")?;
    writeln!(out, "{rule}")?;

    for (i, question) in questions.iter().enumerate() {
        writeln!(out, "\n{rule}")?;
        writeln!(out, "🔍 QUERY {}: {}", i + 1, question)?;
        writeln!(out, "{}", "-".repeat(70))?;

        let result = match pipeline.retrieve(question).await {
            Ok(sources) => {
                write_context(out, &sources)?;
                pipeline.generate(question, sources).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(answer) => {
                summary.answered += 1;
                writeln!(out, "\n🤖 ANSWER:\n{}", answer.answer)?;
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(question, error = %e, "test query failed");
                writeln!(out, "❌ Error: {e}")?;
            }
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "✅ Testing Complete!")?;
    writeln!(out, "{rule}")?;

    tracing::info!(answered = summary.answered, failed = summary.failed, "batch finished");
    Ok(summary)
}
