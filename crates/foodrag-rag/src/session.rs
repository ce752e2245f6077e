//! Interactive question loop.
//!
//! Reads one question per line, prints the retrieved sources and then the
//! model's answer. A failed question is reported and the loop carries on.

use std::io::{BufRead, Write};

use foodrag_core::error::Result;
use foodrag_core::traits::{ChatModel, VectorIndex};
use foodrag_core::types::RetrievedDoc;

use crate::pipeline::RagPipeline;

pub const PROMPT: &str = "You: ";
pub const GOODBYE: &str = "👋 Goodbye!";
pub const BANNER: &str = "\n🧠 RAG is ready. Ask a question (type 'exit' to quit):\n";

/// What one input line asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Skip,
    Ask(&'a str),
}

pub fn parse_line(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Command::Skip
    } else if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        Command::Exit
    } else {
        Command::Ask(trimmed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub asked: usize,
    pub failed: usize,
}

pub fn write_sources<W: Write>(out: &mut W, sources: &[RetrievedDoc]) -> std::io::Result<()> {
    writeln!(out, "\n🧠 Retrieving relevant information to reason through your question...\n")?;
    for (i, doc) in sources.iter().enumerate() {
        writeln!(out, "🔹 Source {} (ID: {}):", i + 1, doc.id)?;
        writeln!(out, "    \"{}\"\n", doc.original_text)?;
    }
    writeln!(out, "📚 These seem to be the most relevant pieces of information to answer your question.\n")
}

/// Run the loop until `exit`/`quit` or end of input.
pub async fn run_interactive<V, M, R, W>(
    pipeline: &RagPipeline<'_, V, M>,
    input: R,
    out: &mut W,
) -> Result<SessionStats>
where
    V: VectorIndex,
    M: ChatModel,
    R: BufRead,
    W: Write,
{
    let mut stats = SessionStats::default();
    let mut lines = input.lines();
    tracing::debug!(top_k = pipeline.top_k(), "session started");

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let question = match parse_line(&line) {
            Command::Exit => break,
            Command::Skip => continue,
            Command::Ask(question) => question,
        };
        stats.asked += 1;

        let result = match pipeline.retrieve(question).await {
            Ok(sources) => {
                write_sources(out, &sources)?;
                pipeline.generate(question, sources).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(answer) => writeln!(out, "🤖: {}", answer.answer)?,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(question, error = %e, "question failed");
                writeln!(out, "❌ Error: {e}")?;
            }
        }
    }

    writeln!(out, "{GOODBYE}")?;
    Ok(stats)
}
