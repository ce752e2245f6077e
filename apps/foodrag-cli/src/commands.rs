//! The console programs, written against the index and model traits so the
//! same code runs on the hosted services and on in-process fakes.

use std::io::{BufRead, Write};

use foodrag_core::config::{AppConfig, SyncGuard};
use foodrag_core::traits::{ChatModel, VectorIndex};
use foodrag_rag::session::{write_sources, BANNER};
use foodrag_rag::{run_batch, run_interactive, BatchSummary, RagPipeline, SessionStats, TEST_QUERIES};
use foodrag_vector::{apply_sync, plan_sync, reset_and_reload, IngestOutcome, ResetReport, SyncPlan};

use crate::app::App;

/// Bring the index in line with the dataset under `guard`.
///
/// The plan is printed before any upload starts.
pub async fn run_ingest<V, W>(
    app: &App,
    index: &V,
    guard: SyncGuard,
    show_progress: bool,
    out: &mut W,
) -> anyhow::Result<IngestOutcome>
where
    V: VectorIndex,
    W: Write,
{
    let plan = plan_sync(index, &app.docs, guard).await?;
    if let SyncPlan::Rebuild { previous } = plan {
        writeln!(out, "♻️  Index held {previous} documents that do not match the dataset, rebuilding.")?;
    }
    if plan.uploads() {
        writeln!(out, "🆕 Adding {} documents to Upstash Vector...", app.docs.len())?;
        out.flush()?;
    }

    let outcome = apply_sync(index, &app.docs, &app.fields, plan, &app.sync_options(show_progress)).await?;
    match &outcome {
        IngestOutcome::Ingested { .. } | IngestOutcome::Rebuilt { .. } => {
            writeln!(out, "✅ Documents added successfully!")?;
        }
        IngestOutcome::Skipped { existing } | IngestOutcome::UpToDate { count: existing } => {
            writeln!(out, "✅ {existing} documents already in Upstash Vector.")?;
        }
    }
    Ok(outcome)
}

/// Clear the index, reload every document, and print the resulting counts.
pub async fn run_reset<V, W>(app: &App, index: &V, show_progress: bool, out: &mut W) -> anyhow::Result<ResetReport>
where
    V: VectorIndex,
    W: Write,
{
    writeln!(out, "🗑️  Resetting Upstash Vector database...")?;
    writeln!(out, "🆕 Adding {} documents to Upstash Vector...", app.docs.len())?;
    out.flush()?;

    let report = reset_and_reload(index, &app.docs, &app.fields, &app.sync_options(show_progress)).await?;

    writeln!(out, "✅ Database reset complete!")?;
    writeln!(out, "📊 Total documents: {}", report.uploaded)?;
    writeln!(out, "🔢 Vector count in database: {}", report.vector_count)?;
    if report.pending_vector_count > 0 {
        writeln!(out, "⏳ Still indexing: {}", report.pending_vector_count)?;
    }
    Ok(report)
}

/// Sync the index, then answer questions read from `input` until exit.
pub async fn run_chat<V, M, R, W>(app: &App, index: &V, model: &M, input: R, out: &mut W) -> anyhow::Result<SessionStats>
where
    V: VectorIndex,
    M: ChatModel,
    R: BufRead,
    W: Write,
{
    run_ingest(app, index, app.config.index.sync_guard, true, out).await?;
    writeln!(out, "{BANNER}")?;
    let pipeline = RagPipeline::new(index, model, app.config.retrieval.top_k);
    Ok(run_interactive(&pipeline, input, out).await?)
}

/// Run the fixed test questions. Only the configuration is needed; the dataset is not read.
pub async fn run_test_queries<V, M, W>(
    config: &AppConfig,
    index: &V,
    model: &M,
    out: &mut W,
) -> anyhow::Result<BatchSummary>
where
    V: VectorIndex,
    M: ChatModel,
    W: Write,
{
    let pipeline = RagPipeline::new(index, model, config.retrieval.top_k);
    Ok(run_batch(&pipeline, &TEST_QUERIES, out).await?)
}

/// Answer a single question. Unlike the sessions, a failure here is returned.
pub async fn run_ask<V, M, W>(
    config: &AppConfig,
    index: &V,
    model: &M,
    question: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    V: VectorIndex,
    M: ChatModel,
    W: Write,
{
    let question = question.trim();
    anyhow::ensure!(!question.is_empty(), "question must not be empty");

    let pipeline = RagPipeline::new(index, model, config.retrieval.top_k);
    let answer = pipeline.answer(question).await?;
    write_sources(out, &answer.sources)?;
    writeln!(out, "🤖: {}", answer.answer)?;
    Ok(())
}
