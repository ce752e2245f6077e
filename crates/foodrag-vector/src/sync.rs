//! Keeping the remote index equal to the enriched dataset.
//!
//! - [`ingest_if_empty`] loads only when the index holds no documents.
//! - [`reset_and_reload`] clears the index and loads unconditionally.
//! - [`sync_dataset`] compares the stored marker with the dataset
//!   fingerprint and rebuilds on any mismatch, which also repairs an index left
//!   partially populated by an interrupted upload.
//!
//! The marker is blanked before any upload and written again only after the
//! last batch succeeded, so an upload that dies part way never leaves a marker
//! claiming the index is complete.

use indicatif::{ProgressBar, ProgressStyle};

use foodrag_core::config::SyncGuard;
use foodrag_core::enrich::FieldSet;
use foodrag_core::error::Result;
use foodrag_core::fingerprint::{blank_marker, dataset_fingerprint, marker_for};
use foodrag_core::traits::VectorIndex;
use foodrag_core::types::{EnrichedDocument, IndexInfo};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub batch_size: usize,
    pub show_progress: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { batch_size: 100, show_progress: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The index was empty and every document was uploaded.
    Ingested { uploaded: usize },
    /// The count guard found documents and did nothing.
    Skipped { existing: u64 },
    /// The marker matched the dataset and the count matched.
    UpToDate { count: u64 },
    /// The index held something else and was rebuilt.
    Rebuilt { uploaded: usize, previous: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    pub uploaded: usize,
    pub vector_count: u64,
    pub pending_vector_count: u64,
}

fn stored(info: &IndexInfo) -> u64 {
    info.vector_count + info.pending_vector_count
}

/// Upsert `docs` in batches of `opts.batch_size`, returning how many were sent.
pub async fn upload<V: VectorIndex>(index: &V, docs: &[EnrichedDocument], opts: &SyncOptions) -> Result<usize> {
    if docs.is_empty() {
        return Ok(0);
    }
    let pb = if opts.show_progress { ProgressBar::new(docs.len() as u64) } else { ProgressBar::hidden() };
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);

    let mut sent = 0usize;
    for batch in docs.chunks(opts.batch_size.max(1)) {
        pb.set_message(format!("upserting {} documents", batch.len()));
        if let Err(e) = index.upsert(batch).await {
            pb.abandon_with_message(format!("upload stopped after {sent} documents"));
            tracing::error!(sent, total = docs.len(), "upsert failed: {}", e);
            return Err(e);
        }
        sent += batch.len();
        pb.set_position(sent as u64);
        tracing::debug!(sent, total = docs.len(), "batch upserted");
    }
    pb.finish_and_clear();
    Ok(sent)
}

async fn upload_and_mark<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    opts: &SyncOptions,
) -> Result<usize> {
    index.write_marker(&blank_marker(fields)).await?;
    let uploaded = upload(index, docs, opts).await?;
    index.write_marker(&marker_for(docs, fields)).await?;
    Ok(uploaded)
}

async fn clear<V: VectorIndex>(index: &V) -> Result<()> {
    index.reset().await?;
    tracing::info!("index reset");
    Ok(())
}

/// What ingestion will do, decided before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan {
    /// The index holds no documents; upload them all.
    Load,
    /// The count guard found documents and leaves them alone.
    Skip { existing: u64 },
    /// The marker and the count match the dataset.
    UpToDate { count: u64 },
    /// Clear the index and upload again.
    Rebuild { previous: u64 },
}

impl SyncPlan {
    pub fn uploads(&self) -> bool {
        matches!(self, SyncPlan::Load | SyncPlan::Rebuild { .. })
    }
}

/// Inspect the index and decide what `guard` requires for `docs`.
pub async fn plan_sync<V: VectorIndex>(index: &V, docs: &[EnrichedDocument], guard: SyncGuard) -> Result<SyncPlan> {
    let existing = stored(&index.info().await?);
    if existing == 0 {
        return Ok(SyncPlan::Load);
    }
    if guard == SyncGuard::EmptyIndex {
        tracing::info!(existing, "index not empty, skipping ingestion");
        return Ok(SyncPlan::Skip { existing });
    }

    let expected = docs.len() as u64;
    let fingerprint = dataset_fingerprint(docs);
    match index.read_marker().await? {
        Some(marker) if existing == expected && marker.matches(&fingerprint, expected) => {
            tracing::info!(count = existing, fingerprint = %fingerprint, "index already matches dataset");
            return Ok(SyncPlan::UpToDate { count: existing });
        }
        Some(marker) => tracing::info!(
            existing,
            expected,
            stored = %marker.fingerprint,
            wanted = %fingerprint,
            "index out of date, rebuilding"
        ),
        None => tracing::info!(existing, expected, "no dataset marker, rebuilding"),
    }
    Ok(SyncPlan::Rebuild { previous: existing })
}

/// Carry out a plan from [`plan_sync`].
pub async fn apply_sync<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    plan: SyncPlan,
    opts: &SyncOptions,
) -> Result<IngestOutcome> {
    match plan {
        SyncPlan::Load => {
            let uploaded = upload_and_mark(index, docs, fields, opts).await?;
            tracing::info!(uploaded, "ingested into empty index");
            Ok(IngestOutcome::Ingested { uploaded })
        }
        SyncPlan::Skip { existing } => Ok(IngestOutcome::Skipped { existing }),
        SyncPlan::UpToDate { count } => Ok(IngestOutcome::UpToDate { count }),
        SyncPlan::Rebuild { previous } => {
            clear(index).await?;
            let uploaded = upload_and_mark(index, docs, fields, opts).await?;
            Ok(IngestOutcome::Rebuilt { uploaded, previous })
        }
    }
}

/// Load the dataset only if the index holds no documents.
///
/// An index left partially populated by a failed run is skipped from then on;
/// [`sync_dataset`] does not have that gap.
pub async fn ingest_if_empty<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    opts: &SyncOptions,
) -> Result<IngestOutcome> {
    ingest(index, docs, fields, SyncGuard::EmptyIndex, opts).await
}

/// Clear every document, reload the dataset, and report the count the index
/// gives back afterwards.
pub async fn reset_and_reload<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    opts: &SyncOptions,
) -> Result<ResetReport> {
    clear(index).await?;
    let uploaded = upload_and_mark(index, docs, fields, opts).await?;
    let info = index.info().await?;
    Ok(ResetReport { uploaded, vector_count: info.vector_count, pending_vector_count: info.pending_vector_count })
}

/// Bring the index in line with `docs` using the stored dataset marker.
pub async fn sync_dataset<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    opts: &SyncOptions,
) -> Result<IngestOutcome> {
    ingest(index, docs, fields, SyncGuard::Fingerprint, opts).await
}

/// Run the ingestion step selected by `guard`.
pub async fn ingest<V: VectorIndex>(
    index: &V,
    docs: &[EnrichedDocument],
    fields: &FieldSet,
    guard: SyncGuard,
    opts: &SyncOptions,
) -> Result<IngestOutcome> {
    let plan = plan_sync(index, docs, guard).await?;
    apply_sync(index, docs, fields, plan, opts).await
}
