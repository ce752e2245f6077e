use foodrag_core::config::SyncGuard;
use foodrag_core::enrich::{enrich_all, FieldSet};
use foodrag_core::traits::VectorIndex;
use foodrag_core::types::{EnrichedDocument, FoodRecord};
use foodrag_vector::{
    apply_sync, ingest, ingest_if_empty, plan_sync, reset_and_reload, sync_dataset, InMemoryIndex, IngestOutcome,
    SyncOptions, SyncPlan,
};

fn foods(n: usize) -> Vec<FoodRecord> {
    (0..n)
        .map(|i| {
            let mut r = FoodRecord::new(format!("{}", i + 1), format!("Dish number {} is tasty.", i + 1));
            r.region = Some("South India".to_string());
            r.kind = Some("snack".to_string());
            r.dietary = Some(vec!["vegetarian".to_string()]);
            r
        })
        .collect()
}

fn docs(n: usize) -> Vec<EnrichedDocument> {
    enrich_all(&foods(n), &FieldSet::full())
}

fn opts(batch_size: usize) -> SyncOptions {
    SyncOptions { batch_size, show_progress: false }
}

#[tokio::test]
async fn ingest_if_empty_loads_n_then_skips() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let docs = docs(12);

    let first = ingest_if_empty(&index, &docs, &FieldSet::full(), &opts(5)).await?;
    assert_eq!(first, IngestOutcome::Ingested { uploaded: 12 });
    assert_eq!(index.info().await?.vector_count, 12);
    assert_eq!(index.upsert_calls()?, 3, "12 documents in batches of 5");

    let second = ingest_if_empty(&index, &docs, &FieldSet::full(), &opts(5)).await?;
    assert_eq!(second, IngestOutcome::Skipped { existing: 12 });
    assert_eq!(index.upsert_calls()?, 3, "no upsert on the second call");
    Ok(())
}

#[tokio::test]
async fn ingest_if_empty_keeps_skipping_a_partial_index() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let docs = docs(10);

    index.fail_upserts_after(1)?;
    assert!(ingest_if_empty(&index, &docs, &FieldSet::full(), &opts(4)).await.is_err());
    assert_eq!(index.len()?, 4);
    index.heal()?;

    let outcome = ingest_if_empty(&index, &docs, &FieldSet::full(), &opts(4)).await?;
    assert_eq!(outcome, IngestOutcome::Skipped { existing: 4 });
    assert_eq!(index.len()?, 4);
    Ok(())
}

#[tokio::test]
async fn reset_and_reload_reports_exactly_n_regardless_of_prior_content() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    index.upsert(&docs(30)).await?;

    let report = reset_and_reload(&index, &docs(7), &FieldSet::full(), &opts(100)).await?;

    assert_eq!(report.uploaded, 7);
    assert_eq!(report.vector_count, 7);
    assert_eq!(report.pending_vector_count, 0);
    assert_eq!(index.reset_calls()?, 1);
    assert!(index.get("8")?.is_none(), "entries beyond the new dataset are gone");
    Ok(())
}

#[tokio::test]
async fn metadata_mirrors_enrichment_after_reset() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    reset_and_reload(&index, &docs(1), &FieldSet::full(), &opts(10)).await?;

    let stored = index.get("1")?.expect("entry 1");
    assert_eq!(stored.metadata["original_text"], "Dish number 1 is tasty.");
    assert_eq!(stored.metadata["dietary"], "vegetarian");
    assert_eq!(stored.metadata["nutritional_highlights"], "");
    assert!(stored.text.contains("Dietary info: vegetarian."));
    Ok(())
}

#[tokio::test]
async fn sync_dataset_is_a_no_op_when_marker_matches() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let docs = docs(5);

    let first = sync_dataset(&index, &docs, &FieldSet::full(), &opts(2)).await?;
    assert_eq!(first, IngestOutcome::Ingested { uploaded: 5 });
    let calls = index.upsert_calls()?;

    let second = sync_dataset(&index, &docs, &FieldSet::full(), &opts(2)).await?;
    assert_eq!(second, IngestOutcome::UpToDate { count: 5 });
    assert_eq!(index.upsert_calls()?, calls);
    assert_eq!(index.reset_calls()?, 0);
    Ok(())
}

#[tokio::test]
async fn sync_dataset_rebuilds_when_a_record_changes() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    sync_dataset(&index, &docs(5), &FieldSet::full(), &opts(10)).await?;

    let mut edited = foods(4);
    edited[2].text = "Dish number 3 is now spicy.".to_string();
    let edited = enrich_all(&edited, &FieldSet::full());

    let outcome = sync_dataset(&index, &edited, &FieldSet::full(), &opts(10)).await?;

    assert_eq!(outcome, IngestOutcome::Rebuilt { uploaded: 4, previous: 5 });
    assert_eq!(index.info().await?.vector_count, 4);
    assert_eq!(index.get("3")?.unwrap().metadata["original_text"], "Dish number 3 is now spicy.");
    Ok(())
}

#[tokio::test]
async fn sync_dataset_repairs_an_interrupted_upload() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let docs = docs(9);

    index.fail_upserts_after(2)?;
    assert!(sync_dataset(&index, &docs, &FieldSet::full(), &opts(3)).await.is_err());
    assert_eq!(index.len()?, 6);
    let marker = index.read_marker().await?.expect("blank marker written before upload");
    assert!(marker.fingerprint.is_empty());
    index.heal()?;

    let outcome = sync_dataset(&index, &docs, &FieldSet::full(), &opts(3)).await?;

    assert_eq!(outcome, IngestOutcome::Rebuilt { uploaded: 9, previous: 6 });
    assert_eq!(index.info().await?.vector_count, 9);
    assert_eq!(index.read_marker().await?.unwrap().record_count, 9);
    Ok(())
}

#[tokio::test]
async fn changing_the_field_set_triggers_a_rebuild() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let records = foods(3);
    sync_dataset(&index, &enrich_all(&records, &FieldSet::basic()), &FieldSet::basic(), &opts(10)).await?;

    let outcome = ingest(
        &index,
        &enrich_all(&records, &FieldSet::full()),
        &FieldSet::full(),
        SyncGuard::Fingerprint,
        &opts(10),
    )
    .await?;

    assert_eq!(outcome, IngestOutcome::Rebuilt { uploaded: 3, previous: 3 });
    assert_eq!(index.get("1")?.unwrap().metadata["dietary"], "vegetarian");
    Ok(())
}

#[tokio::test]
async fn empty_index_guard_dispatches_to_count_check() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    index.upsert(&docs(2)).await?;

    let outcome = ingest(&index, &docs(5), &FieldSet::full(), SyncGuard::EmptyIndex, &opts(10)).await?;

    assert_eq!(outcome, IngestOutcome::Skipped { existing: 2 });
    Ok(())
}

#[tokio::test]
async fn planning_writes_nothing_until_applied() -> anyhow::Result<()> {
    let index = InMemoryIndex::new();
    let docs = docs(3);

    let plan = plan_sync(&index, &docs, SyncGuard::Fingerprint).await?;
    assert_eq!(plan, SyncPlan::Load);
    assert!(plan.uploads());
    assert_eq!(index.upsert_calls()?, 0);
    assert!(index.read_marker().await?.is_none());

    let outcome = apply_sync(&index, &docs, &FieldSet::full(), plan, &opts(10)).await?;
    assert_eq!(outcome, IngestOutcome::Ingested { uploaded: 3 });

    let again = plan_sync(&index, &docs, SyncGuard::Fingerprint).await?;
    assert_eq!(again, SyncPlan::UpToDate { count: 3 });
    assert!(!again.uploads());
    assert_eq!(plan_sync(&index, &docs, SyncGuard::EmptyIndex).await?, SyncPlan::Skip { existing: 3 });
    Ok(())
}
