//! foodrag-vector
//!
//! The hosted vector index client ([`UpstashIndex`]), an in-process stand-in
//! ([`InMemoryIndex`]) and the operations that load the enriched dataset into
//! either of them (see [`sync`]).

pub mod memory;
pub mod sync;
pub mod upstash;
mod wire;

pub use memory::InMemoryIndex;
pub use sync::{
    apply_sync, ingest, ingest_if_empty, plan_sync, reset_and_reload, sync_dataset, IngestOutcome, ResetReport, SyncOptions,
    SyncPlan,
};
pub use upstash::UpstashIndex;
