//! Retrieval-augmented question answering over the food index: prompt
//! assembly, the retrieve-then-generate pipeline, and the interactive and
//! batch console sessions built on it.

pub mod batch;
pub mod pipeline;
pub mod prompt;
pub mod session;

pub use batch::{run_batch, BatchSummary, TEST_QUERIES};
pub use pipeline::RagPipeline;
pub use session::{run_interactive, SessionStats};
