//! Progress reporting for a crawl.
//!
//! The batch runner reports one unit per listing entry. Rendering is left to
//! the caller: the CLI draws an `indicatif` bar, tests and library callers
//! pass [`NullProgress`].

use std::sync::Arc;

/// Receives crawl progress.
pub trait ProgressCallback: Send + Sync {
    /// Number of entries the batch will process.
    fn set_total(&self, total: u64);

    /// Marks `delta` more entries as done, successfully or not.
    fn inc(&self, delta: u64);

    /// Names the entry currently being assembled.
    fn set_message(&self, msg: String);

    /// Ends the run with a summary line.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// A shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
