//! Session pipeline
//!
//! Drives tracked objects through typestate, predicate generation and
//! constraint solving, one pass at a time.

pub mod session;
pub mod summary;
pub mod tracked_object;
pub mod worker_pool;

pub use session::AnalysisSession;
pub use summary::PassSummary;
pub use tracked_object::TrackedObject;
pub use worker_pool::WorkerPool;
