//! Synchronization of stored jobs with upstream listings.

pub mod reconciler;
pub mod upstream;

pub use reconciler::{JobReconciler, ReconcileReport};
pub use upstream::{InvalidRecord, UpstreamJob};
