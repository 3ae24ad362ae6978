//! Shared test utilities for indyjobs integration tests.
//!
//! - `JobBuilder` for upsert parameters with valid required fields
//! - `TestStore` for a migrated database in a temp directory

pub mod builders;
pub mod store;

pub use builders::*;
pub use store::TestStore;
