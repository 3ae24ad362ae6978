pub mod config;
pub mod db;
pub mod error;
pub mod industry;
pub mod logging;
pub mod optional;
pub mod sync;

pub use config::{load_config, Config};
pub use db::{Database, DatabaseError, ErrorKind};
pub use error::{ConfigError, IndyJobsError, Result};
pub use industry::{
    IndustryActivity, IndustryJob, IndustryJobStatus, IndustryJobType, JobOwner, OwnerKind,
    UpsertIndustryJobParams,
};
pub use sync::{JobReconciler, ReconcileReport, UpstreamJob};
