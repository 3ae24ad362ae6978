//! Industry job domain types.

pub mod activity;
pub mod job;
pub mod status;

pub use activity::{IndustryActivity, IndustryJobType, UnknownActivity};
pub use job::{
    CompletedBy, EntityShort, EveEntity, Identified, IndustryJob, IndustryJobStatusCount,
    JobCompletion, JobOwner, Lookup, LocationShort, OwnerKind, UpsertIndustryJobParams,
};
pub use status::{IndustryJobStatus, STATUS_VALUES};
