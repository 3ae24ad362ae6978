//! Industry job records: owner identity, upsert parameters and the enriched
//! read view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{IndustryActivity, IndustryJobStatus, IndustryJobType};

/// Kind of owner a job belongs to. Selects the job table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Character,
    Corporation,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => f.write_str("character"),
            Self::Corporation => f.write_str("corporation"),
        }
    }
}

/// Owner of a job. Together with the job id this is the natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum JobOwner {
    Character(i32),
    Corporation(i32),
}

impl JobOwner {
    pub fn kind(self) -> OwnerKind {
        match self {
            Self::Character(_) => OwnerKind::Character,
            Self::Corporation(_) => OwnerKind::Corporation,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Self::Character(id) | Self::Corporation(id) => id,
        }
    }

    pub fn with_kind(kind: OwnerKind, id: i32) -> Self {
        match kind {
            OwnerKind::Character => Self::Character(id),
            OwnerKind::Corporation => Self::Corporation(id),
        }
    }
}

impl fmt::Display for JobOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Completion data of a job. Character and date are only ever known together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JobCompletion {
    pub character_id: i32,
    pub date: DateTime<Utc>,
}

/// Parameters for creating or fully replacing a job.
///
/// Required ids must be non-zero. Every `Option` field is stored as NULL when
/// `None`; a later upsert with `None` wipes a previously stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertIndustryJobParams {
    pub owner: JobOwner,
    pub job_id: i32,
    pub activity: IndustryActivity,
    pub blueprint_id: i64,
    pub blueprint_location_id: i64,
    pub blueprint_type_id: i32,
    pub completed: Option<JobCompletion>,
    pub cost: Option<f64>,
    /// Station for character jobs, generic location for corporation jobs.
    pub destination_location_id: i64,
    pub duration: i32,
    pub end_date: DateTime<Utc>,
    pub facility_id: i64,
    pub installer_id: i32,
    pub licensed_runs: Option<i32>,
    pub output_location_id: i64,
    pub pause_date: Option<DateTime<Utc>>,
    pub probability: Option<f32>,
    pub product_type_id: Option<i32>,
    pub runs: i32,
    pub start_date: DateTime<Utc>,
    pub status: IndustryJobStatus,
    pub successful_runs: Option<i32>,
}

impl UpsertIndustryJobParams {
    /// Returns the name of the first required field that is zero.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        let checks: [(&'static str, bool); 6] = [
            ("owner_id", self.owner.id() == 0),
            ("blueprint_type_id", self.blueprint_type_id == 0),
            ("blueprint_location_id", self.blueprint_location_id == 0),
            ("installer_id", self.installer_id == 0),
            ("output_location_id", self.output_location_id == 0),
            ("destination_location_id", self.destination_location_id == 0),
        ];
        checks
            .into_iter()
            .find(|(_, is_zero)| *is_zero)
            .map(|(field, _)| field)
    }
}

/// Something that can be looked up by id.
pub trait Identified {
    type Id: Copy + PartialEq + fmt::Debug + Serialize;

    fn id(&self) -> Self::Id;
}

/// A reference to a lookup entity that may not have been fetched yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Lookup<T: Identified> {
    /// Only the id is known; details are pending enrichment.
    Unresolved(T::Id),
    Resolved(T),
}

impl<T: Identified> Lookup<T> {
    pub fn id(&self) -> T::Id {
        match self {
            Self::Unresolved(id) => *id,
            Self::Resolved(value) => value.id(),
        }
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(value) => Some(value),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// An entity with a category, e.g. a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EveEntity {
    pub id: i32,
    pub category: String,
    pub name: String,
}

impl Identified for EveEntity {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

/// A named thing, e.g. an inventory type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityShort {
    pub id: i32,
    pub name: String,
}

impl Identified for EntityShort {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

/// A location with its name and, when its solar system is known, security.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationShort {
    pub id: i64,
    pub name: String,
    pub security_status: Option<f32>,
}

impl Identified for LocationShort {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Completion of a job as seen on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedBy {
    pub character: Lookup<EveEntity>,
    pub date: DateTime<Utc>,
}

/// A stored job composed with its lookup data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryJob {
    /// Surrogate row id.
    pub id: i64,
    pub owner: JobOwner,
    pub job_id: i32,
    pub activity: IndustryActivity,
    pub blueprint_id: i64,
    pub blueprint_location: Lookup<LocationShort>,
    pub blueprint_type: Lookup<EntityShort>,
    pub completed: Option<CompletedBy>,
    pub cost: Option<f64>,
    pub destination: Lookup<LocationShort>,
    pub duration: i32,
    pub end_date: DateTime<Utc>,
    pub facility_id: i64,
    pub installer: Lookup<EveEntity>,
    pub licensed_runs: Option<i32>,
    pub output_location: Lookup<LocationShort>,
    pub pause_date: Option<DateTime<Utc>>,
    pub probability: Option<f32>,
    pub product_type: Option<Lookup<EntityShort>>,
    pub runs: i32,
    pub start_date: DateTime<Utc>,
    pub status: IndustryJobStatus,
    pub successful_runs: Option<i32>,
}

/// Number of jobs per installer, activity and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryJobStatusCount {
    pub installer_id: i32,
    pub activity: IndustryActivity,
    /// Slot kind of `activity`.
    pub job_type: IndustryJobType,
    pub status: IndustryJobStatus,
    pub count: u64,
}
