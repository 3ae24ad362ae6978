//! Builders for job parameters and upstream records.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use indyjobs::industry::{
    IndustryActivity, IndustryJobStatus, JobCompletion, JobOwner, UpsertIndustryJobParams,
};
use indyjobs::UpstreamJob;

pub const JITA_SYSTEM: i32 = 30000142;
pub const JITA_STATION: i64 = 60003760;
pub const FACILITY: i64 = 1022734985679;
pub const INSTALLER: i32 = 90000001;
pub const RIFTER_BLUEPRINT: i32 = 691;
pub const RIFTER: i32 = 587;

/// Reference instant all test dates are derived from.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap()
}

/// Builder for `UpsertIndustryJobParams` with every required field set.
pub struct JobBuilder {
    params: UpsertIndustryJobParams,
}

impl JobBuilder {
    pub fn new(owner: JobOwner, job_id: i32) -> Self {
        Self {
            params: UpsertIndustryJobParams {
                owner,
                job_id,
                activity: IndustryActivity::Manufacturing,
                blueprint_id: 1_000_000_000 + i64::from(job_id),
                blueprint_location_id: JITA_STATION,
                blueprint_type_id: RIFTER_BLUEPRINT,
                completed: None,
                cost: None,
                destination_location_id: JITA_STATION,
                duration: 18 * 3600,
                end_date: now() + Duration::hours(12),
                facility_id: FACILITY,
                installer_id: INSTALLER,
                licensed_runs: None,
                output_location_id: JITA_STATION,
                pause_date: None,
                probability: None,
                product_type_id: None,
                runs: 1,
                start_date: now() - Duration::hours(6),
                status: IndustryJobStatus::Active,
                successful_runs: None,
            },
        }
    }

    pub fn activity(mut self, activity: IndustryActivity) -> Self {
        self.params.activity = activity;
        self
    }

    pub fn status(mut self, status: IndustryJobStatus) -> Self {
        self.params.status = status;
        self
    }

    pub fn runs(mut self, runs: i32) -> Self {
        self.params.runs = runs;
        self
    }

    pub fn end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.params.end_date = end_date;
        self
    }

    pub fn installer(mut self, installer_id: i32) -> Self {
        self.params.installer_id = installer_id;
        self
    }

    pub fn destination(mut self, location_id: i64) -> Self {
        self.params.destination_location_id = location_id;
        self
    }

    pub fn completed(mut self, character_id: i32, date: DateTime<Utc>) -> Self {
        self.params.completed = Some(JobCompletion { character_id, date });
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.params.cost = Some(cost);
        self
    }

    pub fn product(mut self, type_id: i32) -> Self {
        self.params.product_type_id = Some(type_id);
        self
    }

    pub fn probability(mut self, probability: f32) -> Self {
        self.params.probability = Some(probability);
        self
    }

    pub fn successful_runs(mut self, runs: i32) -> Self {
        self.params.successful_runs = Some(runs);
        self
    }

    pub fn licensed_runs(mut self, runs: i32) -> Self {
        self.params.licensed_runs = Some(runs);
        self
    }

    pub fn paused_at(mut self, date: DateTime<Utc>) -> Self {
        self.params.pause_date = Some(date);
        self
    }

    pub fn build(self) -> UpsertIndustryJobParams {
        self.params
    }

    /// The same job as a zero-filled upstream record.
    pub fn upstream(self) -> UpstreamJob {
        UpstreamJob::from_params(&self.params)
    }
}
