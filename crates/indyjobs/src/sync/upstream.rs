//! Upstream job records as delivered by the game API.
//!
//! The API zero-fills attributes it does not have, so a missing cost arrives
//! as `0.0` and a missing completion date as the zero instant. Conversion to
//! [`UpsertIndustryJobParams`] is the one place where those zeros turn into
//! `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::industry::{
    IndustryActivity, IndustryJobStatus, JobCompletion, JobOwner, UpsertIndustryJobParams,
};
use crate::optional::{from_zero_sentinel, paired, to_zero_sentinel};

/// A record that cannot be stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRecord {
    #[error("record without job id")]
    MissingJobId,

    #[error("job {job_id}: unknown activity id {activity_id}")]
    UnknownActivity { job_id: i32, activity_id: i32 },

    #[error("job {job_id}: required field {field} is zero")]
    MissingField { job_id: i32, field: &'static str },
}

/// One job of a full upstream listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamJob {
    pub activity_id: i32,
    pub blueprint_id: i64,
    pub blueprint_location_id: i64,
    pub blueprint_type_id: i32,
    pub completed_character_id: i32,
    pub completed_date: DateTime<Utc>,
    pub cost: f64,
    /// `station_id` in character listings, `location_id` in corporation listings.
    #[serde(alias = "station_id", alias = "location_id")]
    pub destination_location_id: i64,
    pub duration: i32,
    pub end_date: DateTime<Utc>,
    pub facility_id: i64,
    pub installer_id: i32,
    pub job_id: i32,
    pub licensed_runs: i32,
    pub output_location_id: i64,
    pub pause_date: DateTime<Utc>,
    pub probability: f32,
    pub product_type_id: i32,
    pub runs: i32,
    pub start_date: DateTime<Utc>,
    pub status: String,
    pub successful_runs: i32,
}

impl UpstreamJob {
    /// Whether the API reports the job as running although its end date has
    /// passed. Such jobs are in fact ready for delivery.
    pub fn is_overdue_active(&self, now: DateTime<Utc>) -> bool {
        self.status == IndustryJobStatus::Active.as_str()
            && from_zero_sentinel(self.end_date).is_some_and(|end| end < now)
    }

    /// Converts the record into upsert parameters for `owner`.
    pub fn to_params(&self, owner: JobOwner) -> Result<UpsertIndustryJobParams, InvalidRecord> {
        let job_id = self.job_id;
        if job_id == 0 {
            return Err(InvalidRecord::MissingJobId);
        }
        let activity =
            IndustryActivity::try_from(self.activity_id).map_err(|e| {
                InvalidRecord::UnknownActivity {
                    job_id,
                    activity_id: e.0,
                }
            })?;
        let completed = paired(
            from_zero_sentinel(self.completed_character_id),
            from_zero_sentinel(self.completed_date),
        )
        .map(|(character_id, date)| JobCompletion { character_id, date });

        let params = UpsertIndustryJobParams {
            owner,
            job_id,
            activity,
            blueprint_id: self.blueprint_id,
            blueprint_location_id: self.blueprint_location_id,
            blueprint_type_id: self.blueprint_type_id,
            completed,
            cost: from_zero_sentinel(self.cost),
            destination_location_id: self.destination_location_id,
            duration: self.duration,
            end_date: self.end_date,
            facility_id: self.facility_id,
            installer_id: self.installer_id,
            licensed_runs: from_zero_sentinel(self.licensed_runs),
            output_location_id: self.output_location_id,
            pause_date: from_zero_sentinel(self.pause_date),
            probability: from_zero_sentinel(self.probability),
            product_type_id: from_zero_sentinel(self.product_type_id),
            runs: self.runs,
            start_date: self.start_date,
            status: IndustryJobStatus::decode(&self.status),
            successful_runs: from_zero_sentinel(self.successful_runs),
        };
        match params.missing_required_field() {
            Some(field) => Err(InvalidRecord::MissingField { job_id, field }),
            None => Ok(params),
        }
    }

    /// Builds the zero-filled record for stored parameters.
    pub fn from_params(params: &UpsertIndustryJobParams) -> Self {
        Self {
            activity_id: params.activity.id(),
            blueprint_id: params.blueprint_id,
            blueprint_location_id: params.blueprint_location_id,
            blueprint_type_id: params.blueprint_type_id,
            completed_character_id: to_zero_sentinel(params.completed.map(|c| c.character_id)),
            completed_date: to_zero_sentinel(params.completed.map(|c| c.date)),
            cost: to_zero_sentinel(params.cost),
            destination_location_id: params.destination_location_id,
            duration: params.duration,
            end_date: params.end_date,
            facility_id: params.facility_id,
            installer_id: params.installer_id,
            job_id: params.job_id,
            licensed_runs: to_zero_sentinel(params.licensed_runs),
            output_location_id: params.output_location_id,
            pause_date: to_zero_sentinel(params.pause_date),
            probability: to_zero_sentinel(params.probability),
            product_type_id: to_zero_sentinel(params.product_type_id),
            runs: params.runs,
            start_date: params.start_date,
            status: params.status.as_str().to_string(),
            successful_runs: to_zero_sentinel(params.successful_runs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    fn record() -> UpstreamJob {
        UpstreamJob {
            activity_id: 1,
            blueprint_id: 1_000_000_001,
            blueprint_location_id: 60003760,
            blueprint_type_id: 691,
            destination_location_id: 60003760,
            duration: 3600,
            end_date: at(12),
            facility_id: 60003760,
            installer_id: 90000001,
            job_id: 501,
            output_location_id: 60003760,
            runs: 10,
            start_date: at(11),
            status: "active".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_fields_become_none() {
        let params = record().to_params(JobOwner::Character(90000001)).unwrap();
        assert_eq!(params.activity, IndustryActivity::Manufacturing);
        assert_eq!(params.status, IndustryJobStatus::Active);
        assert!(params.completed.is_none());
        assert!(params.cost.is_none());
        assert!(params.licensed_runs.is_none());
        assert!(params.pause_date.is_none());
        assert!(params.probability.is_none());
        assert!(params.product_type_id.is_none());
        assert!(params.successful_runs.is_none());
    }

    #[test]
    fn test_completion_needs_character_and_date() {
        let mut r = record();
        r.completed_character_id = 90000002;
        let params = r.to_params(JobOwner::Character(90000001)).unwrap();
        assert!(params.completed.is_none());

        r.completed_date = at(13);
        let params = r.to_params(JobOwner::Character(90000001)).unwrap();
        assert_eq!(
            params.completed,
            Some(JobCompletion {
                character_id: 90000002,
                date: at(13)
            })
        );
    }

    #[test]
    fn test_invalid_records() {
        let owner = JobOwner::Corporation(98000001);

        let mut r = record();
        r.job_id = 0;
        assert_eq!(r.to_params(owner), Err(InvalidRecord::MissingJobId));

        let mut r = record();
        r.activity_id = 2;
        assert_eq!(
            r.to_params(owner),
            Err(InvalidRecord::UnknownActivity {
                job_id: 501,
                activity_id: 2
            })
        );

        let mut r = record();
        r.installer_id = 0;
        assert_eq!(
            r.to_params(owner),
            Err(InvalidRecord::MissingField {
                job_id: 501,
                field: "installer_id"
            })
        );
    }

    #[test]
    fn test_unmapped_status_is_undefined() {
        let mut r = record();
        r.status = "on_hold".to_string();
        let params = r.to_params(JobOwner::Character(1)).unwrap();
        assert_eq!(params.status, IndustryJobStatus::Undefined);
    }

    #[test]
    fn test_overdue_active() {
        let r = record();
        assert!(!r.is_overdue_active(at(11)));
        assert!(r.is_overdue_active(at(13)));

        let mut paused = record();
        paused.status = "paused".to_string();
        assert!(!paused.is_overdue_active(at(13)));

        let mut no_end = record();
        no_end.end_date = DateTime::<Utc>::default();
        assert!(!no_end.is_overdue_active(at(13)));
    }

    #[test]
    fn test_destination_aliases() {
        let character: UpstreamJob =
            serde_json::from_str(r#"{ "job_id": 1, "station_id": 60003760 }"#).unwrap();
        let corporation: UpstreamJob =
            serde_json::from_str(r#"{ "job_id": 1, "location_id": 1022734985679 }"#).unwrap();
        assert_eq!(character.destination_location_id, 60003760);
        assert_eq!(corporation.destination_location_id, 1022734985679);
        assert_eq!(character.cost, 0.0);
    }

    #[test]
    fn test_from_params_restores_record() {
        let mut r = record();
        r.cost = 1250.5;
        r.product_type_id = 587;
        let params = r.to_params(JobOwner::Character(1)).unwrap();
        assert_eq!(UpstreamJob::from_params(&params), r);
    }
}
