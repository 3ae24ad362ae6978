//! Applies a full upstream listing of one owner to the store.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{InvalidRecordPolicy, OrphanPolicy, ReconcileConfig};
use crate::db::{industry_job_repo as repo, Database};
use crate::error::{IndyJobsError, Result};
use crate::industry::{IndustryJobStatus, JobOwner, UpsertIndustryJobParams};
use crate::sync::upstream::UpstreamJob;

/// Outcome of one reconcile cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Whether anything was written.
    pub changed: bool,
    pub upserted: usize,
    pub skipped: usize,
    /// Stored jobs that were missing from the listing and handled per the
    /// orphan policy, in ascending order.
    pub orphaned: Vec<i32>,
    pub deleted: usize,
}

/// Keeps the stored jobs of an owner in line with upstream listings.
#[derive(Clone)]
pub struct JobReconciler {
    db: Database,
    config: ReconcileConfig,
}

impl JobReconciler {
    pub fn new(db: Database, config: ReconcileConfig) -> Self {
        Self { db, config }
    }

    /// Applies `snapshot`, the complete current listing for `owner`.
    ///
    /// When every listed job is already stored with the same status and no
    /// stored job needs orphan handling, nothing is written. Otherwise all
    /// valid records are upserted and orphans are handled inside one
    /// transaction, so a failure leaves the store as it was.
    #[tracing::instrument(skip_all, fields(owner = %owner, records = snapshot.len()))]
    pub fn reconcile(
        &self,
        owner: JobOwner,
        snapshot: &[UpstreamJob],
        now: DateTime<Utc>,
    ) -> Result<ReconcileReport> {
        let (jobs, skipped) = self.prepare(owner, snapshot, now)?;
        let incoming: HashSet<i32> = snapshot
            .iter()
            .map(|r| r.job_id)
            .filter(|id| *id != 0)
            .collect();

        let report = self.db.with_transaction(|tx| {
            let stored = repo::job_statuses_in(tx, owner)?;

            let mut changed = jobs
                .iter()
                .any(|j| stored.get(&j.job_id) != Some(&j.status));
            let orphans: HashSet<i32> = stored
                .iter()
                .filter(|(id, status)| {
                    !incoming.contains(id)
                        && match self.config.orphan_policy {
                            OrphanPolicy::MarkUnknown => status.is_active(),
                            OrphanPolicy::Delete => true,
                        }
                })
                .map(|(id, _)| *id)
                .collect();
            changed |= !orphans.is_empty();

            let mut report = ReconcileReport {
                changed,
                skipped,
                ..Default::default()
            };
            if !changed {
                return Ok(report);
            }

            for job in &jobs {
                repo::upsert_in(tx, job)?;
            }
            report.upserted = jobs.len();

            if !orphans.is_empty() {
                match self.config.orphan_policy {
                    OrphanPolicy::MarkUnknown => {
                        repo::update_status_in(tx, owner, &orphans, IndustryJobStatus::Unknown)?;
                    }
                    OrphanPolicy::Delete if incoming.is_empty() => {
                        report.deleted = repo::delete_all_in(tx, owner)?;
                    }
                    OrphanPolicy::Delete => {
                        report.deleted = repo::delete_by_ids_in(tx, owner, &orphans)?;
                    }
                }
                let mut orphaned: Vec<i32> = orphans.into_iter().collect();
                orphaned.sort_unstable();
                report.orphaned = orphaned;
            }
            Ok(report)
        })?;

        if report.changed {
            tracing::info!(
                upserted = report.upserted,
                skipped = report.skipped,
                orphaned = report.orphaned.len(),
                deleted = report.deleted,
                "Industry jobs reconciled"
            );
        } else {
            tracing::debug!("Industry jobs unchanged");
        }
        Ok(report)
    }

    /// Converts the listing into upsert parameters. Returns the valid jobs
    /// and the number of skipped records.
    fn prepare(
        &self,
        owner: JobOwner,
        snapshot: &[UpstreamJob],
        now: DateTime<Utc>,
    ) -> Result<(Vec<UpsertIndustryJobParams>, usize)> {
        let mut jobs = Vec::with_capacity(snapshot.len());
        let mut skipped = 0;
        for record in snapshot {
            let mut params = match record.to_params(owner) {
                Ok(params) => params,
                Err(err) => match self.config.on_invalid_record {
                    InvalidRecordPolicy::Skip => {
                        tracing::warn!(error = %err, "Skipping industry job record");
                        skipped += 1;
                        continue;
                    }
                    InvalidRecordPolicy::Abort => return Err(IndyJobsError::InvalidRecord(err)),
                },
            };
            if self.config.fix_overdue_active && record.is_overdue_active(now) {
                tracing::debug!(job_id = record.job_id, "Treating overdue active job as ready");
                params.status = IndustryJobStatus::Ready;
            }
            jobs.push(params);
        }
        Ok((jobs, skipped))
    }
}
