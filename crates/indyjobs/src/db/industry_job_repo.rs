//! Industry job repository for the `character_industry_jobs` and
//! `corporation_industry_jobs` tables.
//!
//! Both tables share one layout and differ only in the owner column and the
//! destination column, so every operation takes the owner and picks the
//! table from its kind. Jobs are keyed by `(owner, job_id)`; the surrogate
//! `id` is only used for display and joins.
//!
//! Reads join lookup tables with LEFT JOINs. A reference whose lookup row is
//! missing comes back as [`Lookup::Unresolved`] instead of failing the read.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::industry::{
    CompletedBy, EntityShort, EveEntity, IndustryActivity, IndustryJob, IndustryJobStatus,
    IndustryJobStatusCount, JobOwner, Lookup, LocationShort, OwnerKind, UpsertIndustryJobParams,
};
use crate::optional::{f32_from_storage, paired, to_storage};

/// Upper bound of job ids bound into a single `IN (...)` list.
const MAX_IDS_PER_STATEMENT: usize = 500;

/// Columns overwritten by an upsert, besides the destination column.
const MUTABLE_COLUMNS: [&str; 20] = [
    "activity_id",
    "blueprint_id",
    "blueprint_location_id",
    "blueprint_type_id",
    "completed_character_id",
    "completed_date",
    "cost",
    "duration",
    "end_date",
    "facility_id",
    "installer_id",
    "licensed_runs",
    "output_location_id",
    "pause_date",
    "probability",
    "product_type_id",
    "runs",
    "start_date",
    "status",
    "successful_runs",
];

/// Physical layout of one job table.
struct JobTable {
    name: &'static str,
    owner_column: &'static str,
    destination_column: &'static str,
}

fn job_table(kind: OwnerKind) -> JobTable {
    match kind {
        OwnerKind::Character => JobTable {
            name: "character_industry_jobs",
            owner_column: "character_id",
            destination_column: "station_id",
        },
        OwnerKind::Corporation => JobTable {
            name: "corporation_industry_jobs",
            owner_column: "corporation_id",
            destination_column: "location_id",
        },
    }
}

fn upsert_sql(t: &JobTable) -> String {
    let mut columns = vec![t.owner_column, "job_id", t.destination_column];
    columns.extend(MUTABLE_COLUMNS);
    // Positional parameters follow the column order.
    let values = placeholders(1, columns.len());
    let mut updates: Vec<String> = MUTABLE_COLUMNS
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    updates.push(format!(
        "{dest} = excluded.{dest}",
        dest = t.destination_column
    ));

    format!(
        "INSERT INTO {table} ({columns}) VALUES ({values})
         ON CONFLICT({owner}, job_id) DO UPDATE SET {updates}",
        table = t.name,
        columns = columns.join(", "),
        owner = t.owner_column,
        updates = updates.join(", "),
    )
}

fn select_sql(t: &JobTable, filter: &str) -> String {
    format!(
        "SELECT j.id, j.{owner} AS owner_id, j.job_id, j.activity_id, j.blueprint_id,
           j.blueprint_location_id, j.blueprint_type_id, j.completed_character_id,
           j.completed_date, j.cost, j.{dest} AS destination_location_id, j.duration,
           j.end_date, j.facility_id, j.installer_id, j.licensed_runs, j.output_location_id,
           j.pause_date, j.probability, j.product_type_id, j.runs, j.start_date, j.status,
           j.successful_runs,
           ie.name AS installer_name, ie.category AS installer_category,
           bt.name AS blueprint_type_name,
           pt.name AS product_type_name,
           cc.name AS completed_character_name, cc.category AS completed_character_category,
           bl.name AS blueprint_location_name, bls.security_status AS blueprint_location_security,
           ol.name AS output_location_name, ols.security_status AS output_location_security,
           dl.name AS destination_name, dls.security_status AS destination_security
         FROM {table} j
         LEFT JOIN eve_entities ie ON ie.id = j.installer_id
         LEFT JOIN eve_types bt ON bt.id = j.blueprint_type_id
         LEFT JOIN eve_types pt ON pt.id = j.product_type_id
         LEFT JOIN eve_entities cc ON cc.id = j.completed_character_id
         LEFT JOIN eve_locations bl ON bl.id = j.blueprint_location_id
         LEFT JOIN eve_solar_systems bls ON bls.id = bl.solar_system_id
         LEFT JOIN eve_locations ol ON ol.id = j.output_location_id
         LEFT JOIN eve_solar_systems ols ON ols.id = ol.solar_system_id
         LEFT JOIN eve_locations dl ON dl.id = j.{dest}
         LEFT JOIN eve_solar_systems dls ON dls.id = dl.solar_system_id
         {filter}
         ORDER BY j.{owner}, j.job_id",
        table = t.name,
        owner = t.owner_column,
        dest = t.destination_column,
    )
}

/// Positional placeholders `?start, ?start+1, ...`.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sorted_ids(ids: &HashSet<i32>) -> Vec<i32> {
    let mut ids: Vec<i32> = ids.iter().copied().collect();
    ids.sort_unstable();
    ids
}

/// A stored job row with the columns of its joined lookup rows.
#[derive(Debug, Clone, PartialEq)]
struct StoredJobRow {
    id: i64,
    owner_id: i32,
    job_id: i32,
    activity: IndustryActivity,
    blueprint_id: i64,
    blueprint_location_id: i64,
    blueprint_type_id: i32,
    completed_character_id: Option<i32>,
    completed_date: Option<DateTime<Utc>>,
    cost: Option<f64>,
    destination_location_id: i64,
    duration: i32,
    end_date: DateTime<Utc>,
    facility_id: i64,
    installer_id: i32,
    licensed_runs: Option<i32>,
    output_location_id: i64,
    pause_date: Option<DateTime<Utc>>,
    probability: Option<f64>,
    product_type_id: Option<i32>,
    runs: i32,
    start_date: DateTime<Utc>,
    status: IndustryJobStatus,
    successful_runs: Option<i32>,
    installer_name: Option<String>,
    installer_category: Option<String>,
    blueprint_type_name: Option<String>,
    product_type_name: Option<String>,
    completed_character_name: Option<String>,
    completed_character_category: Option<String>,
    blueprint_location_name: Option<String>,
    blueprint_location_security: Option<f64>,
    output_location_name: Option<String>,
    output_location_security: Option<f64>,
    destination_name: Option<String>,
    destination_security: Option<f64>,
}

impl StoredJobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            job_id: row.get("job_id")?,
            activity: row.get("activity_id")?,
            blueprint_id: row.get("blueprint_id")?,
            blueprint_location_id: row.get("blueprint_location_id")?,
            blueprint_type_id: row.get("blueprint_type_id")?,
            completed_character_id: row.get("completed_character_id")?,
            completed_date: row.get("completed_date")?,
            cost: row.get("cost")?,
            destination_location_id: row.get("destination_location_id")?,
            duration: row.get("duration")?,
            end_date: row.get("end_date")?,
            facility_id: row.get("facility_id")?,
            installer_id: row.get("installer_id")?,
            licensed_runs: row.get("licensed_runs")?,
            output_location_id: row.get("output_location_id")?,
            pause_date: row.get("pause_date")?,
            probability: row.get("probability")?,
            product_type_id: row.get("product_type_id")?,
            runs: row.get("runs")?,
            start_date: row.get("start_date")?,
            status: row.get("status")?,
            successful_runs: row.get("successful_runs")?,
            installer_name: row.get("installer_name")?,
            installer_category: row.get("installer_category")?,
            blueprint_type_name: row.get("blueprint_type_name")?,
            product_type_name: row.get("product_type_name")?,
            completed_character_name: row.get("completed_character_name")?,
            completed_character_category: row.get("completed_character_category")?,
            blueprint_location_name: row.get("blueprint_location_name")?,
            blueprint_location_security: row.get("blueprint_location_security")?,
            output_location_name: row.get("output_location_name")?,
            output_location_security: row.get("output_location_security")?,
            destination_name: row.get("destination_name")?,
            destination_security: row.get("destination_security")?,
        })
    }

    /// Composes the read view. Completion is only surfaced when both the
    /// character and the date are stored.
    fn into_job(self, kind: OwnerKind) -> IndustryJob {
        let completed = paired(self.completed_character_id, self.completed_date).map(
            |(character_id, date)| CompletedBy {
                character: entity(
                    character_id,
                    self.completed_character_name,
                    self.completed_character_category,
                ),
                date,
            },
        );
        IndustryJob {
            id: self.id,
            owner: JobOwner::with_kind(kind, self.owner_id),
            job_id: self.job_id,
            activity: self.activity,
            blueprint_id: self.blueprint_id,
            blueprint_location: location(
                self.blueprint_location_id,
                self.blueprint_location_name,
                self.blueprint_location_security,
            ),
            blueprint_type: named(self.blueprint_type_id, self.blueprint_type_name),
            completed,
            cost: self.cost,
            destination: location(
                self.destination_location_id,
                self.destination_name,
                self.destination_security,
            ),
            duration: self.duration,
            end_date: self.end_date,
            facility_id: self.facility_id,
            installer: entity(
                self.installer_id,
                self.installer_name,
                self.installer_category,
            ),
            licensed_runs: self.licensed_runs,
            output_location: location(
                self.output_location_id,
                self.output_location_name,
                self.output_location_security,
            ),
            pause_date: self.pause_date,
            probability: f32_from_storage(self.probability),
            product_type: self
                .product_type_id
                .map(|id| named(id, self.product_type_name)),
            runs: self.runs,
            start_date: self.start_date,
            status: self.status,
            successful_runs: self.successful_runs,
        }
    }
}

fn entity(id: i32, name: Option<String>, category: Option<String>) -> Lookup<EveEntity> {
    match paired(name, category) {
        Some((name, category)) => Lookup::Resolved(EveEntity { id, category, name }),
        None => Lookup::Unresolved(id),
    }
}

fn named(id: i32, name: Option<String>) -> Lookup<EntityShort> {
    match name {
        Some(name) => Lookup::Resolved(EntityShort { id, name }),
        None => Lookup::Unresolved(id),
    }
}

fn location(id: i64, name: Option<String>, security: Option<f64>) -> Lookup<LocationShort> {
    match name {
        Some(name) => Lookup::Resolved(LocationShort {
            id,
            name,
            security_status: f32_from_storage(security),
        }),
        None => Lookup::Unresolved(id),
    }
}

/// Creates a job or fully replaces the stored job with the same
/// `(owner, job_id)`.
pub fn upsert(db: &Database, arg: &UpsertIndustryJobParams) -> Result<(), DatabaseError> {
    db.with_conn(|conn| upsert_in(conn, arg))
}

pub(crate) fn upsert_in(
    conn: &Connection,
    arg: &UpsertIndustryJobParams,
) -> Result<(), DatabaseError> {
    const OP: &str = "upsert_industry_job";
    if let Some(field) = arg.missing_required_field() {
        return Err(DatabaseError::invalid(OP, format!("{field} is zero"), arg));
    }
    let wrap_err = |err: rusqlite::Error| {
        DatabaseError::storage(
            OP,
            format!("{} job {}: {:?}", arg.owner, arg.job_id, arg),
            err.into(),
        )
    };
    let t = job_table(arg.owner.kind());
    conn.execute(
        &upsert_sql(&t),
        params![
            arg.owner.id(),
            arg.job_id,
            arg.destination_location_id,
            arg.activity,
            arg.blueprint_id,
            arg.blueprint_location_id,
            arg.blueprint_type_id,
            arg.completed.map(|c| c.character_id),
            arg.completed.map(|c| c.date),
            arg.cost,
            arg.duration,
            arg.end_date,
            arg.facility_id,
            arg.installer_id,
            arg.licensed_runs,
            arg.output_location_id,
            arg.pause_date,
            to_storage::<f32, f64>(arg.probability),
            arg.product_type_id,
            arg.runs,
            arg.start_date,
            arg.status,
            arg.successful_runs,
        ],
    )
    .map_err(wrap_err)?;
    log::debug!("Industry job {} stored for {}", arg.job_id, arg.owner);
    Ok(())
}

/// Returns one job with its lookup data.
pub fn get(db: &Database, owner: JobOwner, job_id: i32) -> Result<IndustryJob, DatabaseError> {
    const OP: &str = "get_industry_job";
    let key = format!("{owner} job {job_id}");
    let t = job_table(owner.kind());
    let row = db
        .with_conn(|conn| {
            let sql = select_sql(&t, &format!("WHERE j.{} = ?1 AND j.job_id = ?2", t.owner_column));
            Ok(conn
                .query_row(&sql, [owner.id(), job_id], StoredJobRow::from_row)
                .optional()?)
        })
        .map_err(|e| DatabaseError::storage(OP, key.clone(), e))?;
    match row {
        Some(row) => Ok(row.into_job(owner.kind())),
        None => Err(DatabaseError::NotFound { operation: OP, key }),
    }
}

/// Returns all jobs of an owner. Empty when the owner has none.
pub fn list(db: &Database, owner: JobOwner) -> Result<Vec<IndustryJob>, DatabaseError> {
    db.with_conn(|conn| list_in(conn, owner))
        .map_err(|e| DatabaseError::storage("list_industry_jobs", owner.to_string(), e))
}

pub(crate) fn list_in(conn: &Connection, owner: JobOwner) -> Result<Vec<IndustryJob>, DatabaseError> {
    if owner.id() == 0 {
        return Err(DatabaseError::invalid(
            "list_industry_jobs",
            "owner_id is zero",
            &owner,
        ));
    }
    let t = job_table(owner.kind());
    let sql = select_sql(&t, &format!("WHERE j.{} = ?1", t.owner_column));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([owner.id()], StoredJobRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows.into_iter().map(|r| r.into_job(owner.kind())).collect())
}

/// Returns the jobs of every owner of one kind.
pub fn list_all(db: &Database, kind: OwnerKind) -> Result<Vec<IndustryJob>, DatabaseError> {
    let t = job_table(kind);
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&select_sql(&t, ""))?;
        let rows = stmt
            .query_map([], StoredJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(|r| r.into_job(kind)).collect())
    })
    .map_err(|e| DatabaseError::storage("list_all_industry_jobs", kind.to_string(), e))
}

/// Returns the stored status of every job of an owner, keyed by job id.
pub(crate) fn job_statuses_in(
    conn: &Connection,
    owner: JobOwner,
) -> Result<HashMap<i32, IndustryJobStatus>, DatabaseError> {
    let t = job_table(owner.kind());
    let sql = format!(
        "SELECT job_id, status FROM {} WHERE {} = ?1",
        t.name, t.owner_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let statuses = stmt
        .query_map([owner.id()], |r| Ok((r.get(0)?, r.get(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(statuses)
}

/// Counts jobs of all owners of one kind per installer, activity and status.
pub fn count_by_status(
    db: &Database,
    kind: OwnerKind,
) -> Result<Vec<IndustryJobStatusCount>, DatabaseError> {
    let t = job_table(kind);
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT installer_id, activity_id, status, COUNT(*) FROM {}
             GROUP BY installer_id, activity_id, status
             ORDER BY installer_id, activity_id, status",
            t.name
        );
        let mut stmt = conn.prepare(&sql)?;
        let counts = stmt
            .query_map([], |row| {
                let activity: IndustryActivity = row.get(1)?;
                Ok(IndustryJobStatusCount {
                    installer_id: row.get(0)?,
                    activity,
                    job_type: activity.job_type(),
                    status: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    })
    .map_err(|e| DatabaseError::storage("count_industry_jobs_by_status", kind.to_string(), e))
}

/// Deletes every job of an owner. Returns the number of deleted jobs.
pub fn delete_all(db: &Database, owner: JobOwner) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| delete_all_in(conn, owner))
}

pub(crate) fn delete_all_in(conn: &Connection, owner: JobOwner) -> Result<usize, DatabaseError> {
    const OP: &str = "delete_all_industry_jobs";
    if owner.id() == 0 {
        return Err(DatabaseError::invalid(OP, "owner_id is zero", &owner));
    }
    let t = job_table(owner.kind());
    let deleted = conn
        .execute(
            &format!("DELETE FROM {} WHERE {} = ?1", t.name, t.owner_column),
            [owner.id()],
        )
        .map_err(|e| DatabaseError::storage(OP, owner.to_string(), e.into()))?;
    log::info!("Industry jobs deleted for {owner}: {deleted}");
    Ok(deleted)
}

/// Deletes exactly the named jobs of an owner. An empty set is a no-op.
/// Returns the number of deleted jobs.
pub fn delete_by_ids(
    db: &Database,
    owner: JobOwner,
    job_ids: &HashSet<i32>,
) -> Result<usize, DatabaseError> {
    db.with_transaction(|tx| delete_by_ids_in(tx, owner, job_ids))
}

pub(crate) fn delete_by_ids_in(
    conn: &Connection,
    owner: JobOwner,
    job_ids: &HashSet<i32>,
) -> Result<usize, DatabaseError> {
    const OP: &str = "delete_industry_jobs_by_id";
    if owner.id() == 0 {
        return Err(DatabaseError::invalid(OP, "owner_id is zero", &owner));
    }
    if job_ids.is_empty() {
        return Ok(0);
    }
    let t = job_table(owner.kind());
    let ids = sorted_ids(job_ids);
    let mut deleted = 0;
    for chunk in ids.chunks(MAX_IDS_PER_STATEMENT) {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1 AND job_id IN ({})",
            t.name,
            t.owner_column,
            placeholders(2, chunk.len())
        );
        let values: Vec<i32> = std::iter::once(owner.id()).chain(chunk.iter().copied()).collect();
        deleted += conn
            .execute(&sql, rusqlite::params_from_iter(values))
            .map_err(|e| DatabaseError::storage(OP, format!("{owner} jobs {ids:?}"), e.into()))?;
    }
    log::info!("Industry jobs deleted for {owner}: {ids:?}");
    Ok(deleted)
}

/// Sets the status of the named jobs of an owner and touches nothing else.
/// Ids of jobs that do not belong to the owner are ignored. Returns the
/// number of updated jobs.
pub fn update_status(
    db: &Database,
    owner: JobOwner,
    job_ids: &HashSet<i32>,
    status: IndustryJobStatus,
) -> Result<usize, DatabaseError> {
    db.with_transaction(|tx| update_status_in(tx, owner, job_ids, status))
}

pub(crate) fn update_status_in(
    conn: &Connection,
    owner: JobOwner,
    job_ids: &HashSet<i32>,
    status: IndustryJobStatus,
) -> Result<usize, DatabaseError> {
    const OP: &str = "update_industry_job_status";
    if owner.id() == 0 {
        return Err(DatabaseError::invalid(OP, "owner_id is zero", &owner));
    }
    if job_ids.contains(&0) {
        return Err(DatabaseError::invalid(OP, "job id 0 in set", job_ids));
    }
    if job_ids.is_empty() {
        return Ok(0);
    }
    let t = job_table(owner.kind());
    let ids = sorted_ids(job_ids);
    let mut updated = 0;
    for chunk in ids.chunks(MAX_IDS_PER_STATEMENT) {
        let sql = format!(
            "UPDATE {} SET status = ?1 WHERE {} = ?2 AND job_id IN ({})",
            t.name,
            t.owner_column,
            placeholders(3, chunk.len())
        );
        let values: Vec<Value> = [Value::from(status.as_str().to_string()), Value::from(owner.id())]
            .into_iter()
            .chain(chunk.iter().map(|&id| Value::from(id)))
            .collect();
        updated += conn.execute(&sql, rusqlite::params_from_iter(values)).map_err(|e| {
            DatabaseError::storage(OP, format!("{owner} jobs {ids:?} to {status:?}"), e.into())
        })?;
    }
    log::info!(
        "Industry job status set to {:?} for {owner}: {ids:?}",
        status.as_str()
    );
    Ok(updated)
}
