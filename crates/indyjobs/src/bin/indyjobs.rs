use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use indyjobs::config::{load_config, Config};
use indyjobs::db::{industry_job_repo, Database};
use indyjobs::industry::STATUS_VALUES;
use indyjobs::{
    ConfigError, IndustryJobStatus, IndyJobsError, JobOwner, JobReconciler, OwnerKind,
    UpstreamJob,
};

#[derive(Debug, Parser)]
#[command(name = "indyjobs")]
#[command(about = "Local store for character and corporation industry jobs")]
struct Cli {
    /// JSON config file. Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Character,
    Corporation,
}

impl From<Kind> for OwnerKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Character => OwnerKind::Character,
            Kind::Corporation => OwnerKind::Corporation,
        }
    }
}

#[derive(Debug, Args)]
struct OwnerArgs {
    #[arg(long, value_enum)]
    kind: Kind,
    /// Character or corporation id.
    #[arg(long)]
    owner: i32,
}

impl OwnerArgs {
    fn owner(&self) -> JobOwner {
        JobOwner::with_kind(self.kind.into(), self.owner)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and apply pending migrations.
    Migrate,
    /// Print stored jobs. Without an owner, all owners of the kind.
    List {
        #[arg(long, value_enum)]
        kind: Kind,
        #[arg(long)]
        owner: Option<i32>,
        /// Print a single job of the owner.
        #[arg(long, requires = "owner")]
        job: Option<i32>,
    },
    /// Print job counts per installer, activity and status.
    Counts {
        #[arg(long, value_enum)]
        kind: Kind,
    },
    /// Delete the named jobs of an owner, or all of them.
    Purge {
        #[command(flatten)]
        owner: OwnerArgs,
        #[arg(long = "job")]
        jobs: Vec<i32>,
    },
    /// Set the status of the named jobs of an owner.
    SetStatus {
        #[command(flatten)]
        owner: OwnerArgs,
        #[arg(long, value_parser = parse_status)]
        status: IndustryJobStatus,
        #[arg(long = "job", required = true)]
        jobs: Vec<i32>,
    },
    /// Apply a full listing from a JSON file.
    Reconcile {
        #[command(flatten)]
        owner: OwnerArgs,
        snapshot: PathBuf,
    },
}

fn parse_status(raw: &str) -> Result<IndustryJobStatus, String> {
    STATUS_VALUES
        .iter()
        .find(|(_, s)| !s.is_empty() && *s == raw)
        .map(|(status, _)| *status)
        .ok_or_else(|| format!("unknown status '{raw}'"))
}

fn print_json<T: Serialize>(value: &T) -> indyjobs::Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(IndyJobsError::Output)?;
    println!("{out}");
    Ok(())
}

fn open_database(cli: &Cli, config: &Config) -> indyjobs::Result<Database> {
    let path = cli
        .database
        .clone()
        .or_else(|| config.database_path())
        .ok_or(ConfigError::NoDatabasePath)?;
    Ok(Database::open_with(&path, &config.database)?)
}

fn run(cli: Cli) -> indyjobs::Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Err(e) = indyjobs::logging::init(&config.logging) {
        eprintln!("Logging already initialized: {e}");
    }
    let db = open_database(&cli, &config)?;

    match cli.command {
        Commands::Migrate => print_json(&serde_json::json!({ "migrated": true })),
        Commands::List { kind, owner, job } => match (owner, job) {
            (Some(owner), Some(job_id)) => {
                let owner = JobOwner::with_kind(kind.into(), owner);
                print_json(&industry_job_repo::get(&db, owner, job_id)?)
            }
            (Some(owner), None) => {
                let owner = JobOwner::with_kind(kind.into(), owner);
                print_json(&industry_job_repo::list(&db, owner)?)
            }
            (None, _) => print_json(&industry_job_repo::list_all(&db, kind.into())?),
        },
        Commands::Counts { kind } => {
            print_json(&industry_job_repo::count_by_status(&db, kind.into())?)
        }
        Commands::Purge { owner, jobs } => {
            let deleted = if jobs.is_empty() {
                industry_job_repo::delete_all(&db, owner.owner())?
            } else {
                let ids: HashSet<i32> = jobs.into_iter().collect();
                industry_job_repo::delete_by_ids(&db, owner.owner(), &ids)?
            };
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        Commands::SetStatus {
            owner,
            status,
            jobs,
        } => {
            let ids: HashSet<i32> = jobs.into_iter().collect();
            let updated = industry_job_repo::update_status(&db, owner.owner(), &ids, status)?;
            print_json(&serde_json::json!({ "updated": updated }))
        }
        Commands::Reconcile { owner, snapshot } => {
            let content =
                std::fs::read_to_string(&snapshot).map_err(|e| IndyJobsError::ReadSnapshot {
                    path: snapshot.clone(),
                    source: e,
                })?;
            let records: Vec<UpstreamJob> =
                serde_json::from_str(&content).map_err(IndyJobsError::ParseSnapshot)?;
            let reconciler = JobReconciler::new(db, config.reconcile.clone());
            let report = reconciler.reconcile(owner.owner(), &records, chrono::Utc::now())?;
            print_json(&report)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
