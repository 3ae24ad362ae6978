use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndyJobsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Invalid upstream record: {0}")]
    InvalidRecord(#[from] crate::sync::InvalidRecord),

    #[error("Failed to read snapshot '{path}': {source}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot JSON: {0}")]
    ParseSnapshot(#[source] serde_json::Error),

    #[error("Failed to write JSON output: {0}")]
    Output(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Unknown log level '{level}'")]
    InvalidLogLevel { level: String },

    #[error("No database path configured and no home directory found")]
    NoDatabasePath,
}

pub type Result<T> = std::result::Result<T, IndyJobsError>;
