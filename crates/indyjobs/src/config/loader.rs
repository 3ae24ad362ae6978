use std::path::Path;

use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/store-config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.database.busy_timeout_ms == 0 {
        return Err(ConfigError::Validation {
            message: "database.busy_timeout_ms must be positive".to_string(),
        });
    }

    if config.logging.level.parse::<LevelFilter>().is_err() {
        return Err(ConfigError::InvalidLogLevel {
            level: config.logging.level.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InvalidRecordPolicy, OrphanPolicy};

    #[test]
    fn test_load_minimal_config() {
        let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();
        assert_eq!(config.version, "1.0");
        assert!(config.database.path.is_none());
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.reconcile.orphan_policy, OrphanPolicy::MarkUnknown);
    }

    #[test]
    fn test_load_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "database": {
                "path": "/var/lib/indyjobs/jobs.db",
                "busy_timeout_ms": 250,
                "wal": false
            },
            "logging": { "level": "debug", "json": true },
            "reconcile": {
                "orphan_policy": "delete",
                "on_invalid_record": "abort",
                "fix_overdue_active": false
            }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(
            config.database.path.as_deref(),
            Some(Path::new("/var/lib/indyjobs/jobs.db"))
        );
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert!(!config.database.wal);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.reconcile.orphan_policy, OrphanPolicy::Delete);
        assert_eq!(config.reconcile.on_invalid_record, InvalidRecordPolicy::Abort);
        assert!(!config.reconcile.fix_overdue_active);
    }

    #[test]
    fn test_unknown_field_fails_schema() {
        let result = load_config_from_str(r#"{ "version": "1.0", "workers": 4 }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let result = load_config_from_str(r#"{ "version": "2.0" }"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_invalid_log_level() {
        let result = load_config_from_str(r#"{ "version": "1.0", "logging": { "level": "loud" } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidLogLevel { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = load_config_from_str("{ version: 1.0 ");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }
}
