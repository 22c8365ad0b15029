//! Configuration loading and representation.

use std::path::PathBuf;

use thiserror::Error;

use mercado_core::UserId;
use mercado_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "MERCADO_LOG_FORMAT";
pub const SEED_FILE_VAR: &str = "MERCADO_SEED_FILE";
pub const SEED_PRINCIPAL_VAR: &str = "MERCADO_SEED_PRINCIPAL";

const DEFAULT_SEED_PRINCIPAL: &str = "seed-loader";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_format: LogFormat,
    /// Seed file to load; `None` means the bundled sample data.
    pub seed_file: Option<PathBuf>,
    /// Identity the bulk loader writes as.
    pub seed_principal: UserId,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(v) => v.parse::<LogFormat>().map_err(|e| {
                ConfigError::Invalid {
                    var: LOG_FORMAT_VAR,
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let seed_file = lookup(SEED_FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let seed_principal = lookup(SEED_PRINCIPAL_VAR)
            .unwrap_or_else(|| DEFAULT_SEED_PRINCIPAL.to_string());
        let seed_principal = UserId::parse(seed_principal).map_err(|e| ConfigError::Invalid {
            var: SEED_PRINCIPAL_VAR,
            reason: e.to_string(),
        })?;

        Ok(Self {
            log_format,
            seed_file,
            seed_principal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.seed_file, None);
        assert_eq!(cfg.seed_principal.as_str(), "seed-loader");
    }

    #[test]
    fn reads_all_variables() {
        let cfg = config(&[
            (LOG_FORMAT_VAR, "pretty"),
            (SEED_FILE_VAR, "/tmp/seed.json"),
            (SEED_PRINCIPAL_VAR, "admin1"),
        ])
        .unwrap();
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.seed_file, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(cfg.seed_principal.as_str(), "admin1");
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = config(&[(LOG_FORMAT_VAR, "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: LOG_FORMAT_VAR, .. }));

        let err = config(&[(SEED_PRINCIPAL_VAR, "a/b")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: SEED_PRINCIPAL_VAR, .. }));
    }
}
