//! Runtime configuration for the workflow core.
//!
//! Configuration is plain data with documented defaults. A JSON document may
//! override any subset of keys; omitted keys keep their defaults.
//!
//! # Examples
//!
//! ```
//! use zettelflow::config::ZettelflowConfig;
//!
//! let config = ZettelflowConfig::from_json_str(r#"{"workflow": {"max_tags": 5}}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.workflow.max_tags, 5);
//! assert!(config.workflow.quality_gate_threshold.total_cmp(&0.3).is_eq());
//! ```

use crate::note::domain::NoteType;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Thresholds and limits used by the workflow services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Quality score below which AI enrichment is skipped.
    pub quality_gate_threshold: f64,
    /// Minimum quality score required for promotion.
    pub promotion_threshold: f64,
    /// Maximum number of tags kept from an enrichment response.
    pub max_tags: usize,
    /// Upper bound on a primary enrichment call, in seconds.
    pub primary_timeout_secs: u64,
    /// Stage error count at which a run is reported as a total failure.
    pub circuit_breaker_threshold: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            quality_gate_threshold: 0.3,
            promotion_threshold: 0.7,
            max_tags: 8,
            primary_timeout_secs: 30,
            circuit_breaker_threshold: 3,
        }
    }
}

impl WorkflowConfig {
    /// Returns the primary enrichment timeout.
    #[must_use]
    pub const fn primary_timeout(&self) -> Duration {
        Duration::from_secs(self.primary_timeout_secs)
    }

    /// Checks that thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a threshold lies outside
    /// `0.0..=1.0` or a limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("quality_gate_threshold", self.quality_gate_threshold),
            ("promotion_threshold", self.promotion_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must lie within 0.0..=1.0, got {value}"
                )));
            }
        }
        if self.max_tags == 0 {
            return Err(ConfigError::Invalid("max_tags must be positive".to_owned()));
        }
        if self.circuit_breaker_threshold == 0 {
            return Err(ConfigError::Invalid(
                "circuit_breaker_threshold must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Vault-relative directories used by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultLayout {
    /// Fleeting notes awaiting promotion.
    pub fleeting_dir: Utf8PathBuf,
    /// Promoted permanent notes.
    pub permanent_dir: Utf8PathBuf,
    /// Promoted literature notes.
    pub literature_dir: Utf8PathBuf,
    /// Root of safety backups.
    pub backup_dir: Utf8PathBuf,
    /// Review queue receiving bug reports.
    pub review_queue_dir: Utf8PathBuf,
}

impl Default for VaultLayout {
    fn default() -> Self {
        Self {
            fleeting_dir: Utf8PathBuf::from("Fleeting Notes"),
            permanent_dir: Utf8PathBuf::from("Permanent Notes"),
            literature_dir: Utf8PathBuf::from("Literature Notes"),
            backup_dir: Utf8PathBuf::from("backups"),
            review_queue_dir: Utf8PathBuf::from("Reviews/bug-reports"),
        }
    }
}

impl VaultLayout {
    /// Returns the destination directory for notes of `note_type`.
    #[must_use]
    pub fn directory_for(&self, note_type: NoteType) -> &Utf8Path {
        match note_type {
            NoteType::Fleeting => &self.fleeting_dir,
            NoteType::Permanent => &self.permanent_dir,
            NoteType::Literature => &self.literature_dir,
        }
    }
}

/// Complete configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZettelflowConfig {
    /// Workflow thresholds and limits.
    pub workflow: WorkflowConfig,
    /// Vault directory layout.
    pub layout: VaultLayout,
}

impl ZettelflowConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.workflow.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, plus the
    /// errors of [`Self::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfigError::Invalid(format!("{path} has no file name")))?;
        let raw = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(|err| ConfigError::Read {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        Self::from_json_str(&raw)
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {reason}")]
    Read {
        /// Configuration path.
        path: Utf8PathBuf,
        /// I/O error message.
        reason: String,
    },

    /// The configuration document is not valid JSON for the schema.
    #[error("cannot parse configuration: {0}")]
    Parse(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_document_uses_defaults() {
        let config = ZettelflowConfig::from_json_str("{}").expect("defaults parse");
        assert_eq!(config, ZettelflowConfig::default());
        assert_eq!(config.workflow.primary_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    fn partial_document_overrides_selected_keys() {
        let config = ZettelflowConfig::from_json_str(
            r#"{"workflow": {"quality_gate_threshold": 0.5}, "layout": {"permanent_dir": "Zettel"}}"#,
        )
        .expect("partial config parses");

        assert!(config.workflow.quality_gate_threshold.total_cmp(&0.5).is_eq());
        assert_eq!(config.workflow.max_tags, 8);
        assert_eq!(
            config.layout.directory_for(NoteType::Permanent),
            Utf8Path::new("Zettel")
        );
        assert_eq!(
            config.layout.directory_for(NoteType::Literature),
            Utf8Path::new("Literature Notes")
        );
    }

    #[rstest]
    #[case(r#"{"workflow": {"promotion_threshold": 1.5}}"#)]
    #[case(r#"{"workflow": {"max_tags": 0}}"#)]
    #[case(r#"{"workflow": {"circuit_breaker_threshold": 0}}"#)]
    fn out_of_range_values_are_rejected(#[case] raw: &str) {
        let result = ZettelflowConfig::from_json_str(raw);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        let result = ZettelflowConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
