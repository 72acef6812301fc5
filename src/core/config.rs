//! Configuration management
//!
//! Settings are layered: the user config (`<config_dir>/mrt/config.yaml`),
//! then a `.mrt.yaml` in the working directory, then `MRT_*` environment
//! variables. Later layers override earlier ones field by field.

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LOCAL_CONFIG_FILE: &str = ".mrt.yaml";
pub const DEFAULT_DOCUMENT_FILE: &str = "assessment.json";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Report header text; each field falls back to the standard wording
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_sentence: Option<String>,
}

impl ReportSettings {
    fn merge(&mut self, other: ReportSettings) {
        if other.assessment_type.is_some() {
            self.assessment_type = other.assessment_type;
        }
        if other.limits.is_some() {
            self.limits = other.limits;
        }
        if other.sources.is_some() {
            self.sources = other.sources;
        }
        if other.scoring_system.is_some() {
            self.scoring_system = other.scoring_system;
        }
        if other.guide_sentence.is_some() {
            self.guide_sentence = other.guide_sentence;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name printed as the report analyst
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyst: Option<String>,

    /// Document used when `--file` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<PathBuf>,

    pub report: ReportSettings,

    /// tracing filter directive, e.g. "info" or "mrt=debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load and merge every layer. Unreadable or invalid files are skipped
    /// so a bad config never blocks the tool; see [`Config::load_reporting`]
    /// for the skipped files.
    pub fn load() -> Self {
        let (config, errors) = Self::load_reporting();
        for e in errors {
            tracing::debug!("{}", e);
        }
        config
    }

    /// Like [`Config::load`], also returning the layers that were skipped
    pub fn load_reporting() -> (Self, Vec<ConfigError>) {
        let mut layers = Vec::new();
        if let Some(path) = Self::user_config_path() {
            layers.push(path);
        }
        layers.push(PathBuf::from(LOCAL_CONFIG_FILE));
        Self::load_layers(&layers, |key| std::env::var(key).ok())
    }

    fn load_layers<F>(layers: &[PathBuf], lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let mut errors = Vec::new();
        for path in layers.iter().filter(|p| p.exists()) {
            match Self::from_file(path) {
                Ok(layer) => config.merge(layer),
                Err(e) => errors.push(e),
            }
        }
        config.apply_env(lookup);
        (config, errors)
    }

    /// `<config_dir>/mrt/config.yaml`, when a home directory is known
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mrt").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(content).map_err(|e| e.to_string())
    }

    /// Overlay `other` onto self; only fields set in `other` win
    pub fn merge(&mut self, other: Config) {
        if other.analyst.is_some() {
            self.analyst = other.analyst;
        }
        if other.default_file.is_some() {
            self.default_file = other.default_file;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self.report.merge(other.report);
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(analyst) = lookup("MRT_ANALYST").filter(|v| !v.trim().is_empty()) {
            self.analyst = Some(analyst);
        }
        if let Some(file) = lookup("MRT_FILE").filter(|v| !v.trim().is_empty()) {
            self.default_file = Some(PathBuf::from(file));
        }
    }

    pub fn analyst(&self) -> String {
        self.analyst
            .clone()
            .unwrap_or_else(|| "Risk Assessment Team".to_string())
    }

    pub fn document_file(&self) -> PathBuf {
        self.default_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analyst(), "Risk Assessment Team");
        assert_eq!(config.document_file(), PathBuf::from("assessment.json"));
    }

    #[test]
    fn test_parse_yaml() {
        let config = Config::from_yaml(
            "analyst: J. Smith\nreport:\n  assessment_type: Preliminary\nlog_level: debug\n",
        )
        .unwrap();
        assert_eq!(config.analyst(), "J. Smith");
        assert_eq!(config.report.assessment_type.as_deref(), Some("Preliminary"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(Config::from_yaml("").unwrap() == Config::default());
        assert!(Config::from_yaml("analyst: [unclosed").is_err());
    }

    #[test]
    fn test_local_layer_overrides_user_layer() {
        let mut config = Config::from_yaml("analyst: Global\nreport:\n  limits: Whole line\n").unwrap();
        config.merge(Config::from_yaml("report:\n  sources: Site walk\n").unwrap());
        assert_eq!(config.analyst(), "Global");
        assert_eq!(config.report.limits.as_deref(), Some("Whole line"));
        assert_eq!(config.report.sources.as_deref(), Some("Site walk"));

        config.merge(Config::from_yaml("analyst: Local\n").unwrap());
        assert_eq!(config.analyst(), "Local");
    }

    #[test]
    fn test_env_overrides_files() {
        let env: HashMap<&str, &str> = [("MRT_ANALYST", "Env Analyst"), ("MRT_FILE", "cell7.json")]
            .into_iter()
            .collect();
        let mut config = Config::from_yaml("analyst: File Analyst\n").unwrap();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.analyst(), "Env Analyst");
        assert_eq!(config.document_file(), PathBuf::from("cell7.json"));
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "analyst: [").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn test_bad_layer_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.yaml");
        let local = dir.path().join("local.yaml");
        std::fs::write(&user, "analyst: User\nlog_level: info\n").unwrap();
        std::fs::write(&local, "analyst: [").unwrap();
        let missing = dir.path().join("missing.yaml");

        let (config, errors) = Config::load_layers(&[user, local, missing], |_| None);
        assert_eq!(config.analyst(), "User");
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
        assert!(errors[0].to_string().contains("local.yaml"));
    }
}
