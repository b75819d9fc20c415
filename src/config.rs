//! Engine configuration.
//!
//! Configuration lives in an optional YAML file. Every field has a default,
//! so an empty file (or no file at all) gives the stock thresholds.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::analysis::SmellConfig;
use crate::score::DEFAULT_ACCEPTANCE_THRESHOLD;

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["reviewcheck.yaml", ".reviewcheck.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub version: String,
    /// Smell detection thresholds.
    #[serde(default)]
    pub smells: SmellConfig,
    /// Minimum quality score for a unit to be acceptable (default: 0.7).
    #[serde(default)]
    pub acceptance_threshold: Option<f64>,
    /// Glob patterns for paths to skip when collecting units (e.g., "**/migrations/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl EngineConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Returns the acceptance threshold (defaults to 0.7).
    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
            .unwrap_or(DEFAULT_ACCEPTANCE_THRESHOLD)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Find a config file in `dir`, if any.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a configuration for correctness.
pub fn validate(config: &EngineConfig) -> anyhow::Result<()> {
    if let Some(threshold) = config.acceptance_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!(
                "invalid acceptance_threshold {}, must be between 0 and 1",
                threshold
            );
        }
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1.0"
smells:
  max_function_statements: 30
acceptance_threshold: 0.8
excluded_paths:
  - "**/migrations/**"
"#;
        let config = EngineConfig::parse_str(yaml).unwrap();
        assert_eq!(config.smells.max_function_statements, 30);
        // unspecified threshold keeps its default
        assert_eq!(config.smells.max_nesting_depth, 3);
        assert_eq!(config.acceptance_threshold(), 0.8);
        assert!(config.is_path_excluded(Path::new("app/migrations/0001_initial.py")));
        assert!(!config.is_path_excluded(Path::new("app/models.py")));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::parse_str("").unwrap();
        assert_eq!(config.smells, SmellConfig::default());
        assert_eq!(config.acceptance_threshold(), DEFAULT_ACCEPTANCE_THRESHOLD);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = EngineConfig {
            acceptance_threshold: Some(1.5),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = EngineConfig {
            excluded_paths: vec!["a/{b".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path()).is_none());

        let path = temp.path().join(".reviewcheck.yaml");
        fs::write(&path, "acceptance_threshold: 0.5\n").unwrap();
        assert_eq!(discover(temp.path()), Some(path.clone()));

        let config = EngineConfig::parse_file(&path).unwrap();
        assert_eq!(config.acceptance_threshold(), 0.5);
    }
}
