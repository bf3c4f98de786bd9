//! Pilot configuration.
//!
//! Loaded from .ur5e-pilot.yml or ~/.config/ur5e-pilot/ur5e-pilot.yml

use crate::error::{PilotError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration for the pipeline menu.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Log level used when RUST_LOG is unset.
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// External runner settings.
    pub runner: RunnerConfig,

    /// Training pipeline identifiers and entry points.
    pub pipeline: PipelineConfig,

    /// JAX backend settings.
    pub jax: JaxConfig,

    /// Inference server settings.
    pub inference: InferenceConfig,

    /// Menu loop behavior.
    pub dispatcher: DispatcherConfig,
}

impl PilotConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .ur5e-pilot.yml in current directory
    /// 3. ~/.config/ur5e-pilot/ur5e-pilot.yml
    /// 4. Defaults
    ///
    /// The first config file that exists is used; if it fails to parse or
    /// validate, loading fails instead of falling back to defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let mut candidates = vec![PathBuf::from(crate::config::PROJECT_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("ur5e-pilot").join("ur5e-pilot.yml"));
        }
        Self::load_first_existing(&candidates)
    }

    /// Load the first existing file among `candidates`, or defaults if none exist.
    pub fn load_first_existing(candidates: &[PathBuf]) -> Result<Self> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_from_file(path).map_err(|e| {
                    log::error!("Failed to load {}: {}", path.display(), e);
                    PilotError::Config(format!("{}: {}", path.display(), e))
                })?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => {
                log::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a config file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.runner.program.trim().is_empty() {
            return Err(PilotError::Config("runner.program must not be empty".to_string()));
        }
        if self.pipeline.config_name.trim().is_empty() {
            return Err(PilotError::Config("pipeline.config-name must not be empty".to_string()));
        }
        if self.pipeline.exp_prefix.trim().is_empty() {
            return Err(PilotError::Config("pipeline.exp-prefix must not be empty".to_string()));
        }
        if !(self.jax.mem_fraction > 0.0 && self.jax.mem_fraction <= 1.0) {
            return Err(PilotError::Config(format!(
                "jax.mem-fraction must be in (0, 1], got {}",
                self.jax.mem_fraction
            )));
        }
        Ok(())
    }
}

/// External runner settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program that launches the pipeline scripts (must be on PATH).
    pub program: String,

    /// Python interpreter used for environment checks.
    pub python: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: crate::config::DEFAULT_RUNNER.to_string(),
            python: "python".to_string(),
        }
    }
}

/// Training pipeline identifiers and script entry points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Training config identifier shared by every stage.
    #[serde(rename = "config-name")]
    pub config_name: String,

    /// Prefix for generated experiment names.
    #[serde(rename = "exp-prefix")]
    pub exp_prefix: String,

    #[serde(rename = "norm-stats-script")]
    pub norm_stats_script: String,

    #[serde(rename = "train-jax-script")]
    pub train_jax_script: String,

    #[serde(rename = "train-pytorch-script")]
    pub train_pytorch_script: String,

    #[serde(rename = "serve-script")]
    pub serve_script: String,

    /// Policy source passed to the serving script.
    #[serde(rename = "policy-kind")]
    pub policy_kind: String,

    /// Root under which training writes `<config-name>/<exp-name>/`.
    #[serde(rename = "checkpoints-dir")]
    pub checkpoints_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            config_name: crate::config::DEFAULT_CONFIG_NAME.to_string(),
            exp_prefix: "ur5e_run".to_string(),
            norm_stats_script: "scripts/compute_norm_stats.py".to_string(),
            train_jax_script: "scripts/train.py".to_string(),
            train_pytorch_script: "scripts/train_pytorch.py".to_string(),
            serve_script: "scripts/serve_policy.py".to_string(),
            policy_kind: "policy:checkpoint".to_string(),
            checkpoints_dir: "./checkpoints".to_string(),
        }
    }
}

/// JAX backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JaxConfig {
    /// Fraction of device memory XLA may preallocate.
    #[serde(rename = "mem-fraction")]
    pub mem_fraction: f64,
}

impl Default for JaxConfig {
    fn default() -> Self {
        Self { mem_fraction: 0.9 }
    }
}

/// Inference server settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Resolve glob patterns in the checkpoint dir to the latest matching run.
    #[serde(rename = "expand-latest")]
    pub expand_latest: bool,
}

/// Menu loop behavior.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Exit with the child's status when a pipeline command fails.
    #[serde(rename = "halt-on-failure")]
    pub halt_on_failure: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PilotConfig::default();
        assert_eq!(config.runner.program, "uv");
        assert_eq!(config.pipeline.config_name, "pi0_ur5e_finetune_lora");
        assert_eq!(config.pipeline.exp_prefix, "ur5e_run");
        assert_eq!(config.jax.mem_fraction, 0.9);
        assert!(!config.inference.expand_latest);
        assert!(!config.dispatcher.halt_on_failure);
    }

    #[test]
    fn test_config_validation() {
        let config = PilotConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_mem_fraction() {
        let config = PilotConfig {
            jax: JaxConfig { mem_fraction: 1.5 },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mem-fraction"));
    }

    #[test]
    fn test_empty_runner_rejected() {
        let config = PilotConfig {
            runner: RunnerConfig {
                program: " ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
runner:
  program: pixi
jax:
  mem-fraction: 0.5
dispatcher:
  halt-on-failure: true
"#;
        let config: PilotConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.runner.program, "pixi");
        assert_eq!(config.jax.mem_fraction, 0.5);
        assert!(config.dispatcher.halt_on_failure);
        // Other fields should have defaults
        assert_eq!(config.runner.python, "python");
        assert_eq!(config.pipeline.serve_script, "scripts/serve_policy.py");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pilot.yml");
        fs::write(&path, "pipeline:\n  exp-prefix: lab_run\n").unwrap();

        let config = PilotConfig::load(Some(&path)).unwrap();
        assert_eq!(config.pipeline.exp_prefix, "lab_run");
    }

    #[test]
    fn test_load_explicit_path_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pilot.yml");
        fs::write(&path, "jax:\n  mem-fraction: 0\n").unwrap();

        assert!(matches!(PilotConfig::load(Some(&path)), Err(PilotError::Config(_))));
    }

    #[test]
    fn test_invalid_project_config_is_an_error() {
        let dir = tempdir().unwrap();
        let project = dir.path().join(".ur5e-pilot.yml");
        let user = dir.path().join("user.yml");
        fs::write(&project, "runner:\n  program: pixi\njax:\n  mem-fraction: 1.5\n").unwrap();
        fs::write(&user, "runner:\n  program: conda\n").unwrap();

        let err = PilotConfig::load_first_existing(&[project.clone(), user]).unwrap_err();
        assert!(matches!(err, PilotError::Config(_)));
        assert!(err.to_string().contains(".ur5e-pilot.yml"));
        assert!(err.to_string().contains("mem-fraction"));
    }

    #[test]
    fn test_unparsable_config_is_an_error() {
        let dir = tempdir().unwrap();
        let project = dir.path().join(".ur5e-pilot.yml");
        fs::write(&project, "runner: [not, a, map\n").unwrap();

        assert!(PilotConfig::load_first_existing(&[project]).is_err());
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.yml");
        let user = dir.path().join("user.yml");
        fs::write(&user, "runner:\n  program: pixi\n").unwrap();

        let config = PilotConfig::load_first_existing(&[missing, user]).unwrap();
        assert_eq!(config.runner.program, "pixi");
    }

    #[test]
    fn test_no_candidates_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = PilotConfig::load_first_existing(&[dir.path().join("none.yml")]).unwrap();
        assert_eq!(config.runner.program, "uv");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let path = PathBuf::from("/nonexistent/ur5e-pilot.yml");
        assert!(matches!(PilotConfig::load(Some(&path)), Err(PilotError::Io(_))));
    }
}
