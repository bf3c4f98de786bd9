//! Configuration system for ur5e-pilot.
//!
//! A single YAML file (explicit path, .ur5e-pilot.yml, or the user config dir)
//! overrides the built-in pipeline defaults.

use crate::error::Result;
use std::path::PathBuf;

pub use self::pilot::{DispatcherConfig, InferenceConfig, JaxConfig, PilotConfig, PipelineConfig, RunnerConfig};

mod pilot;

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = ".ur5e-pilot.yml";

/// Default program used to launch pipeline scripts.
pub const DEFAULT_RUNNER: &str = "uv";

/// Default training config identifier.
pub const DEFAULT_CONFIG_NAME: &str = "pi0_ur5e_finetune_lora";

/// Environment variable controlling XLA device memory preallocation.
pub const JAX_MEM_FRACTION_VAR: &str = "XLA_PYTHON_CLIENT_MEM_FRACTION";

/// Load configuration from the standard search paths.
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<PilotConfig> {
    PilotConfig::load(explicit_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        // Should succeed with defaults when no config file exists
        let config = load_config(None).unwrap();
        assert_eq!(config.runner.program, DEFAULT_RUNNER);
    }
}
