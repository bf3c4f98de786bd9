//! Subprocess invocation descriptors for each pipeline stage.

use crate::config::{JAX_MEM_FRACTION_VAR, PilotConfig};
use std::collections::BTreeMap;
use std::fmt;

/// Program, arguments and environment overrides for one subprocess call.
///
/// Overrides are applied on top of the inherited environment of the child
/// only; the caller's environment is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl InvocationSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment override for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Whether `needle` is among the arguments.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for InvocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Builds the invocation for each menu handler from the loaded config.
#[derive(Debug, Clone)]
pub struct PipelineCommands<'a> {
    config: &'a PilotConfig,
}

impl<'a> PipelineCommands<'a> {
    pub fn new(config: &'a PilotConfig) -> Self {
        Self { config }
    }

    fn run_script(&self, script: &str) -> InvocationSpec {
        InvocationSpec::new(&self.config.runner.program).args(["run", script])
    }

    /// `python --version`
    pub fn python_version(&self) -> InvocationSpec {
        InvocationSpec::new(&self.config.runner.python).arg("--version")
    }

    /// Accelerator probe: prints CUDA availability and the device name.
    pub fn gpu_probe(&self) -> InvocationSpec {
        InvocationSpec::new(&self.config.runner.python).args(["-c", GPU_PROBE_SCRIPT])
    }

    /// `uv run scripts/compute_norm_stats.py --config-name <config>`
    pub fn compute_norm_stats(&self) -> InvocationSpec {
        let pipeline = &self.config.pipeline;
        self.run_script(&pipeline.norm_stats_script)
            .args(["--config-name", pipeline.config_name.as_str()])
    }

    /// `XLA_PYTHON_CLIENT_MEM_FRACTION=<f> uv run scripts/train.py <config> --exp_name=<name>`
    pub fn train_jax(&self, exp_name: &str) -> InvocationSpec {
        let pipeline = &self.config.pipeline;
        self.run_script(&pipeline.train_jax_script)
            .arg(&pipeline.config_name)
            .arg(format!("--exp_name={}", exp_name))
            .env(JAX_MEM_FRACTION_VAR, self.config.jax.mem_fraction.to_string())
    }

    /// `uv run scripts/train_pytorch.py <config> --exp_name=<name>`
    pub fn train_pytorch(&self, exp_name: &str) -> InvocationSpec {
        let pipeline = &self.config.pipeline;
        self.run_script(&pipeline.train_pytorch_script)
            .arg(&pipeline.config_name)
            .arg(format!("--exp_name={}", exp_name))
    }

    /// `uv run scripts/serve_policy.py policy:checkpoint --policy.config=<config> --policy.dir=<dir>`
    pub fn serve_policy(&self, checkpoint_dir: &str) -> InvocationSpec {
        let pipeline = &self.config.pipeline;
        self.run_script(&pipeline.serve_script)
            .arg(&pipeline.policy_kind)
            .arg(format!("--policy.config={}", pipeline.config_name))
            .arg(format!("--policy.dir={}", checkpoint_dir))
    }
}

const GPU_PROBE_SCRIPT: &str = "\
import torch
available = torch.cuda.is_available()
print('CUDA available:', available)
if available:
    print('GPU:', torch.cuda.get_device_name(0))
";
