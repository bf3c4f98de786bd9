//! SystemRunner spawns real child processes.

use super::{ProcessRunner, RunStatus};
use crate::error::Result;
use crate::invocation::InvocationSpec;
use std::process::{Command, Stdio};

/// Spawns children with inherited stdio and blocks until they exit.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn execute(&mut self, spec: &InvocationSpec) -> Result<RunStatus> {
        log::info!("Spawning: {}", spec);
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        let status = RunStatus { code: status.code() };
        log::info!("{} finished with {}", spec.program, status);
        Ok(status)
    }
}
