//! Process runner module - the subprocess boundary.
//!
//! Every external program the menu launches goes through [`ProcessRunner`]:
//! - SystemRunner spawns real children with inherited stdio
//! - RecordingRunner records invocations for tests

mod recording;
mod system;

pub use recording::RecordingRunner;
pub use system::SystemRunner;

use crate::error::Result;
use crate::invocation::InvocationSpec;
use std::fmt;

/// Exit status of a finished child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when the child was killed by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn signaled() -> Self {
        Self { code: None }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "a signal"),
        }
    }
}

/// Runs one external program to completion.
pub trait ProcessRunner {
    /// Spawn the program described by `spec`, block until it exits, and
    /// return its status. Standard streams are shared with the caller.
    fn execute(&mut self, spec: &InvocationSpec) -> Result<RunStatus>;
}
