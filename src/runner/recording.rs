//! RecordingRunner captures invocations instead of spawning them.

use super::{ProcessRunner, RunStatus};
use crate::error::{PilotError, Result};
use crate::invocation::InvocationSpec;
use std::collections::VecDeque;
use std::io;

/// Scripted answer for one call.
#[derive(Debug, Clone, Copy)]
enum Scripted {
    Exited(RunStatus),
    SpawnFailed,
}

/// Test runner that records every invocation.
///
/// Answers queued with [`RecordingRunner::with_status`] and
/// [`RecordingRunner::with_spawn_failure`] are returned in order; once the
/// queue is empty every call succeeds.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Vec<InvocationSpec>,
    answers: VecDeque<Scripted>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the status returned by the next unanswered call.
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.answers.push_back(Scripted::Exited(status));
        self
    }

    /// Make the next unanswered call fail to spawn.
    pub fn with_spawn_failure(mut self) -> Self {
        self.answers.push_back(Scripted::SpawnFailed);
        self
    }

    /// Invocations seen so far, in order.
    pub fn calls(&self) -> &[InvocationSpec] {
        &self.calls
    }

    /// Invocations of a given program.
    pub fn calls_to(&self, program: &str) -> Vec<&InvocationSpec> {
        self.calls.iter().filter(|c| c.program == program).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn execute(&mut self, spec: &InvocationSpec) -> Result<RunStatus> {
        self.calls.push(spec.clone());
        match self.answers.pop_front() {
            Some(Scripted::Exited(status)) => Ok(status),
            Some(Scripted::SpawnFailed) => Err(PilotError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("cannot spawn {}", spec.program),
            ))),
            None => Ok(RunStatus::success()),
        }
    }
}
