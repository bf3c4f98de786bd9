//! Command dispatcher - the interactive menu loop.
//!
//! Each iteration renders the menu, reads one line, and runs the matching
//! handler. Handlers that launch pipeline scripts first require the runner
//! program on PATH; a missing runner ends the process with status 1.
//!
//! A failed child is reported and control returns to the menu, unless
//! `dispatcher.halt-on-failure` is set, in which case the dispatcher exits
//! with the child's status.

use crate::checkpoint::{default_checkpoint_pattern, resolve_checkpoint_dir};
use crate::config::PilotConfig;
use crate::error::{PilotError, Result};
use crate::invocation::{InvocationSpec, PipelineCommands};
use crate::menu::{MenuChoice, render_menu};
use crate::naming::{check_exp_name, generate_exp_name_now};
use crate::runner::ProcessRunner;
use crate::tools::{ToolLocator, require_tool};
use colored::*;
use std::io::{BufRead, Write};

/// Title printed above the menu.
pub const MENU_TITLE: &str = "UR5e pi0 Fine-tuning Pipeline";

/// Exit code when a required tool is missing.
pub const EXIT_TOOL_NOT_FOUND: i32 = 1;

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit(i32),
}

/// Training backend selected from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Jax,
    Pytorch,
}

impl Backend {
    fn name(self) -> &'static str {
        match self {
            Backend::Jax => "JAX",
            Backend::Pytorch => "PyTorch",
        }
    }
}

/// Interactive dispatcher over a process runner and a tool locator.
pub struct Dispatcher<R, L> {
    config: PilotConfig,
    runner: R,
    locator: L,
}

impl<R: ProcessRunner, L: ToolLocator> Dispatcher<R, L> {
    pub fn new(config: PilotConfig, runner: R, locator: L) -> Self {
        Self { config, runner, locator }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the menu loop until Exit, end of input, or a fatal error.
    ///
    /// Returns the process exit code. `Err` is reserved for console I/O
    /// failures.
    pub fn run<I, O, E>(&mut self, input: &mut I, out: &mut O, err: &mut E) -> Result<i32>
    where
        I: BufRead,
        O: Write,
        E: Write,
    {
        log::info!("Dispatcher started");
        loop {
            write!(out, "{}", render_menu(MENU_TITLE))?;
            write!(out, "Select an option [1-6]: ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                end_of_input(out)?;
                return Ok(0);
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    log::warn!("{}", e);
                    writeln!(out, "{}", format!("Invalid choice '{}'. Please select 1-6.", line).red())?;
                    continue;
                }
            };

            log::info!("Selected: {}", choice);
            match self.dispatch(choice, input, out, err)? {
                Flow::Continue => {}
                Flow::Exit(code) => {
                    log::info!("Dispatcher exiting with {}", code);
                    return Ok(code);
                }
            }
        }
    }

    fn dispatch<I, O, E>(&mut self, choice: MenuChoice, input: &mut I, out: &mut O, err: &mut E) -> Result<Flow>
    where
        I: BufRead,
        O: Write,
        E: Write,
    {
        if choice.needs_runner() {
            let program = self.config.runner.program.clone();
            if let Err(e) = require_tool(&self.locator, &program) {
                writeln!(err, "{}", format!("Error: {}", e).red())?;
                writeln!(err, "Run ur5e-pilot inside the environment where '{}' is installed.", program)?;
                return Ok(Flow::Exit(EXIT_TOOL_NOT_FOUND));
            }
        }

        match choice {
            MenuChoice::VerifyEnvironment => self.verify_environment(out, err),
            MenuChoice::ComputeNormStats => {
                writeln!(out, "{}", "Computing normalization statistics...".cyan())?;
                let spec = PipelineCommands::new(&self.config).compute_norm_stats();
                self.launch(&spec, out, err)
            }
            MenuChoice::TrainJax => self.train(Backend::Jax, input, out, err),
            MenuChoice::TrainPytorch => self.train(Backend::Pytorch, input, out, err),
            MenuChoice::RunInference => self.serve(input, out, err),
            MenuChoice::Exit => {
                writeln!(out, "{}", "Goodbye!".green())?;
                Ok(Flow::Exit(0))
            }
        }
    }

    fn verify_environment<O: Write, E: Write>(&mut self, out: &mut O, err: &mut E) -> Result<Flow> {
        writeln!(out, "{}", "Verifying environment...".cyan())?;
        writeln!(out, "ur5e-pilot {}", env!("CARGO_PKG_VERSION"))?;

        let commands = PipelineCommands::new(&self.config);
        for (what, spec) in [("Python version check", commands.python_version()), ("GPU check", commands.gpu_probe())] {
            match self.runner.execute(&spec) {
                Ok(status) if status.is_success() => {}
                Ok(status) => {
                    log::warn!("{} exited with {}", what, status);
                    writeln!(err, "{}", format!("Warning: {} exited with {}", what, status).yellow())?;
                }
                Err(e) => {
                    log::warn!("{} could not run: {}", what, e);
                    writeln!(err, "{}", format!("Warning: {} could not run: {}", what, e).yellow())?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn train<I, O, E>(&mut self, backend: Backend, input: &mut I, out: &mut O, err: &mut E) -> Result<Flow>
    where
        I: BufRead,
        O: Write,
        E: Write,
    {
        let Some(exp_name) = self.prompt_exp_name(input, out)? else {
            return end_of_input(out);
        };
        writeln!(
            out,
            "{} {} training with experiment name: {}",
            "Starting".green(),
            backend.name(),
            exp_name.bold()
        )?;

        let commands = PipelineCommands::new(&self.config);
        let spec = match backend {
            Backend::Jax => commands.train_jax(&exp_name),
            Backend::Pytorch => commands.train_pytorch(&exp_name),
        };
        self.launch(&spec, out, err)
    }

    fn serve<I, O, E>(&mut self, input: &mut I, out: &mut O, err: &mut E) -> Result<Flow>
    where
        I: BufRead,
        O: Write,
        E: Write,
    {
        let pipeline = &self.config.pipeline;
        let default_dir = default_checkpoint_pattern(&pipeline.checkpoints_dir, &pipeline.config_name, &pipeline.exp_prefix);

        write!(out, "Checkpoint directory [{}]: ", default_dir)?;
        out.flush()?;
        let Some(typed) = read_line(input)? else {
            return end_of_input(out);
        };
        let requested = if typed.is_empty() { default_dir } else { typed };
        let checkpoint_dir = resolve_checkpoint_dir(&requested, self.config.inference.expand_latest);

        writeln!(out, "{} inference server with checkpoint: {}", "Starting".green(), checkpoint_dir.bold())?;
        let spec = PipelineCommands::new(&self.config).serve_policy(&checkpoint_dir);
        self.launch(&spec, out, err)
    }

    /// Prompt until a usable experiment name is entered; blank generates one.
    ///
    /// Returns `None` at end of input.
    fn prompt_exp_name<I: BufRead, O: Write>(&self, input: &mut I, out: &mut O) -> Result<Option<String>> {
        loop {
            write!(out, "Experiment name (blank for auto-generated): ")?;
            out.flush()?;

            let Some(typed) = read_line(input)? else {
                return Ok(None);
            };
            if typed.is_empty() {
                let generated = generate_exp_name_now(&self.config.pipeline.exp_prefix);
                log::info!("Generated experiment name {}", generated);
                return Ok(Some(generated));
            }
            match check_exp_name(&typed) {
                Ok(()) => return Ok(Some(typed)),
                Err(reason) => writeln!(out, "{}", format!("Invalid experiment name: {}", reason).red())?,
            }
        }
    }

    fn launch<O: Write, E: Write>(&mut self, spec: &InvocationSpec, out: &mut O, err: &mut E) -> Result<Flow> {
        log::info!("Running: {}", spec);
        writeln!(out, "$ {}", spec)?;

        let (failure, code) = match self.runner.execute(spec) {
            Ok(status) if status.is_success() => {
                writeln!(out, "{}", format!("{} completed successfully", spec.program).green())?;
                return Ok(Flow::Continue);
            }
            Ok(status) => (
                PilotError::SubprocessFailed {
                    program: spec.program.clone(),
                    status: status.to_string(),
                },
                status.code.unwrap_or(1),
            ),
            Err(e) => (e, 1),
        };

        log::error!("{}", failure);
        writeln!(err, "{}", format!("Error: {}", failure).red())?;
        if self.config.dispatcher.halt_on_failure {
            return Ok(Flow::Exit(code));
        }
        Ok(Flow::Continue)
    }
}

/// End of input behaves like Exit; nothing is launched.
fn end_of_input<O: Write>(out: &mut O) -> Result<Flow> {
    writeln!(out)?;
    log::info!("End of input, exiting");
    writeln!(out, "{}", "Goodbye!".green())?;
    Ok(Flow::Exit(0))
}

/// Read one trimmed line, `None` at end of input.
fn read_line<I: BufRead>(input: &mut I) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
