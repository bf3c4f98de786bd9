//! ur5e-pilot - interactive menu for the UR5e pi0 fine-tuning pipeline
//!
//! The menu verifies the GPU environment, computes normalization statistics,
//! launches JAX or PyTorch training, and starts the policy server. Every
//! stage runs as an external program behind the [`runner::ProcessRunner`]
//! boundary.

pub mod checkpoint;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod invocation;
pub mod menu;
pub mod naming;
pub mod runner;
pub mod tools;

pub use dispatcher::Dispatcher;
pub use error::{PilotError, Result};
