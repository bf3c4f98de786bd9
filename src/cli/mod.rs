//! CLI module for ur5e-pilot - command-line options.
//!
//! There are no subcommands; every pipeline action is chosen from the menu.

pub mod commands;

pub use commands::Cli;
