//! Tool locators resolve program names against the search path.

use crate::error::{PilotError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a program name to an executable path.
pub trait ToolLocator {
    /// Return the resolved path, or `None` if the program is not available.
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Looks programs up on the process PATH.
#[derive(Debug, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }
}

/// Fixed set of known tools, for tests and dry runs.
#[derive(Debug, Default)]
pub struct StaticLocator {
    tools: HashMap<String, PathBuf>,
}

impl StaticLocator {
    /// A locator that finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a tool under `/usr/bin/<name>`.
    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools.insert(name.to_string(), PathBuf::from("/usr/bin").join(name));
        self
    }
}

impl ToolLocator for StaticLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools.get(tool).cloned()
    }
}

/// Fail with [`PilotError::ToolNotFound`] unless `tool` resolves.
pub fn require_tool(locator: &dyn ToolLocator, tool: &str) -> Result<PathBuf> {
    match locator.locate(tool) {
        Some(path) => {
            log::debug!("Resolved {} to {}", tool, path.display());
            Ok(path)
        }
        None => {
            log::error!("Required tool {} not found on PATH", tool);
            Err(PilotError::ToolNotFound(tool.to_string()))
        }
    }
}
