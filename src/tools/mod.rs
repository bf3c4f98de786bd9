//! Tool dependency checks - is an external program resolvable on PATH.

mod locator;

pub use locator::{PathLocator, StaticLocator, ToolLocator, require_tool};
