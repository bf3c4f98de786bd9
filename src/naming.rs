//! Experiment name generation and checks.
//!
//! Generated names embed a UTC timestamp so that checkpoint directories sort
//! chronologically.

use chrono::{DateTime, Utc};

/// Timestamp layout used in generated experiment names (14 digits).
pub const EXP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generate an experiment name for the given instant.
///
/// Format: `{prefix}_{YYYYmmddHHMMSS}`
/// Example: `ur5e_run_20261019143005`
pub fn generate_exp_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", prefix, now.format(EXP_TIMESTAMP_FORMAT))
}

/// Generate an experiment name for the current instant.
pub fn generate_exp_name_now(prefix: &str) -> String {
    generate_exp_name(prefix, Utc::now())
}

/// Check a user-supplied experiment name.
///
/// The name becomes a directory component under the checkpoints root, so
/// whitespace and path separators are refused.
pub fn check_exp_name(name: &str) -> Result<(), String> {
    if let Some(c) = name.chars().find(|c| c.is_whitespace() || *c == '/' || *c == '\\') {
        return Err(format!("experiment name must not contain {:?}", c));
    }
    if name == "." || name == ".." {
        return Err("experiment name must not be '.' or '..'".to_string());
    }
    Ok(())
}
