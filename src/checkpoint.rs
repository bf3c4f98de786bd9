//! Checkpoint directory defaults and latest-run resolution.

use std::path::{Path, PathBuf};

/// Default checkpoint pattern covering every generated run of a config.
///
/// Example: `./checkpoints/pi0_ur5e_finetune_lora/ur5e_run_*/`
pub fn default_checkpoint_pattern(checkpoints_dir: &str, config_name: &str, exp_prefix: &str) -> String {
    format!(
        "{}/{}/{}_*/",
        checkpoints_dir.trim_end_matches('/'),
        config_name,
        exp_prefix
    )
}

/// Whether the path contains glob metacharacters.
pub fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Resolve a checkpoint pattern to the most recent matching directory.
///
/// Run names embed sortable timestamps, so the lexicographically greatest
/// match is the latest. Returns `None` when the pattern is invalid or nothing
/// matches.
pub fn latest_match(pattern: &str) -> Option<PathBuf> {
    let paths = match glob::glob(pattern.trim_end_matches('/')) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("Invalid checkpoint pattern {}: {}", pattern, e);
            return None;
        }
    };

    paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("Skipping unreadable checkpoint entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_dir())
        .max()
}

/// Checkpoint dir to hand to the serving script.
///
/// Patterns are expanded to the latest run when `expand_latest` is set; a
/// pattern with no match is passed through untouched.
pub fn resolve_checkpoint_dir(input: &str, expand_latest: bool) -> String {
    if !expand_latest || !is_pattern(input) {
        return input.to_string();
    }
    match latest_match(input) {
        Some(path) => {
            log::info!("Resolved {} to {}", input, path.display());
            display_dir(&path)
        }
        None => {
            log::info!("No checkpoint matches {}, passing pattern through", input);
            input.to_string()
        }
    }
}

fn display_dir(path: &Path) -> String {
    format!("{}/", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_checkpoint_pattern() {
        assert_eq!(
            default_checkpoint_pattern("./checkpoints", "pi0_ur5e_finetune_lora", "ur5e_run"),
            "./checkpoints/pi0_ur5e_finetune_lora/ur5e_run_*/"
        );
        assert_eq!(
            default_checkpoint_pattern("/data/ckpt/", "cfg", "run"),
            "/data/ckpt/cfg/run_*/"
        );
    }

    #[test]
    fn test_is_pattern() {
        assert!(is_pattern("./checkpoints/x/run_*/"));
        assert!(is_pattern("run_?"));
        assert!(!is_pattern("./checkpoints/x/run_1/"));
    }

    #[test]
    fn test_latest_match_picks_greatest_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("cfg");
        fs::create_dir_all(root.join("ur5e_run_20260101000000")).unwrap();
        fs::create_dir_all(root.join("ur5e_run_20261019120000")).unwrap();
        fs::create_dir_all(root.join("ur5e_run_20260505000000")).unwrap();
        // Files are not checkpoint dirs
        fs::write(root.join("ur5e_run_99999999999999"), "").unwrap();

        let pattern = format!("{}/ur5e_run_*/", root.display());
        let latest = latest_match(&pattern).unwrap();
        assert_eq!(latest, root.join("ur5e_run_20261019120000"));
    }

    #[test]
    fn test_resolve_falls_back_to_pattern() {
        let dir = tempdir().unwrap();
        let pattern = format!("{}/cfg/ur5e_run_*/", dir.path().display());
        assert_eq!(resolve_checkpoint_dir(&pattern, true), pattern);
    }

    #[test]
    fn test_resolve_without_expansion() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cfg/ur5e_run_1")).unwrap();
        let pattern = format!("{}/cfg/ur5e_run_*/", dir.path().display());
        assert_eq!(resolve_checkpoint_dir(&pattern, false), pattern);
    }

    #[test]
    fn test_resolve_expands_to_latest() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cfg/ur5e_run_1")).unwrap();
        fs::create_dir_all(dir.path().join("cfg/ur5e_run_2")).unwrap();
        let pattern = format!("{}/cfg/ur5e_run_*/", dir.path().display());
        let resolved = resolve_checkpoint_dir(&pattern, true);
        assert_eq!(resolved, format!("{}/cfg/ur5e_run_2/", dir.path().display()));
    }

    #[test]
    fn test_resolve_plain_path_untouched() {
        assert_eq!(resolve_checkpoint_dir("./ckpt/run_7/", true), "./ckpt/run_7/");
    }
}
