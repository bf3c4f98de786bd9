//! CLI option definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// ur5e-pilot - interactive menu for the UR5e pi0 fine-tuning pipeline
#[derive(Parser, Debug)]
#[command(name = "ur5e-pilot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args() {
        let cli = Cli::try_parse_from(["ur5e-pilot"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_config_and_verbose() {
        let cli = Cli::try_parse_from(["ur5e-pilot", "-c", "pilot.yml", "--verbose"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("pilot.yml")));
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_rejects_subcommands() {
        assert!(Cli::try_parse_from(["ur5e-pilot", "train"]).is_err());
    }
}
