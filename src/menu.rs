//! Menu choices and the fixed menu text.

use crate::error::PilotError;
use std::fmt;
use std::str::FromStr;

/// One entry of the pipeline menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    VerifyEnvironment,
    ComputeNormStats,
    TrainJax,
    TrainPytorch,
    RunInference,
    Exit,
}

impl MenuChoice {
    /// All choices in menu order.
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::VerifyEnvironment,
        MenuChoice::ComputeNormStats,
        MenuChoice::TrainJax,
        MenuChoice::TrainPytorch,
        MenuChoice::RunInference,
        MenuChoice::Exit,
    ];

    /// Number the user types to select this choice.
    pub fn key(self) -> u8 {
        match self {
            MenuChoice::VerifyEnvironment => 1,
            MenuChoice::ComputeNormStats => 2,
            MenuChoice::TrainJax => 3,
            MenuChoice::TrainPytorch => 4,
            MenuChoice::RunInference => 5,
            MenuChoice::Exit => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::VerifyEnvironment => "Verify environment (GPU check)",
            MenuChoice::ComputeNormStats => "Compute normalization statistics",
            MenuChoice::TrainJax => "Train model (JAX)",
            MenuChoice::TrainPytorch => "Train model (PyTorch)",
            MenuChoice::RunInference => "Run inference server",
            MenuChoice::Exit => "Exit",
        }
    }

    /// Whether the handler shells out through the pipeline runner.
    pub fn needs_runner(self) -> bool {
        matches!(
            self,
            MenuChoice::ComputeNormStats | MenuChoice::TrainJax | MenuChoice::TrainPytorch | MenuChoice::RunInference
        )
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.key(), self.label())
    }
}

impl FromStr for MenuChoice {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MenuChoice::ALL
            .into_iter()
            .find(|choice| trimmed == choice.key().to_string())
            .ok_or_else(|| PilotError::InvalidChoice(trimmed.to_string()))
    }
}

/// Render the menu shown before every prompt.
pub fn render_menu(title: &str) -> String {
    let rule = "=".repeat(48);
    let mut out = format!("\n{}\n  {}\n{}\n", rule, title, rule);
    for choice in MenuChoice::ALL {
        out.push_str(&format!("  {}\n", choice));
    }
    out.push_str(&format!("{}\n", rule));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_key() {
        for choice in MenuChoice::ALL {
            let parsed: MenuChoice = choice.key().to_string().parse().unwrap();
            assert_eq!(parsed, choice);
        }
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        assert_eq!(" 3 \n".parse::<MenuChoice>().unwrap(), MenuChoice::TrainJax);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for input in ["", "0", "7", "9", "03", "1 2", "exit", "-1"] {
            let result = input.parse::<MenuChoice>();
            assert!(matches!(result, Err(PilotError::InvalidChoice(_))), "input {:?}", input);
        }
    }

    #[test]
    fn test_needs_runner() {
        assert!(!MenuChoice::VerifyEnvironment.needs_runner());
        assert!(MenuChoice::ComputeNormStats.needs_runner());
        assert!(MenuChoice::TrainJax.needs_runner());
        assert!(MenuChoice::TrainPytorch.needs_runner());
        assert!(MenuChoice::RunInference.needs_runner());
        assert!(!MenuChoice::Exit.needs_runner());
    }

    #[test]
    fn test_render_menu_lists_all_choices() {
        let menu = render_menu("UR5e pipeline");
        assert!(menu.contains("UR5e pipeline"));
        assert!(menu.contains("1) Verify environment"));
        assert!(menu.contains("6) Exit"));
        let positions: Vec<usize> = MenuChoice::ALL
            .iter()
            .map(|c| menu.find(&c.to_string()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
