use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Free spacing around `=` and between `if`, `not` and the name.
    #[default]
    Tolerant,
    /// Exact literal text only.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub file_path: PathBuf,
    pub outcomes: Vec<RuleOutcome>,
    pub written: bool,
    pub dry_run: bool,
}

impl PatchReport {
    pub fn total_replacements(&self) -> usize {
        self.outcomes.iter().map(|o| o.count).sum()
    }

    pub fn count_for(&self, rule: &str) -> Option<usize> {
        self.outcomes
            .iter()
            .find(|o| o.rule == rule)
            .map(|o| o.count)
    }
}
