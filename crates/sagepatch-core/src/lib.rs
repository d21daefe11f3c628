pub mod config;
pub mod error;
pub mod operations;
pub mod rules;
pub mod types;

pub use config::{PatchConfig, DEFAULT_CAPABILITIES, DEFAULT_CONFIG_FILE};
pub use error::{PatchError, Result};
pub use operations::{patch_file, run_preflight_checks, write_file_content};
pub use rules::{apply_rules, build_rules, SubstitutionRule};
pub use types::{MatchMode, PatchReport, RuleOutcome};

/// Build script patched when no target is given.
pub const DEFAULT_TARGET: &str = "setup.py";
