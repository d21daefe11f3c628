use crate::config::PatchConfig;
use crate::error::{PatchError, Result};
use crate::operations::file_operations::{read_file_content, replace_file_atomically};
use crate::operations::preflight_checks::run_preflight_checks;
use crate::rules::{apply_rules, build_rules};
use crate::types::PatchReport;
use log::{debug, info, warn};
use std::path::Path;

/// Patches the build script at `path` in place.
///
/// Fails with [`PatchError::NotFound`] before reading anything when the target
/// is missing, and with [`PatchError::NoMatch`] without writing when no rule
/// matched. On success the file is replaced in a single rename.
pub fn patch_file(path: &Path, config: &PatchConfig, dry_run: bool) -> Result<PatchReport> {
    let rules = build_rules(config)?;
    run_preflight_checks(path, dry_run)?;

    info!("--- Applying patch to: {:?}", path);
    let content = read_file_content(path)?;
    info!("    Read {:?} successfully.", path);

    for rule in &rules {
        debug!("    rule {} matches /{}/", rule.name, rule.pattern());
    }
    let (new_content, outcomes) = apply_rules(&content, &rules);
    for (rule, outcome) in rules.iter().zip(&outcomes) {
        info!(
            "    Replaced {}: {} occurrence(s)",
            rule.description, outcome.count
        );
    }

    if outcomes.iter().all(|o| o.count == 0) {
        let excerpt = excerpt(&content, config.excerpt_chars);
        warn!("    [WARNING] No replacements made! The patterns may depend on exact spacing.");
        warn!("    First {} characters of {:?}:\n{}", config.excerpt_chars, path, excerpt);
        return Err(PatchError::NoMatch {
            path: path.to_path_buf(),
            excerpt,
        });
    }

    let written = if dry_run {
        info!("    [DRY RUN] Patch would be applied successfully.");
        false
    } else {
        replace_file_atomically(path, &new_content)?;
        info!("    [SUCCESS] Patch applied.");
        true
    };

    Ok(PatchReport {
        file_path: path.to_path_buf(),
        outcomes,
        written,
        dry_run,
    })
}

/// First `max_chars` characters of `content`, cut on a char boundary.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}
