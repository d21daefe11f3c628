use crate::error::{PatchError, Result};
use crate::operations::file_operations::file_exists;
use log::{info, warn};
use std::fs;
use std::path::Path;

pub fn run_preflight_checks(path: &Path, dry_run: bool) -> Result<()> {
    info!("--- Running Preflight Checks ---");

    if !file_exists(path) {
        return Err(PatchError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if !dry_run {
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.permissions().readonly() {
                warn!("  - {:?} is read-only; the write will likely fail", path);
            }
        }
    }

    info!("  - {:?} OK", path);
    Ok(())
}
