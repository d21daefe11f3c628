use crate::error::{PatchError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PatchError::io(parent, e))?;
        }
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn read_file_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| PatchError::io(path, e))
}

/// Plain overwrite, creating parent directories as needed.
pub fn write_file_content(path: &Path, content: &str) -> Result<()> {
    ensure_directory_exists(path)?;
    fs::write(path, content).map_err(|e| PatchError::io(path, e))
}

/// Writes `content` to a temp file beside the real target and renames it into
/// place, so the target is either the old text or the new text, never a mix.
/// Symlinks are followed: the file they point to is replaced, the link stays.
pub fn replace_file_atomically(path: &Path, content: &str) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(PatchError::io(path, e)),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PatchError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PatchError::io(tmp.path(), e))?;

    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| PatchError::io(&target, e))?;
    }

    tmp.persist(&target)
        .map_err(|e| PatchError::io(&target, e.error))?;
    Ok(())
}
