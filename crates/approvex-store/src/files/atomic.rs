//! Atomic write primitives
//!
//! Uses temp→rename so a reader never sees a partially written file.

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Atomically write bytes to a file, creating parent directories.
///
/// The temp file lives next to the target and carries a random suffix, so
/// two writers racing on the same target do not clobber each other's temp
/// file; the last rename wins.
///
/// # Errors
///
/// Returns `ApprovalError::Io` when a directory, the temp file or the rename
/// fails. The temp file is removed on a failed rename.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_approval_dir", e))?;
    }

    let temp_path = temp_path_for(target_path);

    fs::write(&temp_path, content).map_err(|e| io_error("write_approval_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_approval_temp", e));
    }

    Ok(())
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("abc123-not-approved.json");

        atomic_write(&target, b"{}").unwrap();

        let content = fs::read(&target).unwrap();
        assert_eq!(content, b"{}");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("201a6b").join("62cdb7-not-approved.json");

        atomic_write(&target, b"nested").unwrap();

        let content = fs::read(&target).unwrap();
        assert_eq!(content, b"nested");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("test.json");

        atomic_write(&target, b"clean").unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|s| s.ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count();

        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let target = Path::new("/x/y-not-approved.json");
        assert_ne!(temp_path_for(target), temp_path_for(target));
        assert_eq!(temp_path_for(target).parent(), Some(Path::new("/x")));
    }
}
