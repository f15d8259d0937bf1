//! Store settings
//!
//! Where approval files live and which extension they carry. The base
//! directory defaults to `<crate manifest dir>/approvals` and can be moved
//! for a whole test run with the `APPROVEX_DIR` environment variable.

use std::path::{Path, PathBuf};

use crate::naming::DEFAULT_EXTENSION;

/// Environment variable overriding the approval base directory.
pub const BASE_DIR_ENV: &str = "APPROVEX_DIR";

/// Directory created under the manifest dir when no override is set.
pub const DEFAULT_DIR_NAME: &str = "approvals";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub base_dir: PathBuf,
    pub extension: String,
}

impl StoreSettings {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Settings for a crate, honouring `APPROVEX_DIR`.
    pub fn from_env(manifest_dir: impl AsRef<Path>) -> Self {
        Self::new(base_dir_from(
            std::env::var_os(BASE_DIR_ENV).map(PathBuf::from),
            manifest_dir.as_ref(),
        ))
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

fn base_dir_from(env_override: Option<PathBuf>, manifest_dir: &Path) -> PathBuf {
    match env_override {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => manifest_dir.join(DEFAULT_DIR_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_dir_under_manifest() {
        assert_eq!(
            base_dir_from(None, Path::new("/work/my-crate")),
            PathBuf::from("/work/my-crate/approvals")
        );
    }

    #[test]
    fn test_env_override_wins_unless_empty() {
        assert_eq!(
            base_dir_from(Some(PathBuf::from("/tmp/snapshots")), Path::new("/work")),
            PathBuf::from("/tmp/snapshots")
        );
        assert_eq!(
            base_dir_from(Some(PathBuf::new()), Path::new("/work")),
            PathBuf::from("/work/approvals")
        );
    }

    #[test]
    fn test_with_extension() {
        let settings = StoreSettings::new("/a").with_extension("txt");
        assert_eq!(settings.extension, "txt");
        assert_eq!(StoreSettings::new("/a").extension, DEFAULT_EXTENSION);
    }
}
