//! Approval file naming
//!
//! The directory is the first [`NUM_OF_HASH_CHARS`] hex characters of the
//! SHA-1 of the test class name, and the base file name the same prefix of
//! the SHA-1 of the test method name. The hashes keep paths short and free
//! of characters that are unsafe on some filesystems. Six characters is a
//! deliberate collision trade-off, not a security property.
//!
//! Explicit overrides replace the hashes verbatim. A unique id is appended
//! to the base name as `-<id>`.

use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// Hex characters kept from each SHA-1 digest.
pub const NUM_OF_HASH_CHARS: usize = 6;

/// Joins the base name with the unique id and the approval suffixes.
pub const SEPARATOR: &str = "-";

pub const APPROVED_SUFFIX: &str = "approved";
pub const NOT_APPROVED_SUFFIX: &str = "not-approved";
pub const DEFAULT_EXTENSION: &str = "json";

/// First [`NUM_OF_HASH_CHARS`] lowercase hex characters of SHA-1(`name`).
pub fn hash_name(name: &str) -> String {
    let digest = Sha1::digest(name.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(NUM_OF_HASH_CHARS);
    encoded
}

/// Identity of the calling test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    pub class_name: String,
    pub method_name: String,
    /// Directory hashed class directories are created under.
    pub base_dir: PathBuf,
}

impl TestContext {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            base_dir: base_dir.into(),
        }
    }
}

/// Caller overrides for the derived names. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNameOverrides {
    pub path_name: Option<String>,
    pub file_name: Option<String>,
    pub unique_id: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// One resolved approval file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalFileReference {
    path_name: PathBuf,
    file_name: String,
    hashed_dir: Option<String>,
    extension: String,
}

impl ApprovalFileReference {
    /// Directory holding the approval files.
    pub fn path_name(&self) -> &Path {
        &self.path_name
    }

    /// Base name, including any unique-id suffix.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Directory joined with the base name.
    pub fn file_name_with_path(&self) -> PathBuf {
        self.path_name.join(&self.file_name)
    }

    /// Hashed class directory name, when the directory was not overridden.
    pub fn hashed_dir(&self) -> Option<&str> {
        self.hashed_dir.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn approved_file_name(&self) -> String {
        self.suffixed(APPROVED_SUFFIX)
    }

    pub fn not_approved_file_name(&self) -> String {
        self.suffixed(NOT_APPROVED_SUFFIX)
    }

    pub fn approved_path(&self) -> PathBuf {
        self.path_name.join(self.approved_file_name())
    }

    pub fn not_approved_path(&self) -> PathBuf {
        self.path_name.join(self.not_approved_file_name())
    }

    /// Name used in user-facing messages: `<hash>/<file>` under a hashed
    /// directory, the full path otherwise.
    pub fn display_name(&self, file_name: &str) -> String {
        match &self.hashed_dir {
            Some(dir) => format!("{}/{}", dir, file_name),
            None => self.path_name.join(file_name).display().to_string(),
        }
    }

    fn suffixed(&self, suffix: &str) -> String {
        format!(
            "{}{}{}.{}",
            self.file_name, SEPARATOR, suffix, self.extension
        )
    }
}

/// Resolve the approval file for a test.
///
/// Deterministic: the same context and overrides always give the same
/// reference.
pub fn locate(
    context: &TestContext,
    overrides: &FileNameOverrides,
    extension: &str,
) -> ApprovalFileReference {
    let mut file_name = match non_blank(&overrides.file_name) {
        Some(name) => name.to_string(),
        None => hash_name(&context.method_name),
    };
    if let Some(unique_id) = &overrides.unique_id {
        file_name.push_str(SEPARATOR);
        file_name.push_str(unique_id);
    }

    let (path_name, hashed_dir) = match non_blank(&overrides.path_name) {
        Some(path) => (PathBuf::from(path), None),
        None => {
            let hashed = hash_name(&context.class_name);
            (context.base_dir.join(&hashed), Some(hashed))
        }
    };

    ApprovalFileReference {
        path_name,
        file_name,
        hashed_dir,
        extension: extension.trim_start_matches('.').to_string(),
    }
}

/// Split a candidate file name into its base name, if it follows the
/// not-approved convention for `extension`.
pub fn not_approved_base<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let suffix = format!("{}{}.{}", SEPARATOR, NOT_APPROVED_SUFFIX, extension);
    file_name
        .strip_suffix(suffix.as_str())
        .filter(|base| !base.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TestContext {
        TestContext::new("Foo", "bar", "/approvals")
    }

    #[test]
    fn test_hash_name_is_sha1_prefix() {
        assert_eq!(hash_name("Foo"), "201a6b");
        assert_eq!(hash_name("bar"), "62cdb7");
        assert_eq!(hash_name("shouldMatch"), "ca3136");
    }

    #[test]
    fn test_locate_hashes_class_and_method() {
        let reference = locate(&context(), &FileNameOverrides::default(), DEFAULT_EXTENSION);
        assert_eq!(reference.path_name(), Path::new("/approvals/201a6b"));
        assert_eq!(reference.file_name(), "62cdb7");
        assert_eq!(reference.hashed_dir(), Some("201a6b"));
        assert_eq!(reference.approved_file_name(), "62cdb7-approved.json");
        assert_eq!(reference.not_approved_file_name(), "62cdb7-not-approved.json");
        assert_eq!(
            reference.approved_path(),
            PathBuf::from("/approvals/201a6b/62cdb7-approved.json")
        );
        assert_eq!(
            reference.display_name(&reference.approved_file_name()),
            "201a6b/62cdb7-approved.json"
        );
    }

    #[test]
    fn test_unique_id_appended_with_separator() {
        let overrides = FileNameOverrides {
            unique_id: Some("case1".to_string()),
            ..Default::default()
        };
        let reference = locate(&context(), &overrides, DEFAULT_EXTENSION);
        assert_eq!(reference.file_name(), "62cdb7-case1");
        assert_eq!(reference.approved_file_name(), "62cdb7-case1-approved.json");
    }

    #[test]
    fn test_overrides_used_verbatim() {
        let overrides = FileNameOverrides {
            path_name: Some("/custom/dir".to_string()),
            file_name: Some("orderSnapshot".to_string()),
            unique_id: None,
        };
        let reference = locate(&context(), &overrides, "txt");
        assert_eq!(reference.path_name(), Path::new("/custom/dir"));
        assert_eq!(reference.hashed_dir(), None);
        assert_eq!(reference.approved_file_name(), "orderSnapshot-approved.txt");
        assert_eq!(
            reference.display_name("orderSnapshot-approved.txt"),
            PathBuf::from("/custom/dir/orderSnapshot-approved.txt")
                .display()
                .to_string()
        );
    }

    #[test]
    fn test_blank_overrides_ignored() {
        let overrides = FileNameOverrides {
            path_name: Some("   ".to_string()),
            file_name: Some(String::new()),
            unique_id: None,
        };
        let reference = locate(&context(), &overrides, ".json");
        assert_eq!(reference.file_name(), "62cdb7");
        assert_eq!(reference.hashed_dir(), Some("201a6b"));
        assert_eq!(reference.extension(), "json");
    }

    #[test]
    fn test_not_approved_base() {
        assert_eq!(not_approved_base("62cdb7-not-approved.json", "json"), Some("62cdb7"));
        assert_eq!(not_approved_base("62cdb7-approved.json", "json"), None);
        assert_eq!(not_approved_base("-not-approved.json", "json"), None);
        assert_eq!(not_approved_base("62cdb7-not-approved.txt", "json"), None);
    }
}
