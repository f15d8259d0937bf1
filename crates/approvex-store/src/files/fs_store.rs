//! Filesystem approval file store
//!
//! The approved file is ground truth: nothing here writes to an approved
//! path except an explicit [`ApprovalFileStore::approve`], which refuses to
//! overwrite.

use crate::errors::{
    approved_exists, approved_unreadable, invalid_file_name, io_error, not_approved_missing,
    not_approved_unwritable, Result,
};
use crate::files::atomic::atomic_write;
use crate::naming::{
    locate, not_approved_base, ApprovalFileReference, FileNameOverrides, TestContext,
    APPROVED_SUFFIX, DEFAULT_EXTENSION, SEPARATOR,
};
use crate::settings::StoreSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Approval file store for one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalFileStore {
    extension: String,
}

impl Default for ApprovalFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ApprovalFileStore {
    pub fn new(extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self::new(settings.extension.clone())
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Resolve the approval file for a test.
    pub fn locate(&self, context: &TestContext, overrides: &FileNameOverrides) -> ApprovalFileReference {
        locate(context, overrides, &self.extension)
    }

    /// Whether the approved file is present.
    pub fn exists(&self, reference: &ApprovalFileReference) -> bool {
        reference.approved_path().exists()
    }

    /// Read the approved file.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::ApprovedFileUnreadable` when the file cannot be
    /// read, which callers treat as a broken environment.
    pub fn read_approved(&self, reference: &ApprovalFileReference) -> Result<String> {
        let path = reference.approved_path();
        fs::read_to_string(&path).map_err(|e| approved_unreadable(&path, e))
    }

    /// Write the not-approved candidate unless one is already present.
    ///
    /// Returns the candidate's file name either way. An existing candidate is
    /// left untouched so a reviewer's in-progress edits survive a rerun.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::NotApprovedFileUnwritable` if the write fails.
    pub fn write_not_approved(&self, reference: &ApprovalFileReference, content: &str) -> Result<String> {
        let path = reference.not_approved_path();
        let file_name = reference.not_approved_file_name();

        if path.exists() {
            tracing::debug!(file = %path.display(), "not-approved file already present");
            return Ok(file_name);
        }

        atomic_write(&path, content.as_bytes()).map_err(|e| not_approved_unwritable(&path, e))?;
        tracing::debug!(file = %path.display(), bytes = content.len(), "not-approved file written");

        Ok(file_name)
    }

    /// All not-approved candidates under `dir`, recursively, sorted by path.
    ///
    /// A missing `dir` has no candidates.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::Io` if a directory cannot be listed.
    pub fn pending(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        if dir.is_dir() {
            self.collect_pending(dir, &mut found)?;
        }
        found.sort();
        Ok(found)
    }

    fn collect_pending(&self, dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| io_error("pending", e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_error("pending", e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| io_error("pending", e))?;
            if file_type.is_dir() {
                self.collect_pending(&path, found)?;
            } else if self.candidate_base(&path).is_some() {
                found.push(path);
            }
        }
        Ok(())
    }

    /// Promote a not-approved candidate to its approved name.
    ///
    /// # Errors
    ///
    /// - `InvalidApprovalFileName` if `not_approved` is not a candidate name
    /// - `NotApprovedFileMissing` if it does not exist
    /// - `ApprovedFileExists` if the approved file is already present
    /// - `Io` if the rename fails
    pub fn approve(&self, not_approved: &Path) -> Result<PathBuf> {
        let base = self
            .candidate_base(not_approved)
            .ok_or_else(|| invalid_file_name(not_approved))?;
        if !not_approved.is_file() {
            return Err(not_approved_missing(not_approved));
        }

        let approved = not_approved.with_file_name(format!(
            "{}{}{}.{}",
            base, SEPARATOR, APPROVED_SUFFIX, self.extension
        ));
        if approved.exists() {
            return Err(approved_exists(&approved));
        }

        fs::rename(not_approved, &approved).map_err(|e| io_error("approve", e))?;
        tracing::info!(file = %approved.display(), "approved");

        Ok(approved)
    }

    fn candidate_base(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        not_approved_base(file_name, &self.extension).map(str::to_string)
    }
}
