//! Error helpers for approvex-store
//!
//! Store operations report `ApprovalError`; these helpers keep the mapping
//! from `std::io::Error` in one place.

use approvex_core::errors::ApprovalError;
use std::path::Path;

/// Result type alias using ApprovalError
pub type Result<T> = std::result::Result<T, ApprovalError>;

/// Approved file exists but could not be read
pub fn approved_unreadable(path: &Path, err: std::io::Error) -> ApprovalError {
    ApprovalError::ApprovedFileUnreadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Candidate file could not be written
pub fn not_approved_unwritable(path: &Path, reason: impl ToString) -> ApprovalError {
    ApprovalError::NotApprovedFileUnwritable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Promotion target already present
pub fn approved_exists(path: &Path) -> ApprovalError {
    ApprovalError::ApprovedFileExists {
        path: path.display().to_string(),
    }
}

/// Promotion source missing
pub fn not_approved_missing(path: &Path) -> ApprovalError {
    ApprovalError::NotApprovedFileMissing {
        path: path.display().to_string(),
    }
}

/// File name outside the approval naming convention
pub fn invalid_file_name(path: &Path) -> ApprovalError {
    ApprovalError::InvalidApprovalFileName {
        path: path.display().to_string(),
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ApprovalError {
    ApprovalError::Io {
        op: operation.to_string(),
        reason: err.to_string(),
    }
}
