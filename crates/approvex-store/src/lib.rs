//! approvex store - approval files on disk
//!
//! Provides:
//! - Deterministic approval file naming (SHA-1 prefixes of test names)
//! - Approved / not-approved file reads and atomic candidate writes
//! - Listing of pending candidates and their promotion to approved files

pub mod errors;
pub mod files;
pub mod naming;
pub mod settings;

// Re-export key types
pub use errors::Result;
pub use files::fs_store::ApprovalFileStore;
pub use naming::{locate, ApprovalFileReference, FileNameOverrides, TestContext};
pub use settings::StoreSettings;
