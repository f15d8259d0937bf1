#![allow(clippy::unwrap_used, clippy::expect_used)]

use approvex_core::ApprovalError;
use approvex_store::{ApprovalFileStore, FileNameOverrides, TestContext};
use std::fs;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn candidate(store: &ApprovalFileStore, base: &std::path::Path, class: &str, method: &str) -> std::path::PathBuf {
    let context = TestContext::new(class, method, base);
    let reference = store.locate(&context, &FileNameOverrides::default());
    store.write_not_approved(&reference, "{}").unwrap();
    reference.not_approved_path()
}

// ---------------------------------------------------------------------------
// Pending
// ---------------------------------------------------------------------------

#[test]
fn test_pending_lists_candidates_recursively() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();

    let first = candidate(&store, dir.path(), "Foo", "bar");
    let second = candidate(&store, dir.path(), "my_crate::tests", "scenario_a");
    fs::write(dir.path().join("notes.txt"), "x").unwrap();
    fs::write(dir.path().join("abc-approved.json"), "{}").unwrap();

    let pending = store.pending(dir.path()).unwrap();

    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(pending, expected);
}

#[test]
fn test_pending_on_missing_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();
    assert!(store.pending(&dir.path().join("nope")).unwrap().is_empty());
}

#[test]
fn test_pending_respects_extension() {
    let dir = TempDir::new().unwrap();
    candidate(&ApprovalFileStore::default(), dir.path(), "Foo", "bar");

    let txt_store = ApprovalFileStore::new("txt");
    assert!(txt_store.pending(dir.path()).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Approve
// ---------------------------------------------------------------------------

#[test]
fn test_approve_renames_candidate() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();
    let context = TestContext::new("Foo", "bar", dir.path());
    let reference = store.locate(&context, &FileNameOverrides::default());
    store.write_not_approved(&reference, "{\"a\":1}").unwrap();

    let approved = store.approve(&reference.not_approved_path()).unwrap();

    assert_eq!(approved, reference.approved_path());
    assert!(store.exists(&reference));
    assert!(!reference.not_approved_path().exists());
    assert_eq!(store.read_approved(&reference).unwrap(), "{\"a\":1}");
}

#[test]
fn test_approve_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();
    let context = TestContext::new("Foo", "bar", dir.path());
    let reference = store.locate(&context, &FileNameOverrides::default());
    store.write_not_approved(&reference, "new").unwrap();
    fs::write(reference.approved_path(), "old").unwrap();

    let err = store.approve(&reference.not_approved_path()).unwrap_err();

    assert!(matches!(err, ApprovalError::ApprovedFileExists { .. }));
    assert_eq!(fs::read_to_string(reference.approved_path()).unwrap(), "old");
    assert!(reference.not_approved_path().exists());
}

#[test]
fn test_approve_rejects_bad_names_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();

    let err = store.approve(&dir.path().join("notes.txt")).unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidApprovalFileName { .. }));

    let err = store
        .approve(&dir.path().join("abc123-not-approved.json"))
        .unwrap_err();
    assert!(matches!(err, ApprovalError::NotApprovedFileMissing { .. }));
}

#[test]
fn test_unwritable_candidate_is_environment_error() {
    let dir = TempDir::new().unwrap();
    let store = ApprovalFileStore::default();
    // A regular file where the hashed directory should go.
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, "").unwrap();
    let overrides = FileNameOverrides {
        path_name: Some(blocker.join("sub").display().to_string()),
        ..Default::default()
    };
    let reference = store.locate(&TestContext::new("Foo", "bar", dir.path()), &overrides);

    let err = store.write_not_approved(&reference, "{}").unwrap_err();

    assert!(matches!(err, ApprovalError::NotApprovedFileUnwritable { .. }));
}
