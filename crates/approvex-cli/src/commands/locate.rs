//! Locate command
//!
//! Usage: approvex locate --class <CLASS> --method <METHOD> [--unique-id <ID>] [--dir <DIR>]

use approvex_store::{ApprovalFileStore, FileNameOverrides, TestContext};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Test class name (module path of the test)
    #[arg(long)]
    pub class: String,

    /// Test method name
    #[arg(long)]
    pub method: String,

    /// Unique id the test passed to its matcher
    #[arg(long)]
    pub unique_id: Option<String>,

    /// Approval base directory (default: $APPROVEX_DIR or ./approvals)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Approval file extension
    #[arg(long, default_value = "json")]
    pub extension: String,
}

/// Execute locate command
pub fn execute(args: LocateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let base_dir = super::base_dir(args.dir)?;
    let store = ApprovalFileStore::new(args.extension);
    let context = TestContext::new(args.class, args.method, base_dir);
    let overrides = FileNameOverrides {
        unique_id: args.unique_id,
        ..Default::default()
    };

    let reference = store.locate(&context, &overrides);
    let status = if store.exists(&reference) {
        "present"
    } else {
        "missing"
    };

    println!("approved: {} ({})", reference.approved_path().display(), status);
    println!("not-approved: {}", reference.not_approved_path().display());

    Ok(())
}
