//! Approve command
//!
//! Usage: approvex approve <FILE>

use approvex_core::ExError;
use approvex_store::ApprovalFileStore;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApproveArgs {
    /// Not-approved file to promote
    pub file: PathBuf,

    /// Approval file extension
    #[arg(long, default_value = "json")]
    pub extension: String,
}

/// Execute approve command
pub fn execute(args: ApproveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ApprovalFileStore::new(args.extension);

    let approved = store.approve(&args.file).map_err(|e| {
        let ex: ExError = e.clone().into();
        format!("{} [{}]", e, ex.code())
    })?;

    println!("✓ Approved {}", approved.display());
    Ok(())
}
