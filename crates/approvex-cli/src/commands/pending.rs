//! Pending command
//!
//! Usage: approvex pending [--dir <DIR>]

use approvex_store::ApprovalFileStore;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PendingArgs {
    /// Approval base directory (default: $APPROVEX_DIR or ./approvals)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Approval file extension
    #[arg(long, default_value = "json")]
    pub extension: String,
}

/// Execute pending command
pub fn execute(args: PendingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let base_dir = super::base_dir(args.dir)?;
    let store = ApprovalFileStore::new(args.extension);

    let pending = store.pending(&base_dir)?;
    if pending.is_empty() {
        println!("No pending approvals under {}", base_dir.display());
        return Ok(());
    }

    for path in &pending {
        println!("{}", path.display());
    }
    Ok(())
}
