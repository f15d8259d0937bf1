pub mod approve;
pub mod locate;
pub mod pending;

use approvex_store::StoreSettings;
use std::path::PathBuf;

/// Base directory from `--dir`, else `APPROVEX_DIR`, else `./approvals`.
pub fn base_dir(dir: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(StoreSettings::from_env(std::env::current_dir()?).base_dir),
    }
}
