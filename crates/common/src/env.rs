//! Environment/runtime helpers
//!
//! Sanity checks to ensure the profile data root is usable at startup.

use std::path::Path;
use tracing::{info, warn};

/// Ensure the data root exists and is a directory, creating it when missing.
pub fn ensure_data_root(data_root: &str) -> anyhow::Result<()> {
    let path = Path::new(data_root);
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{data_root} exists but is not a directory")),
        Err(_) => {
            warn!(%data_root, "profile data root not found; creating it");
            std::fs::create_dir_all(path)
                .map_err(|e| anyhow::anyhow!("cannot create {data_root}: {e}"))?;
            info!(%data_root, "profile data root created");
            Ok(())
        }
    }
}
