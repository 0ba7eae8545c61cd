//! CLI command implementations.

pub mod audit;
pub mod check;

use anyhow::{Context, Result};
use std::path::Path;

use acadsched_core::AcadschedConfig;

/// Load configuration from `path`, or the defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<AcadschedConfig> {
    if !path.exists() {
        return Ok(AcadschedConfig::default());
    }

    AcadschedConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
