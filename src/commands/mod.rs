pub mod cat;
pub mod check;
pub mod dump_json;
pub mod fragment;
pub mod list;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve a glob pattern to the matched paths
pub fn matched_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    glob::glob(pattern)
        .context("Invalid glob pattern")?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read glob entry")
}
