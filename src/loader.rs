use std::path::Path;

use thiserror::Error;

use crate::tab::{error::FormatError, parser::parse_file_str, types::SystemSpec};

/// Failure to load a particle file. I/O failures surface distinctly from
/// format failures, both verbatim.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Read a `.tab` file and parse every system in it. The file handle is
/// scoped to the read; nothing is retained on any exit path.
pub fn load_path(path: &Path) -> Result<Vec<SystemSpec>, LoadError> {
    let contents = std::fs::read_to_string(path)?;

    Ok(parse_file_str(&contents)?)
}
