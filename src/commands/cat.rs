use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::loader::load_path;
use crate::tab::serializer::{format_file, format_system};

/// Write the canonical text of a particle file, or of one of its systems,
/// to stdout
pub fn cat_file(path: &Path, system: Option<&str>) -> Result<()> {
    let systems = load_path(path).with_context(|| format!("Failed to load file: {path:?}"))?;

    let text = match system {
        Some(name) => {
            let spec = systems
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("No system named {name:?} in {path:?}"))?;
            format_system(spec)
        }
        None => format_file(&systems),
    };

    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}
