use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::loader::load_path;
use crate::tab::serializer::format_emitter;

/// Write one emitter as a standalone fragment to stdout: the payload the
/// editor puts on the clipboard for copy/duplicate
pub fn print_fragment(path: &Path, system: &str, emitter: &str) -> Result<()> {
    let systems = load_path(path).with_context(|| format!("Failed to load file: {path:?}"))?;

    let spec = systems
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(system))
        .ok_or_else(|| anyhow!("No system named {system:?} in {path:?}"))?;
    let emitter = spec
        .emitters
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(emitter))
        .ok_or_else(|| anyhow!("No emitter named {emitter:?} in system {:?}", spec.name))?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(format_emitter(emitter, Some(&spec.name)).as_bytes())
        .context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}
