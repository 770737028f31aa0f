use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use super::matched_paths;
use crate::loader::load_path;

/// List systems and their emitter counts for files matching a glob pattern
pub fn list_systems(pattern: &str) -> Result<()> {
    // Use a buffered writer since rules files can hold hundreds of systems
    let mut stdout = BufWriter::new(io::stdout().lock());

    for path in matched_paths(pattern)? {
        match load_path(&path) {
            Ok(systems) => {
                writeln!(stdout, "{}", path.display()).context("Failed to write to stdout")?;
                for system in &systems {
                    writeln!(
                        stdout,
                        "  {} ({} emitters)",
                        system.name,
                        system.emitters.len()
                    )
                    .context("Failed to write to stdout")?;
                }
            }
            Err(e) => eprintln!("Failed to load file: {:?}: {}", path, e),
        }
    }

    stdout.flush().context("Failed to flush stdout")
}
