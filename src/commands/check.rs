use anyhow::{Result, ensure};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::matched_paths;
use crate::{VERBOSE, loader::load_path};

/// Parse every matched file, reporting per-file outcomes on stderr.
/// Fails if any file fails to parse.
pub fn check_files(pattern: &str) -> Result<()> {
    let results: Vec<_> = matched_paths(pattern)?
        .into_par_iter()
        .map(|path| {
            let outcome = load_path(&path);
            (path, outcome)
        })
        .collect();

    let mut failures = 0;
    for (path, outcome) in results {
        match outcome {
            Ok(systems) => eprintln!("{}: ok ({} systems)", path.display(), systems.len()),
            Err(e) => {
                failures += 1;
                let message = if *VERBOSE.get().unwrap_or(&false) {
                    format!("{e:?}")
                } else {
                    format!("{e}")
                };
                eprintln!("{}: {}", path.display(), message);
            }
        }
    }

    ensure!(failures == 0, "{failures} file(s) failed to parse");
    Ok(())
}
