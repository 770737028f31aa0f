use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::matched_paths;
use crate::loader::load_path;

/// Convert matched `.tab` files into pretty-printed JSON files
pub fn dump_json(output_folder: &Path, pattern: &str) -> Result<()> {
    std::fs::create_dir_all(output_folder).context("Failed to create output folder")?;

    matched_paths(pattern)?
        .into_par_iter()
        .for_each(|path| match dump_file(&path, output_folder) {
            Ok(filename) => eprintln!("Dumped file: {}", filename),
            Err(e) => eprintln!("Failed to dump file: {:?}: {:?}", path, e),
        });

    Ok(())
}

fn dump_file(path: &Path, output_folder: &Path) -> Result<String> {
    let systems = load_path(path)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Invalid filename: {path:?}"))?;
    let out_path = output_folder.join(format!("{stem}.json"));

    let file = std::fs::File::create(&out_path)
        .with_context(|| format!("Failed to create {out_path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &systems)
        .context("Failed to write JSON")?;

    Ok(out_path.display().to_string())
}
