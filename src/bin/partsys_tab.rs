use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use partsys_tools::{
    VERBOSE,
    commands::{
        cat::cat_file, check::check_files, dump_json::dump_json, fragment::print_fragment,
        list::list_systems,
    },
};

#[derive(Debug, Subcommand)]
enum Command {
    /// List systems and emitter counts in matched files
    List {
        /// Glob pattern selecting the files to list
        #[clap(default_value = "*.tab")]
        glob: String,
    },
    /// Print the canonical text of a file (or a single system) to stdout
    Cat {
        /// Path to the particle file
        path: PathBuf,

        /// Print only this system
        #[arg(long)]
        system: Option<String>,
    },
    /// Parse matched files and report malformed ones
    Check {
        /// Glob pattern selecting the files to check
        #[clap(default_value = "*.tab")]
        glob: String,
    },
    /// Convert matched files into JSON files
    DumpJson {
        /// Path to the folder to output the JSON files
        output_folder: PathBuf,

        /// Glob pattern selecting the files to convert
        #[clap(default_value = "*.tab")]
        glob: String,
    },
    /// Print one emitter as a standalone fragment (the clipboard payload)
    Fragment {
        /// Path to the particle file
        path: PathBuf,
        /// System owning the emitter
        system: String,
        /// Emitter to export
        emitter: String,
    },
}

/// A CLI tool for particle-system definition files: validate, re-serialize
/// and export the systems they define.
#[derive(Parser, Debug)]
#[command(name = "partsys_tab")]
#[clap(version)]
struct Cli {
    /// Print full error detail
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = VERBOSE.set(cli.verbose);

    match cli.command {
        Command::List { glob } => list_systems(&glob),
        Command::Cat { path, system } => cat_file(&path, system.as_deref()),
        Command::Check { glob } => check_files(&glob),
        Command::DumpJson {
            output_folder,
            glob,
        } => dump_json(&output_folder, &glob),
        Command::Fragment {
            path,
            system,
            emitter,
        } => print_fragment(&path, &system, &emitter),
    }
}
