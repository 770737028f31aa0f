use std::sync::OnceLock;

pub mod commands;
pub mod loader;
pub mod tab;

/// Application-level verbosity
pub static VERBOSE: OnceLock<bool> = OnceLock::new();
