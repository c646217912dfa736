//! Per-invocation run configuration.
//!
//! Built once from CLI arguments and never mutated during a run. The
//! force-all and dry-run switches live in [`crate::context::Context`];
//! these structs carry the path selectors specific to each mode.

use std::path::{Path, PathBuf};

/// Directory under the home root that receives backups by default.
pub const DEFAULT_BASE_DIR: &str = "Backups";

/// Resolve the base directory: explicit override or `<home>/Backups`.
#[must_use]
pub fn base_dir(home: &Path, override_dir: Option<&Path>) -> PathBuf {
    override_dir.map_or_else(|| home.join(DEFAULT_BASE_DIR), Path::to_path_buf)
}

/// Configuration for one backup run.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Directory that receives the timestamped backup root.
    pub base_dir: PathBuf,
    /// Seal the finished root into a single encrypted archive.
    pub encrypt: bool,
}

/// Configuration for one restore run.
///
/// The three source selectors are resolved with the precedence
/// encrypted file > explicit directory > newest under `base_dir`.
#[derive(Debug, Clone)]
pub struct RestoreConfig {
    /// Directory searched for the newest backup when no override is given.
    pub base_dir: PathBuf,
    /// Restore from this specific backup directory.
    pub source_dir: Option<PathBuf>,
    /// Restore from this encrypted archive file.
    pub encrypted_file: Option<PathBuf>,
}
