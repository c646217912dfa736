//! Single-file transfer with digest-based change detection.

use std::fs;
use std::io;
use std::path::Path;

use crate::logging::Logger;
use crate::transfer::{copy_with_mtime, files_identical, Transfer};

/// Copy `src` to `dst`, creating parent directories as needed. The copy
/// keeps the source's permission bits and modification time.
///
/// Returns [`Transfer::SourceMissing`] when `src` is not a regular file
/// and [`Transfer::Unchanged`] when the destination already has identical
/// contents.
///
/// # Errors
///
/// Returns an I/O error if the comparison or the copy fails.
pub fn copy_file(src: &Path, dst: &Path, dry_run: bool, log: &Logger) -> io::Result<Transfer> {
    if !src.is_file() {
        return Ok(Transfer::SourceMissing);
    }
    if dst.is_file() && files_identical(src, dst)? {
        return Ok(Transfer::Unchanged);
    }

    let detail = format!("copy {}", src.display());
    if dry_run {
        log.dry_run(&format!("{} -> {}", src.display(), dst.display()));
        return Ok(Transfer::Planned { detail });
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    copy_with_mtime(src, dst)?;
    Ok(Transfer::Done { detail })
}
