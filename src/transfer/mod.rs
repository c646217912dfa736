//! The transfer engine: the four operations that move user state between
//! the home directory and a backup root.
//!
//! Every operation is idempotent, dry-run aware, and skips silently when
//! its source does not exist. Change detection is by content digest, not
//! size+mtime, so a touched-but-unchanged file still counts as unchanged.

pub mod apps;
pub mod file;
pub mod mirror;
pub mod settings;

use std::io::{self, Read as _};
use std::path::Path;

use sha2::{Digest as _, Sha256};

/// Outcome of one transfer operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Destination was updated (or created).
    Done {
        /// Short human-readable summary of what changed.
        detail: String,
    },
    /// Source and destination already match; nothing was written.
    Unchanged,
    /// Dry-run: the same actions were computed and reported, nothing written.
    Planned {
        /// Short human-readable summary of what would change.
        detail: String,
    },
    /// Source does not exist; the item is skipped, not an error.
    SourceMissing,
}

/// SHA-256 digest of a file's contents.
fn sha256_file(path: &Path) -> io::Result<[u8; 32]> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

/// Whether two files have identical contents (size check first).
pub(crate) fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let (ma, mb) = (std::fs::metadata(a)?, std::fs::metadata(b)?);
    if ma.len() != mb.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}

/// Copy a file and carry the source's modification time to the copy.
///
/// [`std::fs::copy`] keeps permission bits but resets the mtime; backups
/// should keep the user's timestamps. Extended attributes and ACLs are
/// not carried over.
pub(crate) fn copy_with_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::copy(src, dst)?;
    let mtime = std::fs::metadata(src)?.modified()?;
    std::fs::File::options()
        .write(true)
        .open(dst)?
        .set_modified(mtime)?;
    Ok(())
}
