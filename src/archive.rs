//! Compressed tar packaging of a backup root.
//!
//! The encryption adapter layers gpg on top of these streams; keeping the
//! tar.gz step native makes the seal/open lifecycle testable without an
//! external tool.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{Archive, Builder};

/// Pack `root` into a gzip-compressed tar at `dest`.
///
/// The archive contains a single top-level directory named after `root`'s
/// final component (the timestamp), so unpacking reproduces the backup
/// root layout exactly.
///
/// # Errors
///
/// Returns an error if `root` has no final component or any read/write
/// fails.
pub fn pack_root(root: &Path, dest: &Path) -> io::Result<()> {
    let name = root.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no directory name", root.display()),
        )
    })?;

    let file = File::create(dest)?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(enc);
    builder.follow_symlinks(false);
    builder.append_dir_all(Path::new(name), root)?;
    builder.into_inner()?.finish()?;
    Ok(())
}

/// Unpack a gzip-compressed tar into `dest`.
///
/// # Errors
///
/// Returns an error if the archive cannot be read or entries cannot be
/// written.
pub fn unpack(archive: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(archive)?;
    let mut ar = Archive::new(GzDecoder::new(file));
    ar.set_preserve_permissions(true);
    ar.unpack(dest)
}
