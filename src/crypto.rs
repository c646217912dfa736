//! Encryption adapter: seal a backup root into a single symmetric-encrypted
//! archive, and open such an archive back into a usable root.
//!
//! The symmetric primitive is gpg invoked through the [`Executor`] seam;
//! gpg prompts for the passphrase itself, so this module never sees,
//! stores, or logs it. Decrypted plaintext only ever lives inside a
//! [`tempfile::TempDir`] that is removed on drop, on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::archive;
use crate::error::CryptoError;
use crate::exec::Executor;

/// Suffix of a sealed backup archive.
pub const ENCRYPTED_SUFFIX: &str = ".tar.gz.gpg";

/// Symmetric encryption primitive.
///
/// Injected so the seal/open lifecycle can be tested without gpg; the
/// production implementation is [`GpgEncryptor`].
pub trait Encryptor {
    /// Encrypt `plaintext` into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if the primitive fails.
    fn encrypt(&self, plaintext: &Path, output: &Path) -> Result<(), CryptoError>;

    /// Decrypt `archive` into `output`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] on wrong passphrase or corrupt
    /// input.
    fn decrypt(&self, archive: &Path, output: &Path) -> Result<(), CryptoError>;
}

/// Production [`Encryptor`] shelling out to gpg.
pub struct GpgEncryptor<'a> {
    executor: &'a dyn Executor,
}

impl std::fmt::Debug for GpgEncryptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpgEncryptor").finish_non_exhaustive()
    }
}

impl<'a> GpgEncryptor<'a> {
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl Encryptor for GpgEncryptor<'_> {
    fn encrypt(&self, plaintext: &Path, output: &Path) -> Result<(), CryptoError> {
        let out = output.to_string_lossy().to_string();
        let src = plaintext.to_string_lossy().to_string();
        let result = self
            .executor
            .run_unchecked(
                "gpg",
                &["--symmetric", "--cipher-algo", "AES256", "--output", &out, &src],
            )
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        if result.success {
            Ok(())
        } else {
            Err(CryptoError::Encryption(format!(
                "gpg exited with code {}: {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            )))
        }
    }

    fn decrypt(&self, archive: &Path, output: &Path) -> Result<(), CryptoError> {
        let out = output.to_string_lossy().to_string();
        let src = archive.to_string_lossy().to_string();
        let result = self
            .executor
            .run_unchecked("gpg", &["--decrypt", "--output", &out, &src])
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
        if result.success {
            Ok(())
        } else {
            Err(CryptoError::Decryption(format!(
                "gpg exited with code {}: {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            )))
        }
    }
}

/// Seal a backup root into `<base>/<timestamp>.tar.gz.gpg`.
///
/// The root is packed into a compressed tar, encrypted, and deleted only
/// after the encryption succeeded, so a failed seal never loses data.
/// The intermediate plaintext tar is removed on every path.
///
/// # Errors
///
/// Returns [`CryptoError::Pack`] if packaging fails,
/// [`CryptoError::Encryption`] if the primitive fails (plaintext root is
/// preserved), and [`CryptoError::Cleanup`] if the root cannot be removed
/// afterwards.
pub fn seal(root: &Path, encryptor: &dyn Encryptor) -> Result<PathBuf, CryptoError> {
    let io_err = |source| CryptoError::Pack {
        path: root.display().to_string(),
        source,
    };
    let name = root
        .file_name()
        .ok_or_else(|| {
            io_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "backup root has no directory name",
            ))
        })?
        .to_string_lossy()
        .to_string();
    let base = root.parent().unwrap_or_else(|| Path::new("."));

    let tarball = base.join(format!("{name}.tar.gz"));
    archive::pack_root(root, &tarball).map_err(io_err)?;

    let sealed = base.join(format!("{name}{ENCRYPTED_SUFFIX}"));
    let encrypted = encryptor.encrypt(&tarball, &sealed);
    // The plaintext tar is an intermediate, gone on success and failure alike.
    let _ = fs::remove_file(&tarball);
    encrypted?;

    fs::remove_dir_all(root).map_err(|source| CryptoError::Cleanup {
        path: root.display().to_string(),
        source,
    })?;
    Ok(sealed)
}

/// A decrypted backup root staged in a temporary directory.
///
/// The staging directory, and with it the decrypted plaintext, is
/// removed when this value is dropped.
#[derive(Debug)]
pub struct OpenedArchive {
    _staging: TempDir,
    /// The single top-level directory recovered from the archive.
    pub root: PathBuf,
}

/// Open an encrypted archive: decrypt into a scoped temporary directory,
/// unpack the tar stream, and return the single top-level entry as the
/// backup root.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if the primitive fails,
/// [`CryptoError::Unpack`] on tar/IO failures, and
/// [`CryptoError::InvalidArchive`] if unpacking yields anything other than
/// exactly one top-level directory.
pub fn open(archive_file: &Path, encryptor: &dyn Encryptor) -> Result<OpenedArchive, CryptoError> {
    let unpack_err = |source| CryptoError::Unpack { source };

    let staging = tempfile::tempdir().map_err(unpack_err)?;
    let tarball = staging.path().join("decrypted.tar.gz");
    encryptor.decrypt(archive_file, &tarball)?;

    let contents = staging.path().join("contents");
    fs::create_dir(&contents).map_err(unpack_err)?;
    archive::unpack(&tarball, &contents).map_err(unpack_err)?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(&contents).map_err(unpack_err)? {
        entries.push(entry.map_err(unpack_err)?.path());
    }
    let count = entries.len();
    match entries.pop() {
        Some(root) if count == 1 && root.is_dir() => Ok(OpenedArchive {
            _staging: staging,
            root,
        }),
        _ => Err(CryptoError::InvalidArchive { count }),
    }
}
