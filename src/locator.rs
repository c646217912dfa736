//! Backup root creation and resolution.
//!
//! Backup side: mint a fresh `<base>/<timestamp>/home/` root. Restore
//! side: resolve which on-disk root to read from, with the precedence
//! encrypted file > explicit directory > newest subdirectory of the base.
//!
//! The timestamp format (`YYYYmmdd_HHMMSS`) sorts lexicographically in
//! chronological order, so "newest" is simply the greatest directory name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{APP_LIST_FILE, HOME_SUBDIR, SETTINGS_DUMP_FILE};
use crate::config::RestoreConfig;
use crate::crypto::{self, Encryptor, OpenedArchive};
use crate::error::{HomevaultError, LocateError};

/// Timestamp format of a backup root directory name.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The path a new backup root would occupy, without creating anything.
///
/// Used by dry-run backups, which must not mutate the base directory.
#[must_use]
pub fn backup_root_path(base: &Path) -> PathBuf {
    base.join(chrono::Local::now().format(TIMESTAMP_FORMAT).to_string())
}

/// Create a fresh timestamped backup root with its inner `home/` directory.
///
/// # Errors
///
/// Returns [`LocateError::DirectoryCreation`] if the directories cannot be
/// created.
pub fn create_backup_root(base: &Path) -> Result<PathBuf, LocateError> {
    let root = backup_root_path(base);
    create_backup_root_at(&root)?;
    Ok(root)
}

/// Create a backup root (and its inner `home/` directory) at a path
/// previously computed by [`backup_root_path`].
///
/// The backup command computes the path up front but defers creation
/// until an item is actually approved, so an all-declined run leaves the
/// base directory untouched.
///
/// # Errors
///
/// Returns [`LocateError::DirectoryCreation`] if the directories cannot be
/// created.
pub fn create_backup_root_at(root: &Path) -> Result<(), LocateError> {
    fs::create_dir_all(root.join(HOME_SUBDIR)).map_err(|source| {
        LocateError::DirectoryCreation {
            path: root.display().to_string(),
            source,
        }
    })
}

/// A restore source resolved to an on-disk backup root.
///
/// When the source was an encrypted archive the decrypted plaintext lives
/// in a temporary staging directory owned by this value; dropping it
/// removes the plaintext on every exit path.
#[derive(Debug)]
pub struct ResolvedRoot {
    path: PathBuf,
    _opened: Option<OpenedArchive>,
}

impl ResolvedRoot {
    /// The backup root directory to read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the backup root for a restore run.
///
/// Precedence: encrypted archive file, then explicit directory, then the
/// newest subdirectory of the base directory.
///
/// # Errors
///
/// Returns a [`crate::error::CryptoError`] if the encrypted source cannot
/// be opened, [`LocateError::NoBackupFound`] if the base directory holds
/// no candidates, and [`LocateError::InvalidBackup`] if the resolved root
/// contains neither a `home/` subtree nor a recognized artifact.
pub fn resolve_restore_root(
    config: &RestoreConfig,
    encryptor: &dyn Encryptor,
) -> Result<ResolvedRoot, HomevaultError> {
    if let Some(file) = &config.encrypted_file {
        let opened = crypto::open(file, encryptor)?;
        validate_root(&opened.root)?;
        return Ok(ResolvedRoot {
            path: opened.root.clone(),
            _opened: Some(opened),
        });
    }

    let path = if let Some(dir) = &config.source_dir {
        dir.clone()
    } else {
        newest_backup(&config.base_dir)?
    };
    validate_root(&path)?;
    Ok(ResolvedRoot {
        path,
        _opened: None,
    })
}

/// The newest backup root under `base`, by directory name.
///
/// # Errors
///
/// Returns [`LocateError::NoBackupFound`] if `base` does not exist or
/// holds no subdirectories.
pub fn newest_backup(base: &Path) -> Result<PathBuf, LocateError> {
    let no_backup = || LocateError::NoBackupFound(base.display().to_string());

    let mut candidates: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(base).map_err(|_| no_backup())?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            candidates.push(path);
        }
    }
    candidates
        .into_iter()
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
        .ok_or_else(no_backup)
}

/// Check that `path` is self-describing as a backup root: it must hold a
/// `home/` subtree or at least one recognized generated artifact.
fn validate_root(path: &Path) -> Result<(), LocateError> {
    let recognizable = path.join(HOME_SUBDIR).is_dir()
        || path.join(APP_LIST_FILE).is_file()
        || path.join(SETTINGS_DUMP_FILE).is_file();
    if recognizable {
        Ok(())
    } else {
        Err(LocateError::InvalidBackup {
            path: path.display().to_string(),
        })
    }
}
