//! Domain-specific error types for the backup engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`LocateError`],
//! [`CryptoError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! HomevaultError
//! ├── Locate(LocateError)     backup root creation and resolution
//! ├── Crypto(CryptoError)     archive encryption and decryption
//! └── Transfer(TransferError) per-item copy/export/import failures
//! ```
//!
//! Locate and Crypto errors are fatal: they occur before any item
//! processing and abort the run. Transfer errors are per-item and
//! non-fatal; the orchestrator logs them and continues.

use thiserror::Error;

/// Top-level error type for the backup engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum HomevaultError {
    /// Backup root creation or resolution failed.
    #[error("{0}")]
    Locate(#[from] LocateError),

    /// Archive encryption or decryption failed.
    #[error("{0}")]
    Crypto(#[from] CryptoError),

    /// A per-item transfer operation failed.
    #[error("{0}")]
    Transfer(#[from] TransferError),
}

/// Errors that arise while creating or resolving a backup root.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The timestamped backup directory could not be created.
    #[error("cannot create backup directory {path}: {source}")]
    DirectoryCreation {
        /// Path that could not be created.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The base directory holds no backup subdirectories to restore from.
    #[error("no backup found under {0}")]
    NoBackupFound(String),

    /// The resolved directory does not look like a backup root.
    #[error("{path} is not a backup: no home/ subtree or known artifact file")]
    InvalidBackup {
        /// Path of the rejected directory.
        path: String,
    },
}

/// Errors that arise while sealing or opening an encrypted archive.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The symmetric encryption step exited non-zero.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong passphrase or corrupt input).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Unpacking produced an ambiguous layout.
    #[error("invalid archive: expected exactly one top-level entry, found {count}")]
    InvalidArchive {
        /// Number of top-level entries found after unpacking.
        count: usize,
    },

    /// The backup root could not be packaged into a tar stream.
    #[error("cannot package {path}: {source}")]
    Pack {
        /// Backup root being packaged.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The decrypted tar stream could not be unpacked.
    #[error("cannot unpack archive: {source}")]
    Unpack {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The plaintext root could not be removed after a successful seal.
    #[error("sealed, but cannot remove plaintext root {path}: {source}")]
    Cleanup {
        /// Plaintext backup root left behind.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from a single catalog item's transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    /// An item's copy/export/import failed.
    #[error("item '{item}' failed: {reason}")]
    Item {
        /// Display name of the catalog item.
        item: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// An external collaborator command exited non-zero.
    #[error("'{command}' failed (exit {code}): {stderr}")]
    Subprocess {
        /// The program that was invoked.
        command: String,
        /// Exit code (or -1 if terminated by signal).
        code: i32,
        /// Trimmed stderr output.
        stderr: String,
    },
}
