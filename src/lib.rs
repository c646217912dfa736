//! Personal workstation backup and restore engine.
//!
//! The crate is layered bottom-up:
//!
//! - [`catalog`] declares the user state the engine knows about; the rest
//!   of the crate is generic over it.
//! - [`transfer`], [`archive`], [`crypto`], and [`locator`] are the
//!   primitives: directory mirroring, tar.gz packaging, encrypted
//!   sealing, and backup root creation/resolution.
//! - [`commands`] orchestrates the primitives into the CLI subcommands.
//!
//! External collaborators (gpg, flatpak, dconf, the package manager) sit
//! behind the [`exec::Executor`], [`crypto::Encryptor`],
//! [`transfer::apps::AppStore`], and [`transfer::settings::SettingsStore`]
//! seams so everything above them is unit-testable.

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod context;
pub mod crypto;
pub mod error;
pub mod exec;
pub mod locator;
pub mod logging;
pub mod transfer;
