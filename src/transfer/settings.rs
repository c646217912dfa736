//! Desktop settings dump and load.
//!
//! Backup captures the full settings tree as a text dump in the backup
//! root; restore pipes that dump back into the settings daemon.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::exec::Executor;
use crate::logging::Logger;
use crate::transfer::Transfer;

/// A desktop settings database that can be dumped and reloaded as text.
pub trait SettingsStore {
    /// Whether the store's tooling is present on this machine.
    fn available(&self) -> bool {
        true
    }

    /// Dump the entire settings tree as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the dump fails.
    fn dump(&self) -> Result<String>;

    /// Load a previously dumped settings tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the load fails.
    fn load(&self, text: &str) -> Result<()>;
}

/// [`SettingsStore`] backed by the `dconf` command line tool.
pub struct DconfStore<'a> {
    executor: &'a dyn Executor,
}

impl<'a> DconfStore<'a> {
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl SettingsStore for DconfStore<'_> {
    fn available(&self) -> bool {
        self.executor.which("dconf")
    }

    fn dump(&self) -> Result<String> {
        let result = self
            .executor
            .run("dconf", &["dump", "/"])
            .context("cannot dump desktop settings")?;
        Ok(result.stdout)
    }

    fn load(&self, text: &str) -> Result<()> {
        self.executor
            .run_with_stdin("dconf", &["load", "/"], text)
            .context("cannot load desktop settings")?;
        Ok(())
    }
}

/// Export the settings dump to `dst`.
///
/// Returns [`Transfer::SourceMissing`] when the store tooling is absent.
///
/// # Errors
///
/// Returns an error if the dump fails or the file cannot be written.
pub fn export_dump(
    store: &dyn SettingsStore,
    dst: &Path,
    dry_run: bool,
    log: &Logger,
) -> Result<Transfer> {
    if !store.available() {
        return Ok(Transfer::SourceMissing);
    }

    let text = store.dump()?;
    let detail = format!("{} settings lines", text.lines().count());
    if dry_run {
        log.dry_run(&format!("write {} to {}", detail, dst.display()));
        return Ok(Transfer::Planned { detail });
    }

    fs::write(dst, text).with_context(|| format!("cannot write {}", dst.display()))?;
    Ok(Transfer::Done { detail })
}

/// Load the settings dump at `src` back into the store.
///
/// A missing file is [`Transfer::SourceMissing`]; an empty dump is
/// [`Transfer::Unchanged`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or the load fails.
pub fn import_dump(
    store: &dyn SettingsStore,
    src: &Path,
    dry_run: bool,
    log: &Logger,
) -> Result<Transfer> {
    if !src.is_file() {
        return Ok(Transfer::SourceMissing);
    }

    let text = fs::read_to_string(src).with_context(|| format!("cannot read {}", src.display()))?;
    if text.trim().is_empty() {
        return Ok(Transfer::Unchanged);
    }

    let detail = format!("{} settings lines", text.lines().count());
    if dry_run {
        log.dry_run(&format!("load {} from {}", detail, src.display()));
        return Ok(Transfer::Planned { detail });
    }

    store.load(&text)?;
    Ok(Transfer::Done { detail })
}
