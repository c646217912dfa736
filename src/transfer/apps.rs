//! Application list export and reinstall.
//!
//! The backup side asks the store for its installed applications and
//! writes them, one identifier per line, to the backup root. The restore
//! side reads that file back and reinstalls each application, warning and
//! continuing on individual failures.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::exec::Executor;
use crate::logging::Logger;
use crate::transfer::Transfer;

/// An installable-application store the engine can enumerate and drive.
pub trait AppStore {
    /// Whether the store's tooling is present on this machine.
    fn available(&self) -> bool {
        true
    }

    /// Identifiers of all installed applications.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_installed(&self) -> Result<Vec<String>>;

    /// Install one application by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the installation fails.
    fn install(&self, id: &str) -> Result<()>;
}

/// [`AppStore`] backed by the `flatpak` command line tool.
pub struct FlatpakStore<'a> {
    executor: &'a dyn Executor,
}

impl<'a> FlatpakStore<'a> {
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl AppStore for FlatpakStore<'_> {
    fn available(&self) -> bool {
        self.executor.which("flatpak")
    }

    fn list_installed(&self) -> Result<Vec<String>> {
        let result = self
            .executor
            .run("flatpak", &["list", "--app", "--columns=application"])
            .context("cannot list installed applications")?;
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn install(&self, id: &str) -> Result<()> {
        self.executor
            .run(
                "flatpak",
                &["install", "--noninteractive", "--assumeyes", "flathub", id],
            )
            .with_context(|| format!("cannot install {id}"))?;
        Ok(())
    }
}

/// Export the store's installed applications to `dst`, one per line.
///
/// Returns [`Transfer::SourceMissing`] when the store tooling is absent.
/// An empty list still writes an (empty) file so the artifact records the
/// state faithfully.
///
/// # Errors
///
/// Returns an error if the store cannot be queried or the file cannot be
/// written.
pub fn export_list(
    store: &dyn AppStore,
    dst: &Path,
    dry_run: bool,
    log: &Logger,
) -> Result<Transfer> {
    if !store.available() {
        return Ok(Transfer::SourceMissing);
    }

    let ids = store.list_installed()?;
    let detail = format!("{} applications", ids.len());
    if dry_run {
        log.dry_run(&format!("write {} to {}", detail, dst.display()));
        return Ok(Transfer::Planned { detail });
    }

    let mut contents = ids.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(dst, contents).with_context(|| format!("cannot write {}", dst.display()))?;
    Ok(Transfer::Done { detail })
}

/// Reinstall every application listed in `src`.
///
/// A missing file is [`Transfer::SourceMissing`]; an empty list is
/// [`Transfer::Unchanged`]. Individual installation failures are warned
/// and counted but do not abort the remaining installs.
///
/// # Errors
///
/// Returns an error only if `src` exists but cannot be read.
pub fn import_list(
    store: &dyn AppStore,
    src: &Path,
    dry_run: bool,
    log: &Logger,
) -> Result<Transfer> {
    if !src.is_file() {
        return Ok(Transfer::SourceMissing);
    }

    let contents = fs::read_to_string(src).with_context(|| format!("cannot read {}", src.display()))?;
    let ids: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if ids.is_empty() {
        return Ok(Transfer::Unchanged);
    }

    if dry_run {
        for id in &ids {
            log.dry_run(&format!("install {id}"));
        }
        return Ok(Transfer::Planned {
            detail: format!("{} applications", ids.len()),
        });
    }

    let mut installed = 0usize;
    let mut failed = 0usize;
    for id in &ids {
        match store.install(id) {
            Ok(()) => {
                log.debug(&format!("installed {id}"));
                installed += 1;
            }
            Err(err) => {
                log.warn(&format!("{id}: {err:#}"));
                failed += 1;
            }
        }
    }

    let detail = if failed > 0 {
        format!("{installed} installed, {failed} failed")
    } else {
        format!("{installed} installed")
    };
    Ok(Transfer::Done { detail })
}
