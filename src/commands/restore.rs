//! The restore orchestrator.
//!
//! Resolves the backup root (encrypted archive > explicit directory >
//! newest under the base), walks the catalog applying the selection
//! policy, and transfers each approved item back into the home directory.
//! Resolution failures are fatal; item failures are recorded and skipped.

use anyhow::Result;

use crate::catalog::{self, ItemKind};
use crate::commands::record;
use crate::config::RestoreConfig;
use crate::context::Context;
use crate::crypto::{Encryptor, GpgEncryptor};
use crate::locator;
use crate::transfer::apps::{self, AppStore, FlatpakStore};
use crate::transfer::settings::{self, DconfStore, SettingsStore};
use crate::transfer::{file, mirror, Transfer};

/// Run a restore with the production collaborators.
///
/// # Errors
///
/// Returns an error if no backup root can be resolved or the resolved
/// root is not recognizable. Per-item failures are reported in the
/// summary instead.
pub fn run(ctx: &Context, config: &RestoreConfig) -> Result<()> {
    let encryptor = GpgEncryptor::new(ctx.executor);
    let app_store = FlatpakStore::new(ctx.executor);
    let settings_store = DconfStore::new(ctx.executor);
    execute(ctx, config, &encryptor, &app_store, &settings_store)
}

/// Restore core, generic over the injected capabilities.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    ctx: &Context,
    config: &RestoreConfig,
    encryptor: &dyn Encryptor,
    app_store: &dyn AppStore,
    settings_store: &dyn SettingsStore,
) -> Result<()> {
    // Holds any decrypted plaintext alive exactly as long as the run.
    let resolved = locator::resolve_restore_root(config, encryptor)?;
    ctx.log
        .stage(&format!("Restore from {}", resolved.path().display()));

    for item in catalog::default_catalog() {
        if !ctx.approves(item.name) {
            ctx.log
                .record_item(item.name, crate::logging::ItemStatus::Declined, None);
            continue;
        }
        let outcome = import_item(ctx, item, resolved.path(), app_store, settings_store);
        record(ctx.log, item.name, outcome);
    }

    ctx.log.print_summary();
    Ok(())
}

/// Transfer one catalog item from the backup root back into the home
/// directory.
fn import_item(
    ctx: &Context,
    item: &catalog::CatalogItem,
    root: &std::path::Path,
    app_store: &dyn AppStore,
    settings_store: &dyn SettingsStore,
) -> Result<Transfer> {
    let src = item.archive_path(root);
    match item.kind {
        ItemKind::Directory => {
            let dst = item
                .home_path(&ctx.home)
                .ok_or_else(|| anyhow::anyhow!("'{}' has no home path", item.name))?;
            Ok(mirror::mirror(&src, &dst, ctx.dry_run, ctx.log)?)
        }
        ItemKind::File => {
            let dst = item
                .home_path(&ctx.home)
                .ok_or_else(|| anyhow::anyhow!("'{}' has no home path", item.name))?;
            Ok(file::copy_file(&src, &dst, ctx.dry_run, ctx.log)?)
        }
        ItemKind::AppList => apps::import_list(app_store, &src, ctx.dry_run, ctx.log),
        ItemKind::SettingsDump => {
            settings::import_dump(settings_store, &src, ctx.dry_run, ctx.log)
        }
    }
}
