//! The backup orchestrator.
//!
//! Walks the catalog in order applying the selection policy, transfers
//! each approved item into a timestamped root under the base directory,
//! optionally seals the finished root into an encrypted archive, and
//! prints the summary. The root is created when the first item is
//! approved; declining everything leaves the base directory untouched.
//! Item failures are recorded and skipped over; only root creation and
//! sealing are fatal.

use anyhow::Result;

use crate::catalog::{self, ItemKind};
use crate::commands::record;
use crate::config::BackupConfig;
use crate::context::Context;
use crate::crypto::{self, Encryptor, GpgEncryptor, ENCRYPTED_SUFFIX};
use crate::locator;
use crate::transfer::apps::{self, AppStore, FlatpakStore};
use crate::transfer::settings::{self, DconfStore, SettingsStore};
use crate::transfer::{file, mirror, Transfer};

/// Run a backup with the production collaborators.
///
/// # Errors
///
/// Returns an error if the backup root cannot be created or sealing
/// fails. Per-item failures are reported in the summary instead.
pub fn run(ctx: &Context, config: &BackupConfig) -> Result<()> {
    let encryptor = GpgEncryptor::new(ctx.executor);
    let app_store = FlatpakStore::new(ctx.executor);
    let settings_store = DconfStore::new(ctx.executor);
    execute(ctx, config, &encryptor, &app_store, &settings_store)
}

/// Backup core, generic over the injected capabilities.
///
/// # Errors
///
/// See [`run`].
pub fn execute(
    ctx: &Context,
    config: &BackupConfig,
    encryptor: &dyn Encryptor,
    app_store: &dyn AppStore,
    settings_store: &dyn SettingsStore,
) -> Result<()> {
    ctx.log
        .stage(&format!("Backup to {}", config.base_dir.display()));

    // The root path is fixed up front but nothing is created until an
    // item is approved, so an all-declined run leaves the base untouched
    // and cannot shadow the previous backup as "newest".
    let root = locator::backup_root_path(&config.base_dir);
    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("create backup root {}", root.display()));
    }

    let mut created = false;
    for item in catalog::default_catalog() {
        if !ctx.approves(item.name) {
            ctx.log
                .record_item(item.name, crate::logging::ItemStatus::Declined, None);
            continue;
        }
        if !created && !ctx.dry_run {
            locator::create_backup_root_at(&root)?;
            ctx.log.info(&format!("backup root {}", root.display()));
            created = true;
        }
        let outcome = export_item(ctx, item, &root, app_store, settings_store);
        record(ctx.log, item.name, outcome);
    }

    if config.encrypt {
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "seal {} into {}{ENCRYPTED_SUFFIX}",
                root.display(),
                root.display()
            ));
        } else if created {
            let sealed = crypto::seal(&root, encryptor)?;
            ctx.log.info(&format!("sealed {}", sealed.display()));
        }
    }

    ctx.log.print_summary();
    Ok(())
}

/// Transfer one catalog item from the home directory into the backup root.
fn export_item(
    ctx: &Context,
    item: &catalog::CatalogItem,
    root: &std::path::Path,
    app_store: &dyn AppStore,
    settings_store: &dyn SettingsStore,
) -> Result<Transfer> {
    let dst = item.archive_path(root);
    match item.kind {
        ItemKind::Directory => {
            let src = item
                .home_path(&ctx.home)
                .ok_or_else(|| anyhow::anyhow!("'{}' has no home path", item.name))?;
            Ok(mirror::mirror(&src, &dst, ctx.dry_run, ctx.log)?)
        }
        ItemKind::File => {
            let src = item
                .home_path(&ctx.home)
                .ok_or_else(|| anyhow::anyhow!("'{}' has no home path", item.name))?;
            Ok(file::copy_file(&src, &dst, ctx.dry_run, ctx.log)?)
        }
        ItemKind::AppList => apps::export_list(app_store, &dst, ctx.dry_run, ctx.log),
        ItemKind::SettingsDump => {
            settings::export_dump(settings_store, &dst, ctx.dry_run, ctx.log)
        }
    }
}
