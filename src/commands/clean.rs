//! Disk space reclamation.
//!
//! Categories follow the provisioning conventions (availability check,
//! selection policy, dry-run), but two of them need more than a fixed
//! command line: orphan removal queries the package manager first, and
//! the user cache prune is plain filesystem work.

use anyhow::Result;

use crate::commands::{record, CommandSpec};
use crate::context::Context;
use crate::logging::ItemStatus;
use crate::transfer::Transfer;

/// Cache subdirectory kept during a prune (it holds the current run log).
const KEPT_CACHE_ENTRY: &str = "homevault";

/// What a cleanup category does when approved.
pub enum Action {
    /// Run a fixed command sequence.
    Commands(&'static [CommandSpec]),
    /// Query orphaned packages, then remove them.
    OrphanPackages,
    /// Delete the contents of `~/.cache`.
    PruneUserCache,
}

/// One cleanup category.
pub struct Category {
    /// Display name used for prompting and reporting.
    pub name: &'static str,
    /// Program that must be on PATH; `None` for filesystem-only work.
    pub requires: Option<&'static str>,
    pub action: Action,
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "Package cache",
        requires: Some("pacman"),
        action: Action::Commands(&[CommandSpec {
            program: "sudo",
            args: &["pacman", "-Sc", "--noconfirm"],
        }]),
    },
    Category {
        name: "Orphaned packages",
        requires: Some("pacman"),
        action: Action::OrphanPackages,
    },
    Category {
        name: "Unused flatpak runtimes",
        requires: Some("flatpak"),
        action: Action::Commands(&[CommandSpec {
            program: "flatpak",
            args: &["uninstall", "--unused", "--noninteractive", "--assumeyes"],
        }]),
    },
    Category {
        name: "User cache directory",
        requires: None,
        action: Action::PruneUserCache,
    },
];

/// Run the cleanup dispatcher over the built-in categories.
///
/// # Errors
///
/// Never fails; category failures are reported in the summary.
pub fn run(ctx: &Context) -> Result<()> {
    execute(ctx, CATEGORIES)
}

/// Dispatcher core over an explicit category list.
///
/// # Errors
///
/// See [`run`].
pub fn execute(ctx: &Context, categories: &[Category]) -> Result<()> {
    ctx.log.stage("Clean");

    for category in categories {
        if let Some(program) = category.requires {
            if !ctx.executor.which(program) {
                ctx.log.record_item(
                    category.name,
                    ItemStatus::Missing,
                    Some(&format!("{program} not on PATH")),
                );
                continue;
            }
        }
        if !ctx.approves(category.name) {
            ctx.log.record_item(category.name, ItemStatus::Declined, None);
            continue;
        }
        let outcome = match &category.action {
            Action::Commands(commands) => dispatch_commands(ctx, commands),
            Action::OrphanPackages => remove_orphans(ctx),
            Action::PruneUserCache => prune_user_cache(ctx),
        };
        record(ctx.log, category.name, outcome);
    }

    ctx.log.print_summary();
    Ok(())
}

fn dispatch_commands(ctx: &Context, commands: &[CommandSpec]) -> Result<Transfer> {
    if ctx.dry_run {
        for command in commands {
            ctx.log.dry_run(&command.display());
        }
        return Ok(Transfer::Planned {
            detail: format!("{} commands", commands.len()),
        });
    }

    for command in commands {
        ctx.log.debug(&command.display());
        ctx.executor.run(command.program, command.args)?;
    }
    Ok(Transfer::Done {
        detail: format!("{} commands", commands.len()),
    })
}

/// List orphaned packages, then remove them in one shot.
///
/// `pacman -Qdtq` exits non-zero when there is nothing to list, so an
/// unsuccessful query means no orphans rather than an error.
fn remove_orphans(ctx: &Context) -> Result<Transfer> {
    let query = ctx.executor.run_unchecked("pacman", &["-Qdtq"])?;
    let orphans: Vec<&str> = query
        .stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !query.success || orphans.is_empty() {
        return Ok(Transfer::Unchanged);
    }

    let detail = format!("{} packages", orphans.len());
    if ctx.dry_run {
        for orphan in &orphans {
            ctx.log.dry_run(&format!("remove {orphan}"));
        }
        return Ok(Transfer::Planned { detail });
    }

    let mut args = vec!["pacman", "-Rns", "--noconfirm"];
    args.extend(&orphans);
    ctx.executor.run("sudo", &args)?;
    Ok(Transfer::Done { detail })
}

/// Delete the contents of `~/.cache`, keeping our own log directory.
fn prune_user_cache(ctx: &Context) -> Result<Transfer> {
    let cache = ctx.home.join(".cache");
    if !cache.is_dir() {
        return Ok(Transfer::SourceMissing);
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(&cache)? {
        let entry = entry?;
        if entry.file_name() != KEPT_CACHE_ENTRY {
            entries.push(entry.path());
        }
    }
    if entries.is_empty() {
        return Ok(Transfer::Unchanged);
    }

    let detail = format!("{} entries", entries.len());
    if ctx.dry_run {
        for entry in &entries {
            ctx.log.dry_run(&format!("remove {}", entry.display()));
        }
        return Ok(Transfer::Planned { detail });
    }

    for entry in &entries {
        if entry.is_dir() {
            std::fs::remove_dir_all(entry)?;
        } else {
            std::fs::remove_file(entry)?;
        }
    }
    Ok(Transfer::Done { detail })
}
