//! Command handlers for the CLI subcommands.
//!
//! Each handler has a thin `run` entry point that wires the production
//! collaborators (gpg, flatpak, dconf, the package manager) around a
//! testable `execute` core taking the capability traits.

pub mod backup;
pub mod clean;
pub mod provision;
pub mod restore;

use crate::logging::{ItemStatus, Logger};
use crate::transfer::Transfer;

/// One external command line of a dispatcher category.
pub struct CommandSpec {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl CommandSpec {
    fn display(&self) -> String {
        let mut line = self.program.to_string();
        for arg in self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Map a transfer outcome onto the summary ledger.
///
/// Failures are logged and recorded but never propagated; the caller
/// moves on to the next item.
pub(crate) fn record(log: &Logger, name: &str, outcome: anyhow::Result<Transfer>) {
    match outcome {
        Ok(Transfer::Done { detail }) => log.record_item(name, ItemStatus::Done, Some(&detail)),
        Ok(Transfer::Unchanged) => log.record_item(name, ItemStatus::Done, Some("unchanged")),
        Ok(Transfer::Planned { detail }) => {
            log.record_item(name, ItemStatus::DryRun, Some(&detail));
        }
        Ok(Transfer::SourceMissing) => log.record_item(name, ItemStatus::Missing, None),
        Err(err) => {
            log.error(&format!("{name}: {err:#}"));
            log.record_item(name, ItemStatus::Failed, Some(&format!("{err:#}")));
        }
    }
}
