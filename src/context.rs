use std::path::PathBuf;

use anyhow::Result;

use crate::confirm::{self, Confirm};
use crate::exec::Executor;
use crate::logging::Logger;

/// Shared, read-only context for one run.
///
/// Built once from invocation arguments and passed explicitly to every
/// component; nothing in it is mutated during the run.
pub struct Context<'a> {
    /// User's home directory path.
    pub home: PathBuf,
    /// Bypass all per-item confirmation prompts.
    pub force_all: bool,
    /// Preview changes without applying.
    pub dry_run: bool,
    /// Logger for output and item recording.
    pub log: &'a Logger,
    /// Command executor (for testing or real system calls).
    pub executor: &'a dyn Executor,
    /// Source of yes/no answers for per-item prompts.
    pub confirm: &'a dyn Confirm,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("home", &self.home)
            .field("force_all", &self.force_all)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    /// Create a context, resolving the home directory from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME environment variable is not set.
    pub fn new(
        force_all: bool,
        dry_run: bool,
        log: &'a Logger,
        executor: &'a dyn Executor,
        confirm: &'a dyn Confirm,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;
        Ok(Self::with_home(
            PathBuf::from(home),
            force_all,
            dry_run,
            log,
            executor,
            confirm,
        ))
    }

    /// Create a context with an explicit home directory.
    #[must_use]
    pub fn with_home(
        home: PathBuf,
        force_all: bool,
        dry_run: bool,
        log: &'a Logger,
        executor: &'a dyn Executor,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            home,
            force_all,
            dry_run,
            log,
            executor,
            confirm,
        }
    }

    /// Apply the selection policy for one item.
    #[must_use]
    pub fn approves(&self, item_name: &str) -> bool {
        confirm::approves(item_name, self.force_all, self.confirm)
    }
}
