//! Baseline software provisioning.
//!
//! A fixed list of categories, each a named sequence of external
//! commands. Categories whose tooling is absent are skipped, every
//! category goes through the selection policy, and dry-run prints the
//! command lines instead of running them.

use anyhow::Result;

use crate::commands::{record, CommandSpec};
use crate::context::Context;
use crate::logging::ItemStatus;
use crate::transfer::Transfer;

/// One provisioning category.
pub struct Category {
    /// Display name used for prompting and reporting.
    pub name: &'static str,
    /// Program that must be on PATH for the category to apply.
    pub requires: &'static str,
    /// Commands run in order; the first failure fails the category.
    pub commands: &'static [CommandSpec],
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "System packages",
        requires: "pacman",
        commands: &[CommandSpec {
            program: "sudo",
            args: &[
                "pacman",
                "-S",
                "--needed",
                "--noconfirm",
                "base-devel",
                "git",
                "openssh",
                "flatpak",
            ],
        }],
    },
    Category {
        name: "Flathub remote",
        requires: "flatpak",
        commands: &[CommandSpec {
            program: "flatpak",
            args: &[
                "remote-add",
                "--if-not-exists",
                "flathub",
                "https://dl.flathub.org/repo/flathub.flatpakrepo",
            ],
        }],
    },
];

/// Run the provisioning dispatcher over the built-in categories.
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
    ctx.log.stage("Provision");

    for category in categories {
        if !ctx.executor.which(category.requires) {
            ctx.log.record_item(
                category.name,
                ItemStatus::Missing,
                Some(&format!("{} not on PATH", category.requires)),
            );
            continue;
        }
        if !ctx.approves(category.name) {
            ctx.log.record_item(category.name, ItemStatus::Declined, None);
            continue;
        }
        record(ctx.log, category.name, dispatch(ctx, category));
    }

    ctx.log.print_summary();
    Ok(())
}

fn dispatch(ctx: &Context, category: &Category) -> Result<Transfer> {
    if ctx.dry_run {
        for command in category.commands {
            ctx.log.dry_run(&command.display());
        }
        return Ok(Transfer::Planned {
            detail: format!("{} commands", category.commands.len()),
        });
    }

    for command in category.commands {
        ctx.log.debug(&command.display());
        ctx.executor.run(command.program, command.args)?;
    }
    Ok(Transfer::Done {
        detail: format!("{} commands", category.commands.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::test_helpers::ScriptedConfirm;
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::Logger;
    use std::path::PathBuf;

    const TEST_CATEGORIES: &[Category] = &[
        Category {
            name: "Alpha",
            requires: "alpha-tool",
            commands: &[CommandSpec {
                program: "alpha-tool",
                args: &["apply"],
            }],
        },
        Category {
            name: "Beta",
            requires: "beta-tool",
            commands: &[
                CommandSpec {
                    program: "beta-tool",
                    args: &["first"],
                },
                CommandSpec {
                    program: "beta-tool",
                    args: &["second"],
                },
            ],
        },
    ];

    fn ctx<'a>(
        force_all: bool,
        dry_run: bool,
        log: &'a Logger,
        executor: &'a MockExecutor,
        confirm: &'a ScriptedConfirm,
    ) -> Context<'a> {
        Context::with_home(PathBuf::from("/home/test"), force_all, dry_run, log, executor, confirm)
    }

    #[test]
    fn runs_each_command_of_approved_categories() {
        let log = Logger::new(false);
        let executor = MockExecutor::with_responses(vec![
            (true, String::new()),
            (true, String::new()),
            (true, String::new()),
        ])
        .with_which(true);
        let confirm = ScriptedConfirm::new(&[]);
        let context = ctx(true, false, &log, &executor, &confirm);

        execute(&context, TEST_CATEGORIES).unwrap();

        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, "alpha-tool");
        assert_eq!(calls[1].1, vec!["first"]);
        assert_eq!(calls[2].1, vec!["second"]);
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn missing_tooling_skips_without_prompting() {
        let log = Logger::new(false);
        let executor = MockExecutor::with_responses(vec![]).with_which(false);
        let confirm = ScriptedConfirm::new(&[true, true]);
        let context = ctx(false, false, &log, &executor, &confirm);

        execute(&context, TEST_CATEGORIES).unwrap();

        assert!(executor.recorded_calls().is_empty());
        assert!(
            confirm.seen_prompts().is_empty(),
            "unavailable categories must not prompt"
        );
    }

    #[test]
    fn declined_categories_run_nothing() {
        let log = Logger::new(false);
        let executor = MockExecutor::with_responses(vec![]).with_which(true);
        let confirm = ScriptedConfirm::new(&[false, false]);
        let context = ctx(false, false, &log, &executor, &confirm);

        execute(&context, TEST_CATEGORIES).unwrap();
        assert!(executor.recorded_calls().is_empty());
    }

    #[test]
    fn dry_run_executes_nothing() {
        let log = Logger::new(false);
        let executor = MockExecutor::with_responses(vec![]).with_which(true);
        let confirm = ScriptedConfirm::new(&[]);
        let context = ctx(true, true, &log, &executor, &confirm);

        execute(&context, TEST_CATEGORIES).unwrap();
        assert!(executor.recorded_calls().is_empty());
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn failed_category_does_not_abort_the_rest() {
        let log = Logger::new(false);
        // Alpha fails, Beta's two commands succeed.
        let executor = MockExecutor::with_responses(vec![
            (false, String::new()),
            (true, String::new()),
            (true, String::new()),
        ])
        .with_which(true);
        let confirm = ScriptedConfirm::new(&[]);
        let context = ctx(true, false, &log, &executor, &confirm);

        execute(&context, TEST_CATEGORIES).unwrap();
        assert_eq!(log.failure_count(), 1);
        assert_eq!(executor.recorded_calls().len(), 3);
    }

    #[test]
    fn builtin_categories_are_well_formed() {
        for category in CATEGORIES {
            assert!(!category.name.is_empty());
            assert!(!category.requires.is_empty());
            assert!(!category.commands.is_empty());
        }
    }
}
