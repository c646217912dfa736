use std::process::ExitCode;

use clap::Parser as _;

use homevault_cli::cli::{Cli, Command};
use homevault_cli::commands;
use homevault_cli::config::{self, BackupConfig, RestoreConfig};
use homevault_cli::confirm::TerminalConfirm;
use homevault_cli::context::Context;
use homevault_cli::exec::SystemExecutor;
use homevault_cli::logging::Logger;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders usage/help itself; --help exits 0, bad input 1.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log = Logger::new(cli.global.verbose);
    match run(&cli, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log.error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, log: &Logger) -> anyhow::Result<()> {
    if matches!(cli.command, Command::Version) {
        println!("homevault {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let executor = SystemExecutor;
    let confirm = TerminalConfirm;
    let ctx = Context::new(cli.global.yes, cli.global.dry_run, log, &executor, &confirm)?;

    match &cli.command {
        Command::Backup(opts) => {
            let backup_config = BackupConfig {
                base_dir: config::base_dir(&ctx.home, opts.dir.as_deref()),
                encrypt: opts.encrypt,
            };
            commands::backup::run(&ctx, &backup_config)
        }
        Command::Restore(opts) => {
            let restore_config = RestoreConfig {
                base_dir: config::base_dir(&ctx.home, opts.dir.as_deref()),
                source_dir: opts.source.clone(),
                encrypted_file: opts.archive.clone(),
            };
            commands::restore::run(&ctx, &restore_config)
        }
        Command::Provision => commands::provision::run(&ctx),
        Command::Clean => commands::clean::run(&ctx),
        // Handled before the context was built.
        Command::Version => Ok(()),
    }
}
