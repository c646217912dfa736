//! Command line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Personal workstation backup and restore.
#[derive(Debug, Parser)]
#[command(name = "homevault", version, about, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Process every item without prompting
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Report actions without applying them
    #[arg(short = 'd', long = "dry-run", global = true)]
    pub dry_run: bool,

    /// Print debug-level detail
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Back up user state into a timestamped directory
    Backup(BackupOpts),
    /// Restore user state from a backup
    Restore(RestoreOpts),
    /// Install baseline software
    Provision,
    /// Reclaim disk space
    Clean,
    /// Print the version
    Version,
}

#[derive(Debug, Args)]
pub struct BackupOpts {
    /// Base directory receiving the backup (default: ~/Backups)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Seal the finished backup into an encrypted archive
    #[arg(short = 'e', long = "encrypt")]
    pub encrypt: bool,
}

#[derive(Debug, Args)]
pub struct RestoreOpts {
    /// Base directory searched for the newest backup (default: ~/Backups)
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Restore from this specific backup directory
    #[arg(long = "source", value_name = "DIR", conflicts_with = "archive")]
    pub source: Option<PathBuf>,

    /// Restore from this encrypted archive file
    #[arg(long = "archive", value_name = "FILE")]
    pub archive: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn backup_defaults() {
        let cli = parse(&["homevault", "backup"]);
        match cli.command {
            Command::Backup(opts) => {
                assert!(opts.dir.is_none());
                assert!(!opts.encrypt);
            }
            other => panic!("expected backup, got {other:?}"),
        }
        assert!(!cli.global.yes);
        assert!(!cli.global.dry_run);
        assert!(!cli.global.verbose);
    }

    #[test]
    fn backup_with_all_flags() {
        let cli = parse(&[
            "homevault", "backup", "--dir", "/mnt/usb", "--encrypt", "-y", "-d", "-v",
        ]);
        match cli.command {
            Command::Backup(opts) => {
                assert_eq!(opts.dir, Some(PathBuf::from("/mnt/usb")));
                assert!(opts.encrypt);
            }
            other => panic!("expected backup, got {other:?}"),
        }
        assert!(cli.global.yes);
        assert!(cli.global.dry_run);
        assert!(cli.global.verbose);
    }

    #[test]
    fn global_flags_accepted_after_subcommand() {
        let cli = parse(&["homevault", "restore", "--yes"]);
        assert!(cli.global.yes);
    }

    #[test]
    fn restore_source_selectors() {
        let cli = parse(&["homevault", "restore", "--archive", "/b/x.tar.gz.gpg"]);
        match cli.command {
            Command::Restore(opts) => {
                assert_eq!(opts.archive, Some(PathBuf::from("/b/x.tar.gz.gpg")));
                assert!(opts.source.is_none());
            }
            other => panic!("expected restore, got {other:?}"),
        }
    }

    #[test]
    fn restore_source_and_archive_conflict() {
        let result = Cli::try_parse_from([
            "homevault", "restore", "--source", "/b/one", "--archive", "/b/two.tar.gz.gpg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["homevault", "backup", "--bogus"]).is_err());
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["homevault"]).is_err());
    }

    #[test]
    fn simple_subcommands_parse() {
        assert!(matches!(parse(&["homevault", "provision"]).command, Command::Provision));
        assert!(matches!(parse(&["homevault", "clean"]).command, Command::Clean));
        assert!(matches!(parse(&["homevault", "version"]).command, Command::Version));
    }
}
