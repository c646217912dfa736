//! Per-item confirmation seam.
//!
//! The selection policy is injected as a [`Confirm`] capability so the
//! orchestrators can be tested without a terminal: the production
//! implementation reads stdin, test implementations return scripted
//! answers.

use std::io::{self, Write as _};

/// Source of yes/no answers for per-item prompts.
pub trait Confirm {
    /// Ask the operator a yes/no question. Default is no.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Production [`Confirm`] that prompts on the terminal.
///
/// Only an explicit affirmative (`y` or `yes`, case-insensitive) counts
/// as yes; anything else, including empty input or a read error, is a
/// decline, never an error.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        is_affirmative(&input)
    }
}

/// Whether a raw input line is an explicit yes.
#[must_use]
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Decide whether to act on an item: force-all bypasses the prompt entirely.
pub fn approves(item_name: &str, force_all: bool, confirm: &dyn Confirm) -> bool {
    if force_all {
        return true;
    }
    confirm.confirm(&format!("Include '{item_name}'?"))
}
