//! Shared fixtures for the integration tests: an isolated tempdir home,
//! plus in-process stand-ins for the external collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use anyhow::Result;

use homevault_cli::confirm::Confirm;
use homevault_cli::crypto::Encryptor;
use homevault_cli::error::CryptoError;
use homevault_cli::exec::{ExecResult, Executor};
use homevault_cli::transfer::apps::AppStore;
use homevault_cli::transfer::settings::SettingsStore;

/// Populate a home directory with a representative slice of user state.
pub fn seed_home(home: &Path) {
    std::fs::create_dir_all(home.join(".config/editor")).unwrap();
    std::fs::write(home.join(".config/editor/init.conf"), b"theme=dark\n").unwrap();
    std::fs::create_dir_all(home.join(".ssh")).unwrap();
    std::fs::write(home.join(".ssh/id_ed25519"), b"private-key-bytes\n").unwrap();
    std::fs::write(home.join(".ssh/id_ed25519.pub"), b"public-key\n").unwrap();
    std::fs::write(home.join(".gitconfig"), b"[user]\n\tname = Test\n").unwrap();
    std::fs::create_dir_all(home.join(".themes/Dark")).unwrap();
    std::fs::write(home.join(".themes/Dark/theme.css"), b"body{}\n").unwrap();
}

/// Approve every prompt.
pub struct ApproveAll;

impl Confirm for ApproveAll {
    fn confirm(&self, _: &str) -> bool {
        true
    }
}

/// Decline every prompt.
pub struct DeclineAll;

impl Confirm for DeclineAll {
    fn confirm(&self, _: &str) -> bool {
        false
    }
}

/// Byte-copying stand-in for the encryption primitive.
pub struct PlainEncryptor;

impl Encryptor for PlainEncryptor {
    fn encrypt(&self, plaintext: &Path, output: &Path) -> Result<(), CryptoError> {
        std::fs::copy(plaintext, output)
            .map(|_| ())
            .map_err(|e| CryptoError::Encryption(e.to_string()))
    }

    fn decrypt(&self, archive: &Path, output: &Path) -> Result<(), CryptoError> {
        std::fs::copy(archive, output)
            .map(|_| ())
            .map_err(|e| CryptoError::Decryption(e.to_string()))
    }
}

/// Application store holding a fixed list, recording installs.
pub struct MemoryApps {
    pub listed: Vec<String>,
    pub installed: RefCell<Vec<String>>,
}

impl MemoryApps {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            listed: ids.iter().map(|s| (*s).to_string()).collect(),
            installed: RefCell::new(Vec::new()),
        }
    }
}

impl AppStore for MemoryApps {
    fn list_installed(&self) -> Result<Vec<String>> {
        Ok(self.listed.clone())
    }

    fn install(&self, id: &str) -> Result<()> {
        self.installed.borrow_mut().push(id.to_string());
        Ok(())
    }
}

/// Settings store holding a fixed dump, recording loads.
pub struct MemorySettings {
    pub dump_text: String,
    pub loaded: RefCell<Option<String>>,
}

impl MemorySettings {
    pub fn new(dump_text: &str) -> Self {
        Self {
            dump_text: dump_text.to_string(),
            loaded: RefCell::new(None),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn dump(&self) -> Result<String> {
        Ok(self.dump_text.clone())
    }

    fn load(&self, text: &str) -> Result<()> {
        *self.loaded.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Executor that fails every call; the core engine must not need
/// subprocesses when all collaborators are injected.
pub struct NullExecutor;

impl Executor for NullExecutor {
    fn run(&self, program: &str, _: &[&str]) -> Result<ExecResult> {
        anyhow::bail!("unexpected subprocess: {program}")
    }

    fn run_unchecked(&self, program: &str, _: &[&str]) -> Result<ExecResult> {
        anyhow::bail!("unexpected subprocess: {program}")
    }

    fn run_with_stdin(&self, program: &str, _: &[&str], _: &str) -> Result<ExecResult> {
        anyhow::bail!("unexpected subprocess: {program}")
    }

    fn which(&self, _: &str) -> bool {
        false
    }
}
