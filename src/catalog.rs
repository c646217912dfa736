//! The declarative catalog of user state the engine knows how to back up.
//!
//! Purely data: the backup and restore orchestrators are generic over
//! [`ItemKind`], so adding an item here requires no engine changes. Order
//! matters only for deterministic prompting and reporting; items are
//! independent.

use std::path::{Path, PathBuf};

/// File name of the exported application list at the backup root.
pub const APP_LIST_FILE: &str = "flatpaks.txt";

/// File name of the exported desktop settings dump at the backup root.
pub const SETTINGS_DUMP_FILE: &str = "dconf-settings.ini";

/// Name of the subtree mirroring the user's home directory layout.
pub const HOME_SUBDIR: &str = "home";

/// What kind of state a catalog item captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A directory under the home root, mirrored recursively.
    Directory,
    /// A single file under the home root.
    File,
    /// The list of installed applications, exported to [`APP_LIST_FILE`].
    AppList,
    /// A desktop settings dump, exported to [`SETTINGS_DUMP_FILE`].
    SettingsDump,
}

/// One declared unit of user state.
#[derive(Debug, Clone, Copy)]
pub struct CatalogItem {
    /// Display name used for prompting and reporting.
    pub name: &'static str,
    /// Kind of state this item captures.
    pub kind: ItemKind,
    /// Path relative to the home root; `None` for generated kinds.
    pub relative_path: Option<&'static str>,
}

impl CatalogItem {
    /// Location of this item inside a backup root.
    ///
    /// Directory/File items live under `root/home/<relative_path>`;
    /// generated items use their fixed artifact name at the root.
    #[must_use]
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        match self.kind {
            ItemKind::Directory | ItemKind::File => root
                .join(HOME_SUBDIR)
                .join(self.relative_path.unwrap_or_default()),
            ItemKind::AppList => root.join(APP_LIST_FILE),
            ItemKind::SettingsDump => root.join(SETTINGS_DUMP_FILE),
        }
    }

    /// Location of this item under the user's home directory, if it has one.
    #[must_use]
    pub fn home_path(&self, home: &Path) -> Option<PathBuf> {
        self.relative_path.map(|rel| home.join(rel))
    }
}

/// The fixed, ordered catalog of items processed by backup and restore.
#[must_use]
pub const fn default_catalog() -> &'static [CatalogItem] {
    const CATALOG: &[CatalogItem] = &[
        CatalogItem {
            name: "Application configuration",
            kind: ItemKind::Directory,
            relative_path: Some(".config"),
        },
        CatalogItem {
            name: "Local application data",
            kind: ItemKind::Directory,
            relative_path: Some(".local/share"),
        },
        CatalogItem {
            name: "Themes",
            kind: ItemKind::Directory,
            relative_path: Some(".themes"),
        },
        CatalogItem {
            name: "Icons",
            kind: ItemKind::Directory,
            relative_path: Some(".icons"),
        },
        CatalogItem {
            name: "SSH keys",
            kind: ItemKind::Directory,
            relative_path: Some(".ssh"),
        },
        CatalogItem {
            name: "GnuPG keyring",
            kind: ItemKind::Directory,
            relative_path: Some(".gnupg"),
        },
        CatalogItem {
            name: "Git identity",
            kind: ItemKind::File,
            relative_path: Some(".gitconfig"),
        },
        CatalogItem {
            name: "Flatpak application data",
            kind: ItemKind::Directory,
            relative_path: Some(".var/app"),
        },
        CatalogItem {
            name: "Flatpak application list",
            kind: ItemKind::AppList,
            relative_path: None,
        },
        CatalogItem {
            name: "Desktop settings",
            kind: ItemKind::SettingsDump,
            relative_path: None,
        },
    ];
    CATALOG
}
