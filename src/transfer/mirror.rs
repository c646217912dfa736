//! Recursive directory mirroring with a plan/apply split.
//!
//! A mirror run first walks both trees and computes the list of actions
//! that would make the destination match the source, then either reports
//! them (dry-run) or applies them in order. Files are compared by content
//! digest; matching files are never rewritten, so a second run over an
//! unchanged tree plans nothing. Copied files keep their permission bits
//! and modification time; symlinks are recreated as symlinks, dangling
//! ones included. Extended attributes and ACLs are not carried over.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::Logger;
use crate::transfer::{copy_with_mtime, files_identical, Transfer};

/// One step of a mirror plan. Paths are relative to the tree roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorAction {
    /// Create a directory missing from the destination.
    CreateDir(PathBuf),
    /// Copy a file not present in the destination.
    CopyFile(PathBuf),
    /// Overwrite a destination file whose contents differ.
    ReplaceFile(PathBuf),
    /// Recreate a symlink with the source's target.
    CopyLink(PathBuf),
    /// Remove a destination entry with no source counterpart.
    Remove(PathBuf),
}

impl fmt::Display for MirrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(p) => write!(f, "create dir {}", p.display()),
            Self::CopyFile(p) => write!(f, "copy {}", p.display()),
            Self::ReplaceFile(p) => write!(f, "replace {}", p.display()),
            Self::CopyLink(p) => write!(f, "link {}", p.display()),
            Self::Remove(p) => write!(f, "remove {}", p.display()),
        }
    }
}

/// What an on-disk entry is, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Link,
}

fn kind_of(path: &Path) -> io::Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => {
            let ft = meta.file_type();
            Ok(Some(if ft.is_symlink() {
                EntryKind::Link
            } else if ft.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            }))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Mirror `src` into `dst`, or report what a mirror would do.
///
/// Returns [`Transfer::SourceMissing`] when `src` does not exist and
/// [`Transfer::Unchanged`] when the trees already match.
///
/// # Errors
///
/// Returns an I/O error if either tree cannot be walked or an action
/// cannot be applied. Actions applied before the failure stay applied.
pub fn mirror(src: &Path, dst: &Path, dry_run: bool, log: &Logger) -> io::Result<Transfer> {
    if !src.is_dir() {
        return Ok(Transfer::SourceMissing);
    }

    let actions = plan(src, dst)?;
    if actions.is_empty() {
        return Ok(Transfer::Unchanged);
    }

    let detail = summarize(&actions);
    if dry_run {
        for action in &actions {
            log.dry_run(&action.to_string());
        }
        return Ok(Transfer::Planned { detail });
    }

    for action in &actions {
        log.debug(&action.to_string());
    }
    apply(src, dst, &actions)?;
    Ok(Transfer::Done { detail })
}

/// Compute the actions that would make `dst` an exact mirror of `src`.
///
/// # Errors
///
/// Returns an I/O error if either tree cannot be read.
pub fn plan(src: &Path, dst: &Path) -> io::Result<Vec<MirrorAction>> {
    let mut actions = Vec::new();
    plan_subtree(src, dst, Path::new(""), &mut actions)?;
    Ok(actions)
}

fn plan_subtree(
    src: &Path,
    dst: &Path,
    rel: &Path,
    actions: &mut Vec<MirrorAction>,
) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        let s = entry.path();
        let d = dst.join(&name);
        let r = rel.join(&name);

        let s_kind = {
            let ft = entry.file_type()?;
            if ft.is_symlink() {
                EntryKind::Link
            } else if ft.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            }
        };
        let d_kind = kind_of(&d)?;

        match s_kind {
            EntryKind::Dir => {
                match d_kind {
                    Some(EntryKind::Dir) => {}
                    Some(_) => {
                        // Type flip: something else sits where a directory belongs.
                        actions.push(MirrorAction::Remove(r.clone()));
                        actions.push(MirrorAction::CreateDir(r.clone()));
                    }
                    None => actions.push(MirrorAction::CreateDir(r.clone())),
                }
                plan_subtree(&s, &d, &r, actions)?;
            }
            EntryKind::Link => {
                let same = d_kind == Some(EntryKind::Link) && fs::read_link(&s)? == fs::read_link(&d)?;
                if !same {
                    if d_kind.is_some() {
                        actions.push(MirrorAction::Remove(r.clone()));
                    }
                    actions.push(MirrorAction::CopyLink(r));
                }
            }
            EntryKind::File => match d_kind {
                Some(EntryKind::File) => {
                    if !files_identical(&s, &d)? {
                        actions.push(MirrorAction::ReplaceFile(r));
                    }
                }
                Some(_) => {
                    actions.push(MirrorAction::Remove(r.clone()));
                    actions.push(MirrorAction::CopyFile(r));
                }
                None => actions.push(MirrorAction::CopyFile(r)),
            },
        }
    }

    // Destination entries with no source counterpart get removed wholesale;
    // there is no need to descend into them.
    if dst.is_dir() {
        for entry in fs::read_dir(dst)? {
            let entry = entry?;
            let name = entry.file_name();
            if kind_of(&src.join(&name))?.is_none() {
                actions.push(MirrorAction::Remove(rel.join(&name)));
            }
        }
    }

    Ok(())
}

/// Apply a previously computed plan, in order.
///
/// # Errors
///
/// Returns the first I/O error; earlier actions stay applied.
pub fn apply(src: &Path, dst: &Path, actions: &[MirrorAction]) -> io::Result<()> {
    for action in actions {
        match action {
            MirrorAction::CreateDir(rel) => {
                fs::create_dir_all(dst.join(rel))?;
            }
            MirrorAction::CopyFile(rel) | MirrorAction::ReplaceFile(rel) => {
                let target = dst.join(rel);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                copy_with_mtime(&src.join(rel), &target)?;
            }
            MirrorAction::CopyLink(rel) => {
                let target = dst.join(rel);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                std::os::unix::fs::symlink(fs::read_link(src.join(rel))?, target)?;
            }
            MirrorAction::Remove(rel) => {
                let target = dst.join(rel);
                let meta = fs::symlink_metadata(&target)?;
                if meta.file_type().is_dir() {
                    fs::remove_dir_all(target)?;
                } else {
                    fs::remove_file(target)?;
                }
            }
        }
    }
    Ok(())
}

/// One-line count summary of a plan, e.g. `3 copied, 1 replaced, 2 removed`.
fn summarize(actions: &[MirrorAction]) -> String {
    let mut dirs = 0usize;
    let mut copied = 0usize;
    let mut replaced = 0usize;
    let mut linked = 0usize;
    let mut removed = 0usize;
    for action in actions {
        match action {
            MirrorAction::CreateDir(_) => dirs += 1,
            MirrorAction::CopyFile(_) => copied += 1,
            MirrorAction::ReplaceFile(_) => replaced += 1,
            MirrorAction::CopyLink(_) => linked += 1,
            MirrorAction::Remove(_) => removed += 1,
        }
    }

    let mut parts = Vec::new();
    if dirs > 0 {
        parts.push(format!("{dirs} dirs created"));
    }
    if copied > 0 {
        parts.push(format!("{copied} copied"));
    }
    if replaced > 0 {
        parts.push(format!("{replaced} replaced"));
    }
    if linked > 0 {
        parts.push(format!("{linked} linked"));
    }
    if removed > 0 {
        parts.push(format!("{removed} removed"));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn touch(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn backdate(path: &Path, secs: u64) -> SystemTime {
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        mtime
    }

    // -----------------------------------------------------------------------
    // plan
    // -----------------------------------------------------------------------

    #[test]
    fn plan_for_empty_destination_copies_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("a.txt"), b"a");
        touch(&src.join("sub/b.txt"), b"b");

        let actions = plan(&src, &tmp.path().join("dst")).unwrap();
        assert!(actions.contains(&MirrorAction::CopyFile(PathBuf::from("a.txt"))));
        assert!(actions.contains(&MirrorAction::CreateDir(PathBuf::from("sub"))));
        assert!(actions.contains(&MirrorAction::CopyFile(PathBuf::from("sub/b.txt"))));
    }

    #[test]
    fn plan_detects_changed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("a.txt"), b"new");
        touch(&dst.join("a.txt"), b"old");

        let actions = plan(&src, &dst).unwrap();
        assert_eq!(
            actions,
            vec![MirrorAction::ReplaceFile(PathBuf::from("a.txt"))]
        );
    }

    #[test]
    fn plan_removes_extraneous_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        touch(&dst.join("stale.txt"), b"x");
        fs::create_dir_all(dst.join("stale-dir/deep")).unwrap();

        let actions = plan(&src, &dst).unwrap();
        assert!(actions.contains(&MirrorAction::Remove(PathBuf::from("stale.txt"))));
        assert!(actions.contains(&MirrorAction::Remove(PathBuf::from("stale-dir"))));
        // Removal is wholesale, no descent into the stale directory.
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn plan_handles_file_replaced_by_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("entry/inner.txt"), b"x");
        touch(&dst.join("entry"), b"was a file");

        let actions = plan(&src, &dst).unwrap();
        let remove = actions
            .iter()
            .position(|a| *a == MirrorAction::Remove(PathBuf::from("entry")))
            .expect("plan must remove the shadowing file");
        let create = actions
            .iter()
            .position(|a| *a == MirrorAction::CreateDir(PathBuf::from("entry")))
            .expect("plan must recreate the directory");
        assert!(remove < create, "removal must precede creation");
    }

    #[test]
    fn plan_handles_directory_replaced_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("entry"), b"now a file");
        fs::create_dir_all(dst.join("entry/deep")).unwrap();

        let actions = plan(&src, &dst).unwrap();
        assert_eq!(
            actions,
            vec![
                MirrorAction::Remove(PathBuf::from("entry")),
                MirrorAction::CopyFile(PathBuf::from("entry")),
            ]
        );
    }

    #[test]
    fn plan_preserves_empty_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("empty")).unwrap();

        let actions = plan(&src, &tmp.path().join("dst")).unwrap();
        assert_eq!(
            actions,
            vec![MirrorAction::CreateDir(PathBuf::from("empty"))]
        );
    }

    // -----------------------------------------------------------------------
    // mirror
    // -----------------------------------------------------------------------

    #[test]
    fn mirror_missing_source_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let log = Logger::new(false);
        let result = mirror(
            &tmp.path().join("gone"),
            &tmp.path().join("dst"),
            false,
            &log,
        )
        .unwrap();
        assert_eq!(result, Transfer::SourceMissing);
        assert!(!tmp.path().join("dst").exists());
    }

    #[test]
    fn mirror_copies_and_second_run_is_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("a.txt"), b"alpha");
        touch(&src.join("sub/b.txt"), b"beta");
        fs::create_dir_all(src.join("empty")).unwrap();
        let log = Logger::new(false);

        let first = mirror(&src, &dst, false, &log).unwrap();
        assert!(matches!(first, Transfer::Done { .. }));
        assert_eq!(fs::read(dst.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(dst.join("sub/b.txt")).unwrap(), b"beta");
        assert!(dst.join("empty").is_dir());

        let second = mirror(&src, &dst, false, &log).unwrap();
        assert_eq!(second, Transfer::Unchanged);
    }

    #[test]
    fn mirror_preserves_modification_times() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("old.txt"), b"x");
        let mtime = backdate(&src.join("old.txt"), 1_000_000);
        let log = Logger::new(false);

        mirror(&src, &dst, false, &log).unwrap();
        assert_eq!(
            fs::metadata(dst.join("old.txt")).unwrap().modified().unwrap(),
            mtime,
            "copied files must keep the source mtime"
        );
    }

    #[test]
    fn mirror_recreates_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("a.txt"), b"a");
        std::os::unix::fs::symlink("a.txt", src.join("a.link")).unwrap();
        // Dangling links are user state too.
        std::os::unix::fs::symlink("/nonexistent/target", src.join("broken.link")).unwrap();
        let log = Logger::new(false);

        let first = mirror(&src, &dst, false, &log).unwrap();
        assert!(matches!(first, Transfer::Done { .. }));
        assert_eq!(
            fs::read_link(dst.join("a.link")).unwrap(),
            PathBuf::from("a.txt")
        );
        assert_eq!(
            fs::read_link(dst.join("broken.link")).unwrap(),
            PathBuf::from("/nonexistent/target")
        );

        let second = mirror(&src, &dst, false, &log).unwrap();
        assert_eq!(second, Transfer::Unchanged, "link round-trip must be idempotent");
    }

    #[test]
    fn mirror_updates_retargeted_symlink() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        std::os::unix::fs::symlink("new-target", src.join("l")).unwrap();
        std::os::unix::fs::symlink("old-target", dst.join("l")).unwrap();
        let log = Logger::new(false);

        mirror(&src, &dst, false, &log).unwrap();
        assert_eq!(fs::read_link(dst.join("l")).unwrap(), PathBuf::from("new-target"));
    }

    #[test]
    fn mirror_removes_extraneous_destination_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("keep.txt"), b"k");
        touch(&dst.join("keep.txt"), b"k");
        touch(&dst.join("stale.txt"), b"s");
        std::os::unix::fs::symlink("/nowhere", dst.join("stale.link")).unwrap();
        let log = Logger::new(false);

        let result = mirror(&src, &dst, false, &log).unwrap();
        assert!(matches!(result, Transfer::Done { .. }));
        assert!(dst.join("keep.txt").is_file());
        assert!(!dst.join("stale.txt").exists());
        assert!(
            fs::symlink_metadata(dst.join("stale.link")).is_err(),
            "stale symlinks must be removed too"
        );
    }

    #[test]
    fn mirror_dry_run_mutates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("a.txt"), b"a");
        touch(&dst.join("stale.txt"), b"s");
        let log = Logger::new(false);

        let result = mirror(&src, &dst, true, &log).unwrap();
        match result {
            Transfer::Planned { detail } => assert!(!detail.is_empty()),
            other => panic!("expected Planned, got {other:?}"),
        }
        assert!(!dst.join("a.txt").exists());
        assert!(dst.join("stale.txt").exists(), "dry-run must not remove");
    }

    #[test]
    fn mirror_dry_run_on_matching_trees_is_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("a.txt"), b"same");
        touch(&dst.join("a.txt"), b"same");
        let log = Logger::new(false);

        let result = mirror(&src, &dst, true, &log).unwrap();
        assert_eq!(result, Transfer::Unchanged);
    }

    // -----------------------------------------------------------------------
    // summarize
    // -----------------------------------------------------------------------

    #[test]
    fn summarize_counts_each_kind() {
        let actions = vec![
            MirrorAction::CreateDir(PathBuf::from("d")),
            MirrorAction::CopyFile(PathBuf::from("a")),
            MirrorAction::CopyFile(PathBuf::from("b")),
            MirrorAction::ReplaceFile(PathBuf::from("c")),
            MirrorAction::CopyLink(PathBuf::from("l")),
            MirrorAction::Remove(PathBuf::from("e")),
        ];
        assert_eq!(
            summarize(&actions),
            "1 dirs created, 2 copied, 1 replaced, 1 linked, 1 removed"
        );
    }
}
