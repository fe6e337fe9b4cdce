//! Pre-push hook lifecycle.
//!
//! The hook is a single file that this tool creates, recognises and deletes.
//! Ownership is decided by whether the file contains the ownership marker,
//! which is the command the hook was installed with. A hook that exists but
//! lacks the marker belongs to someone else and is never touched.

use crate::core::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Name of the only hook this tool manages.
pub const HOOK_NAME: &str = "pre-push";

/// Shebang line of generated hooks.
pub const SHEBANG: &str = "#!/bin/sh";

/// Observed state of the hook file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    /// No file at the hook path.
    Absent,
    /// File exists and contains the ownership marker.
    Owned,
    /// File exists and does not contain the ownership marker.
    ForeignOccupied,
}

impl HookStatus {
    /// Returns a human-readable name for the status.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Owned => "installed",
            Self::ForeignOccupied => "occupied by another hook",
        }
    }
}

impl std::fmt::Display for HookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Renders the script written by [`HookFile::install`].
#[must_use]
pub fn render_script(command: &str) -> String {
    format!("{SHEBANG}\n\n{command}\n")
}

/// A git hook file at a fixed path.
#[derive(Debug, Clone)]
pub struct HookFile {
    path: PathBuf,
}

impl HookFile {
    /// Creates a handle for the hook at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the hook path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classifies the hook file against `marker`.
    pub fn status(&self, marker: &str) -> Result<HookStatus> {
        let Some(contents) = self.read()? else {
            return Ok(HookStatus::Absent);
        };

        if String::from_utf8_lossy(&contents).contains(marker) {
            Ok(HookStatus::Owned)
        } else {
            Ok(HookStatus::ForeignOccupied)
        }
    }

    /// Writes a new hook that runs `command`.
    ///
    /// Fails with [`Error::HookAlreadyExists`] if anything is already at the
    /// path, owned or not. The file is opened with `create_new`, so the
    /// existence check and the creation cannot interleave with another writer.
    pub fn install(&self, command: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| Error::io("create hooks dir", e))?;
            }
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::HookAlreadyExists {
                    path: self.path.clone(),
                });
            },
            Err(e) => return Err(Error::io("create hook", e)),
        };

        let written = file
            .write_all(render_script(command).as_bytes())
            .map_err(|e| Error::io("write hook", e));
        drop(file);

        if let Err(e) = written.and_then(|()| make_executable(&self.path)) {
            return Err(self.abandon(e));
        }

        tracing::debug!(path = %self.path.display(), command, "Installed hook");
        Ok(())
    }

    /// Deletes the hook if it carries `marker`.
    ///
    /// Returns `Ok(false)` when there was nothing to remove. A hook without
    /// the marker is left untouched and reported as [`Error::HookNotOwned`].
    pub fn remove(&self, marker: &str) -> Result<bool> {
        match self.status(marker)? {
            HookStatus::Absent => {
                tracing::debug!(path = %self.path.display(), "No hook to remove");
                Ok(false)
            },
            HookStatus::ForeignOccupied => Err(Error::HookNotOwned {
                path: self.path.clone(),
            }),
            HookStatus::Owned => {
                std::fs::remove_file(&self.path).map_err(|e| Error::io("remove hook", e))?;
                tracing::debug!(path = %self.path.display(), "Removed hook");
                Ok(true)
            },
        }
    }

    /// Deletes a hook this call just created and failed to finish.
    ///
    /// A half-written hook would block both install and remove.
    fn abandon(&self, error: Error) -> Error {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial hook"
            );
        }
        error
    }

    /// Reads the hook contents, `None` if nothing occupies the path.
    ///
    /// A dangling symlink occupies the path but has no contents, so it reads
    /// as empty and classifies as foreign.
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if std::fs::symlink_metadata(&self.path).is_ok() {
                    tracing::debug!(path = %self.path.display(), "Hook is a dangling symlink");
                    Ok(Some(Vec::new()))
                } else {
                    Ok(None)
                }
            },
            Err(e) => Err(Error::io("read hook", e)),
        }
    }
}

/// Adds execute permission wherever read permission is already granted,
/// and always for the owner. Existing bits are kept.
#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)
        .map_err(|e| Error::io("get hook metadata", e))?
        .permissions();
    let mode = perms.mode();
    perms.set_mode(mode | 0o100 | ((mode & 0o444) >> 2));
    std::fs::set_permissions(path, perms).map_err(|e| Error::io("set hook perms", e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    const COMMAND: &str = "python3 standards.py --check";
    const MARKER: &str = "standards.py --check";

    fn hook_in(temp: &TempDir) -> HookFile {
        HookFile::new(temp.path().join(".git/hooks/pre-push"))
    }

    fn read(hook: &HookFile) -> String {
        std::fs::read_to_string(hook.path()).expect("read hook")
    }

    // =========================================================================
    // Install tests
    // =========================================================================

    #[test]
    fn test_install_writes_script() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);

        hook.install(COMMAND).expect("install");

        assert_eq!(read(&hook), "#!/bin/sh\n\npython3 standards.py --check\n");
        assert_eq!(hook.status(MARKER).expect("status"), HookStatus::Owned);
    }

    #[cfg(unix)]
    #[test]
    fn test_install_sets_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        hook.install(COMMAND).expect("install");

        let mode = std::fs::metadata(hook.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_ne!(mode & 0o100, 0, "owner execute bit missing: {mode:o}");
        assert_ne!(mode & 0o400, 0, "owner read bit cleared: {mode:o}");
    }

    #[test]
    fn test_install_twice_fails_and_keeps_file() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        hook.install(COMMAND).expect("install");

        let result = hook.install("something else");

        assert!(matches!(result, Err(Error::HookAlreadyExists { .. })));
        assert_eq!(read(&hook), render_script(COMMAND));
    }

    #[test]
    fn test_install_over_foreign_hook_fails() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(hook.path(), "echo hi").expect("write foreign");

        let result = hook.install(COMMAND);

        assert!(matches!(result, Err(Error::HookAlreadyExists { .. })));
        assert_eq!(read(&hook), "echo hi");
    }

    #[test]
    fn test_install_over_empty_file_fails() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(hook.path(), "").expect("write empty");

        assert!(matches!(
            hook.install(COMMAND),
            Err(Error::HookAlreadyExists { .. })
        ));
        assert_eq!(read(&hook), "");
    }

    #[test]
    fn test_install_creates_hooks_dir() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = HookFile::new(temp.path().join("custom/hooks/pre-push"));

        hook.install(COMMAND).expect("install");

        assert!(hook.path().exists());
    }

    // =========================================================================
    // Remove tests
    // =========================================================================

    #[test]
    fn test_remove_absent_is_noop() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);

        assert!(!hook.remove(MARKER).expect("remove"));
        assert_eq!(hook.status(MARKER).expect("status"), HookStatus::Absent);
    }

    #[test]
    fn test_remove_owned_deletes_file() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        hook.install(COMMAND).expect("install");

        assert!(hook.remove(MARKER).expect("remove"));
        assert!(!hook.path().exists());
    }

    #[test]
    fn test_remove_foreign_fails_and_keeps_bytes() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        let foreign: &[u8] = b"#!/bin/sh\n\xff\xfe not utf8\necho hi\n";
        std::fs::write(hook.path(), foreign).expect("write foreign");

        let result = hook.remove(MARKER);

        assert!(matches!(result, Err(Error::HookNotOwned { .. })));
        assert_eq!(std::fs::read(hook.path()).expect("read"), foreign);
    }

    #[test]
    fn test_install_remove_round_trip() {
        let temp = TempDir::new().expect("create temp dir");
        let hooks_dir = temp.path().join(".git/hooks");
        std::fs::create_dir_all(&hooks_dir).expect("mkdir");
        let hook = HookFile::new(hooks_dir.join(HOOK_NAME));

        hook.install(COMMAND).expect("install");
        hook.remove(COMMAND).expect("remove");

        let remaining: Vec<_> = std::fs::read_dir(&hooks_dir)
            .expect("read dir")
            .collect();
        assert!(remaining.is_empty());
        assert_eq!(hook.status(COMMAND).expect("status"), HookStatus::Absent);
    }

    #[test]
    fn test_remove_then_install_again() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);

        hook.install(COMMAND).expect("install");
        hook.remove(MARKER).expect("remove");
        hook.install(COMMAND).expect("reinstall");

        assert_eq!(hook.status(MARKER).expect("status"), HookStatus::Owned);
    }

    // =========================================================================
    // Status tests
    // =========================================================================

    #[rstest]
    #[case("standards check", "standards check", HookStatus::Owned)]
    #[case("/usr/local/bin/standards check", "standards check", HookStatus::Owned)]
    #[case("standards check --verbose", "standards check", HookStatus::Owned)]
    #[case("standards fix", "standards check", HookStatus::ForeignOccupied)]
    #[case("echo hi", "standards check", HookStatus::ForeignOccupied)]
    fn test_status_follows_marker(
        #[case] command: &str,
        #[case] marker: &str,
        #[case] expected: HookStatus,
    ) {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        hook.install(command).expect("install");

        assert_eq!(hook.status(marker).expect("status"), expected);
    }

    #[test]
    fn test_status_absent() {
        let temp = TempDir::new().expect("create temp dir");
        assert_eq!(
            hook_in(&temp).status(MARKER).expect("status"),
            HookStatus::Absent
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HookStatus::Owned.to_string(), "installed");
        assert_eq!(HookStatus::Absent.to_string(), "absent");
    }

    #[test]
    fn test_abandon_removes_partial_hook() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(hook.path(), "#!/bin/sh\n\nstan").expect("write partial");

        let error = hook.abandon(Error::io("write hook", std::io::Error::other("disk full")));

        assert!(matches!(error, Error::Io { .. }));
        assert_eq!(hook.status(MARKER).expect("status"), HookStatus::Absent);
        hook.install(COMMAND).expect("install after cleanup");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_foreign() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        std::os::unix::fs::symlink(temp.path().join("missing-target"), hook.path())
            .expect("symlink");

        assert_eq!(
            hook.status(MARKER).expect("status"),
            HookStatus::ForeignOccupied
        );
        assert!(matches!(
            hook.install(COMMAND),
            Err(Error::HookAlreadyExists { .. })
        ));
        assert!(matches!(
            hook.remove(MARKER),
            Err(Error::HookNotOwned { .. })
        ));
        assert!(std::fs::symlink_metadata(hook.path()).is_ok());
    }

    #[test]
    fn test_marker_mention_in_foreign_hook_is_not_ours() {
        let temp = TempDir::new().expect("create temp dir");
        let hook = hook_in(&temp);
        std::fs::create_dir_all(hook.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(hook.path(), "#!/bin/sh\nstandards check || true\n").expect("write");

        let marker = "'/usr/local/bin/standards' check";
        assert!(matches!(
            hook.remove(marker),
            Err(Error::HookNotOwned { .. })
        ));
        assert!(hook.path().exists());
    }

    #[test]
    fn test_render_script_has_two_non_empty_lines() {
        let script = render_script("standards check");
        let lines: Vec<_> = script.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec![SHEBANG, "standards check"]);
    }
}
