//! Orphaned state-file removal
//!
//! A state file whose owner died (or whose PID was reused by another program)
//! is removed so the next server start begins from a clean slate. Removal is
//! best effort: no outcome is fatal to the coordinator.

use std::io;
use std::path::Path;

use tracing::{info, warn};

/// Result of an attempt to delete an orphaned state file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// The file was removed
    Deleted,
    /// The file had already disappeared
    AlreadyGone,
    /// The platform refused, typically because the writer still holds it open
    PermissionDenied,
    /// Deletion was not attempted on this platform
    Skipped,
    /// Any other I/O failure
    Failed(io::ErrorKind),
}

impl ReclaimOutcome {
    /// Whether the orphan no longer exists on disk
    pub fn is_reclaimed(&self) -> bool {
        matches!(self, Self::Deleted | Self::AlreadyGone)
    }
}

/// Delete the orphaned state file at `path`, logging the outcome
pub fn reclaim_orphan(path: &Path) -> ReclaimOutcome {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Orphan beacon file '{}' deleted", path.display());
            ReclaimOutcome::Deleted
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Orphan beacon file '{}' already removed", path.display());
            ReclaimOutcome::AlreadyGone
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!("Permission error {}: cannot delete '{}'", e, path.display());
            ReclaimOutcome::PermissionDenied
        }
        Err(e) => {
            warn!("Failed to delete orphan beacon file '{}': {}", path.display(), e);
            ReclaimOutcome::Failed(e.kind())
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reclaim_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".uxplay.ble");
        std::fs::write(&path, [0u8; 8]).unwrap();

        assert_eq!(reclaim_orphan(&path), ReclaimOutcome::Deleted);
        assert!(!path.exists());
    }

    #[test]
    fn test_reclaim_missing_file_is_benign() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-written");

        let outcome = reclaim_orphan(&path);
        assert_eq!(outcome, ReclaimOutcome::AlreadyGone);
        assert!(outcome.is_reclaimed());
    }

    #[test]
    fn test_reclaim_directory_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = reclaim_orphan(dir.path());
        assert!(!outcome.is_reclaimed());
        assert!(dir.path().exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_reclaim_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let path = locked.join(".uxplay.ble");
        std::fs::write(&path, [0u8; 8]).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let outcome = reclaim_orphan(&path);

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores directory permissions, so deletion may still succeed
        if path.exists() {
            assert_eq!(outcome, ReclaimOutcome::PermissionDenied);
        } else {
            assert_eq!(outcome, ReclaimOutcome::Deleted);
        }
    }
}
