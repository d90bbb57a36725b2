use std::{
    fs::{self, DirBuilder, Permissions},
    io,
    os::unix::fs::{DirBuilderExt, PermissionsExt},
    path::Path,
};

use nix::unistd::chown;
use tracing::{debug, info};

use slurmkit_model::{FileMode, Ownership};

use crate::{
    ProvisionError, ProvisionResult,
    files::{resolve_ownership, write::staging_path},
};

/// Make sure `path` is a directory.
///
/// An existing directory is left exactly as it is, ownership and mode
/// included. Otherwise any missing parents are created, and the leaf is
/// built under a hidden sibling name, given `ownership` and `mode`, then
/// renamed into place. A failure never leaves a half-provisioned leaf
/// that a later call would mistake for a finished one. Every failure,
/// including a non-directory already sitting at `path`, is
/// [`ProvisionError::DirectoryCreate`].
pub fn ensure_directory(path: &Path, ownership: &Ownership, mode: FileMode) -> ProvisionResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            debug!(path = %path.display(), "directory exists; leaving as is");
            return Ok(());
        }
        Ok(_) => return Err(dir_error(path, "path exists and is not a directory")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(dir_error(path, e)),
    }

    let (uid, gid) = resolve_ownership(ownership).map_err(|e| dir_error(path, e))?;

    if let Some(parent) = path.parent() {
        DirBuilder::new()
            .recursive(true)
            .mode(mode.bits())
            .create(parent)
            .map_err(|e| dir_error(path, e))?;
    }

    create_staged(path, mode, |staging| {
        chown(staging, Some(uid), Some(gid)).map_err(|e| dir_error(path, e))?;
        // The umask narrowed the creation mode.
        fs::set_permissions(staging, Permissions::from_mode(mode.bits()))
            .map_err(|e| dir_error(path, e))
    })?;

    info!(
        path = %path.display(),
        owner = %ownership,
        mode = %mode,
        "directory created",
    );
    Ok(())
}

/// Create the leaf under its staging name, run `finish` on it, then rename
/// it to `path`. The staging directory is removed on failure.
fn create_staged<F>(path: &Path, mode: FileMode, finish: F) -> ProvisionResult<()>
where
    F: FnOnce(&Path) -> ProvisionResult<()>,
{
    let staging = staging_path(path).map_err(|e| dir_error(path, e))?;

    // Leftover from an interrupted run.
    match fs::remove_dir(&staging) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(dir_error(&staging, e)),
    }

    DirBuilder::new()
        .mode(mode.bits())
        .create(&staging)
        .map_err(|e| dir_error(path, e))?;

    let res = finish(&staging)
        .and_then(|()| fs::rename(&staging, path).map_err(|e| dir_error(path, e)));
    if res.is_err() {
        let _ = fs::remove_dir(&staging);
    }
    res
}

fn dir_error(path: &Path, reason: impl ToString) -> ProvisionError {
    ProvisionError::DirectoryCreate {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::MetadataExt;

    use tempfile::tempdir;

    use super::*;
    use crate::files::current_ownership;

    #[test]
    fn creates_with_parents_and_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("var").join("spool").join("slurmd");

        ensure_directory(&path, &current_ownership(), FileMode::DIRECTORY).unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert!(meta.is_dir());
        assert_eq!(meta.mode() & 0o7777, 0o750);
    }

    #[test]
    fn second_call_leaves_existing_directory_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state");
        let owner = current_ownership();

        ensure_directory(&path, &owner, FileMode::DIRECTORY).unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o700)).unwrap();

        ensure_directory(&path, &owner, FileMode::DIRECTORY).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().mode() & 0o7777, 0o700);
    }

    #[test]
    fn existing_directory_skips_identity_lookup() {
        let dir = tempdir().unwrap();
        ensure_directory(
            dir.path(),
            &Ownership::same("slurmkit-no-such-user"),
            FileMode::DIRECTORY,
        )
        .unwrap();
    }

    #[test]
    fn file_in_the_way_is_directory_create_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spool");
        fs::write(&path, "not a dir").unwrap();

        let err = ensure_directory(&path, &current_ownership(), FileMode::DIRECTORY).unwrap_err();
        assert!(matches!(err, ProvisionError::DirectoryCreate { .. }));
        assert!(path.is_file());
    }

    #[test]
    fn unknown_owner_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spool");

        let err = ensure_directory(
            &path,
            &Ownership::same("slurmkit-no-such-user"),
            FileMode::DIRECTORY,
        )
        .unwrap_err();

        assert!(matches!(err, ProvisionError::DirectoryCreate { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn failed_attributes_leave_nothing_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spool");

        let err = create_staged(&path, FileMode::DIRECTORY, |staging| {
            assert!(staging.is_dir());
            Err(dir_error(staging, "Operation not permitted"))
        })
        .unwrap_err();

        assert!(matches!(err, ProvisionError::DirectoryCreate { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        // Nothing was mistaken for a finished directory.
        ensure_directory(&path, &current_ownership(), FileMode::DIRECTORY).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().mode() & 0o7777, 0o750);
    }

    #[test]
    fn foreign_owner_is_applied_or_nothing_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spool");

        // Succeeds only with the privilege to chown to root.
        match ensure_directory(&path, &Ownership::same("root"), FileMode::DIRECTORY) {
            Ok(()) => assert_eq!(fs::metadata(&path).unwrap().uid(), 0),
            Err(err) => {
                assert!(matches!(err, ProvisionError::DirectoryCreate { .. }));
                assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
            }
        }
    }

    #[test]
    fn stale_staging_directory_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state");
        fs::create_dir(dir.path().join(".state.slurmkit-tmp")).unwrap();

        ensure_directory(&path, &current_ownership(), FileMode::DIRECTORY).unwrap();

        assert!(path.is_dir());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("state")]);
    }
}
