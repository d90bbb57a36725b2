use std::{
    fs::{self, OpenOptions, Permissions},
    io::{self, Write},
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::{Path, PathBuf},
};

use nix::unistd::{Gid, Uid, chown};

use slurmkit_model::{FileMode, Ownership};

use crate::{ProvisionError, ProvisionResult, files::resolve_ownership};

/// Atomically replace `target` with `contents`, owned by `ownership` with `mode`.
///
/// The data is staged in a hidden sibling file, given its final owner and
/// mode, synced, then renamed over `target`. Readers never see a partially
/// written file or one with looser permissions than requested. The staging
/// file is removed on failure.
pub fn write_file(
    target: &Path,
    contents: &[u8],
    ownership: &Ownership,
    mode: FileMode,
) -> ProvisionResult<()> {
    let (uid, gid) = resolve_ownership(ownership)?;
    let staging = staging_path(target)?;

    // Leftover from an interrupted run; it may carry the wrong owner or mode.
    match fs::remove_file(&staging) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(ProvisionError::io(&staging, e)),
    }

    let res = stage(&staging, contents, uid, gid, mode)
        .and_then(|()| fs::rename(&staging, target).map_err(|e| ProvisionError::io(target, e)));
    if res.is_err() {
        let _ = fs::remove_file(&staging);
    }
    res
}

fn stage(path: &Path, contents: &[u8], uid: Uid, gid: Gid, mode: FileMode) -> ProvisionResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode.bits())
        .open(path)
        .map_err(|e| ProvisionError::io(path, e))?;

    file.write_all(contents)
        .map_err(|e| ProvisionError::io(path, e))?;

    chown(path, Some(uid), Some(gid)).map_err(|e| ProvisionError::errno(path, e))?;

    // The umask narrowed the creation mode; chown may have cleared set-id bits.
    fs::set_permissions(path, Permissions::from_mode(mode.bits()))
        .map_err(|e| ProvisionError::io(path, e))?;

    file.sync_all().map_err(|e| ProvisionError::io(path, e))
}

pub(super) fn staging_path(target: &Path) -> ProvisionResult<PathBuf> {
    let name = target.file_name().ok_or_else(|| {
        ProvisionError::io(
            target,
            io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"),
        )
    })?;
    Ok(target.with_file_name(format!(".{}.slurmkit-tmp", name.to_string_lossy())))
}
