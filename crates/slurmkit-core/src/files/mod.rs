//! Ownership-aware filesystem primitives.
mod dir;
pub use dir::ensure_directory;

mod write;
pub use write::write_file;

use nix::unistd::{Gid, Group, Uid, User};

use slurmkit_model::Ownership;

use crate::{ProvisionError, ProvisionResult};

/// Resolve owner and group names to numeric ids.
pub(crate) fn resolve_ownership(ownership: &Ownership) -> ProvisionResult<(Uid, Gid)> {
    let user = User::from_name(ownership.owner())
        .ok()
        .flatten()
        .ok_or_else(|| ProvisionError::UnknownIdentity {
            kind: "user",
            name: ownership.owner().to_string(),
        })?;
    let group = Group::from_name(ownership.group())
        .ok()
        .flatten()
        .ok_or_else(|| ProvisionError::UnknownIdentity {
            kind: "group",
            name: ownership.group().to_string(),
        })?;
    Ok((user.uid, group.gid))
}

/// Owner and primary group of the test process; chown to these never needs privileges.
#[cfg(test)]
pub(crate) fn current_ownership() -> Ownership {
    let user = User::from_uid(Uid::current())
        .expect("passwd lookup")
        .expect("test user has a passwd entry");
    let group = Group::from_gid(Gid::current())
        .expect("group lookup")
        .expect("test group has a group entry");
    Ownership::new(user.name, group.name)
}
