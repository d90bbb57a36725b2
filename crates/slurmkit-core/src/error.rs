use std::{io, path::PathBuf};

use nix::errno::Errno;
use thiserror::Error;

use slurmkit_model::ModelError;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Context(#[from] ModelError),

    #[error("permission denied on '{}': {reason}", .path.display())]
    Permission { path: PathBuf, reason: String },

    #[error("cannot create directory '{}': {reason}", .path.display())]
    DirectoryCreate { path: PathBuf, reason: String },

    #[error("unknown {kind} '{name}'")]
    UnknownIdentity { kind: &'static str, name: String },

    #[error("template '{name}': {reason}")]
    Template { name: String, reason: String },

    #[error("io error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProvisionError {
    /// Classify an I/O failure on `path`; permission problems get their own kind.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            return Self::Permission {
                path,
                reason: source.to_string(),
            };
        }
        Self::Io { path, source }
    }

    /// Same as [`ProvisionError::io`] for raw errno results (`chown`).
    pub(crate) fn errno(path: impl Into<PathBuf>, errno: Errno) -> Self {
        match errno {
            Errno::EPERM | Errno::EACCES => Self::Permission {
                path: path.into(),
                reason: errno.desc().to_string(),
            },
            other => Self::io(path, io::Error::from(other)),
        }
    }

    /// True for failures caused by a missing or invalid context key.
    pub fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_io_maps_to_permission() {
        let err = ProvisionError::io("/etc/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ProvisionError::Permission { .. }));

        let err = ProvisionError::io("/etc/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ProvisionError::Io { .. }));
    }

    #[test]
    fn eperm_maps_to_permission() {
        assert!(matches!(
            ProvisionError::errno("/etc/x", Errno::EPERM),
            ProvisionError::Permission { .. }
        ));
        assert!(matches!(
            ProvisionError::errno("/etc/x", Errno::ENOSPC),
            ProvisionError::Io { .. }
        ));
    }
}
