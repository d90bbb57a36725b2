use std::path::PathBuf;

use thiserror::Error;

use slurmkit_model::TimeoutMs;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("'{}' did not exit within {timeout_ms}ms", .binary.display())]
    ProbeTimeout { binary: PathBuf, timeout_ms: TimeoutMs },

    #[error("failed to spawn '{}': {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wait failed: {0}")]
    Wait(#[from] std::io::Error),
}
