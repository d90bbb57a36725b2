use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::TimeoutMs;

/// How the installed scheduler is asked for its version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionProbe {
    /// Query binary; absent binary means the scheduler is not installed.
    pub binary: PathBuf,
    /// Single flag that makes the binary print `<name> <version>`.
    pub flag: String,
    /// Upper bound on how long the binary may run.
    pub timeout_ms: TimeoutMs,
}

impl VersionProbe {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for VersionProbe {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/bin/sinfo"),
            flag: "-V".to_string(),
            timeout_ms: 10_000,
        }
    }
}
