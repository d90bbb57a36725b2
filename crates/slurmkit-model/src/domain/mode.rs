use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Permission bits for a rendered file or provisioned directory.
///
/// Serialized as an octal string (`"0644"`) so layout files read the way
/// `chmod` arguments do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct FileMode(u32);

impl FileMode {
    /// Main scheduler configuration: world-readable, owner-writable.
    pub const CONFIG: FileMode = FileMode(0o644);
    /// Shared secret: owner read-only.
    pub const SECRET: FileMode = FileMode(0o400);
    /// Spool and state-save directories.
    pub const DIRECTORY: FileMode = FileMode(0o750);

    const MAX: u32 = 0o7777;

    /// Build a mode from raw bits, rejecting anything outside `0o7777`.
    pub fn new(bits: u32) -> Result<Self, ModelError> {
        if bits > Self::MAX {
            return Err(ModelError::InvalidMode(format!("{bits:o} exceeds 7777")));
        }
        Ok(Self(bits))
    }

    /// Raw permission bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl FromStr for FileMode {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .unwrap_or(trimmed)
            .trim_start_matches('0');
        if digits.is_empty() {
            return if trimmed.is_empty() {
                Err(ModelError::InvalidMode(s.to_string()))
            } else {
                Ok(Self(0))
            };
        }
        let bits = u32::from_str_radix(digits, 8)
            .map_err(|e| ModelError::InvalidMode(format!("{s}: {e}")))?;
        Self::new(bits)
    }
}

impl TryFrom<String> for FileMode {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FileMode> for String {
    fn from(m: FileMode) -> Self {
        m.to_string()
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}
