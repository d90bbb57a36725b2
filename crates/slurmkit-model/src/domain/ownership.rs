use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner and group names applied to a rendered file or created directory.
///
/// Names are resolved to numeric ids only when the write happens, so a
/// layout can reference accounts that a package install creates later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: String,
    group: String,
}

impl Ownership {
    /// Create an ownership pair from distinct owner and group names.
    pub fn new<O, G>(owner: O, group: G) -> Self
    where
        O: Into<String>,
        G: Into<String>,
    {
        Self {
            owner: owner.into(),
            group: group.into(),
        }
    }

    /// Use one name for both owner and group (`slurm:slurm`, `munge:munge`).
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            group: name.clone(),
            owner: name,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.group)
    }
}
