use std::fmt;

/// Version reported by the installed scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerVersion {
    /// Second whitespace-separated token of the probe output, e.g. `21.08.5`.
    Known(String),
    /// The binary ran but did not report a usable version.
    Unknown,
}

impl SchedulerVersion {
    /// Literal reported for [`SchedulerVersion::Unknown`].
    pub const UNKNOWN: &'static str = "Unknown";

    /// Parse successful probe output of the form `<name> <version> ...`.
    ///
    /// Output with fewer than two tokens yields [`SchedulerVersion::Unknown`].
    pub fn from_stdout(stdout: &str) -> Self {
        stdout
            .split_whitespace()
            .nth(1)
            .map_or(Self::Unknown, |v| Self::Known(v.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(v) => v,
            Self::Unknown => Self::UNKNOWN,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for SchedulerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SchedulerVersion;

    #[test]
    fn takes_second_token() {
        let v = SchedulerVersion::from_stdout("slurm 21.08.5\n");
        assert_eq!(v, SchedulerVersion::Known("21.08.5".into()));
        assert_eq!(v.to_string(), "21.08.5");
    }

    #[test]
    fn short_output_is_unknown() {
        for out in ["", "\n", "slurm"] {
            let v = SchedulerVersion::from_stdout(out);
            assert_eq!(v, SchedulerVersion::Unknown, "for {out:?}");
            assert_eq!(v.as_str(), "Unknown");
        }
    }
}
