use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicI32, Ordering},
};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::LoggerError;

/// Local offset in seconds, captured by [`init_local_offset`]. Zero until then.
static LOCAL_OFFSET_SECS: AtomicI32 = AtomicI32::new(0);

/// Timezone used for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

impl LoggerTimeZone {
    pub(crate) fn offset(self) -> UtcOffset {
        match self {
            Self::Utc => UtcOffset::UTC,
            Self::Local => UtcOffset::from_whole_seconds(LOCAL_OFFSET_SECS.load(Ordering::Relaxed))
                .unwrap_or(UtcOffset::UTC),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utc => "utc",
            Self::Local => "local",
        })
    }
}

/// Capture the local UTC offset.
///
/// Must run in `main()` before any other thread is spawned (including the
/// tokio runtime): offset detection refuses to work in multi-threaded
/// processes on most Unix platforms. Leaves UTC in place on failure.
pub fn init_local_offset() {
    if let Ok(offset) = UtcOffset::current_local_offset() {
        LOCAL_OFFSET_SECS.store(offset.whole_seconds(), Ordering::Relaxed);
    }
}
