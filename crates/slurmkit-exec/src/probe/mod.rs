//! Scheduler version probe.
//!
//! Runs the scheduler's query binary with a single version flag via
//! `tokio::process::Command` and reads the version off stdout. Three outcomes
//! are kept apart: a version string, the `"Unknown"` sentinel (binary ran
//! but failed), and `None` (binary not installed).
mod runner;
mod version;

pub use runner::probe_version;
pub use version::SchedulerVersion;
