mod error;
pub use error::ExecError;

pub mod probe;
pub use probe::{SchedulerVersion, probe_version};
