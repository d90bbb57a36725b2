mod mode;
pub use mode::FileMode;

mod ownership;
pub use ownership::Ownership;

mod constants;
pub use constants::{CONTEXT_CLUSTERNAME, CONTEXT_INCLUDE, CONTEXT_SLURM_USER};
pub use constants::{CONTEXT_SLURMD_SPOOL_DIR, CONTEXT_STATE_SAVE_LOCATION};

/// Timeout value in milliseconds.
///
/// Used wherever an external process is waited on with an explicit bound.
pub type TimeoutMs = u64;
