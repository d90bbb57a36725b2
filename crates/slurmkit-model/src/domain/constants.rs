//! Well-known context keys.
//!
//! The orchestration layer hands over a flat JSON object; these are the keys
//! the provisioning helpers read directly. Everything else is passed to
//! templates untouched.

/// Account the scheduler daemons run as; owner and group of rendered config.
pub const CONTEXT_SLURM_USER: &str = "slurm_user";

/// Cluster name; also names the include fragment.
pub const CONTEXT_CLUSTERNAME: &str = "clustername";

/// Controller-distributed include fragment body.
pub const CONTEXT_INCLUDE: &str = "include";

/// Spool directory used by the compute daemon.
pub const CONTEXT_SLURMD_SPOOL_DIR: &str = "slurmd_spool_dir";

/// Directory where the controller saves its state.
pub const CONTEXT_STATE_SAVE_LOCATION: &str = "state_save_location";
