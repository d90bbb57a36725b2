mod domain;
pub use domain::{CONTEXT_CLUSTERNAME, CONTEXT_INCLUDE, CONTEXT_SLURM_USER};
pub use domain::{CONTEXT_SLURMD_SPOOL_DIR, CONTEXT_STATE_SAVE_LOCATION};
pub use domain::{FileMode, Ownership, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod context;
pub use context::SlurmContext;

mod layout;
pub use layout::{ProvisionLayout, VersionProbe};
