pub mod error;
pub mod files;
pub mod materialize;
pub mod render;

pub use error::{ProvisionError, ProvisionResult};

pub mod prelude {
    pub use crate::error::{ProvisionError, ProvisionResult};
    pub use crate::files::ensure_directory;
    pub use crate::materialize::{
        IncludeOutcome, Materializer, create_spool_dir, create_state_save_location,
    };
    pub use crate::render::{Render, RenderRequest, TemplateRenderer};
}
