//! Provisioning operations invoked by the node hooks.
//!
//! Each call is single-shot and idempotent: run it again on the next
//! reconciliation pass and the node converges to the same files.
mod config;
pub use config::{IncludeOutcome, default_include_config};

mod dirs;
pub use dirs::{create_spool_dir, create_state_save_location};

mod secret;

use slurmkit_model::ProvisionLayout;

use crate::render::Render;

/// Renders the scheduler config, include fragment and munge key for one layout.
pub struct Materializer<'a, R> {
    layout: &'a ProvisionLayout,
    renderer: R,
}

impl<'a, R: Render> Materializer<'a, R> {
    pub fn new(layout: &'a ProvisionLayout, renderer: R) -> Self {
        Self { layout, renderer }
    }

    pub fn layout(&self) -> &ProvisionLayout {
        self.layout
    }
}

/// Recording renderer shared by the materializer tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, path::PathBuf};

    use serde_json::{Map, Value};

    use slurmkit_model::{FileMode, Ownership};

    use crate::{
        ProvisionError, ProvisionResult,
        render::{Render, RenderRequest},
    };

    #[derive(Debug, Clone)]
    pub(crate) struct Rendered {
        pub template: String,
        pub target: PathBuf,
        pub context: Map<String, Value>,
        pub ownership: Ownership,
        pub mode: FileMode,
    }

    #[derive(Default)]
    pub(crate) struct Recorder {
        pub calls: RefCell<Vec<Rendered>>,
        pub fail: bool,
    }

    impl Recorder {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl Render for Recorder {
        fn render(&self, request: &RenderRequest<'_>) -> ProvisionResult<()> {
            self.calls.borrow_mut().push(Rendered {
                template: request.template.to_string(),
                target: request.target.to_path_buf(),
                context: request.context.clone(),
                ownership: request.ownership.clone(),
                mode: request.mode,
            });
            if self.fail {
                return Err(ProvisionError::Permission {
                    path: request.target.to_path_buf(),
                    reason: "denied".into(),
                });
            }
            Ok(())
        }
    }
}
