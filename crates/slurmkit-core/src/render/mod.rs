//! Template rendering into owned, permissioned files.
//!
//! [`Render`] is the seam the materializers talk to; [`TemplateRenderer`]
//! is the minijinja-backed implementation used in production.
mod embedded;
mod template;

pub use template::TemplateRenderer;

use std::{fmt, path::Path};

use serde_json::{Map, Value};

use slurmkit_model::{FileMode, Ownership};

use crate::ProvisionResult;

/// One file to render: template, destination, variables and file attributes.
pub struct RenderRequest<'a> {
    /// Template name, e.g. `"slurm.conf"`.
    pub template: &'a str,
    /// Destination path; replaced atomically.
    pub target: &'a Path,
    /// Template variables.
    pub context: &'a Map<String, Value>,
    /// Owner and group of the written file.
    pub ownership: Ownership,
    /// Permission bits of the written file.
    pub mode: FileMode,
}

impl fmt::Debug for RenderRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Context values are not printed: the munge key travels through here.
        f.debug_struct("RenderRequest")
            .field("template", &self.template)
            .field("target", &self.target)
            .field("context_keys", &self.context.len())
            .field("ownership", &self.ownership)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Produces a file from a named template.
///
/// Implementations must be deterministic: identical requests yield
/// byte-identical files with identical attributes.
pub trait Render {
    fn render(&self, request: &RenderRequest<'_>) -> ProvisionResult<()>;
}

impl<R: Render + ?Sized> Render for &R {
    fn render(&self, request: &RenderRequest<'_>) -> ProvisionResult<()> {
        (**self).render(request)
    }
}
