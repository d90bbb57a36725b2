use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

use minijinja::{Environment, UndefinedBehavior};
use serde_json::{Map, Value};
use tracing::{debug, info};

use slurmkit_model::ProvisionLayout;

use crate::{
    ProvisionError, ProvisionResult,
    files::write_file,
    render::{Render, RenderRequest, embedded::embedded},
};

/// Minijinja renderer writing through [`write_file`].
///
/// Templates are looked up in `templates_dir` first, then among the
/// built-in ones. Undefined variables are errors rather than empty strings;
/// templates test optional keys with `is defined`.
pub struct TemplateRenderer {
    env: Environment<'static>,
    templates_dir: Option<PathBuf>,
}

impl TemplateRenderer {
    pub fn new(templates_dir: Option<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env, templates_dir }
    }

    /// Renderer using the layout's templates directory, if any.
    pub fn from_layout(layout: &ProvisionLayout) -> Self {
        Self::new(layout.templates_dir.clone())
    }

    /// Render `name` to a string without touching the filesystem.
    pub fn render_to_string(&self, name: &str, context: &Map<String, Value>) -> ProvisionResult<String> {
        let source = self.source(name)?;
        self.env
            .render_str(&source, context)
            .map_err(|e| ProvisionError::Template {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    fn source(&self, name: &str) -> ProvisionResult<Cow<'static, str>> {
        if let Some(dir) = &self.templates_dir {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(s) => {
                    debug!(template = name, path = %path.display(), "using template from disk");
                    return Ok(Cow::Owned(s));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(template_error(name, &path, e)),
            }
        }
        embedded(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| ProvisionError::Template {
                name: name.to_string(),
                reason: "no such template".to_string(),
            })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Render for TemplateRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> ProvisionResult<()> {
        let content = self.render_to_string(request.template, request.context)?;
        write_file(request.target, content.as_bytes(), &request.ownership, request.mode)?;

        info!(
            template = request.template,
            target = %request.target.display(),
            owner = %request.ownership,
            mode = %request.mode,
            "template rendered",
        );
        Ok(())
    }
}

fn template_error(name: &str, path: &Path, e: io::Error) -> ProvisionError {
    ProvisionError::Template {
        name: name.to_string(),
        reason: format!("{}: {e}", path.display()),
    }
}
