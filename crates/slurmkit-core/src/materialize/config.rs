use std::{
    borrow::Cow,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use serde_json::Value;
use tracing::{debug, info};

use slurmkit_model::{Ownership, SlurmContext};

use crate::{
    ProvisionError, ProvisionResult,
    materialize::Materializer,
    render::{Render, RenderRequest},
};

/// Template variable holding the include fragment path.
const INCLUDE_CONFIG_VAR: &str = "include_config";

/// What happened to the include fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// The fragment was created or overwritten.
    Written,
    /// Active controller with an existing fragment: left untouched.
    Preserved,
}

/// Body written to the include fragment when the context carries none.
pub fn default_include_config(config_path: &Path) -> String {
    format!(
        "# This file is automatically distributed to the Slurm cluster by Juju.\n\
         # To add configuration to this file, edit the file on the active\n\
         # slurm controller and wait some minutes for the next update-status\n\
         # hook.\n\
         #\n\
         # To find your active controller, look for ControlMachine and\n\
         # ControlAddr in {}.\n\
         #\n\
         # To find the unit name of the active controller, read the\n\
         # active_controller leader setting of the slurm-controller application.\n",
        config_path.display()
    )
}

impl<R: Render> Materializer<'_, R> {
    /// Render the main scheduler config and refresh the include fragment.
    ///
    /// The main config is always rendered, owned by `slurm_user` with
    /// `layout.config_mode` (0644 unless overridden). The include fragment
    /// at `<config_dir>/<prefix>-<clustername>.conf` receives `context.include` or [`default_include_config`], except on
    /// the active controller when the fragment already exists: those are the
    /// controller's own edits and are kept.
    ///
    /// On the active controller the existence check and creation are a
    /// single `O_EXCL` open.
    pub fn materialize_config(
        &self,
        ctx: &SlurmContext,
        active_controller: bool,
    ) -> ProvisionResult<IncludeOutcome> {
        let layout = self.layout;
        let include_path = layout.include_path(ctx.clustername());
        debug_assert!(layout.in_config_dir(&include_path));

        let mut vars = ctx.values().clone();
        vars.insert(
            INCLUDE_CONFIG_VAR.to_string(),
            Value::String(include_path.display().to_string()),
        );

        self.renderer.render(&RenderRequest {
            template: &layout.config_template,
            target: &layout.config_path,
            context: &vars,
            ownership: Ownership::same(ctx.slurm_user()),
            mode: layout.config_mode,
        })?;

        let body = match ctx.include() {
            Some(include) => Cow::Borrowed(include),
            None => Cow::Owned(default_include_config(&layout.config_path)),
        };

        let outcome = write_include(&include_path, &body, active_controller)?;
        match outcome {
            IncludeOutcome::Preserved => info!(
                path = %include_path.display(),
                "active controller and include exists; not rendering",
            ),
            IncludeOutcome::Written => debug!(
                path = %include_path.display(),
                from_context = ctx.include().is_some(),
                "include written",
            ),
        }
        Ok(outcome)
    }
}

fn write_include(path: &Path, body: &str, keep_existing: bool) -> ProvisionResult<IncludeOutcome> {
    if keep_existing {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => {
                fill_new(path, file, body)?;
                return Ok(IncludeOutcome::Written);
            }
            // A dangling symlink is not an existing fragment; write through it.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && !path.exists() => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(IncludeOutcome::Preserved);
            }
            Err(e) => return Err(ProvisionError::io(path, e)),
        }
    }

    fs::write(path, body).map_err(|e| ProvisionError::io(path, e))?;
    Ok(IncludeOutcome::Written)
}

/// Fill a fragment this run just created. On failure the file is removed,
/// otherwise the active controller would keep a truncated fragment forever.
fn fill_new(path: &Path, mut file: impl Write, body: &str) -> ProvisionResult<()> {
    if let Err(e) = file.write_all(body.as_bytes()).and_then(|()| file.flush()) {
        let _ = fs::remove_file(path);
        return Err(ProvisionError::io(path, e));
    }
    Ok(())
}
