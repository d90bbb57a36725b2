use tracing::info;

use slurmkit_model::SlurmContext;

use crate::{
    ProvisionResult,
    materialize::Materializer,
    render::{Render, RenderRequest},
};

impl<R: Render> Materializer<'_, R> {
    /// Render the shared munge key, owned by the authentication service
    /// account with `layout.munge_key_mode` (0400 unless overridden).
    ///
    /// Only the path is ever logged.
    pub fn materialize_secret(&self, ctx: &SlurmContext) -> ProvisionResult<()> {
        let layout = self.layout;
        self.renderer.render(&RenderRequest {
            template: &layout.munge_key_template,
            target: &layout.munge_key_path,
            context: ctx.values(),
            ownership: layout.munge_ownership(),
            mode: layout.munge_key_mode,
        })?;

        info!(path = %layout.munge_key_path.display(), "munge key materialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::MetadataExt};

    use serde_json::json;
    use tempfile::tempdir;

    use slurmkit_model::{FileMode, Ownership, ProvisionLayout};

    use super::*;
    use crate::{
        ProvisionError, files::current_ownership, materialize::testing::Recorder,
        render::TemplateRenderer,
    };

    fn ctx() -> SlurmContext {
        SlurmContext::from_value(json!({
            "slurm_user": "slurm",
            "clustername": "alpha",
            "munge_key": "c2VjcmV0",
        }))
        .unwrap()
    }

    #[test]
    fn uses_auth_service_identity_and_owner_only_mode() {
        let layout = ProvisionLayout::default();
        let recorder = Recorder::default();

        Materializer::new(&layout, &recorder)
            .materialize_secret(&ctx())
            .unwrap();

        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].template, "munge.key");
        assert_eq!(calls[0].target, layout.munge_key_path);
        assert_eq!(calls[0].ownership, Ownership::same("munge"));
        assert_eq!(calls[0].mode, FileMode::SECRET);
        assert_eq!(calls[0].context.get("munge_key"), Some(&json!("c2VjcmV0")));
    }

    #[test]
    fn permission_failure_propagates() {
        let layout = ProvisionLayout::default();
        let err = Materializer::new(&layout, Recorder::failing())
            .materialize_secret(&ctx())
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Permission { .. }));
    }

    #[test]
    fn writes_key_file_end_to_end() {
        let dir = tempdir().unwrap();
        let owner = current_ownership();
        let layout = ProvisionLayout {
            munge_key_path: dir.path().join("munge.key"),
            munge_user: owner.owner().to_string(),
            munge_group: owner.group().to_string(),
            ..Default::default()
        };
        let renderer = TemplateRenderer::from_layout(&layout);

        Materializer::new(&layout, &renderer)
            .materialize_secret(&ctx())
            .unwrap();

        assert_eq!(
            fs::read_to_string(&layout.munge_key_path).unwrap(),
            "c2VjcmV0"
        );
        let meta = fs::metadata(&layout.munge_key_path).unwrap();
        assert_eq!(meta.mode() & 0o7777, 0o400);
    }
}
