use slurmkit_model::{FileMode, Ownership, SlurmContext};

use crate::{ProvisionResult, files::ensure_directory};

/// Ensure the compute daemon's spool directory exists (`slurm_user`, 0750).
pub fn create_spool_dir(ctx: &SlurmContext) -> ProvisionResult<()> {
    ensure_directory(
        ctx.slurmd_spool_dir()?,
        &Ownership::same(ctx.slurm_user()),
        FileMode::DIRECTORY,
    )
}

/// Ensure the controller's state-save directory exists (`slurm_user`, 0750).
pub fn create_state_save_location(ctx: &SlurmContext) -> ProvisionResult<()> {
    ensure_directory(
        ctx.state_save_location()?,
        &Ownership::same(ctx.slurm_user()),
        FileMode::DIRECTORY,
    )
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::MetadataExt};

    use serde_json::json;
    use tempfile::tempdir;

    use slurmkit_model::ModelError;

    use super::*;
    use crate::{ProvisionError, files::current_ownership};

    #[test]
    fn missing_path_key_is_missing_context() {
        let ctx = SlurmContext::from_value(json!({"slurm_user": "slurm", "clustername": "a"}))
            .unwrap();

        assert!(matches!(
            create_spool_dir(&ctx),
            Err(ProvisionError::Context(ModelError::MissingContext("slurmd_spool_dir")))
        ));
        assert!(matches!(
            create_state_save_location(&ctx),
            Err(ProvisionError::Context(ModelError::MissingContext("state_save_location")))
        ));
    }

    #[test]
    #[ignore = "needs a test user whose primary group has the same name"]
    fn creates_both_directories() {
        let dir = tempdir().unwrap();
        let spool = dir.path().join("spool").join("slurmd");
        let state = dir.path().join("state");

        // `slurm_user` names both the owner and the group.
        let owner = current_ownership();
        assert_eq!(owner.owner(), owner.group());

        let ctx = SlurmContext::from_value(json!({
            "slurm_user": owner.owner(),
            "clustername": "a",
            "slurmd_spool_dir": spool,
            "state_save_location": state,
        }))
        .unwrap();

        create_spool_dir(&ctx).unwrap();
        create_state_save_location(&ctx).unwrap();

        for path in [&spool, &state] {
            let meta = fs::metadata(path).unwrap();
            assert!(meta.is_dir());
            assert_eq!(meta.mode() & 0o7777, 0o750);
        }
    }
}
