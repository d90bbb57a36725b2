mod probe;
pub use probe::VersionProbe;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{FileMode, Ownership};

/// File name of the main config inside `config_dir`.
const CONFIG_FILE_NAME: &str = "slurm.conf";

/// Fixed filesystem layout and identities used by the provisioning helpers.
///
/// Built once at process start (defaults, optionally overlaid by a JSON file)
/// and passed by reference to every operation.
///
/// When a layout file moves `configDir` without naming `configPath`, the
/// main config follows the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LayoutFile")]
pub struct ProvisionLayout {
    /// Directory holding the main config and include fragments.
    pub config_dir: PathBuf,
    /// Main scheduler configuration file.
    pub config_path: PathBuf,
    /// Template rendered into `config_path`.
    pub config_template: String,
    /// Permission bits of the main config.
    pub config_mode: FileMode,
    /// Include fragments are named `<include_prefix>-<clustername>.conf`.
    pub include_prefix: String,
    /// Shared secret used by the authentication service.
    pub munge_key_path: PathBuf,
    /// Template rendered into `munge_key_path`.
    pub munge_key_template: String,
    /// Permission bits of the shared secret.
    pub munge_key_mode: FileMode,
    /// System account reserved for the authentication service.
    pub munge_user: String,
    pub munge_group: String,
    /// Directory searched for templates before the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Scheduler version query.
    pub probe: VersionProbe,
}

impl ProvisionLayout {
    /// Layout rooted at `config_dir`, everything else at defaults.
    ///
    /// The main config path follows the directory.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
            ..Default::default()
        }
    }

    /// Path of the include fragment for `clustername`.
    ///
    /// `clustername` is expected to be a single path component, which
    /// [`crate::SlurmContext`] guarantees.
    pub fn include_path(&self, clustername: &str) -> PathBuf {
        self.config_dir
            .join(format!("{}-{}.conf", self.include_prefix, clustername))
    }

    /// Identity that owns the shared secret.
    pub fn munge_ownership(&self) -> Ownership {
        Ownership::new(&self.munge_user, &self.munge_group)
    }

    /// Whether `path` lives directly in the config directory.
    pub fn in_config_dir(&self, path: &Path) -> bool {
        path.parent() == Some(self.config_dir.as_path())
    }
}

impl Default for ProvisionLayout {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("/etc/slurm-llnl"),
            config_path: PathBuf::from("/etc/slurm-llnl").join(CONFIG_FILE_NAME),
            config_template: "slurm.conf".to_string(),
            config_mode: FileMode::CONFIG,
            include_prefix: "slurm".to_string(),
            munge_key_path: PathBuf::from("/etc/munge/munge.key"),
            munge_key_template: "munge.key".to_string(),
            munge_key_mode: FileMode::SECRET,
            munge_user: "munge".to_string(),
            munge_group: "munge".to_string(),
            templates_dir: None,
            probe: VersionProbe::default(),
        }
    }
}

/// On-disk shape of a layout file: every field optional, `configPath`
/// resolved against the (possibly overridden) `configDir`.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LayoutFile {
    config_dir: PathBuf,
    config_path: Option<PathBuf>,
    config_template: String,
    config_mode: FileMode,
    include_prefix: String,
    munge_key_path: PathBuf,
    munge_key_template: String,
    munge_key_mode: FileMode,
    munge_user: String,
    munge_group: String,
    templates_dir: Option<PathBuf>,
    probe: VersionProbe,
}

impl Default for LayoutFile {
    fn default() -> Self {
        let l = ProvisionLayout::default();
        Self {
            config_dir: l.config_dir,
            config_path: None,
            config_template: l.config_template,
            config_mode: l.config_mode,
            include_prefix: l.include_prefix,
            munge_key_path: l.munge_key_path,
            munge_key_template: l.munge_key_template,
            munge_key_mode: l.munge_key_mode,
            munge_user: l.munge_user,
            munge_group: l.munge_group,
            templates_dir: l.templates_dir,
            probe: l.probe,
        }
    }
}

impl From<LayoutFile> for ProvisionLayout {
    fn from(f: LayoutFile) -> Self {
        let config_path = f
            .config_path
            .unwrap_or_else(|| f.config_dir.join(CONFIG_FILE_NAME));
        Self {
            config_dir: f.config_dir,
            config_path,
            config_template: f.config_template,
            config_mode: f.config_mode,
            include_prefix: f.include_prefix,
            munge_key_path: f.munge_key_path,
            munge_key_template: f.munge_key_template,
            munge_key_mode: f.munge_key_mode,
            munge_user: f.munge_user,
            munge_group: f.munge_group,
            templates_dir: f.templates_dir,
            probe: f.probe,
        }
    }
}
