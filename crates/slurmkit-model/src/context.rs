use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    CONTEXT_CLUSTERNAME, CONTEXT_INCLUDE, CONTEXT_SLURM_USER, CONTEXT_SLURMD_SPOOL_DIR,
    CONTEXT_STATE_SAVE_LOCATION, ModelError, ModelResult,
};

/// Validated provisioning context handed over by the orchestration layer.
///
/// The raw input is a flat JSON object. `slurm_user` and `clustername` are
/// required and checked when the context is built, so every operation that
/// takes a `SlurmContext` can write without re-validating. All keys,
/// including the typed ones, stay available to templates through
/// [`SlurmContext::values`].
///
/// `Debug` prints keys only: the map can carry the munge key.
#[derive(Clone, PartialEq)]
pub struct SlurmContext {
    slurm_user: String,
    clustername: String,
    include: Option<String>,
    slurmd_spool_dir: Option<PathBuf>,
    state_save_location: Option<PathBuf>,
    values: Map<String, Value>,
}

impl SlurmContext {
    /// Build a context from a raw key/value map.
    ///
    /// Rules:
    /// - `slurm_user` and `clustername` are present, strings, not blank;
    /// - `clustername` is a single path component (it names a file);
    /// - optional typed keys, when present, are strings.
    pub fn from_map(values: Map<String, Value>) -> ModelResult<Self> {
        let slurm_user = required_str(&values, CONTEXT_SLURM_USER)?;
        let clustername = required_str(&values, CONTEXT_CLUSTERNAME)?;
        validate_clustername(&clustername)?;

        let include = optional_str(&values, CONTEXT_INCLUDE)?;
        let slurmd_spool_dir = optional_str(&values, CONTEXT_SLURMD_SPOOL_DIR)?.map(PathBuf::from);
        let state_save_location =
            optional_str(&values, CONTEXT_STATE_SAVE_LOCATION)?.map(PathBuf::from);

        Ok(Self {
            slurm_user,
            clustername,
            include,
            slurmd_spool_dir,
            state_save_location,
            values,
        })
    }

    /// Build a context from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(ModelError::InvalidContext(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn slurm_user(&self) -> &str {
        &self.slurm_user
    }

    pub fn clustername(&self) -> &str {
        &self.clustername
    }

    /// Include fragment body distributed by the active controller, if any.
    pub fn include(&self) -> Option<&str> {
        self.include.as_deref()
    }

    /// Spool directory; `MissingContext` when the orchestration layer did not supply one.
    pub fn slurmd_spool_dir(&self) -> ModelResult<&PathBuf> {
        self.slurmd_spool_dir
            .as_ref()
            .ok_or(ModelError::MissingContext(CONTEXT_SLURMD_SPOOL_DIR))
    }

    /// State-save directory; `MissingContext` when the orchestration layer did not supply one.
    pub fn state_save_location(&self) -> ModelResult<&PathBuf> {
        self.state_save_location
            .as_ref()
            .ok_or(ModelError::MissingContext(CONTEXT_STATE_SAVE_LOCATION))
    }

    /// Every key exactly as supplied; this is what templates see.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl TryFrom<Map<String, Value>> for SlurmContext {
    type Error = ModelError;
    fn try_from(values: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_map(values)
    }
}

impl FromStr for SlurmContext {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s).map_err(|e| ModelError::Parse(e.to_string()))?;
        Self::from_value(value)
    }
}

impl Serialize for SlurmContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SlurmContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_map(map).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for SlurmContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlurmContext")
            .field("slurm_user", &self.slurm_user)
            .field("clustername", &self.clustername)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn required_str(values: &Map<String, Value>, key: &'static str) -> ModelResult<String> {
    match values.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(ModelError::MissingContext(key)),
    }
}

fn optional_str(values: &Map<String, Value>, key: &'static str) -> ModelResult<Option<String>> {
    match values.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ModelError::InvalidContext(format!(
            "{key} must be a string, got {}",
            json_type(other)
        ))),
    }
}

fn validate_clustername(name: &str) -> ModelResult<()> {
    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(ModelError::InvalidContext(format!(
            "clustername {name:?} must be a single path component"
        )));
    }
    Ok(())
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
