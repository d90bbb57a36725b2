use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::{
    error::LoggerResult,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Environment variable overriding [`LoggerConfig::level`].
pub const ENV_LOG_LEVEL: &str = "SLURMKIT_LOG";

/// Environment variable overriding [`LoggerConfig::format`].
pub const ENV_LOG_FORMAT: &str = "SLURMKIT_LOG_FORMAT";

/// Environment variable overriding [`LoggerConfig::tz`].
pub const ENV_LOG_TZ: &str = "SLURMKIT_LOG_TZ";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"slurmkit_core=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module/target names in each line.
    pub with_targets: bool,
    /// Colorize text output when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: false,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Color is used only when requested and stderr is a terminal.
    ///
    /// Hook runners usually capture stderr into a log file; checking at
    /// init time keeps escape codes out of it.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }

    /// Overlay values taken from the process environment.
    pub fn with_env_overrides(self) -> LoggerResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` for [`ENV_LOG_LEVEL`], [`ENV_LOG_FORMAT`]
    /// and [`ENV_LOG_TZ`].
    ///
    /// Blank values are ignored; invalid ones are errors.
    pub fn with_overrides<F>(mut self, lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.level = level.parse()?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.trim().is_empty()) {
            self.format = format.parse()?;
        }
        if let Some(tz) = lookup(ENV_LOG_TZ).filter(|v| !v.trim().is_empty()) {
            self.tz = tz.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(!config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let config: LoggerConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.tz, LoggerTimeZone::Utc);
    }

    #[test]
    fn overrides_replace_level_and_format() {
        let config = LoggerConfig::default()
            .with_overrides(|key| match key {
                ENV_LOG_LEVEL => Some("slurmkit_core=debug,warn".into()),
                ENV_LOG_FORMAT => Some("JSON".into()),
                ENV_LOG_TZ => Some("local".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.level.as_str(), "slurmkit_core=debug,warn");
        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.tz, LoggerTimeZone::Local);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = LoggerConfig::default()
            .with_overrides(|_| Some("  ".into()))
            .unwrap();

        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
    }

    #[test]
    fn invalid_override_is_an_error() {
        let res = LoggerConfig::default().with_overrides(|key| {
            (key == ENV_LOG_FORMAT).then(|| "logfmt".to_string())
        });
        assert!(res.is_err());

        let res = LoggerConfig::default()
            .with_overrides(|key| (key == ENV_LOG_TZ).then(|| "pst".to_string()));
        assert!(res.is_err());
    }
}
