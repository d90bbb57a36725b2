//! Logging setup for the provisioning hooks.
//!
//! Hooks print results on stdout, so every format except journald writes
//! to stderr.
mod config;
mod error;
mod init;
mod object;

pub use config::{ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_LOG_TZ, LoggerConfig};
pub use error::{LoggerError, LoggerResult};
pub use init::init_logger;
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};
