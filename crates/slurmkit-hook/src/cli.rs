use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use slurmkit_observe::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Provisioning helpers for Slurm node hooks.
#[derive(Debug, Parser)]
#[command(name = "slurmkit", version)]
pub struct Cli {
    /// JSON file overriding the default filesystem layout.
    #[arg(long, global = true, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Log format: text, json or journald.
    #[arg(long, global = true)]
    pub log_format: Option<LoggerFormat>,

    /// Log filter expression, e.g. `info` or `slurmkit_core=debug,info`.
    #[arg(long, global = true)]
    pub log_level: Option<LoggerLevel>,

    /// Timezone of log timestamps: utc or local.
    #[arg(long, global = true)]
    pub log_tz: Option<LoggerTimeZone>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render slurm.conf and refresh the cluster include fragment.
    Config {
        #[command(flatten)]
        context: ContextArg,
        /// This node is the active controller; keep an existing include fragment.
        #[arg(long)]
        active_controller: bool,
    },
    /// Render the shared munge key.
    MungeKey {
        #[command(flatten)]
        context: ContextArg,
    },
    /// Ensure the slurmd spool directory exists.
    SpoolDir {
        #[command(flatten)]
        context: ContextArg,
    },
    /// Ensure the slurmctld state-save directory exists.
    StateSaveDir {
        #[command(flatten)]
        context: ContextArg,
    },
    /// Print the installed scheduler version.
    Version,
}

#[derive(Debug, Args)]
pub struct ContextArg {
    /// JSON object supplied by the orchestration hook; `-` reads stdin.
    #[arg(long, value_name = "FILE")]
    pub context: PathBuf,
}
