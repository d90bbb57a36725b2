mod cli;

use std::{
    fs,
    io::{self, Read},
    path::Path,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use slurmkit_core::prelude::*;
use slurmkit_exec::probe_version;
use slurmkit_model::{ProvisionLayout, SlurmContext};
use slurmkit_observe::{LoggerConfig, init_local_offset, init_logger};

use crate::cli::{Cli, Command};

/// Exit status of `version` when the scheduler is not installed.
const EXIT_NOT_INSTALLED: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 1) logger; the offset must be read while the process is single-threaded
    init_local_offset();
    let mut log_cfg = LoggerConfig::default().with_env_overrides()?;
    if let Some(format) = cli.log_format {
        log_cfg.format = format;
    }
    if let Some(level) = cli.log_level.clone() {
        log_cfg.level = level;
    }
    if let Some(tz) = cli.log_tz {
        log_cfg.tz = tz;
    }
    init_logger(&log_cfg)?;

    // 2) layout
    let layout = load_layout(cli.layout.as_deref())?;

    // 3) operation
    let renderer = TemplateRenderer::from_layout(&layout);
    let materializer = Materializer::new(&layout, &renderer);

    match cli.command {
        Command::Config {
            context,
            active_controller,
        } => {
            let ctx = load_context(&context.context)?;
            let outcome = materializer.materialize_config(&ctx, active_controller)?;
            info!(
                cluster = ctx.clustername(),
                active_controller,
                include = ?outcome,
                "scheduler config materialized",
            );
        }
        Command::MungeKey { context } => {
            let ctx = load_context(&context.context)?;
            materializer.materialize_secret(&ctx)?;
        }
        Command::SpoolDir { context } => {
            create_spool_dir(&load_context(&context.context)?)?;
        }
        Command::StateSaveDir { context } => {
            create_state_save_location(&load_context(&context.context)?)?;
        }
        Command::Version => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("building runtime for version probe")?;

            match runtime.block_on(probe_version(&layout.probe))? {
                Some(version) => println!("{version}"),
                None => {
                    warn!(binary = %layout.probe.binary.display(), "scheduler not installed");
                    return Ok(ExitCode::from(EXIT_NOT_INSTALLED));
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Default layout, or the one described by a JSON file (missing fields keep defaults).
fn load_layout(path: Option<&Path>) -> anyhow::Result<ProvisionLayout> {
    let Some(path) = path else {
        return Ok(ProvisionLayout::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading layout {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing layout {}", path.display()))
}

/// Read and validate the hook context; `-` means stdin.
fn load_context(path: &Path) -> anyhow::Result<SlurmContext> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading context from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading context {}", path.display()))?
    };

    let ctx = raw
        .parse::<SlurmContext>()
        .map_err(ProvisionError::from)
        .with_context(|| format!("invalid context {}", path.display()))?;
    Ok(ctx)
}
