use std::{io, process::Stdio};

use tokio::process::Command;
use tracing::{debug, trace, warn};

use slurmkit_model::VersionProbe;

use crate::{ExecError, probe::SchedulerVersion};

/// Ask the installed scheduler for its version.
///
/// - exit 0: version parsed from stdout;
/// - non-zero exit or signal: [`SchedulerVersion::Unknown`];
/// - binary missing: `Ok(None)`;
/// - still running after `probe.timeout_ms`: the child is killed and
///   [`ExecError::ProbeTimeout`] is returned.
pub async fn probe_version(probe: &VersionProbe) -> Result<Option<SchedulerVersion>, ExecError> {
    trace!(
        binary = %probe.binary.display(),
        flag = %probe.flag,
        timeout_ms = probe.timeout_ms,
        "probing scheduler version",
    );

    let mut cmd = Command::new(&probe.binary);
    cmd.arg(&probe.flag)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(binary = %probe.binary.display(), "scheduler binary not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(ExecError::Spawn {
                binary: probe.binary.clone(),
                source,
            });
        }
    };

    // Dropping the future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(probe.timeout(), child.wait_with_output()).await {
        Ok(res) => res?,
        Err(_) => {
            warn!(
                binary = %probe.binary.display(),
                timeout_ms = probe.timeout_ms,
                "version probe timed out; child killed",
            );
            return Err(ExecError::ProbeTimeout {
                binary: probe.binary.clone(),
                timeout_ms: probe.timeout_ms,
            });
        }
    };

    if !output.status.success() {
        debug!(
            binary = %probe.binary.display(),
            status = ?output.status.code(),
            "version probe exited unsuccessfully",
        );
        return Ok(Some(SchedulerVersion::Unknown));
    }

    let version = SchedulerVersion::from_stdout(&String::from_utf8_lossy(&output.stdout));
    if !version.is_known() {
        warn!(binary = %probe.binary.display(), "version probe printed no version token");
    }
    debug!(version = %version, "scheduler version probed");
    Ok(Some(version))
}
