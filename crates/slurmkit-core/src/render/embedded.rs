//! Templates compiled into the binary.
//!
//! Used when no templates directory is configured or it lacks the requested
//! name, so a bare binary can provision a node.

const SLURM_CONF: &str = include_str!("../../templates/slurm.conf");
const MUNGE_KEY: &str = include_str!("../../templates/munge.key");

pub(crate) fn embedded(name: &str) -> Option<&'static str> {
    match name {
        "slurm.conf" => Some(SLURM_CONF),
        "munge.key" => Some(MUNGE_KEY),
        _ => None,
    }
}
