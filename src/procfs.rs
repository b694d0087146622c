//! Locating per-process procfs files.
//!
//! `/proc/self` and `/proc/<pid>` are symlink-like indirections, so the
//! candidate path is always canonicalized before it is opened. A vanished
//! or inaccessible process is reported as an error, never papered over.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::NetDevError;

/// Default procfs mount point.
pub const DEFAULT_PROCFS_PATH: &str = "/proc";

/// Process whose net/dev is read when no PID is configured.
pub const DEFAULT_NETDEV_PID: &str = "self";

/// Joins a path relative to the procfs root.
pub fn proc_file_path(procfs_root: impl AsRef<Path>, rel: impl AsRef<Path>) -> PathBuf {
    procfs_root.as_ref().join(rel)
}

/// Builds `<root>/<pid>/net/dev`. An empty PID means the calling process.
pub fn netdev_path(procfs_root: impl AsRef<Path>, pid: &str) -> PathBuf {
    let pid = if pid.is_empty() { DEFAULT_NETDEV_PID } else { pid };
    proc_file_path(procfs_root, Path::new(pid).join("net/dev"))
}

/// Resolves the canonical path of a process's net/dev file, following symlinks.
pub fn locate_netdev(procfs_root: impl AsRef<Path>, pid: &str) -> Result<PathBuf, NetDevError> {
    let candidate = netdev_path(procfs_root, pid);
    let resolved = fs::canonicalize(&candidate).map_err(|source| NetDevError::PathResolution {
        path: candidate,
        source,
    })?;

    info!("net/dev path is {}", resolved.display());
    Ok(resolved)
}

/// Locates and opens a process's net/dev file.
///
/// The returned reader owns the file handle; it is closed when dropped.
pub fn open_netdev(
    procfs_root: impl AsRef<Path>,
    pid: &str,
) -> Result<BufReader<File>, NetDevError> {
    let path = locate_netdev(procfs_root, pid)?;
    let file = File::open(&path).map_err(|source| NetDevError::Open { path, source })?;
    Ok(BufReader::new(file))
}
