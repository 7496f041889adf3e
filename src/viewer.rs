//! External viewer launch collaborator.
//!
//! The core hands a resolved `(target, password, port)` to an external VNC
//! viewer binary and otherwise stays out of the viewer's way. The argument
//! shape follows the TightVNC viewer convention: `host::port` selects a
//! non-display port, `-password=` supplies the credential.

use crate::types::{ConnectionRecord, Port};
use std::io;
use std::process::{Child, Command, Stdio};
use tracing::info;

/// Launcher for the configured viewer binary.
pub struct ViewerLauncher {
    viewer_path: String,
}

impl ViewerLauncher {
    /// Create a launcher for the given viewer binary.
    pub fn new(viewer_path: impl Into<String>) -> Self {
        Self {
            viewer_path: viewer_path.into(),
        }
    }

    /// Spawn the viewer against a connection record.
    ///
    /// The target is the record's hostname when set, its IP otherwise.
    pub fn launch(&self, record: &ConnectionRecord) -> io::Result<Child> {
        let target = record.target().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "record has no address")
        })?;
        self.launch_target(target, &record.password, record.port)
    }

    /// Spawn the viewer against an explicit target.
    pub fn launch_target(&self, target: &str, password: &str, port: Port) -> io::Result<Child> {
        let mut command = Command::new(&self.viewer_path);
        command
            .arg(format!("{target}::{port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if !password.is_empty() {
            command.arg(format!("-password={password}"));
        }

        info!(viewer = %self.viewer_path, target, %port, "launching viewer");
        command.spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_rejects_record_without_address() {
        let launcher = ViewerLauncher::new("vncviewer");
        let record = ConnectionRecord::new("ghost");
        let err = launcher.launch(&record).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_launch_missing_binary_surfaces_io_error() {
        let launcher = ViewerLauncher::new("/nonexistent/periscope-viewer");
        let record = ConnectionRecord::new("den").with_ip("127.0.0.1");
        assert!(launcher.launch(&record).is_err());
    }
}
