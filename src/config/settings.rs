//! Application settings and paths.
//!
//! Manages XDG-compliant paths and the process-wide settings file. Settings
//! are loaded once at startup and rewritten only on an explicit change; the
//! background refresher observes `enable_scan` through a watch channel owned
//! by the caller, not by re-reading the file.

use crate::error::{ConfigError, ConfigResult};
use crate::probe::DEFAULT_PROBE_TIMEOUT;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::scanner::DEFAULT_SWEEP_CONCURRENCY;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/periscope)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/periscope)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance.
    pub fn get() -> &'static Paths {
        PATHS.get_or_init(|| Self::new().expect("Failed to initialize paths"))
    }

    fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "periscope", "periscope")
            .ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        };

        fs::create_dir_all(&paths.config_dir)?;
        fs::create_dir_all(&paths.data_dir)?;

        Ok(paths)
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Get the path to the connection records file.
    pub fn records_file(&self) -> PathBuf {
        self.data_dir.join("connections.json")
    }
}

/// Application-wide settings.
///
/// `#[serde(default)]` keeps old settings files loadable after new options
/// are introduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether the background status refresher runs at all.
    pub enable_scan: bool,
    /// Whether launching a viewer ends the session (detach and exit) or
    /// waits for the viewer to close.
    pub close_on_connect: bool,
    /// Per-probe connection timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Auto-refresh interval in seconds.
    pub refresh_interval_secs: u64,
    /// Maximum concurrent probes during a sweep or refresh pass.
    pub scan_concurrency: usize,
    /// External viewer binary invoked on connect.
    pub viewer_path: String,
    /// Port assumed for new connections and sweeps unless overridden.
    pub default_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_scan: true,
            close_on_connect: true,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            scan_concurrency: DEFAULT_SWEEP_CONCURRENCY,
            viewer_path: "vncviewer".to_string(),
            default_port: 5900,
        }
    }
}

impl Settings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Paths::get().settings_file())
    }

    /// Load settings from a specific file. A missing file yields defaults.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Paths::get().settings_file())
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        })
    }
}
