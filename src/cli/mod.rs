//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `periscope list` - Show saved connections and their liveness
//! - `periscope add|edit|remove` - Manage connection records
//! - `periscope connect <name>` - Launch the viewer against a connection
//! - `periscope scan` - Sweep the LAN for new targets
//! - `periscope refresh` - One liveness pass over all connections
//! - `periscope watch` - Repeating background refresh with live display
//! - `periscope settings` - Show or change application settings

mod records;
mod refresh;
mod scan;
mod settings;

pub use records::{AddCommand, ConnectCommand, EditCommand, ListCommand, RemoveCommand};
pub use refresh::{RefreshCommand, WatchCommand};
pub use scan::ScanCommand;
pub use settings::SettingsCommand;

use crate::config::Settings;
use crate::error::CliResult;
use crate::probe::{Probe, TcpProbe};
use crate::store::RecordStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Periscope - a remote desktop connection selector.
///
/// Keeps a registry of named VNC targets, tracks which are currently
/// reachable, sweeps the LAN for new servers, and hands live targets off
/// to an external viewer.
#[derive(Parser, Debug)]
#[command(name = "periscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A remote desktop connection selector with LAN scanning", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom connection records file
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show saved connections and their liveness
    #[command(alias = "ls")]
    List(ListCommand),

    /// Add a connection record
    #[command(alias = "a")]
    Add(AddCommand),

    /// Edit (and optionally rename) a connection record
    #[command(alias = "e")]
    Edit(EditCommand),

    /// Remove a connection record
    #[command(alias = "rm")]
    Remove(RemoveCommand),

    /// Launch the viewer against a saved connection
    #[command(alias = "c")]
    Connect(ConnectCommand),

    /// Sweep a /24 range for reachable servers
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Run one liveness pass over all connections
    #[command(alias = "r")]
    Refresh(RefreshCommand),

    /// Keep refreshing on an interval until interrupted
    #[command(alias = "w")]
    Watch(WatchCommand),

    /// Show or change application settings
    Settings(SettingsCommand),
}

/// Shared state every command executes against.
pub struct AppContext {
    pub settings: Settings,
    pub store: RecordStore,
}

impl AppContext {
    /// Build the context from loaded settings and an optional store override.
    pub fn new(settings: Settings, store_path: Option<PathBuf>) -> CliResult<Self> {
        let store = match store_path {
            Some(path) => RecordStore::open(path),
            None => RecordStore::new()?,
        };
        Ok(Self { settings, store })
    }

    /// A TCP probe configured from the settings.
    pub fn probe(&self) -> Arc<dyn Probe> {
        Arc::new(TcpProbe::new(Duration::from_millis(
            self.settings.probe_timeout_ms,
        )))
    }
}
