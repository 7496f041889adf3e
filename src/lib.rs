//! # Periscope - A Remote Desktop Connection Selector
//!
//! Periscope keeps a registry of named remote-desktop targets, tracks which
//! of them are currently reachable, and hands live targets off to an
//! external VNC viewer.
//!
//! ## Features
//!
//! - **Connection Registry**: durable named records with hostname, IP,
//!   port, and viewer password
//! - **Liveness Tracking**: concurrent bounded-timeout TCP probing, on
//!   demand or on a cancellable repeating schedule
//! - **LAN Discovery**: ordered, incremental /24 sweeps with reverse-DNS
//!   naming of discovered hosts
//! - **Viewer Hand-off**: launches the configured viewer binary with the
//!   resolved target, port, and password
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use periscope::probe::TcpProbe;
//! use periscope::refresh;
//! use periscope::store::RecordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = RecordStore::new().unwrap();
//!     let mut records = store.load().unwrap();
//!
//!     refresh::refresh_once(Arc::new(TcpProbe::default()), &mut records, 32).await;
//!
//!     for record in records.values() {
//!         println!("{}: {}", record.name, if record.is_alive { "up" } else { "down" });
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Core type definitions (records, discoveries, ports)
//! - [`store`] - Connection record persistence
//! - [`probe`] - Single-target TCP reachability checks
//! - [`scanner`] - Concurrent ordered range sweeps
//! - [`refresh`] - Background status refreshing with cancellation
//! - [`viewer`] - External viewer launch collaborator
//! - [`config`] - Settings and XDG paths
//! - [`error`] - Error types per domain

pub mod cli;
pub mod config;
pub mod error;
pub mod local;
pub mod output;
pub mod probe;
pub mod refresh;
pub mod scanner;
pub mod store;
pub mod types;
pub mod viewer;

// Re-export commonly used types
pub use error::{CliError, ScanError, StoreError};
pub use probe::{Probe, TcpProbe};
pub use refresh::{RefreshHandle, StatusRefresher};
pub use scanner::{Sweep, SweepRange};
pub use store::RecordStore;
pub use types::{ConnectionRecord, Discovery, Port, RecordSet};
