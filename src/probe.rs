//! Single-target TCP reachability probe.
//!
//! A probe is one bounded-timeout connect attempt against `target:port`.
//! Unreachable hosts are the expected common case on a LAN sweep, so the
//! outcome is a plain boolean; timeouts, refusals, and resolution failures
//! all read as "not alive". The connection is dropped as soon as the
//! outcome is known.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Default per-probe connection timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Reachability probe abstraction.
///
/// The trait seam lets sweeps and refresh passes run against fakes in tests
/// instead of real sockets.
#[async_trait]
pub trait Probe: Send + Sync {
    /// True iff a TCP connection to `target:port` completes within the
    /// probe's timeout. Never errors; any failure reads as unreachable.
    async fn probe(&self, target: &str, port: u16) -> bool;
}

/// Probe backed by a real TCP connect through the OS socket API.
///
/// `target` may be a hostname or a dotted-quad address; name resolution
/// happens inside the timeout window so a stuck resolver cannot stall a
/// pass beyond the bound.
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe with the given connection timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, target: &str, port: u16) -> bool {
        let alive = matches!(
            timeout(self.timeout, TcpStream::connect((target, port))).await,
            Ok(Ok(_))
        );
        trace!(host = target, port, alive, "probe");
        alive
    }
}
