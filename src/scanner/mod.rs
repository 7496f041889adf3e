//! Range scanner: sweeps a /24 for hosts exposing a TCP port.
//!
//! A sweep derives the network prefix from a base address, probes each
//! candidate octet concurrently, and reverse-resolves the name of every
//! host that answers. Results come back as a lazy stream in ascending
//! octet order regardless of probe completion order, so callers can drive
//! a progress display while the sweep is still running. The stream is
//! finite and not restartable; run a new sweep to scan again.

use crate::error::{ScanError, ScanResult};
use crate::probe::Probe;
use crate::types::{Discovery, Port};
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Default concurrent probe limit for a sweep.
///
/// Sized well below the ephemeral port range so a full /24 pass cannot
/// exhaust local sockets.
pub const DEFAULT_SWEEP_CONCURRENCY: usize = 64;

/// A validated half-open octet range `[start, end)` within a /24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepRange {
    start: u16,
    end: u16,
}

impl SweepRange {
    /// Validate scan bounds. Requires `1 <= start < end <= 256`; anything
    /// else fails with `InvalidRange` before any probing starts.
    pub fn new(start: u16, end: u16) -> ScanResult<Self> {
        if start >= 1 && start < end && end <= 256 {
            Ok(Self { start, end })
        } else {
            Err(ScanError::InvalidRange { start, end })
        }
    }

    /// The full host range of a /24, skipping the network address.
    pub fn full() -> Self {
        Self { start: 1, end: 256 }
    }

    /// Number of candidate addresses in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Whether the range is empty. Never true for a validated range.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Iterate the final octets in ascending order.
    pub fn octets(&self) -> impl Iterator<Item = u8> {
        (self.start..self.end).map(|i| i as u8)
    }
}

/// Reverse-DNS resolution seam.
///
/// Failure is soft: a host with no PTR record is still alive, it just has
/// no display name.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve the PTR name for an address, `None` if resolution fails.
    async fn reverse(&self, ip: Ipv4Addr) -> Option<String>;
}

/// Name resolver backed by the system's DNS configuration.
pub struct DnsNameResolver {
    resolver: TokioAsyncResolver,
}

impl DnsNameResolver {
    /// Create a resolver using the default system configuration.
    pub fn new() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }
}

impl Default for DnsNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameResolver for DnsNameResolver {
    async fn reverse(&self, ip: Ipv4Addr) -> Option<String> {
        let lookup = self.resolver.reverse_lookup(IpAddr::V4(ip)).await.ok()?;
        lookup
            .iter()
            .next()
            .map(|name| name.to_utf8().trim_end_matches('.').to_string())
    }
}

/// A configured range sweep.
pub struct Sweep {
    probe: Arc<dyn Probe>,
    resolver: Arc<dyn NameResolver>,
    concurrency: usize,
}

impl Sweep {
    /// Create a sweep using the given probe and resolver.
    pub fn new(probe: Arc<dyn Probe>, resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            probe,
            resolver,
            concurrency: DEFAULT_SWEEP_CONCURRENCY,
        }
    }

    /// Set the concurrent probe limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sweep `prefix.i` for every octet in `range`, where the prefix is the
    /// first three octets of `base`.
    ///
    /// Emits one [`Discovery`] per reachable host. Probing is concurrent,
    /// but `buffered` (not `buffer_unordered`) merges completions back into
    /// submission order, so the output is always ascending by octet.
    /// Whether a discovery duplicates an already-known record is the
    /// caller's concern.
    pub fn run(
        &self,
        base: Ipv4Addr,
        port: Port,
        range: SweepRange,
    ) -> impl Stream<Item = Discovery> + Send {
        let [a, b, c, _] = base.octets();
        debug!(prefix = %format!("{a}.{b}.{c}"), %port, candidates = range.len(), "starting sweep");

        let probe = Arc::clone(&self.probe);
        let resolver = Arc::clone(&self.resolver);

        stream::iter(range.octets())
            .map(move |octet| {
                let probe = Arc::clone(&probe);
                let resolver = Arc::clone(&resolver);
                async move {
                    let ip = Ipv4Addr::new(a, b, c, octet);
                    let addr = ip.to_string();
                    if !probe.probe(&addr, port.as_u16()).await {
                        return None;
                    }
                    let name = resolver.reverse(ip).await.unwrap_or_default();
                    Some(Discovery {
                        name,
                        ip: addr,
                        port,
                        alive: true,
                    })
                }
            })
            .buffered(self.concurrency)
            .filter_map(|found| async move { found })
    }
}
