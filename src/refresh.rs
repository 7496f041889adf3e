//! Status refresher: keeps per-connection liveness current.
//!
//! A refresh pass probes every known record (hostname preferred, IP as
//! fallback, on the record's own port) with bounded concurrency and writes
//! the outcome into `is_alive`. Passes run off the caller's task: the
//! shared record set is locked only to snapshot targets and to write
//! results back, never across a probe.
//!
//! Two scheduling modes share a single-permit gate so at most one pass is
//! ever in flight: a cancellable repeating schedule and an on-demand single
//! pass. Cancellation is cooperative and observed between per-record
//! probes, so a cancelled pass stops quickly even against a large set.

use crate::probe::Probe;
use crate::types::RecordSet;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default auto-refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Default concurrent probe limit for a refresh pass.
pub const DEFAULT_REFRESH_CONCURRENCY: usize = 32;

/// Handle to a background refresh task.
///
/// Dropping the handle does not stop the task; call [`cancel`] first.
/// A pass observes cancellation between record probes, so an in-flight
/// probe may still run to its own timeout before the task finishes.
///
/// [`cancel`]: RefreshHandle::cancel
pub struct RefreshHandle {
    cancel: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Whether the task has fully stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to stop.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Probe the given `(name, target, port)` triples and return their liveness.
///
/// Targets are probed concurrently; a set cancel flag makes remaining
/// targets report nothing rather than probe.
async fn probe_targets(
    probe: Arc<dyn Probe>,
    targets: Vec<(String, String, u16)>,
    concurrency: usize,
    cancel: Arc<AtomicBool>,
) -> Vec<(String, bool)> {
    stream::iter(targets)
        .map(|(name, target, port)| {
            let probe = Arc::clone(&probe);
            let cancel = Arc::clone(&cancel);
            async move {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let alive = probe.probe(&target, port).await;
                Some((name, alive))
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|status| async move { status })
        .collect()
        .await
}

fn snapshot_targets(records: &RecordSet) -> Vec<(String, String, u16)> {
    records
        .values()
        .filter_map(|r| {
            // A record with neither hostname nor IP is skipped; one bad
            // record never aborts the pass.
            r.target()
                .map(|t| (r.name.clone(), t.to_string(), r.port.as_u16()))
        })
        .collect()
}

/// Run one refresh pass over a caller-owned record set, updating
/// `is_alive` in place. Blocks the caller only for the duration of the
/// probes themselves.
pub async fn refresh_once(probe: Arc<dyn Probe>, records: &mut RecordSet, concurrency: usize) {
    let targets = snapshot_targets(records);
    let none = Arc::new(AtomicBool::new(false));
    for (name, alive) in probe_targets(probe, targets, concurrency, none).await {
        if let Some(record) = records.get_mut(&name) {
            record.is_alive = alive;
        }
    }
}

/// Orchestrates refresh passes over a shared record set.
pub struct StatusRefresher {
    probe: Arc<dyn Probe>,
    records: Arc<RwLock<RecordSet>>,
    gate: Arc<Semaphore>,
    concurrency: usize,
}

impl StatusRefresher {
    /// Create a refresher over the given shared record set.
    pub fn new(probe: Arc<dyn Probe>, records: Arc<RwLock<RecordSet>>) -> Self {
        Self {
            probe,
            records,
            // Single permit: at most one pass in flight, manual or scheduled.
            gate: Arc::new(Semaphore::new(1)),
            concurrency: DEFAULT_REFRESH_CONCURRENCY,
        }
    }

    /// Set the concurrent probe limit per pass.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The shared record set this refresher updates.
    pub fn records(&self) -> &Arc<RwLock<RecordSet>> {
        &self.records
    }

    async fn shared_pass(
        probe: Arc<dyn Probe>,
        records: Arc<RwLock<RecordSet>>,
        concurrency: usize,
        cancel: Arc<AtomicBool>,
    ) {
        let targets = {
            let set = records.read().await;
            snapshot_targets(&set)
        };
        let count = targets.len();

        let statuses = probe_targets(probe, targets, concurrency, cancel).await;

        let mut set = records.write().await;
        let mut alive = 0usize;
        for (name, is_alive) in statuses {
            // Records edited or removed while the pass ran are skipped.
            if let Some(record) = set.get_mut(&name) {
                record.is_alive = is_alive;
                alive += usize::from(is_alive);
            }
        }
        debug!(probed = count, alive, "refresh pass complete");
    }

    /// Spawn a single non-blocking refresh pass.
    ///
    /// Returns `None` if a pass is already in flight; the caller is
    /// expected to keep its manual trigger disabled until the returned
    /// handle finishes.
    pub fn run_once(&self) -> Option<RefreshHandle> {
        let permit = Arc::clone(&self.gate).try_acquire_owned().ok()?;

        let cancel = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&self.probe);
        let records = Arc::clone(&self.records);
        let concurrency = self.concurrency;
        let task = tokio::spawn({
            let cancel = Arc::clone(&cancel);
            async move {
                Self::shared_pass(probe, records, concurrency, cancel).await;
                drop(permit);
            }
        });

        Some(RefreshHandle { cancel, task })
    }

    /// Run one pass and wait for it, queueing behind any in-flight pass.
    pub async fn refresh_now(&self) {
        let Ok(permit) = Arc::clone(&self.gate).acquire_owned().await else {
            return;
        };
        Self::shared_pass(
            Arc::clone(&self.probe),
            Arc::clone(&self.records),
            self.concurrency,
            Arc::new(AtomicBool::new(false)),
        )
        .await;
        drop(permit);
    }

    /// Spawn the repeating auto-refresh schedule.
    ///
    /// Runs a pass immediately, then every `interval` until the handle is
    /// cancelled or `enabled` (the `enable_scan` setting) reads false at
    /// the top of a cycle. A tick that fires while a pass is still running
    /// waits for it through the shared gate; passes never overlap.
    pub fn start_auto(
        &self,
        interval: Duration,
        enabled: watch::Receiver<bool>,
    ) -> RefreshHandle {
        let cancel = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&self.probe);
        let records = Arc::clone(&self.records);
        let gate = Arc::clone(&self.gate);
        let concurrency = self.concurrency;

        let task = tokio::spawn({
            let cancel = Arc::clone(&cancel);
            async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    // First tick completes immediately.
                    ticker.tick().await;
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    if !*enabled.borrow() {
                        info!("auto-refresh stopped: scanning disabled in settings");
                        break;
                    }
                    let Ok(permit) = Arc::clone(&gate).acquire_owned().await else {
                        break;
                    };
                    Self::shared_pass(
                        Arc::clone(&probe),
                        Arc::clone(&records),
                        concurrency,
                        Arc::clone(&cancel),
                    )
                    .await;
                    drop(permit);
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                }
            }
        });

        RefreshHandle { cancel, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConnectionRecord, Port};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    /// Probe that answers from a fixed set, optionally slowly, and counts
    /// how many probes run concurrently.
    struct FakeProbe {
        alive: HashSet<String>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeProbe {
        fn new(alive: &[&str]) -> Self {
            Self {
                alive: alive.iter().map(|s| s.to_string()).collect(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for FakeProbe {
        async fn probe(&self, target: &str, _port: u16) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.alive.contains(target)
        }
    }

    fn record(name: &str, host: &str) -> ConnectionRecord {
        ConnectionRecord::new(name)
            .with_hostname(host)
            .with_port(Port::VNC)
    }

    fn set_of(records: &[ConnectionRecord]) -> RecordSet {
        records
            .iter()
            .cloned()
            .map(|r| (r.name.clone(), r))
            .collect()
    }

    #[tokio::test]
    async fn test_refresh_once_updates_liveness_in_place() {
        let probe = Arc::new(FakeProbe::new(&["den.local"]));
        let mut records = set_of(&[record("den", "den.local"), record("attic", "attic.local")]);

        refresh_once(probe, &mut records, 8).await;

        assert!(records["den"].is_alive);
        assert!(!records["attic"].is_alive);
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort_pass() {
        // "bad" has an unresolvable hostname (probe reports false, exactly
        // as a DNS failure folds); "empty" has no target at all and is
        // skipped. The reachable record must still come back alive.
        let probe = Arc::new(FakeProbe::new(&["good.local"]));
        let mut records = set_of(&[record("good", "good.local"), record("bad", "bad.invalid")]);
        records.insert("empty".to_string(), ConnectionRecord::new("empty"));

        refresh_once(Arc::clone(&probe) as Arc<dyn Probe>, &mut records, 8).await;

        assert!(records["good"].is_alive);
        assert!(!records["bad"].is_alive);
        assert!(!records["empty"].is_alive);
        // The empty record was never probed.
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_run_once_at_most_one_active_pass() {
        let probe = Arc::new(FakeProbe::new(&[]).with_delay(Duration::from_millis(50)));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(probe, Arc::clone(&records));

        let first = refresher.run_once().expect("first pass should start");
        // Second trigger while the first is in flight is refused.
        assert!(refresher.run_once().is_none());

        first.join().await;
        // The gate frees up once the pass completes.
        let third = refresher.run_once().expect("pass after join should start");
        third.join().await;
    }

    #[tokio::test]
    async fn test_run_once_skips_records_removed_mid_pass() {
        let probe = Arc::new(FakeProbe::new(&["den.local"]).with_delay(Duration::from_millis(50)));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(probe, Arc::clone(&records));

        let handle = refresher.run_once().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        records.write().await.remove("den");
        handle.join().await;

        // The write-back must not resurrect the removed record.
        assert!(records.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_auto_refresh_repeats_and_cancels_between_ticks() {
        let probe = Arc::new(FakeProbe::new(&["den.local"]));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(Arc::clone(&probe) as Arc<dyn Probe>, records);

        let (_tx, enabled) = watch::channel(true);
        let interval = Duration::from_millis(20);
        let handle = refresher.start_auto(interval, enabled);

        // Let the immediate pass and at least one repeat run.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let before = probe.calls();
        assert!(before >= 2);

        handle.cancel();
        // No tick fires after cancellation is observed.
        tokio::time::sleep(interval * 3).await;
        let after = probe.calls();
        assert!(after <= before + 1, "at most the in-flight tick may finish");
        tokio::time::sleep(interval).await;
        assert_eq!(probe.calls(), after);
    }

    #[tokio::test]
    async fn test_cancel_mid_pass_skips_remaining_records() {
        // Cancellation is observed between record probes, so cancelling a
        // pass over a large set must leave most of it unprobed instead of
        // running to completion.
        let names: Vec<String> = (0..100).map(|i| format!("host-{i:03}")).collect();
        let records: Vec<ConnectionRecord> = names
            .iter()
            .map(|n| record(n, &format!("{n}.local")))
            .collect();

        let probe = Arc::new(FakeProbe::new(&[]).with_delay(Duration::from_millis(30)));
        let shared = Arc::new(RwLock::new(set_of(&records)));
        let refresher = StatusRefresher::new(Arc::clone(&probe) as Arc<dyn Probe>, shared)
            .with_concurrency(4);

        let handle = refresher.run_once().expect("pass should start");
        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.cancel();
        handle.join().await;

        // Only the probes already in flight when the flag was set may have
        // run; the bulk of the set was skipped.
        assert!(
            probe.calls() < 100,
            "cancelled pass probed all {} records",
            probe.calls()
        );
    }

    #[tokio::test]
    async fn test_auto_refresh_stops_when_scanning_disabled() {
        let probe = Arc::new(FakeProbe::new(&[]));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(Arc::clone(&probe) as Arc<dyn Probe>, records);

        let (tx, enabled) = watch::channel(true);
        let handle = refresher.start_auto(Duration::from_millis(20), enabled);

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).ok(); // unrelated settings write keeps it running
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());

        tx.send(false).ok();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_auto_and_manual_passes_never_overlap() {
        let probe = Arc::new(FakeProbe::new(&[]).with_delay(Duration::from_millis(40)));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(Arc::clone(&probe) as Arc<dyn Probe>, records);

        let (_tx, enabled) = watch::channel(true);
        let handle = refresher.start_auto(Duration::from_millis(10), enabled);
        tokio::time::sleep(Duration::from_millis(15)).await;

        // The scheduled pass holds the gate; the manual trigger is refused.
        assert!(refresher.run_once().is_none());

        handle.cancel();
        handle.join().await;
        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_now_queues_behind_in_flight_pass() {
        let probe = Arc::new(FakeProbe::new(&["den.local"]).with_delay(Duration::from_millis(30)));
        let records = Arc::new(RwLock::new(set_of(&[record("den", "den.local")])));
        let refresher = StatusRefresher::new(Arc::clone(&probe) as Arc<dyn Probe>, Arc::clone(&records));

        let first = refresher.run_once().unwrap();
        refresher.refresh_now().await;

        assert!(first.is_finished());
        assert!(records.read().await["den"].is_alive);
        assert_eq!(probe.calls(), 2);
    }
}
