//! Refresh subcommands: one-shot liveness pass and the repeating watch.

use crate::cli::AppContext;
use crate::error::CliResult;
use crate::output;
use crate::refresh::StatusRefresher;
use clap::Parser;
use console::style;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Run one liveness pass over all connections.
#[derive(Parser, Debug)]
pub struct RefreshCommand {}

impl RefreshCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let records = Arc::new(RwLock::new(ctx.store.load()?));
        let refresher = StatusRefresher::new(ctx.probe(), records)
            .with_concurrency(ctx.settings.scan_concurrency);

        refresher.refresh_now().await;

        output::print_records(&*refresher.records().read().await)?;
        Ok(())
    }
}

/// Keep refreshing on an interval until interrupted.
#[derive(Parser, Debug)]
pub struct WatchCommand {
    /// Refresh interval in seconds (defaults to the configured interval)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl WatchCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        if !ctx.settings.enable_scan {
            output::print_warning("scanning is disabled in settings (enable_scan = false)");
            return Ok(());
        }

        let interval = Duration::from_secs(
            self.interval.unwrap_or(ctx.settings.refresh_interval_secs).max(1),
        );
        let records = Arc::new(RwLock::new(ctx.store.load()?));
        let refresher = StatusRefresher::new(ctx.probe(), records)
            .with_concurrency(ctx.settings.scan_concurrency);

        // The watch channel carries enable_scan to the background task; a
        // long-lived UI would push settings changes through it, here it
        // simply stays true until we cancel.
        let (_enabled_tx, enabled) = watch::channel(ctx.settings.enable_scan);
        let handle = refresher.start_auto(interval, enabled);

        println!(
            "{} refreshing every {}s, press Ctrl-C to stop",
            style("watching:").bold(),
            interval.as_secs()
        );

        let mut display = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = display.tick() => {
                    let snapshot = refresher.records().read().await;
                    println!();
                    output::print_records(&snapshot)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    break;
                }
            }
        }

        handle.cancel();
        handle.join().await;
        output::print_info("stopped");
        Ok(())
    }
}
