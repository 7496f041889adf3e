//! Scan subcommand: sweep a /24 range for reachable servers.

use crate::cli::AppContext;
use crate::error::{CliError, CliResult};
use crate::local;
use crate::output;
use crate::scanner::{DnsNameResolver, Sweep, SweepRange};
use crate::types::{Discovery, Port, RecordSet};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

/// Sweep a /24 range for reachable servers.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Base address of the network to sweep (defaults to this machine's
    /// LAN address; only the first three octets are used)
    #[arg(value_name = "BASE")]
    pub base: Option<Ipv4Addr>,

    /// Port to probe
    #[arg(short, long)]
    pub port: Option<Port>,

    /// First host octet to probe (inclusive)
    #[arg(long, default_value = "1")]
    pub start: u16,

    /// Last host octet to probe (exclusive)
    #[arg(long, default_value = "256")]
    pub end: u16,

    /// Save newly discovered hosts as connection records
    #[arg(long)]
    pub save: bool,
}

impl ScanCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        // Bounds are rejected before any probing starts.
        let range = SweepRange::new(self.start, self.end)?;

        let base = match self.base {
            Some(base) => base,
            None => local_ipv4()?,
        };
        let port = self
            .port
            .or_else(|| Port::new(ctx.settings.default_port))
            .unwrap_or_default();

        let mut records = ctx.store.load()?;

        let [a, b, c, _] = base.octets();
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(format!(
            "sweeping {a}.{b}.{c}.{}-{} on port {port}",
            self.start,
            self.end - 1
        ));
        progress.enable_steady_tick(Duration::from_millis(100));

        let sweep = Sweep::new(ctx.probe(), Arc::new(DnsNameResolver::new()))
            .with_concurrency(ctx.settings.scan_concurrency);
        let mut stream = Box::pin(sweep.run(base, port, range));

        let mut found = 0usize;
        let mut saved = 0usize;
        while let Some(discovery) = stream.next().await {
            found += 1;
            // Filtering against already-saved records happens here, not in
            // the scanner.
            let known = is_known(&records, &discovery);
            progress.suspend(|| output::print_discovery(&discovery, known))?;

            if self.save && !known {
                let record = discovery.into_record();
                match ctx.store.add(&mut records, record) {
                    Ok(()) => saved += 1,
                    // Name collisions with an existing record are expected
                    // when rescanning; skip and keep sweeping.
                    Err(e) => output::print_warning(&format!("not saved: {e}")),
                }
            }
        }

        progress.finish_and_clear();
        if found == 0 {
            output::print_info("no reachable hosts found");
        } else if self.save {
            output::print_info(&format!("{found} hosts found, {saved} saved"));
        } else {
            output::print_info(&format!("{found} hosts found"));
        }
        Ok(())
    }
}

/// Whether a discovery matches a saved record by address or hostname.
fn is_known(records: &RecordSet, found: &Discovery) -> bool {
    records.values().any(|r| {
        r.ip_address == found.ip || (!found.name.is_empty() && r.hostname == found.name)
    })
}

fn local_ipv4() -> CliResult<Ipv4Addr> {
    local::local_ipv4().map_err(|e| {
        CliError::Other(format!(
            "could not detect a local address ({e}); pass a base address explicitly"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionRecord;

    fn discovery(ip: &str, name: &str) -> Discovery {
        Discovery {
            name: name.to_string(),
            ip: ip.to_string(),
            port: Port::VNC,
            alive: true,
        }
    }

    #[test]
    fn test_is_known_matches_ip_or_hostname() {
        let mut records = RecordSet::new();
        let record = ConnectionRecord::new("den")
            .with_hostname("den-pc")
            .with_ip("192.168.1.11");
        records.insert(record.name.clone(), record);

        assert!(is_known(&records, &discovery("192.168.1.11", "")));
        assert!(is_known(&records, &discovery("192.168.1.99", "den-pc")));
        assert!(!is_known(&records, &discovery("192.168.1.99", "attic-pc")));
    }

    #[test]
    fn test_unnamed_discovery_does_not_match_empty_hostname() {
        let mut records = RecordSet::new();
        let record = ConnectionRecord::new("ip-only").with_ip("192.168.1.11");
        records.insert(record.name.clone(), record);

        // A record with an empty hostname must not match every unnamed
        // discovery.
        assert!(!is_known(&records, &discovery("192.168.1.99", "")));
    }
}
