//! Settings subcommand: show or change application settings.

use crate::cli::AppContext;
use crate::error::{CliError, CliResult};
use crate::output;
use clap::{Parser, Subcommand};
use console::style;

/// Show or change application settings.
#[derive(Parser, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Change one or more settings and persist them
    Set(SetArgs),
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Whether background liveness scanning runs at all
    #[arg(long)]
    pub enable_scan: Option<bool>,

    /// Whether launching a viewer ends the session
    #[arg(long)]
    pub close_on_connect: Option<bool>,

    /// Per-probe connection timeout in milliseconds
    #[arg(long)]
    pub probe_timeout_ms: Option<u64>,

    /// Auto-refresh interval in seconds
    #[arg(long)]
    pub refresh_interval_secs: Option<u64>,

    /// Maximum concurrent probes per pass
    #[arg(long)]
    pub scan_concurrency: Option<usize>,

    /// External viewer binary invoked on connect
    #[arg(long)]
    pub viewer_path: Option<String>,

    /// Default port for new connections and sweeps
    #[arg(long)]
    pub default_port: Option<u16>,
}

impl SetArgs {
    fn is_empty(&self) -> bool {
        self.enable_scan.is_none()
            && self.close_on_connect.is_none()
            && self.probe_timeout_ms.is_none()
            && self.refresh_interval_secs.is_none()
            && self.scan_concurrency.is_none()
            && self.viewer_path.is_none()
            && self.default_port.is_none()
    }
}

impl SettingsCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        match &self.action {
            SettingsAction::Show => {
                print_settings(ctx);
                Ok(())
            }
            SettingsAction::Set(args) => {
                if args.is_empty() {
                    return Err(CliError::Other(
                        "nothing to change; pass at least one --option".to_string(),
                    ));
                }

                let mut settings = ctx.settings.clone();
                if let Some(v) = args.enable_scan {
                    settings.enable_scan = v;
                }
                if let Some(v) = args.close_on_connect {
                    settings.close_on_connect = v;
                }
                if let Some(v) = args.probe_timeout_ms {
                    settings.probe_timeout_ms = v;
                }
                if let Some(v) = args.refresh_interval_secs {
                    settings.refresh_interval_secs = v;
                }
                if let Some(v) = args.scan_concurrency {
                    settings.scan_concurrency = v;
                }
                if let Some(v) = &args.viewer_path {
                    settings.viewer_path = v.clone();
                }
                if let Some(v) = args.default_port {
                    settings.default_port = v;
                }

                settings.save()?;
                output::print_info("settings saved");
                Ok(())
            }
        }
    }
}

fn print_settings(ctx: &AppContext) {
    let s = &ctx.settings;
    println!("  {:<22} {}", style("enable_scan").bold(), s.enable_scan);
    println!(
        "  {:<22} {}",
        style("close_on_connect").bold(),
        s.close_on_connect
    );
    println!(
        "  {:<22} {}",
        style("probe_timeout_ms").bold(),
        s.probe_timeout_ms
    );
    println!(
        "  {:<22} {}",
        style("refresh_interval_secs").bold(),
        s.refresh_interval_secs
    );
    println!(
        "  {:<22} {}",
        style("scan_concurrency").bold(),
        s.scan_concurrency
    );
    println!("  {:<22} {}", style("viewer_path").bold(), s.viewer_path);
    println!("  {:<22} {}", style("default_port").bold(), s.default_port);
}
