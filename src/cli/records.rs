//! Record management subcommands: list, add, edit, remove, connect.

use crate::cli::AppContext;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::probe::Probe;
use crate::refresh;
use crate::types::{ConnectionRecord, Port};
use crate::viewer::ViewerLauncher;
use clap::Parser;
use console::style;

/// Show saved connections and their liveness.
#[derive(Parser, Debug)]
pub struct ListCommand {
    /// Skip the liveness pass and list records as stored
    #[arg(long)]
    pub no_refresh: bool,
}

impl ListCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let mut records = ctx.store.load()?;

        if !self.no_refresh && ctx.settings.enable_scan {
            refresh::refresh_once(ctx.probe(), &mut records, ctx.settings.scan_concurrency).await;
        }

        output::print_records(&records)?;
        Ok(())
    }
}

/// Add a connection record.
#[derive(Parser, Debug)]
pub struct AddCommand {
    /// Name for the new connection
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Target hostname (at least one of hostname/ip is required)
    #[arg(long)]
    pub hostname: Option<String>,

    /// Target IP address
    #[arg(long)]
    pub ip: Option<String>,

    /// Viewer password (stored in plaintext)
    #[arg(long)]
    pub password: Option<String>,

    /// Server port (defaults to the configured default, normally 5900)
    #[arg(short, long)]
    pub port: Option<Port>,
}

impl AddCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let port = self
            .port
            .or_else(|| Port::new(ctx.settings.default_port))
            .unwrap_or_default();

        let record = ConnectionRecord::new(&self.name)
            .with_hostname(self.hostname.clone().unwrap_or_default())
            .with_ip(self.ip.clone().unwrap_or_default())
            .with_password(self.password.clone().unwrap_or_default())
            .with_port(port);

        let mut records = ctx.store.load()?;
        ctx.store.add(&mut records, record)?;
        output::print_info(&format!("added '{}'", self.name));
        Ok(())
    }
}

/// Edit (and optionally rename) a connection record.
#[derive(Parser, Debug)]
pub struct EditCommand {
    /// Name of the connection to edit
    #[arg(value_name = "NAME")]
    pub name: String,

    /// New name for the connection
    #[arg(long)]
    pub rename: Option<String>,

    /// New hostname (empty string clears it)
    #[arg(long)]
    pub hostname: Option<String>,

    /// New IP address (empty string clears it)
    #[arg(long)]
    pub ip: Option<String>,

    /// New viewer password (empty string clears it)
    #[arg(long)]
    pub password: Option<String>,

    /// New server port
    #[arg(short, long)]
    pub port: Option<Port>,
}

impl EditCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let mut records = ctx.store.load()?;
        let mut record = records
            .get(&self.name)
            .cloned()
            .ok_or_else(|| CliError::Other(format!("no connection named '{}'", self.name)))?;

        if let Some(new_name) = &self.rename {
            record.name = new_name.clone();
        }
        if let Some(hostname) = &self.hostname {
            record.hostname = hostname.clone();
        }
        if let Some(ip) = &self.ip {
            record.ip_address = ip.clone();
        }
        if let Some(password) = &self.password {
            record.password = password.clone();
        }
        if let Some(port) = self.port {
            record.port = port;
        }

        let new_name = record.name.clone();
        ctx.store.rename(&mut records, &self.name, record)?;

        if new_name == self.name {
            output::print_info(&format!("updated '{}'", self.name));
        } else {
            output::print_info(&format!("updated '{}' (now '{}')", self.name, new_name));
        }
        Ok(())
    }
}

/// Remove a connection record.
#[derive(Parser, Debug)]
pub struct RemoveCommand {
    /// Name of the connection to remove
    #[arg(value_name = "NAME")]
    pub name: String,
}

impl RemoveCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let mut records = ctx.store.load()?;
        // Existence is checked here at the call site; the store itself
        // treats a missing key as a no-op.
        if !records.contains_key(&self.name) {
            return Err(CliError::Other(format!(
                "no connection named '{}'",
                self.name
            )));
        }

        ctx.store.remove(&mut records, &self.name)?;
        output::print_info(&format!("removed '{}'", self.name));
        Ok(())
    }
}

/// Launch the viewer against a saved connection.
#[derive(Parser, Debug)]
pub struct ConnectCommand {
    /// Name of the connection to open
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Connect even if the target does not answer a probe
    #[arg(short, long)]
    pub force: bool,
}

impl ConnectCommand {
    pub async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        let records = ctx.store.load()?;
        let record = records
            .get(&self.name)
            .ok_or_else(|| CliError::Other(format!("no connection named '{}'", self.name)))?;
        let target = record
            .target()
            .ok_or_else(|| CliError::Other(format!("'{}' has no address", self.name)))?;

        if !self.force {
            let alive = ctx.probe().probe(target, record.port.as_u16()).await;
            if !alive {
                return Err(CliError::Other(format!(
                    "'{}' ({}:{}) is not answering; use --force to try anyway",
                    self.name, target, record.port
                )));
            }
        }

        let launcher = ViewerLauncher::new(&ctx.settings.viewer_path);
        let mut child = launcher.launch(record)?;
        println!(
            "  {} {} ({}:{})",
            style("connecting to").bold(),
            record.name,
            target,
            record.port
        );

        if !ctx.settings.close_on_connect {
            // Stay attached until the viewer exits.
            child.wait()?;
        }
        Ok(())
    }
}
