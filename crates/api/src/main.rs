//! catc - Catalyst Center assurance CLI
//!
//! Thin dispatch over the callable operations. Each subcommand maps to one
//! operation; output is pretty JSON on stdout, logs go to stderr.

use std::collections::BTreeMap;

use anyhow::Result;
use catc_app::{AppContext, ClientQuery};
use catc_domain::types::{ClientFilters, Paging};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catc", version, about = "Catalyst Center assurance client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Time-window selection shared by the client-telemetry subcommands
#[derive(Args, Clone, Default)]
struct WindowArgs {
    /// Relative expression: "last <N> minutes|hours|days", "today", "yesterday"
    #[arg(long)]
    last: Option<String>,
    /// Absolute ISO 8601 start (or YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// Absolute ISO 8601 end; defaults to now
    #[arg(long)]
    end: Option<String>,
}

/// Client filter flags shared by the client-telemetry subcommands
#[derive(Args, Clone, Default)]
struct FilterArgs {
    #[arg(long)]
    ssid: Option<String>,
    #[arg(long)]
    band: Option<String>,
    #[arg(long)]
    os_type: Option<String>,
    #[arg(long)]
    site_id: Option<String>,
    #[arg(long)]
    site_hierarchy: Option<String>,
    #[arg(long)]
    connection_status: Option<String>,
    /// Extra filter as key=value; repeatable
    #[arg(long = "filter", value_parser = parse_key_val)]
    filters: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Command {
    /// List network devices known to the inventory
    Devices {
        /// Filter as key=value; repeatable, applied verbatim
        #[arg(long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },
    /// List sites with flattened location attributes
    Sites,
    /// List interfaces of one network device
    Interfaces {
        /// Device id as reported by the inventory
        device_id: String,
    },
    /// Query client telemetry over a time window
    Clients {
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long)]
        order: Option<String>,
    },
    /// Count clients matching the filters over a time window
    ClientCount {
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch one client by MAC address
    Client {
        /// Client MAC address
        mac: String,
        #[command(flatten)]
        window: WindowArgs,
        /// Detail view to request
        #[arg(long)]
        view: Option<String>,
        /// Specific attribute to request
        #[arg(long)]
        attribute: Option<String>,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn client_query(window: WindowArgs, filter: FilterArgs, paging: Paging) -> ClientQuery {
    let mut filters = ClientFilters {
        ssid: filter.ssid,
        band: filter.band,
        os_type: filter.os_type,
        site_id: filter.site_id,
        site_hierarchy: filter.site_hierarchy,
        connection_status: filter.connection_status,
        ..Default::default()
    };
    for (key, value) in filter.filters {
        filters.extra.insert(key, value);
    }

    ClientQuery {
        relative: window.last,
        start: window.start,
        end: window.end,
        filters,
        paging,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(_) => tracing::debug!("No .env file found"),
    }

    let cli = Cli::parse();

    let config = catc_infra::config::load()?;
    let ctx = AppContext::new(config)?;

    let output = match cli.command {
        Command::Devices { filters } => {
            let filters: BTreeMap<String, String> = filters.into_iter().collect();
            catc_app::get_network_devices(&ctx, filters).await?
        }
        Command::Sites => catc_app::get_sites(&ctx).await?,
        Command::Interfaces { device_id } => {
            catc_app::get_device_interfaces(&ctx, &device_id).await?
        }
        Command::Clients { window, filter, limit, offset, sort_by, order } => {
            let paging = Paging { limit, offset, sort_by, order };
            catc_app::get_clients(&ctx, client_query(window, filter, paging)).await?
        }
        Command::ClientCount { window, filter } => {
            catc_app::get_client_count(&ctx, client_query(window, filter, Paging::default()))
                .await?
        }
        Command::Client { mac, window, view, attribute } => {
            let query = client_query(window, FilterArgs::default(), Paging::default());
            catc_app::get_client_by_mac(&ctx, &mac, query, view.as_deref(), attribute.as_deref())
                .await?
        }
    };

    println!("{output}");
    Ok(())
}
