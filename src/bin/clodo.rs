//! CLI binary for the clodo-cloud crate.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use clodo_cloud::{
    ClodoDnsDriver, ClodoError, ClodoNodeDriver, ComputeProvider, Connection, ConnectionConfig,
    Credentials, DnsProvider, Extra, NodeAction, Record, Zone, DEFAULT_BASE_URL,
    DEFAULT_ZONE_TYPE,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clodo")]
#[command(author, version, about = "Manage Clodo cloud servers and DNS zones")]
struct Cli {
    /// Account user id
    #[arg(long, env = "CLODO_USER_ID")]
    user_id: String,

    /// Account API key
    #[arg(long, env = "CLODO_KEY", hide_env_values = true)]
    key: String,

    /// API entry point
    #[arg(long, env = "CLODO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and show the token lifetime
    Login,

    /// List images
    Images,

    /// List data centers
    Locations,

    /// List servers
    Nodes,

    /// Power on a server
    Start { node_id: String },

    /// Power off a server
    Stop { node_id: String },

    /// Reboot a server
    Reboot { node_id: String },

    /// Delete a server
    Destroy { node_id: String },

    /// List DNS zones
    Zones,

    /// Show a DNS zone
    Zone { zone_id: String },

    /// Create a DNS zone
    CreateZone {
        domain: String,

        /// Zone type
        #[arg(long = "type", default_value = DEFAULT_ZONE_TYPE)]
        zone_type: String,

        #[arg(long)]
        ttl: Option<u32>,

        /// Master address for slave zones
        #[arg(long)]
        slave_addr: Option<String>,
    },

    /// Update a DNS zone
    UpdateZone {
        zone_id: String,

        domain: String,

        /// Zone type
        #[arg(long = "type", default_value = DEFAULT_ZONE_TYPE)]
        zone_type: String,

        #[arg(long)]
        ttl: Option<u32>,

        #[arg(long)]
        domain_master: Option<String>,
    },

    /// Delete a DNS zone
    DeleteZone { zone_id: String },

    /// Delete a DNS record
    DeleteRecord {
        record_id: String,

        /// Zone the record belongs to
        #[arg(long)]
        zone: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClodoError> {
    let credentials = Credentials::new(cli.user_id, cli.key);
    let config = ConnectionConfig::with_base_url(&cli.base_url);
    let connection = Arc::new(Connection::connect_with(&credentials, config).await?);
    let compute = ClodoNodeDriver::new(connection.clone());
    let dns = ClodoDnsDriver::new(connection.clone());
    let format = cli.format;

    match cli.command {
        Commands::Login => {
            let session = connection.session();
            match format {
                OutputFormat::Text => {
                    println!("issued:  {}", session.issued());
                    println!("expires: {}", session.expires());
                    println!("api:     {}", connection.base_url());
                }
                OutputFormat::Json => print_json(&serde_json::json!({
                    "issued": session.issued(),
                    "expires": session.expires(),
                    "base_url": connection.base_url(),
                }))?,
            }
        }

        Commands::Images => {
            let images = compute.list_images(None).await?;
            match format {
                OutputFormat::Text => {
                    for image in &images {
                        println!("{}\t{}", image.id, image.name);
                    }
                }
                OutputFormat::Json => print_json(&images)?,
            }
        }

        Commands::Locations => {
            let locations = compute.list_locations().await?;
            match format {
                OutputFormat::Text => {
                    for location in &locations {
                        println!("{}\t{}\t{}", location.id, location.name, location.country);
                    }
                }
                OutputFormat::Json => print_json(&locations)?,
            }
        }

        Commands::Nodes => {
            let nodes = compute.list_nodes().await?;
            match format {
                OutputFormat::Text => {
                    for node in &nodes {
                        println!(
                            "{}\t{}\t{}\t{}",
                            node.id,
                            node.name,
                            node.state,
                            node.public_ips.join(",")
                        );
                    }
                }
                OutputFormat::Json => print_json(&nodes)?,
            }
        }

        Commands::Start { node_id } => {
            report(format, compute.node_action(&node_id, NodeAction::Start).await?)?;
        }
        Commands::Stop { node_id } => {
            report(format, compute.node_action(&node_id, NodeAction::Stop).await?)?;
        }
        Commands::Reboot { node_id } => {
            report(format, compute.node_action(&node_id, NodeAction::Reboot).await?)?;
        }
        Commands::Destroy { node_id } => {
            report(format, compute.destroy_node_by_id(&node_id).await?)?;
        }

        Commands::Zones => {
            let zones = dns.list_zones().await?;
            match format {
                OutputFormat::Text => {
                    for zone in &zones {
                        println!("{}\t{}\t{}", zone.id, zone.domain, zone.zone_type);
                    }
                }
                OutputFormat::Json => print_json(&zones)?,
            }
        }

        Commands::Zone { zone_id } => {
            let zone = dns.get_zone(&zone_id).await?;
            match format {
                OutputFormat::Text => {
                    let ttl = zone.ttl.map(|t| t.to_string()).unwrap_or_default();
                    println!("{}\t{}\t{}\t{}", zone.id, zone.domain, zone.zone_type, ttl);
                }
                OutputFormat::Json => print_json(&zone)?,
            }
        }

        Commands::CreateZone {
            domain,
            zone_type,
            ttl,
            slave_addr,
        } => {
            let extra = single_extra("slave_addr", slave_addr);
            let zone = dns
                .create_zone(&domain, &zone_type, ttl, extra.as_ref())
                .await?;
            match format {
                OutputFormat::Text => println!("{}", zone.id),
                OutputFormat::Json => print_json(&zone)?,
            }
        }

        Commands::UpdateZone {
            zone_id,
            domain,
            zone_type,
            ttl,
            domain_master,
        } => {
            let zone = Zone::reference(zone_id);
            let extra = single_extra("domain_master", domain_master);
            let updated = dns
                .update_zone(&zone, &domain, &zone_type, ttl, extra.as_ref())
                .await?;
            report(format, updated)?;
        }

        Commands::DeleteZone { zone_id } => {
            report(format, dns.delete_zone(&Zone::reference(zone_id)).await?)?;
        }

        Commands::DeleteRecord { record_id, zone } => {
            let record = Record::reference(record_id, zone);
            report(format, dns.delete_record(&record).await?)?;
        }
    }

    Ok(())
}

fn single_extra(key: &str, value: Option<String>) -> Option<Extra> {
    value.map(|v| {
        let mut extra = Extra::new();
        extra.insert(key.to_string(), serde_json::Value::String(v));
        extra
    })
}

fn report(format: OutputFormat, done: bool) -> Result<(), ClodoError> {
    match format {
        OutputFormat::Text => println!("{}", if done { "ok" } else { "not done" }),
        OutputFormat::Json => print_json(&serde_json::json!({ "ok": done }))?,
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ClodoError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
