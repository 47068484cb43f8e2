mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "outlet-cli")]
#[command(about = "Outlet finder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the outlet list served by the upstream service
    Outlets,
    /// Free-text search against the upstream service
    Search {
        /// Search text, e.g. "24 hours"
        query: String,
    },
    /// List outlets within the neighbor radius of one outlet
    Neighbors {
        /// Outlet id
        id: String,
        /// Radius in kilometers; defaults to `OUTLET_NEIGHBOR_RADIUS_KM`
        #[arg(long, value_parser = parse_radius_km)]
        radius_km: Option<f64>,
    },
}

fn parse_radius_km(raw: &str) -> Result<f64, String> {
    let km: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !km.is_finite() || km < 0.0 {
        return Err(format!("radius must be a non-negative number, got {raw}"));
    }
    Ok(km)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = outlet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Outlets) => commands::outlets(&config).await?,
        Some(Commands::Search { query }) => commands::search(&config, &query).await?,
        Some(Commands::Neighbors { id, radius_km }) => {
            let radius_km = radius_km.unwrap_or(config.neighbor_radius_km);
            commands::neighbors(&config, &id, radius_km).await?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
