mod output;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use medmap_core::{AppConfig, CategoryFilter, Coordinate};
use medmap_locator::{
    FacilityLocator, FixedPositionProvider, LocatorError, ReferencePoint,
    UnavailablePositionProvider,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medmap")]
#[command(about = "Find medical facilities near a place or your current location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a reference point and print it
    Locate {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Search facilities around a reference point
    Search {
        #[command(flatten)]
        location: LocationArgs,
        /// Search radius in miles
        #[arg(long, default_value = "5")]
        radius: f64,
        /// Facility type: all, hospital, clinic, doctors, pharmacy or dentist
        #[arg(long = "type", default_value = "all")]
        filter: CategoryFilter,
        /// Print the rendered map and list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the facility API's default set
    Defaults {
        /// Print the rendered map and list as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the reference point comes from. Exactly one is required.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct LocationArgs {
    /// Address, city, ZIP code or hospital name
    #[arg(long, short)]
    query: Option<String>,
    /// Use the device position (`MEDMAP_DEVICE_POSITION`)
    #[arg(long)]
    device: bool,
    /// Explicit coordinate as `lat,lng`
    #[arg(long, value_parser = Coordinate::parse_pair, allow_hyphen_values = true)]
    at: Option<Coordinate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = medmap_core::load_app_config_from_env().context("failed to load config")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        facilities_api_url = config.facilities_api_url.as_str(),
        "configuration loaded"
    );

    let mut locator =
        FacilityLocator::from_config(&config).context("failed to build facility locator")?;

    match cli.command {
        Commands::Locate { location } => {
            let point = locate(&mut locator, &config, &location).await?;
            println!("{}", point.status_message());
        }
        Commands::Search {
            location,
            radius,
            filter,
            json,
        } => {
            let point = locate(&mut locator, &config, &location).await?;
            if !json {
                println!("{}", point.status_message());
            }
            let outcome = locator
                .search(radius, filter)
                .await
                .map_err(|err| user_facing(err, "search rejected"))?;
            output::print_report(&locator, &outcome, json)?;
            if outcome.is_retryable() {
                anyhow::bail!("facility search failed");
            }
        }
        Commands::Defaults { json } => {
            let outcome = locator.load_defaults().await;
            output::print_report(&locator, &outcome, json)?;
            if outcome.is_retryable() {
                anyhow::bail!("loading default facilities failed");
            }
        }
    }

    Ok(())
}

async fn locate(
    locator: &mut FacilityLocator,
    config: &AppConfig,
    location: &LocationArgs,
) -> anyhow::Result<ReferencePoint> {
    let result = if let Some(query) = &location.query {
        locator.locate_by_query(query).await
    } else if let Some(coordinate) = location.at {
        locator
            .locate_with_device(&FixedPositionProvider::new(coordinate))
            .await
    } else if location.device {
        match config.device_position {
            Some(coordinate) => {
                locator
                    .locate_with_device(&FixedPositionProvider::new(coordinate))
                    .await
            }
            None => {
                locator
                    .locate_with_device(&UnavailablePositionProvider)
                    .await
            }
        }
    } else {
        anyhow::bail!("one of --query, --device or --at is required");
    };
    result.map_err(|err| user_facing(err, "could not resolve location"))
}

/// Wraps `err` so the banner copy prints first and the cause follows.
fn user_facing(err: LocatorError, context: &'static str) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(context).context(message)
}

#[cfg(test)]
mod tests;
