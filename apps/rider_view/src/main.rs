use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use geocode_client::BarikoiClient;
use map_display::RecordingMapDisplay;
use tracing_subscriber::EnvFilter;
use tracker_core::ViewController;

mod commands;
mod config;
mod console;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Geocode an address and animate a rider toward it")]
struct Args {
    /// Settings file (defaults to ./rider_view.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Submit this address once instead of starting the interactive console.
    #[arg(long)]
    address: Option<String>,
    /// With --address, also track the rider and wait for the animation.
    #[arg(long, requires = "address")]
    track: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    settings.validate()?;

    let geocoder = Arc::new(BarikoiClient::new(settings.geocode_config())?);
    let display = Arc::new(RecordingMapDisplay::new(settings.api_key.clone()));
    let mut controller =
        ViewController::new(geocoder, display.clone(), settings.tracker_settings());
    let printer = console::spawn_printer(controller.subscribe_events(), display);

    controller.initialize().await?;

    match args.address {
        Some(address) => {
            controller.set_address(address);
            controller.submit_address().await?;
            if args.track {
                controller.track_rider().await?;
                tokio::select! {
                    state = controller.wait_for_animation() => {
                        tracing::info!(?state, "rider animation ended");
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("interrupted");
                    }
                }
            }
        }
        None => console::run(&mut controller).await?,
    }

    controller.shutdown();
    printer.abort();
    Ok(())
}
