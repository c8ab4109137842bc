//! Terminal client for the river level API: station markers and hydrograph charts
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use river_level_service::client::{BulletinClient, ChartView, MapView, DEFAULT_BASE_URL};
use river_level_service::db::Session;

#[derive(Parser, Debug)]
#[command(name = "river-level-client")]
#[command(about = "Query river water-level bulletins from the API")]
struct Args {
    /// API base URL
    #[arg(long, env = "RIVER_LEVEL_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List station markers for a bulletin date and session
    Map {
        /// Bulletin date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Morning or Evening
        #[arg(long, default_value = "Morning")]
        session: String,

        /// Show the popup for the marker nearest this "lon,lat" position
        #[arg(long, value_parser = parse_position)]
        click: Option<(f64, f64)>,

        /// Click tolerance in degrees
        #[arg(long, default_value_t = 0.1)]
        tolerance: f64,
    },
    /// Render a station's hydrograph as SVG
    Hydrograph {
        /// Station name
        #[arg(long)]
        station: Option<String>,

        /// Output SVG path
        #[arg(long, default_value = "hydrograph.svg")]
        output: PathBuf,

        #[arg(long, default_value_t = 900)]
        width: u32,

        #[arg(long, default_value_t = 400)]
        height: u32,
    },
}

fn parse_position(value: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected lon,lat but got {value:?}"))?;
    let lon = lon.trim().parse().map_err(|e| format!("invalid longitude: {e}"))?;
    let lat = lat.trim().parse().map_err(|e| format!("invalid latitude: {e}"))?;
    Ok((lon, lat))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();
    let client = BulletinClient::new(args.base_url);

    match args.command {
        Command::Map {
            date,
            session,
            click,
            tolerance,
        } => {
            let mut map = MapView::new(client);
            if let Some(date) = date {
                map.set_date(date);
            }
            map.set_session(Session::from_label(Some(session.as_str())));

            if !map.refresh().await {
                return Err("could not load stations".into());
            }

            println!(
                "{} {} bulletin: {} stations",
                map.date(),
                map.session(),
                map.layer().len()
            );
            for marker in map.layer().markers() {
                let popup = &marker.popup;
                println!(
                    "  {:<24} {:<20} [{:>8.4}, {:>8.4}] {} m",
                    popup.station,
                    popup.river,
                    marker.longitude,
                    marker.latitude,
                    popup
                        .water_level_m
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }

            if let Some((lon, lat)) = click {
                match map.click(lon, lat, tolerance) {
                    Some(popup) => println!("\n{popup}"),
                    None => println!("\nNo station within {tolerance} degrees of {lon},{lat}"),
                }
            }
        }
        Command::Hydrograph {
            station,
            output,
            width,
            height,
        } => {
            let points = match station.as_deref() {
                Some(s) if !s.is_empty() => match client.fetch_hydrograph(s).await {
                    Ok(points) => points,
                    Err(e) => {
                        error!("Failed to fetch hydrograph: {}", e);
                        Vec::new()
                    }
                },
                _ => Vec::new(),
            };

            match ChartView::build(station.as_deref(), &points) {
                ChartView::Prompt(msg) | ChartView::Placeholder(msg) => println!("{msg}"),
                ChartView::Chart(chart) => {
                    fs::write(&output, chart.to_svg(width, height))?;
                    println!(
                        "Wrote {} points for {} to {}",
                        chart.points.len(),
                        chart.station,
                        output.display()
                    );
                }
            }
        }
    }

    Ok(())
}
