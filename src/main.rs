use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use datafusion::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nyc_taxi_analysis::{output, pipeline, reports};

#[derive(Parser, Debug)]
#[command(
    name = "nyc_taxi_analysis",
    about = "NYC taxi trip analytics: popular routes, congestion by hour, fare and passenger patterns"
)]
struct Args {
    /// Folder containing the cleaned trip files (headerless CSV, 19 columns)
    #[arg(long, default_value = "./data/cleaned_output")]
    data_dir: PathBuf,

    /// Folder receiving one CSV destination per report
    #[arg(long, default_value = "./out")]
    out_dir: PathBuf,

    /// Rows shown in each stdout preview
    #[arg(long, default_value_t = 20)]
    preview_rows: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let ctx = SessionContext::new();
    pipeline::register_trips(&ctx, &args.data_dir).await?;
    info!(data_dir = %args.data_dir.display(), "trip table registered");

    let trips = pipeline::enriched_trips(&ctx).await?;
    let congested = reports::congested_trips(&trips)?;

    let top_routes = reports::top_routes(&trips)?;
    let congested_listing = reports::congested_trip_listing(&congested)?;
    let congestion_by_hour = reports::congestion_by_hour(&congested)?;
    let repeated_congested = reports::repeated_congested_routes(&congested)?;
    let hourly_stats = reports::hourly_stats(&trips)?;
    let payment_types = reports::payment_type_counts(&trips)?;
    let avg_total_by_day = reports::avg_total_amount_by_day(&trips)?;
    let passenger_counts = reports::passenger_count_distribution(&trips)?;
    let congested_grouped = reports::congested_routes_grouped(&congested)?;

    let n = args.preview_rows;
    output::preview("top_routes", &top_routes, n).await?;
    output::preview("congested_routes", &congested_listing, n).await?;
    output::preview("congestion_by_hour", &congestion_by_hour, n).await?;
    output::preview("repeated_congested_routes", &repeated_congested, n).await?;
    output::preview("hourly_stats", &hourly_stats, n).await?;
    output::preview("payment_type_count", &payment_types, n).await?;
    output::preview("avr_total_amount", &avg_total_by_day, n).await?;
    output::preview("passenger_count", &passenger_counts, n).await?;
    output::preview("congested_routes_grouped", &congested_grouped, n).await?;

    // Eight independent writes, no cross-report atomicity: a failure partway
    // through leaves the reports already written on disk.
    let persisted = [
        ("hourly_stats", hourly_stats),
        ("payment_type_count", payment_types),
        ("top_routes", top_routes),
        ("avr_total_amount", avg_total_by_day),
        ("passenger_count", passenger_counts),
        ("congestion_by_hour", congestion_by_hour),
        ("repeated_congested_routes", repeated_congested),
        ("congested_routes_grouped", congested_grouped),
    ];

    for (name, df) in persisted {
        let dest = args.out_dir.join(name);
        output::write_report(&df, &dest).await?;
        info!(report = name, dest = %dest.display(), "report written");
    }

    println!("\n✅ All reports completed successfully.");
    Ok(())
}
