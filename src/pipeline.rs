use std::path::Path;

use anyhow::{anyhow, Context, Result};
use datafusion::functions::core::expr_fn::nullif;
use datafusion::functions::datetime::expr_fn::{date_part, to_unixtime};
use datafusion::functions::math::expr_fn::round;
use datafusion::prelude::*;
use tracing::warn;

use crate::schema::{trip_schema, trip_timestamp_type, TRIP_TABLE};

/// Registers the trip files under `data_dir` as the `trips` table.
///
/// The path must be a readable directory; an empty one is only warned about
/// since it still registers cleanly and yields empty reports.
pub async fn register_trips(ctx: &SessionContext, data_dir: &Path) -> Result<()> {
    validate_data_dir(data_dir)?;

    let schema = trip_schema();
    let options = CsvReadOptions::new().has_header(false).schema(&schema);
    ctx.register_csv(TRIP_TABLE, data_dir.to_string_lossy().as_ref(), options)
        .await
        .with_context(|| format!("failed to register trip files from {}", data_dir.display()))?;
    Ok(())
}

fn validate_data_dir(data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        return Err(anyhow!(
            "Data directory does not exist: {}",
            data_dir.display()
        ));
    }
    if !data_dir.is_dir() {
        return Err(anyhow!(
            "Data path is not a directory: {}",
            data_dir.display()
        ));
    }

    let csv_files = std::fs::read_dir(data_dir)
        .with_context(|| format!("cannot read {}", data_dir.display()))?
        .flatten()
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "csv"))
        .count();
    if csv_files == 0 {
        warn!(data_dir = %data_dir.display(), "no .csv files found in data directory");
    }

    Ok(())
}

/// Adds the derived columns to the raw trip table.
///
/// Timestamps are parsed with `try_cast` so malformed values become NULL
/// instead of failing the scan. A zero trip duration makes `speed_kmh` NULL
/// (never a division error), so such rows drop out of any `<` comparison
/// downstream. `speed_kmh` is raw trip_distance (miles) over hours with no
/// unit conversion; the column name overstates the units.
pub async fn enriched_trips(ctx: &SessionContext) -> Result<DataFrame> {
    let df = ctx.table(TRIP_TABLE).await?;

    let df = df
        .with_column(
            "pickup_datetime",
            try_cast(col("tpep_pickup_datetime"), trip_timestamp_type()),
        )?
        .with_column(
            "dropoff_datetime",
            try_cast(col("tpep_dropoff_datetime"), trip_timestamp_type()),
        )?
        .with_column(
            "pickup_latitude_rounded",
            round(vec![col("pickup_latitude"), lit(3)]),
        )?
        .with_column(
            "pickup_longitude_rounded",
            round(vec![col("pickup_longitude"), lit(3)]),
        )?
        .with_column(
            "dropoff_latitude_rounded",
            round(vec![col("dropoff_latitude"), lit(3)]),
        )?
        .with_column(
            "dropoff_longitude_rounded",
            round(vec![col("dropoff_longitude"), lit(3)]),
        )?
        .with_column(
            "trip_duration",
            (to_unixtime(vec![col("dropoff_datetime")]) - to_unixtime(vec![col("pickup_datetime")]))
                / lit(3600.0),
        )?
        .with_column(
            "speed_kmh",
            col("trip_distance") / nullif(col("trip_duration"), lit(0.0)),
        )?
        .with_column(
            "hour",
            cast(
                date_part(lit("hour"), col("pickup_datetime")),
                datafusion::arrow::datatypes::DataType::Int32,
            ),
        )?;

    Ok(df)
}
