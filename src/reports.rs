//! The eight summary tables derived from the enriched trip table.
//!
//! Each builder takes the enriched table (or its congested subset) and returns
//! a lazy `DataFrame`; nothing executes until the caller previews or writes
//! it. Where the source data left row order underspecified on equal counts,
//! the grouping columns are appended as secondary sort keys so output order is
//! reproducible across runs.

use anyhow::Result;
use datafusion::functions::datetime::expr_fn::to_char;
use datafusion::functions::math::expr_fn::round;
use datafusion::functions_aggregate::expr_fn::{avg, count};
use datafusion::logical_expr::SortExpr;
use datafusion::prelude::*;

/// A trip slower than this is considered congested. Fixed, not configurable.
pub const CONGESTION_THRESHOLD: f64 = 20.0;

/// Minimum occurrences before a congested route counts as "repeated".
const REPEATED_ROUTE_MIN: i64 = 5;

/// The spatial bucketing key: both endpoints rounded to 3 decimal places.
fn route_key() -> Vec<Expr> {
    vec![
        col("pickup_latitude_rounded"),
        col("pickup_longitude_rounded"),
        col("dropoff_latitude_rounded"),
        col("dropoff_longitude_rounded"),
    ]
}

fn route_key_asc() -> impl Iterator<Item = SortExpr> {
    route_key().into_iter().map(|c| c.sort(true, true))
}

/// Trips with a non-null speed below the congestion threshold. NULL speeds
/// (zero duration or unparseable timestamps) fail the `<` and drop out.
pub fn congested_trips(trips: &DataFrame) -> Result<DataFrame> {
    let df = trips
        .clone()
        .filter(col("speed_kmh").lt(lit(CONGESTION_THRESHOLD)))?;
    Ok(df)
}

/// Top 20 routes by trip count across all trips.
pub fn top_routes(trips: &DataFrame) -> Result<DataFrame> {
    let mut order = vec![col("count").sort(false, true)];
    order.extend(route_key_asc());

    let df = trips
        .clone()
        .aggregate(route_key(), vec![count(lit(1)).alias("count")])?
        .sort(order)?
        .limit(0, Some(20))?;
    Ok(df)
}

/// Per-trip listing of the congested subset, oldest pickup first.
pub fn congested_trip_listing(congested: &DataFrame) -> Result<DataFrame> {
    let mut columns = route_key();
    columns.extend([col("pickup_datetime"), col("dropoff_datetime"), col("speed_kmh")]);

    let df = congested
        .clone()
        .select(columns)?
        .sort(vec![col("pickup_datetime").sort(true, true)])?;
    Ok(df)
}

/// Congested trip count and average speed per pickup hour.
pub fn congestion_by_hour(congested: &DataFrame) -> Result<DataFrame> {
    let df = congested
        .clone()
        .aggregate(
            vec![col("hour")],
            vec![
                count(lit(1)).alias("num_congested_trips"),
                avg(col("speed_kmh")).alias("raw_avg_speed"),
            ],
        )?
        .select(vec![
            col("hour"),
            col("num_congested_trips"),
            round(vec![col("raw_avg_speed"), lit(2)]).alias("avg_speed"),
        ])?
        .sort(vec![col("hour").sort(true, true)])?;
    Ok(df)
}

/// Routes that show up congested more than five times.
pub fn repeated_congested_routes(congested: &DataFrame) -> Result<DataFrame> {
    let mut order = vec![col("num_repeated_congested_trips").sort(false, true)];
    order.extend(route_key_asc());

    let df = congested
        .clone()
        .aggregate(
            route_key(),
            vec![count(lit(1)).alias("num_repeated_congested_trips")],
        )?
        .filter(col("num_repeated_congested_trips").gt(lit(REPEATED_ROUTE_MIN)))?
        .sort(order)?;
    Ok(df)
}

/// Recurring congestion broken down by pickup hour and route.
pub fn congested_routes_grouped(congested: &DataFrame) -> Result<DataFrame> {
    let mut group = vec![col("hour")];
    group.extend(route_key());

    let mut select_cols = group.clone();
    select_cols.extend([
        col("num_congested_trips"),
        round(vec![col("raw_avg_speed"), lit(2)]).alias("avg_speed"),
    ]);

    let mut order = vec![
        col("num_congested_trips").sort(false, true),
        col("hour").sort(true, true),
    ];
    order.extend(route_key_asc());

    let df = congested
        .clone()
        .aggregate(
            group,
            vec![
                count(lit(1)).alias("num_congested_trips"),
                avg(col("speed_kmh")).alias("raw_avg_speed"),
            ],
        )?
        .filter(col("num_congested_trips").gt(lit(REPEATED_ROUTE_MIN)))?
        .select(select_cols)?
        .sort(order)?;
    Ok(df)
}

/// Average trip distance and trip count per pickup hour, all trips.
pub fn hourly_stats(trips: &DataFrame) -> Result<DataFrame> {
    let df = trips
        .clone()
        .aggregate(
            vec![col("hour")],
            vec![
                avg(col("trip_distance")).alias("raw_avg_distance"),
                count(lit(1)).alias("num_trips"),
            ],
        )?
        .select(vec![
            col("hour"),
            round(vec![col("raw_avg_distance"), lit(2)]).alias("avg_distance"),
            col("num_trips"),
        ])?
        .sort(vec![col("hour").sort(true, true)])?;
    Ok(df)
}

/// Trip counts per payment type, most common first.
pub fn payment_type_counts(trips: &DataFrame) -> Result<DataFrame> {
    let df = trips
        .clone()
        .aggregate(vec![col("payment_type")], vec![count(lit(1)).alias("count")])?
        .sort(vec![
            col("count").sort(false, true),
            col("payment_type").sort(true, true),
        ])?;
    Ok(df)
}

/// Average total amount per day of week.
///
/// Days are 3-letter labels and the sort is on the label, so the output is
/// alphabetical (Fri, Mon, Sat, Sun, Thu, Tue, Wed), not calendar order.
pub fn avg_total_amount_by_day(trips: &DataFrame) -> Result<DataFrame> {
    let df = trips
        .clone()
        .with_column("day_of_week", to_char(col("pickup_datetime"), lit("%a")))?
        .aggregate(
            vec![col("day_of_week")],
            vec![
                avg(col("total_amount")).alias("raw_avg_total"),
                count(lit(1)).alias("num_trips"),
            ],
        )?
        .select(vec![
            col("day_of_week"),
            round(vec![col("raw_avg_total"), lit(2)]).alias("avg_total_amount"),
            col("num_trips"),
        ])?
        .sort(vec![col("day_of_week").sort(true, true)])?;
    Ok(df)
}

/// Trip counts per passenger count, ascending.
pub fn passenger_count_distribution(trips: &DataFrame) -> Result<DataFrame> {
    let df = trips
        .clone()
        .aggregate(
            vec![col("passenger_count")],
            vec![count(lit(1)).alias("count")],
        )?
        .sort(vec![col("passenger_count").sort(true, true)])?;
    Ok(df)
}
