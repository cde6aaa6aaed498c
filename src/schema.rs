use datafusion::arrow::datatypes::{DataType, Field, Schema, TimeUnit};

/// Name of the registered trip table.
pub const TRIP_TABLE: &str = "trips";

/// Arrow timestamp type used for the parsed pickup/dropoff columns.
pub fn trip_timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Nanosecond, None)
}

/// Explicit schema for the headerless 19-column trip files.
///
/// The datetime columns are read as strings and parsed during enrichment so
/// that a malformed value becomes NULL instead of failing the whole scan.
/// Column order matches the cleaned TLC extract exactly; a source row with a
/// different column count fails the scan.
pub fn trip_schema() -> Schema {
    Schema::new(vec![
        Field::new("VendorID", DataType::Int64, true),
        Field::new("tpep_pickup_datetime", DataType::Utf8, true),
        Field::new("tpep_dropoff_datetime", DataType::Utf8, true),
        Field::new("passenger_count", DataType::Int64, true),
        Field::new("trip_distance", DataType::Float64, true),
        Field::new("pickup_longitude", DataType::Float64, true),
        Field::new("pickup_latitude", DataType::Float64, true),
        Field::new("RateCodeID", DataType::Int64, true),
        Field::new("store_and_fwd_flag", DataType::Utf8, true),
        Field::new("dropoff_longitude", DataType::Float64, true),
        Field::new("dropoff_latitude", DataType::Float64, true),
        Field::new("payment_type", DataType::Int64, true),
        Field::new("fare_amount", DataType::Float64, true),
        Field::new("extra", DataType::Float64, true),
        Field::new("mta_tax", DataType::Float64, true),
        Field::new("tip_amount", DataType::Float64, true),
        Field::new("tolls_amount", DataType::Float64, true),
        Field::new("improvement_surcharge", DataType::Float64, true),
        Field::new("total_amount", DataType::Float64, true),
    ])
}
