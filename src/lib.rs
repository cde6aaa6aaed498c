//! Batch analytics over NYC yellow-taxi trip records.
//!
//! Loads headerless delimited trip files into DataFusion, derives timestamp,
//! rounded-coordinate, duration and speed columns, and produces eight summary
//! tables (popular routes, congestion by hour, fare and passenger patterns),
//! each previewed on stdout and written to its own CSV destination.

pub mod output;
pub mod pipeline;
pub mod reports;
pub mod schema;
