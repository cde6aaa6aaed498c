use std::path::Path;

use anyhow::{Context, Result};
use datafusion::arrow::util::pretty::pretty_format_batches;
use datafusion::config::CsvOptions;
use datafusion::dataframe::DataFrameWriteOptions;
use datafusion::prelude::DataFrame;

/// Prints the first `rows` rows of a report to stdout as a formatted table.
pub async fn preview(title: &str, df: &DataFrame, rows: usize) -> Result<()> {
    let batches = df.clone().limit(0, Some(rows))?.collect().await?;
    let formatted = pretty_format_batches(&batches)?;
    println!("\n--- {title} ---");
    println!("{formatted}");
    Ok(())
}

/// Writes a report to `dest` as CSV with a header row.
///
/// Each report gets its own destination; writes are independent, so a failure
/// here leaves previously written reports in place.
pub async fn write_report(df: &DataFrame, dest: &Path) -> Result<()> {
    let csv_options = CsvOptions::default().with_has_header(true);
    df.clone()
        .write_csv(
            dest.to_string_lossy().as_ref(),
            DataFrameWriteOptions::new(),
            Some(csv_options),
        )
        .await
        .with_context(|| format!("failed to write report to {}", dest.display()))?;
    Ok(())
}
