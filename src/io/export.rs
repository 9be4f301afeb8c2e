//! CSV export for forecast series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dataset::ForecastSeries;
use crate::summary::CategoryThresholds;

/// Column header for forecast CSV export.
const HEADER: &str = "step,label,hour_of_day,predicted_aqi,category,severity";

/// Exports a forecast to a CSV file at the given path.
///
/// Writes a header row followed by one data row per forecast step.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(
    forecast: &ForecastSeries,
    categories: &CategoryThresholds,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(forecast, categories, buf)
}

/// Writes a forecast as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(
    forecast: &ForecastSeries,
    categories: &CategoryThresholds,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for (i, &v) in forecast.values().iter().enumerate() {
        let band = categories.classify(v as f64);
        wtr.write_record(&[
            i.to_string(),
            forecast.label(i),
            forecast.hour_of_day(i).to_string(),
            v.to_string(),
            band.label().to_string(),
            band.severity().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
