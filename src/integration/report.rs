//! CSV export of the cumulative counters.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analytics::{Counters, Direction};
use crate::error::ReportError;

/// `analysis_report_<stem>.csv` for the given input file.
pub fn default_report_path(input: impl AsRef<Path>) -> PathBuf {
    let stem = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stream".to_string());
    PathBuf::from(format!("analysis_report_{stem}.csv"))
}

/// Write a `Metric,Value` table: a summary block followed by per-class rows for
/// each direction. Classes appear in sorted order if seen in either direction.
pub fn write_report<W: Write>(counters: &Counters, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let classes = counters.classes();

    wtr.write_record(["Metric", "Value"])?;
    wtr.write_record(["--- SUMMARY ---", ""])?;
    wtr.write_record([
        "Total Objects Entering".to_string(),
        counters.total(Direction::Entering).to_string(),
    ])?;
    wtr.write_record([
        "Total Objects Exiting".to_string(),
        counters.total(Direction::Exiting).to_string(),
    ])?;
    wtr.write_record([
        "Total Vehicles Entering".to_string(),
        counters.total_vehicles_entering().to_string(),
    ])?;
    wtr.write_record([
        "Total Vehicles Exiting".to_string(),
        counters.total_vehicles_exiting().to_string(),
    ])?;

    for (heading, prefix, direction) in [
        ("--- ENTERING DETAILS ---", "Entering", Direction::Entering),
        ("--- EXITING DETAILS ---", "Exiting", Direction::Exiting),
    ] {
        wtr.write_record([heading, ""])?;
        for class in &classes {
            wtr.write_record([
                format!("{prefix}: {class}"),
                counters.count(direction, class).to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_report_file(counters: &Counters, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    write_report(counters, File::create(path)?)?;
    info!(path = %path.display(), "report written");
    Ok(())
}
