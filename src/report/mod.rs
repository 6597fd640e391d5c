//! Report writers
//!
//! Renders a [`SessionReport`] as Markdown, JSON or CSV and writes the
//! selected formats into an output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::bench::SessionReport;
use crate::config::ReportFormat;
use crate::models::AggregatedResult;
use crate::{AwkBenchError, Result, CSV_FILE, JSON_FILE, MARKDOWN_FILE};

mod markdown;

pub use markdown::{write_markdown, write_summary};

const CSV_HEADER: [&str; 9] = [
    "awk",
    "program",
    "runs",
    "mean_ns",
    "median_ns",
    "min_ns",
    "max_ns",
    "stddev_ns",
    "throughput_mbps",
];

/// Write the report as pretty-printed JSON
pub fn write_json<W: Write>(w: &mut W, report: &SessionReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

/// Write one CSV row per aggregated result
pub fn write_csv<W: Write>(w: W, results: &[AggregatedResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    writer.write_record(CSV_HEADER)?;
    for r in results {
        writer.write_record([
            r.awk.clone(),
            r.program.clone(),
            r.runs.to_string(),
            r.mean.as_nanos().to_string(),
            r.median.as_nanos().to_string(),
            r.min.as_nanos().to_string(),
            r.max.as_nanos().to_string(),
            r.std_dev.as_nanos().to_string(),
            format!("{:.2}", r.throughput_mbps),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => MARKDOWN_FILE,
            ReportFormat::Json => JSON_FILE,
            ReportFormat::Csv => CSV_FILE,
        }
    }
}

/// Write every requested format into `dir`, returning the written paths
pub fn write_all(
    dir: &Path,
    report: &SessionReport,
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        AwkBenchError::Report(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = dir.join(format.file_name());
        if written.contains(&path) {
            continue;
        }
        write_file(&path, |w| match format {
            ReportFormat::Markdown => write_markdown(w, report),
            ReportFormat::Json => write_json(w, report),
            ReportFormat::Csv => write_csv(w, &report.results),
        })?;
        info!(format = %format, path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}

fn write_file<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).map_err(|e| {
        AwkBenchError::Report(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    render(&mut writer)?;
    writer.flush()?;
    Ok(())
}
