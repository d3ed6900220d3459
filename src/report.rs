//! One-shot mode: CSV export and a static HTML page written to disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::export::{export_file_stem, write_csv_file};
use crate::pipeline::Report;
use crate::render::{PageOptions, report_page};

/// Paths written by [`write_report`]
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub csv: PathBuf,
    pub html: PathBuf,
}

/// Write `attività_<locality>.csv` and `attività_<locality>.html` into `dir`
///
/// Path separators in the locality are replaced so both files land
/// directly in `dir`. The page links to the CSV by its relative name, so
/// both files must stay together.
pub fn write_report(dir: &Path, report: &Report, zoom: u8) -> Result<ReportFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let stem = export_file_stem(&report.locality);
    let csv_name = format!("{stem}.csv");
    let csv = dir.join(&csv_name);
    write_csv_file(&csv, &report.records)
        .with_context(|| format!("Failed to write CSV file: {}", csv.display()))?;

    let options = PageOptions {
        zoom,
        download_href: utf8_percent_encode(&csv_name, NON_ALPHANUMERIC).to_string(),
        interactive: false,
    };
    let html = dir.join(format!("{stem}.html"));
    fs::write(&html, report_page(report, &options).into_string())
        .with_context(|| format!("Failed to write HTML report: {}", html.display()))?;

    Ok(ReportFiles { csv, html })
}
