//! CSV export for certification batch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::truequote::harness::ValidationEnvelope;

/// Schema v1 column header for certification CSV export.
const HEADER: &str = "fixture,industry,status,confidence,peak_kw,bess_kw,bess_kwh,\
                      total_capex,npv,simple_payback_years,defaulted,warnings,\
                      checks_failed,detail";

/// Exports certification rows to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[ValidationEnvelope], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes certification rows as CSV to any writer.
///
/// One row per fixture. Quote columns are empty for skip and crash rows;
/// optional metrics are empty when the engine could not compute them.
/// Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[ValidationEnvelope], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for row in rows {
        let failed = row.checks.iter().filter(|c| !c.passed).count();
        let (peak, kw, kwh, capex, npv, payback) = match &row.summary {
            Some(s) => (
                format!("{:.2}", s.peak_kw),
                format!("{:.2}", s.bess_kw),
                format!("{:.2}", s.bess_kwh),
                format!("{:.2}", s.total_capex),
                format!("{:.2}", s.npv),
                s.simple_payback_years
                    .map(|y| format!("{y:.2}"))
                    .unwrap_or_default(),
            ),
            None => Default::default(),
        };
        wtr.write_record(&[
            row.fixture.clone(),
            row.industry.slug().to_string(),
            row.status.label().to_string(),
            row.confidence.map(|c| format!("{c:.3}")).unwrap_or_default(),
            peak,
            kw,
            kwh,
            capex,
            npv,
            payback,
            row.assumptions.len().to_string(),
            row.warnings.len().to_string(),
            failed.to_string(),
            row.detail.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
