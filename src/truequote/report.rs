//! Certification report: scoreboard tallies, console table, JSON export.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::truequote::harness::{CertStatus, ValidationEnvelope};

/// Status tallies for one certification batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub total: usize,
    pub pass: usize,
    pub pass_warn: usize,
    pub fail: usize,
    pub skip: usize,
    pub crash: usize,
}

impl Scoreboard {
    /// Tallies a batch of certification rows.
    pub fn tally(rows: &[ValidationEnvelope]) -> Self {
        let mut board = Scoreboard {
            total: rows.len(),
            pass: 0,
            pass_warn: 0,
            fail: 0,
            skip: 0,
            crash: 0,
        };
        for row in rows {
            match row.status {
                CertStatus::Pass => board.pass += 1,
                CertStatus::PassWarn => board.pass_warn += 1,
                CertStatus::Fail => board.fail += 1,
                CertStatus::Skip => board.skip += 1,
                CertStatus::Crash => board.crash += 1,
            }
        }
        board
    }

    /// True when the batch is releasable: no failures, no crashes.
    pub fn is_acceptable(&self) -> bool {
        self.fail == 0 && self.crash == 0
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- TrueQuote Scoreboard ---")?;
        writeln!(f, "Fixtures:   {}", self.total)?;
        writeln!(f, "Pass:       {}", self.pass)?;
        writeln!(f, "Pass/warn:  {}", self.pass_warn)?;
        writeln!(f, "Fail:       {}", self.fail)?;
        writeln!(f, "Skip:       {}", self.skip)?;
        write!(f, "Crash:      {}", self.crash)
    }
}

/// Renders the per-fixture result table for the console.
///
/// One fixed-width line per fixture: status, headline numbers, defaulted
/// answer count, warning count, and the detail column (failure or skip
/// reasons) when there is one.
pub fn render_table(rows: &[ValidationEnvelope]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<26} {:<14} {:<6} {:>9} {:>12} {:>8} {:>5} {:>5} {}\n",
        "fixture", "industry", "status", "peak_kw", "capex_usd", "payback", "dflt", "warn", "detail"
    ));
    for row in rows {
        let (peak, capex, payback) = match &row.summary {
            Some(s) => (
                format!("{:.0}", s.peak_kw),
                format!("{:.0}", s.total_capex),
                s.simple_payback_years
                    .map_or_else(|| "-".to_string(), |p| format!("{p:.1}")),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        out.push_str(&format!(
            "{:<26} {:<14} {:<6} {:>9} {:>12} {:>8} {:>5} {:>5} {}\n",
            row.fixture,
            row.industry.slug(),
            row.status.label(),
            peak,
            capex,
            payback,
            row.assumptions.len(),
            row.warnings.len(),
            row.detail.as_deref().unwrap_or("")
        ));
    }
    out
}

/// Full report payload written to `truequote_report.json`.
#[derive(Debug, Serialize)]
pub struct CertificationReport<'a> {
    pub scoreboard: Scoreboard,
    pub strict: bool,
    pub seed: u64,
    pub results: &'a [ValidationEnvelope],
}

impl<'a> CertificationReport<'a> {
    pub fn new(rows: &'a [ValidationEnvelope], strict: bool, seed: u64) -> Self {
        CertificationReport {
            scoreboard: Scoreboard::tally(rows),
            strict,
            seed,
            results: rows,
        }
    }
}

/// Writes the full report as pretty JSON.
pub fn write_report_json<W: Write>(writer: &mut W, report: &CertificationReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)
}

/// One record of the compact summary artifact.
///
/// Carries just enough per fixture that a PR diff of the summary file
/// shows which quotes moved and by how much. Sizing and capex fields are
/// absent for rows that never produced a quote.
#[derive(Debug, Serialize)]
pub struct SummaryRow<'a> {
    pub fixture: &'a str,
    pub industry: &'static str,
    pub status: CertStatus,
    pub peak_kw: Option<f64>,
    pub total_capex: Option<f64>,
    pub simple_payback_years: Option<f64>,
    pub defaulted: usize,
    pub warnings: usize,
}

/// Compacts a batch into one summary record per fixture.
pub fn summary_rows(rows: &[ValidationEnvelope]) -> Vec<SummaryRow<'_>> {
    rows.iter()
        .map(|row| SummaryRow {
            fixture: &row.fixture,
            industry: row.industry.slug(),
            status: row.status,
            peak_kw: row.summary.as_ref().map(|s| s.peak_kw),
            total_capex: row.summary.as_ref().map(|s| s.total_capex),
            simple_payback_years: row.summary.as_ref().and_then(|s| s.simple_payback_years),
            defaulted: row.assumptions.len(),
            warnings: row.warnings.len(),
        })
        .collect()
}

/// Writes the compact per-fixture summary as a pretty JSON array.
pub fn write_summary_json<W: Write>(writer: &mut W, rows: &[ValidationEnvelope]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &summary_rows(rows))?;
    writeln!(writer)
}

/// Writes the full report to a file path.
pub fn report_to_path(path: &Path, report: &CertificationReport) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_report_json(&mut writer, report)?;
    writer.flush()
}

/// Writes the summary to a file path.
pub fn summary_to_path(path: &Path, rows: &[ValidationEnvelope]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_summary_json(&mut writer, rows)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::quote::QuoteEngine;
    use crate::truequote::fixtures::baseline_fixtures;
    use crate::truequote::harness::run_batch;

    fn batch() -> Vec<ValidationEnvelope> {
        let engine = QuoteEngine::new(EngineConfig::baseline());
        run_batch(&engine, &baseline_fixtures())
    }

    #[test]
    fn tally_counts_every_row_once() {
        let rows = batch();
        let board = Scoreboard::tally(&rows);
        assert_eq!(
            board.total,
            board.pass + board.pass_warn + board.fail + board.skip + board.crash
        );
        assert_eq!(board.total, rows.len());
        assert_eq!(board.skip, 2);
        assert!(board.is_acceptable(), "{board}");
    }

    #[test]
    fn table_has_a_line_per_fixture_plus_header() {
        let rows = batch();
        let table = render_table(&rows);
        assert_eq!(table.lines().count(), rows.len() + 1);
        let header = table.lines().next().expect("table should have a header");
        for column in ["status", "peak_kw", "capex_usd", "payback", "dflt", "warn"] {
            assert!(header.contains(column), "missing column {column}");
        }
        assert!(table.contains("hotel_baseline"));
        assert!(table.contains("SKIP"));
    }

    #[test]
    fn report_json_is_deterministic() {
        let rows_a = batch();
        let rows_b = batch();
        let mut out_a = Vec::new();
        let mut out_b = Vec::new();
        write_report_json(&mut out_a, &CertificationReport::new(&rows_a, false, 42))
            .expect("first export should succeed");
        write_report_json(&mut out_b, &CertificationReport::new(&rows_b, false, 42))
            .expect("second export should succeed");
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn summary_json_has_one_record_per_fixture() {
        let rows = batch();
        let mut out = Vec::new();
        write_summary_json(&mut out, &rows).expect("summary export should succeed");
        let parsed: serde_json::Value =
            serde_json::from_slice(&out).expect("summary should parse back");
        let records = parsed.as_array().expect("summary should be an array");
        assert_eq!(records.len(), rows.len());
        assert!(records.iter().any(|r| r["fixture"] == "hotel_baseline"));
        let skipped = records
            .iter()
            .find(|r| r["status"] == "skip")
            .expect("coverage gaps should appear in the summary");
        assert_eq!(skipped["peak_kw"], serde_json::Value::Null);
        assert!(
            records
                .iter()
                .filter(|r| r["status"] == "pass" || r["status"] == "pass_warn")
                .all(|r| r["simple_payback_years"].as_f64().is_some())
        );
    }

    #[test]
    fn scoreboard_display_lists_every_bucket() {
        let board = Scoreboard::tally(&batch());
        let rendered = board.to_string();
        for label in ["Fixtures:", "Pass:", "Pass/warn:", "Fail:", "Skip:", "Crash:"] {
            assert!(rendered.contains(label), "missing {label}");
        }
    }
}
