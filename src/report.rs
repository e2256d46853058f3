//! Final report: one row per root plus a grand total.
//!
//! The [`ReportCollector`] drains walk results as they arrive, so rows appear
//! in completion order rather than the order roots were given. Rows are laid
//! out by a small [`TableWriter`] that pads the size column to a common width.

use std::io::{self, Write};

use crossbeam_channel::Receiver;

use crate::{aggregator::WalkResult, utils::SizeFormatter};

/// Label of the closing row.
pub const TOTAL_LABEL: &str = "Total";

/// Spaces between the size column and the label column.
const COLUMN_PADDING: usize = 2;

/// Buffers two-column rows and writes them aligned on [`flush`](Self::flush).
#[derive(Debug)]
pub struct TableWriter<W: Write> {
    out: W,
    rows: Vec<(String, String)>,
}

impl<W: Write> TableWriter<W> {
    /// Create a table that writes to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            rows: Vec::new(),
        }
    }

    /// Queue a row.
    pub fn row(&mut self, size: impl Into<String>, label: impl Into<String>) {
        self.rows.push((size.into(), label.into()));
    }

    /// Write every queued row and flush the underlying writer.
    ///
    /// The first column is as wide as its widest cell plus two spaces of
    /// padding; the label column is written as is.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        let width = self
            .rows
            .iter()
            .map(|(size, _)| size.chars().count())
            .max()
            .unwrap_or(0)
            + COLUMN_PADDING;

        for (size, label) in self.rows.drain(..) {
            writeln!(self.out, "{size:<width$}{label}")?;
        }
        self.out.flush()
    }

    /// Consume the table and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Everything the collector saw, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Results in the order the walks finished.
    pub results: Vec<WalkResult>,

    /// Sum of every result's size, in bytes.
    pub total: u64,
}

impl Report {
    /// Number of roots that could not be traversed at all.
    #[must_use]
    pub fn failed_roots(&self) -> usize {
        self.results.iter().filter(|r| r.root_failed).count()
    }

    /// Number of entry errors across every root.
    #[must_use]
    pub fn entry_errors(&self) -> usize {
        self.results.iter().map(|r| r.errors).sum()
    }

    /// One-line description of the traversal errors, or `None` if there
    /// were none.
    #[must_use]
    pub fn error_summary(&self) -> Option<String> {
        let errors = self.entry_errors();
        if errors == 0 {
            return None;
        }

        let noun = if errors == 1 { "entry" } else { "entries" };
        let failed = self.failed_roots();
        let summary = format!("{errors} {noun} could not be read");
        if failed == 0 {
            return Some(summary);
        }

        let paths = if failed == 1 { "path" } else { "paths" };
        Some(format!("{summary} ({failed} {paths} could not be walked)"))
    }
}

/// Drains walk results into a formatted table and a grand total.
#[derive(Debug)]
pub struct ReportCollector<W: Write> {
    table: TableWriter<W>,
    formatter: SizeFormatter,
}

impl<W: Write> ReportCollector<W> {
    /// Create a collector that renders sizes with `formatter` into `out`.
    pub const fn new(out: W, formatter: SizeFormatter) -> Self {
        Self {
            table: TableWriter::new(out),
            formatter,
        }
    }

    /// Consume results until every sender has been dropped, then write the
    /// table followed by the `Total` row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the table fails.
    pub fn collect(mut self, results: &Receiver<WalkResult>) -> io::Result<Report> {
        let mut report = Report::default();

        for result in results {
            self.table.row(
                self.formatter.format(result.size),
                result.path.display().to_string(),
            );
            report.total = report.total.saturating_add(result.size);
            report.results.push(result);
        }

        self.table.row(self.formatter.format(report.total), TOTAL_LABEL);
        self.table.flush()?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossbeam_channel::unbounded;

    use super::*;

    fn result(path: &str, size: u64) -> WalkResult {
        WalkResult {
            path: PathBuf::from(path),
            size,
            errors: 0,
            root_failed: false,
        }
    }

    #[test]
    fn test_table_aligns_first_column() {
        let mut table = TableWriter::new(Vec::new());
        table.row("1K", "short");
        table.row("1024K", "long");
        table.flush().unwrap();

        let text = String::from_utf8(table.into_inner()).unwrap();
        assert_eq!(text, "1K     short\n1024K  long\n");
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let mut table = TableWriter::new(Vec::new());
        table.flush().unwrap();
        assert!(table.into_inner().is_empty());
    }

    #[test]
    fn test_collect_keeps_arrival_order_and_totals() {
        let (tx, rx) = unbounded();
        tx.send(result("second", 2048)).unwrap();
        tx.send(result("first", 1024)).unwrap();
        drop(tx);

        let mut out = Vec::new();
        let report = ReportCollector::new(&mut out, SizeFormatter::Raw)
            .collect(&rx)
            .unwrap();

        assert_eq!(report.total, 3072);
        assert_eq!(report.results[0].path, PathBuf::from("second"));
        assert_eq!(report.results[1].path, PathBuf::from("first"));

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2K  second\n1K  first\n3K  Total\n");
    }

    #[test]
    fn test_total_matches_sum_of_rows() {
        let (tx, rx) = unbounded();
        for (i, size) in [10_u64, 2000, 30_000, 400_000].into_iter().enumerate() {
            tx.send(result(&format!("root{i}"), size)).unwrap();
        }
        drop(tx);

        let report = ReportCollector::new(io::sink(), SizeFormatter::Human)
            .collect(&rx)
            .unwrap();

        let sum: u64 = report.results.iter().map(|r| r.size).sum();
        assert_eq!(report.total, sum);
        assert_eq!(report.total, 432_010);
    }

    #[test]
    fn test_collect_with_no_results_prints_total_only() {
        let (tx, rx) = unbounded::<WalkResult>();
        drop(tx);

        let mut out = Vec::new();
        let report = ReportCollector::new(&mut out, SizeFormatter::Human)
            .collect(&rx)
            .unwrap();

        assert_eq!(report.total, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "0B  Total\n");
    }

    #[test]
    fn test_report_error_counts() {
        let mut failed = result("gone", 0);
        failed.root_failed = true;
        failed.errors = 1;
        let mut partial = result("partial", 10);
        partial.errors = 2;

        let report = Report {
            results: vec![failed, partial, result("ok", 5)],
            total: 15,
        };

        assert_eq!(report.failed_roots(), 1);
        assert_eq!(report.entry_errors(), 3);
        assert_eq!(
            report.error_summary().as_deref(),
            Some("3 entries could not be read (1 path could not be walked)")
        );
    }

    #[test]
    fn test_error_summary() {
        let clean = Report {
            results: vec![result("ok", 5)],
            total: 5,
        };
        assert_eq!(clean.error_summary(), None);

        let mut partial = result("partial", 10);
        partial.errors = 1;
        let report = Report {
            results: vec![partial],
            total: 10,
        };
        assert_eq!(
            report.error_summary().as_deref(),
            Some("1 entry could not be read")
        );
    }
}
