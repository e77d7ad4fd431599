//! Symbol-to-report pipeline.
//!
//! A thin façade over three collaborators: a [`SymbolSource`], a
//! [`QuoteProvider`] and the spreadsheet writer. Every operation is one
//! request/response cycle per symbol, run sequentially.

use crate::data::{BatchProgress, DataError, QuoteProvider, SymbolSource};
use crate::domain::{QuoteRecord, Symbol};
use crate::export::{resolve_output_path, ExportMode, ExportOptions, ExportSummary, SheetWriter};
use crate::report::{EtfReport, StockReport};
use std::io::Write;
use tracing::{info, warn};

pub struct QuoteReportPipeline<S, P> {
    source: S,
    provider: P,
}

impl<S: SymbolSource, P: QuoteProvider> QuoteReportPipeline<S, P> {
    pub fn new(source: S, provider: P) -> Self {
        Self { source, provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current list of listed symbols.
    pub fn fetch_all_symbols(&self) -> Result<Vec<Symbol>, DataError> {
        self.source.fetch_all_symbols()
    }

    /// Provider record for one symbol; never empty.
    ///
    /// Fails with `NotFound` when the provider has no data and `Network` for
    /// any other provider failure, including a rejected session or an
    /// unreadable response.
    pub fn get_company_info(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
        let record = self
            .provider
            .fetch_record(symbol)
            .map_err(|e| match e {
                DataError::Auth(msg) | DataError::Parse(msg) => {
                    DataError::Network(format!("quote request for {symbol} failed: {msg}"))
                }
                other => other,
            })?;
        if record.is_empty() {
            return Err(DataError::not_found(symbol));
        }
        Ok(record)
    }

    /// Print the company report for `symbol` to `out`.
    ///
    /// With `raw` the record's fields are dumped first, one `key: value` per line.
    pub fn print_stock_info<W: Write>(
        &self,
        symbol: &Symbol,
        raw: bool,
        out: &mut W,
    ) -> Result<StockReport, DataError> {
        let record = self.get_company_info(symbol)?;
        if raw {
            write_raw(&record, out)?;
        }
        let report = StockReport::from_record(&record);
        write!(out, "{report}")?;
        Ok(report)
    }

    /// Print the fund report and screen verdict for `symbol`, returning the record.
    pub fn analyze_etf<W: Write>(
        &self,
        symbol: &Symbol,
        out: &mut W,
    ) -> Result<QuoteRecord, DataError> {
        let record = self.get_company_info(symbol)?;
        let report = EtfReport::from_record(&record);
        write!(out, "{report}")?;
        Ok(record)
    }

    /// Write one spreadsheet row per symbol.
    ///
    /// A symbol whose record cannot be fetched still gets its row, with empty
    /// report fields and the error in the last column; the batch carries on.
    /// Only failure to write the file itself aborts.
    pub fn export_symbols(
        &self,
        symbols: &[Symbol],
        options: &ExportOptions,
        progress: &dyn BatchProgress,
    ) -> Result<ExportSummary, DataError> {
        let path = resolve_output_path(&options.path, options.no_clobber);
        let mut sheet = SheetWriter::create(&path, options.mode)?;
        let total = symbols.len();
        let mut failed = Vec::new();

        for (i, symbol) in symbols.iter().enumerate() {
            if options.mode == ExportMode::SymbolsOnly {
                sheet.write_row(symbol, None, None)?;
                continue;
            }

            progress.on_start(symbol, i, total);
            let report = self
                .get_company_info(symbol)
                .map(|record| StockReport::from_record(&record));
            match &report {
                Ok(r) => sheet.write_row(symbol, Some(r), None)?,
                Err(e) => sheet.write_row(symbol, None, Some(e))?,
            }

            let status = report.map(|_| ());
            progress.on_complete(symbol, i, total, &status);
            if let Err(e) = status {
                failed.push((symbol.clone(), e));
            }
        }

        let (path, rows) = sheet.finish()?;
        if options.mode == ExportMode::Full {
            progress.on_batch_complete(total - failed.len(), failed.len(), total);
        }
        info!("wrote {rows} rows to {}", path.display());

        Ok(ExportSummary { path, rows, failed })
    }

    /// Print the company report for each symbol, separated by a blank line.
    ///
    /// Failures are written to the log and collected; the remaining symbols
    /// are still reported.
    pub fn watchlist<W: Write>(
        &self,
        symbols: &[Symbol],
        out: &mut W,
    ) -> Result<Vec<(Symbol, DataError)>, DataError> {
        let mut failed = Vec::new();
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            match self.print_stock_info(symbol, false, out) {
                Ok(_) => {}
                Err(DataError::Output(e)) => return Err(DataError::Output(e)),
                Err(e) => {
                    warn!("{symbol}: {e}");
                    writeln!(out, "{symbol}: no data ({e})")?;
                    failed.push((symbol.clone(), e));
                }
            }
        }
        Ok(failed)
    }
}

fn write_raw<W: Write>(record: &QuoteRecord, out: &mut W) -> Result<(), DataError> {
    for (key, value) in record.fields() {
        match value.as_str() {
            Some(s) => writeln!(out, "{key}: {s}")?,
            None => writeln!(out, "{key}: {value}")?,
        }
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NoProgress;
    use serde_json::json;
    use std::collections::HashMap;

    struct StubProvider {
        records: HashMap<String, QuoteRecord>,
    }

    impl StubProvider {
        fn with(symbols: &[&str]) -> Self {
            let records = symbols
                .iter()
                .map(|s| {
                    let sym = Symbol::parse(s).unwrap();
                    let rec = QuoteRecord::from_fields(
                        sym,
                        [("longName", json!(format!("{s} Corp"))), ("marketCap", json!(1e9))],
                    );
                    (s.to_string(), rec)
                })
                .collect();
            Self { records }
        }
    }

    impl QuoteProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn fetch_record(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
            self.records
                .get(symbol.as_str())
                .cloned()
                .ok_or_else(|| DataError::not_found(symbol))
        }
    }

    struct EmptyProvider;

    impl QuoteProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        fn fetch_record(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
            Ok(QuoteRecord::new(symbol.clone()))
        }
    }

    fn sym(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn empty_record_is_reported_as_not_found() {
        let p = QuoteReportPipeline::new(Vec::<Symbol>::new(), EmptyProvider);
        let err = p.get_company_info(&sym("CEU.TO")).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn raw_dump_precedes_report() {
        let p = QuoteReportPipeline::new(Vec::<Symbol>::new(), StubProvider::with(&["CEU.TO"]));
        let mut out = Vec::new();
        p.print_stock_info(&sym("CEU.TO"), true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let raw_at = text.find("longName: CEU.TO Corp").unwrap();
        let header_at = text.find("==========").unwrap();
        assert!(raw_at < header_at);
    }

    #[test]
    fn watchlist_continues_past_failures() {
        let p = QuoteReportPipeline::new(
            Vec::<Symbol>::new(),
            StubProvider::with(&["CEU.TO", "TSAT.TO"]),
        );
        let mut out = Vec::new();
        let failed = p
            .watchlist(&[sym("CEU.TO"), sym("CCO.TO"), sym("TSAT.TO")], &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, sym("CCO.TO"));
        assert!(text.contains("(CEU.TO)"));
        assert!(text.contains("CCO.TO: no data"));
        assert!(text.contains("(TSAT.TO)"));
    }

    #[test]
    fn export_summary_counts_rows_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let p = QuoteReportPipeline::new(Vec::<Symbol>::new(), StubProvider::with(&["CEU.TO"]));
        let opts = ExportOptions::new(dir.path().join("out.csv"));
        let summary = p
            .export_symbols(&[sym("CEU.TO"), sym("ABC.TO")], &opts, &NoProgress)
            .unwrap();
        assert_eq!(summary.rows, 2);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.failed[0].0, sym("ABC.TO"));
    }

    struct FailingProvider(fn() -> DataError);

    impl QuoteProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch_record(&self, _symbol: &Symbol) -> Result<QuoteRecord, DataError> {
            Err((self.0)())
        }
    }

    #[test]
    fn provider_session_and_payload_failures_surface_as_network() {
        let auth = QuoteReportPipeline::new(
            Vec::<Symbol>::new(),
            FailingProvider(|| DataError::Auth("crumb rejected".into())),
        );
        let err = auth.get_company_info(&sym("CEU.TO")).unwrap_err();
        assert!(matches!(err, DataError::Network(ref m) if m.contains("crumb rejected")));

        let parse = QuoteReportPipeline::new(
            Vec::<Symbol>::new(),
            FailingProvider(|| DataError::Parse("bad payload".into())),
        );
        let err = parse.get_company_info(&sym("CEU.TO")).unwrap_err();
        assert!(matches!(err, DataError::Network(_)));

        let missing = QuoteReportPipeline::new(
            Vec::<Symbol>::new(),
            FailingProvider(|| DataError::NotFound { symbol: "CEU.TO".into() }),
        );
        let err = missing.get_company_info(&sym("CEU.TO")).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    /// Writer whose every write fails like a closed pipe.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_write_failure_is_output_error() {
        let p = QuoteReportPipeline::new(Vec::<Symbol>::new(), StubProvider::with(&["CEU.TO"]));
        let err = p
            .print_stock_info(&sym("CEU.TO"), false, &mut ClosedPipe)
            .unwrap_err();
        assert!(matches!(err, DataError::Output(_)));

        let err = p.watchlist(&[sym("CEU.TO")], &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, DataError::Output(_)));
    }
}
