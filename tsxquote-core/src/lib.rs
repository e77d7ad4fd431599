//! tsxquote core: listed-symbol source, quote records, reports and export.
//!
//! This crate contains everything behind the `tsxquote` CLI:
//! - Domain types (symbols, loosely-typed quote records)
//! - Data sources (TSX symbol list, Yahoo Finance quoteSummary provider)
//! - Console reports for companies and ETFs
//! - CSV spreadsheet export
//! - The pipeline façade tying them together

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod pipeline;
pub mod report;

pub use config::{AppConfig, ConfigError};
pub use data::{DataError, QuoteProvider, SymbolSource, TsxSymbolList, YahooProvider};
pub use domain::{QuoteRecord, Symbol};
pub use export::{ExportMode, ExportOptions, ExportSummary};
pub use pipeline::QuoteReportPipeline;

/// Pipeline wired to the live TSX symbol list and Yahoo Finance, sharing one
/// HTTP client.
pub type LivePipeline = QuoteReportPipeline<TsxSymbolList, YahooProvider>;

/// Build the live pipeline from a config.
pub fn live_pipeline(config: &AppConfig) -> Result<LivePipeline, DataError> {
    let client = data::build_client(&config.http)?;
    let source = TsxSymbolList::new(client.clone(), &config.symbols);
    let provider = YahooProvider::new(client, &config.provider);
    Ok(QuoteReportPipeline::new(source, provider))
}
