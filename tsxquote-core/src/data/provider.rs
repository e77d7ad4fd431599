//! Quote provider trait, structured error types, and batch progress hooks.
//!
//! The QuoteProvider trait abstracts over market-data sources (Yahoo Finance
//! today) so the pipeline can be driven by a test double.

use crate::domain::{QuoteRecord, Symbol};
use thiserror::Error;
use tracing::{info, warn};

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and log lines alike.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("symbol not found: {symbol}")]
    NotFound { symbol: String },

    #[error("authentication rejected by provider: {0}")]
    Auth(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("writing report output failed: {0}")]
    Output(String),
}

impl DataError {
    pub fn not_found(symbol: &Symbol) -> Self {
        DataError::NotFound {
            symbol: symbol.to_string(),
        }
    }

    /// Map a transport-level reqwest failure.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Network(format!("timed out requesting {url}"))
        } else if err.is_connect() {
            DataError::Network(format!("cannot connect to {url}: {err}"))
        } else {
            DataError::Network(format!("request to {url} failed: {err}"))
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Export(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DataError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DataError::Export(err.to_string())
    }
}

/// Console and stream writes. File writes in `export` map their own I/O
/// errors to [`DataError::Export`].
impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Output(err.to_string())
    }
}

/// Trait for market-data providers.
///
/// One call per symbol, no caching: two immediate calls against a stable
/// upstream return field-equal records.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the full field set for one symbol.
    ///
    /// Never returns an empty record: a provider with nothing to say about
    /// the symbol answers `DataError::NotFound`.
    fn fetch_record(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError>;
}

impl<P: QuoteProvider + ?Sized> QuoteProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_record(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
        (**self).fetch_record(symbol)
    }
}

/// Progress callback for multi-symbol operations.
pub trait BatchProgress {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &Symbol, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &Symbol, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that writes to the tracing log.
pub struct LogProgress;

impl BatchProgress for LogProgress {
    fn on_start(&self, symbol: &Symbol, index: usize, total: usize) {
        info!("[{}/{}] fetching {symbol}", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &Symbol,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        if let Err(e) = result {
            warn!("{symbol}: {e}");
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        info!("batch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Progress reporter that does nothing.
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn on_start(&self, _symbol: &Symbol, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &Symbol,
        _index: usize,
        _total: usize,
        _result: &Result<(), DataError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
