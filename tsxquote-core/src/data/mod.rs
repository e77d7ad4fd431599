//! Data sources: the listed-symbol file and the market-data provider.

pub mod http;
pub mod provider;
pub mod symbols;
pub mod yahoo;

pub use http::build_client;
pub use provider::{BatchProgress, DataError, LogProgress, NoProgress, QuoteProvider};
pub use symbols::{parse_symbol_list, SymbolSource, TsxSymbolList};
pub use yahoo::YahooProvider;
