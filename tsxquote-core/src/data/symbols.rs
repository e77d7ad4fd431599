//! Listed-company symbol source.
//!
//! The TSX publishes its interlisted companies as a plain-text file: an
//! `As of <date>` line, a `Symbol ...` header, then one company per line with
//! the exchange-tagged symbol (`ABX:TSX`) as the first column.

use super::provider::DataError;
use crate::config::SymbolListConfig;
use crate::domain::symbol::{is_symbol_char, Symbol};
use reqwest::blocking::Client;
use std::collections::HashSet;
use tracing::{debug, info};

/// Anything that can produce the current list of symbols.
pub trait SymbolSource {
    fn fetch_all_symbols(&self) -> Result<Vec<Symbol>, DataError>;
}

/// The TSX interlisted-companies text file, fetched over HTTP.
pub struct TsxSymbolList {
    client: Client,
    url: String,
    exchange_suffix: String,
}

impl TsxSymbolList {
    pub fn new(client: Client, config: &SymbolListConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            exchange_suffix: config.exchange_suffix.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SymbolSource for TsxSymbolList {
    fn fetch_all_symbols(&self) -> Result<Vec<Symbol>, DataError> {
        debug!("GET {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::from_transport(&self.url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} from {}", self.url)));
        }

        let body = resp
            .bytes()
            .map_err(|e| DataError::from_transport(&self.url, e))?;
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| DataError::Parse(format!("symbol list is not UTF-8 text: {e}")))?;

        let symbols = parse_symbol_list(&text, &self.exchange_suffix)?;
        info!("fetched {} symbols from {}", symbols.len(), self.url);
        Ok(symbols)
    }
}

/// A fixed list, for callers that already know their symbols.
impl SymbolSource for Vec<Symbol> {
    fn fetch_all_symbols(&self) -> Result<Vec<Symbol>, DataError> {
        Ok(self.clone())
    }
}

/// Parse the symbol-list text into provider-form symbols.
///
/// Order is preserved and duplicates are dropped. A body that yields no
/// symbol at all means the file changed shape and is a parse error.
pub fn parse_symbol_list(text: &str, exchange_suffix: &str) -> Result<Vec<Symbol>, DataError> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim_start().starts_with('<') {
        return Err(DataError::Parse(
            "symbol list looks like HTML, not a text listing".into(),
        ));
    }

    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("As of") || line.starts_with("Symbol") {
            continue;
        }
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if !is_listing_token(token) {
            debug!("line {}: skipping {token:?}", lineno + 1);
            continue;
        }
        let symbol = Symbol::qualify(token, exchange_suffix)?;
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(DataError::Parse("no symbols found in symbol list".into()));
    }
    Ok(symbols)
}

/// `ABX`, `BBD.B`, `ABX:TSX`: ticker characters with an optional exchange tag.
fn is_listing_token(token: &str) -> bool {
    let mut parts = token.splitn(2, ':');
    let base = parts.next().unwrap_or_default();
    let tag_ok = parts
        .next()
        .map_or(true, |tag| !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric()));
    !base.is_empty()
        && base.chars().any(|c| c.is_ascii_alphabetic())
        && base.chars().all(|c| c != '^' && c != '=' && is_symbol_char(c))
        && tag_ok
}
