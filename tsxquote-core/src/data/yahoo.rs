//! Yahoo Finance quote provider.
//!
//! Fetches the `quoteSummary` modules for a symbol and flattens them into a
//! single field map, the way Yahoo's own `info` view reads. Yahoo has no
//! official API: requests need a session cookie plus a matching crumb, which
//! are obtained once per provider and reused.

use super::provider::{DataError, QuoteProvider};
use crate::config::ProviderConfig;
use crate::domain::{QuoteRecord, Symbol};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Modules requested from `quoteSummary`, in field-precedence order.
pub const MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "assetProfile",
    "quoteType",
    "fundProfile",
];

/// Yahoo Finance v10 quoteSummary response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<Map<String, Value>>>,
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    code: String,
    #[serde(default)]
    description: String,
}

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_url: config.cookie_url.clone(),
            crumb: Mutex::new(None),
        }
    }

    fn crumb_url(&self) -> String {
        format!("{}/v1/test/getcrumb", self.base_url)
    }

    fn summary_url(&self, symbol: &Symbol) -> String {
        format!("{}/v10/finance/quoteSummary/{symbol}", self.base_url)
    }

    /// Return the session crumb, performing the cookie handshake on first use.
    fn crumb(&self) -> Result<String, DataError> {
        let mut slot = self
            .crumb
            .lock()
            .map_err(|_| DataError::Auth("crumb lock poisoned".into()))?;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie page answers 404 on success; only the Set-Cookie matters.
        debug!("GET {} (session cookie)", self.cookie_url);
        self.client
            .get(&self.cookie_url)
            .send()
            .map_err(|e| DataError::from_transport(&self.cookie_url, e))?;

        let url = self.crumb_url();
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::from_transport(&url, e))?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            return Err(DataError::Auth(format!("crumb request answered HTTP {status}")));
        }
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} from {url}")));
        }
        let body = resp.text().map_err(|e| DataError::from_transport(&url, e))?;
        let crumb = body.trim();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(char::is_whitespace) {
            return Err(DataError::Auth("provider returned no usable crumb".into()));
        }

        *slot = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    fn forget_crumb(&self) {
        if let Ok(mut slot) = self.crumb.lock() {
            *slot = None;
        }
    }

    fn fetch_summary(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
        let crumb = self.crumb()?;
        let url = self.summary_url(symbol);
        let modules = MODULES.join(",");

        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("modules", modules.as_str()),
                ("crumb", crumb.as_str()),
                ("formatted", "false"),
                ("lang", "en-CA"),
                ("region", "CA"),
            ])
            .send()
            .map_err(|e| DataError::from_transport(&url, e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("{symbol}: HTTP {status}, dropping cached crumb");
            self.forget_crumb();
            return Err(DataError::Auth(format!("quoteSummary answered HTTP {status}")));
        }
        if status != StatusCode::NOT_FOUND && !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} for {symbol}")));
        }

        let text = resp.text().map_err(|e| DataError::from_transport(&url, e))?;
        let parsed: SummaryResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if status == StatusCode::NOT_FOUND => return Err(DataError::not_found(symbol)),
            Err(e) => {
                return Err(DataError::Parse(format!(
                    "unexpected quoteSummary payload for {symbol}: {e}"
                )))
            }
        };

        Self::parse_summary(symbol, parsed)
    }

    /// Turn a decoded response into a record.
    fn parse_summary(symbol: &Symbol, resp: SummaryResponse) -> Result<QuoteRecord, DataError> {
        if let Some(err) = resp.quote_summary.error {
            return if err.code == "Not Found" {
                Err(DataError::not_found(symbol))
            } else {
                Err(DataError::Parse(format!("{}: {}", err.code, err.description)))
            };
        }

        let modules = resp
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::not_found(symbol))?;

        let record = flatten_modules(symbol.clone(), &modules);
        if record.is_empty() {
            return Err(DataError::not_found(symbol));
        }
        Ok(record)
    }
}

/// Flatten `quoteSummary` modules into one record.
///
/// Modules are visited in [`MODULES`] order, then any others alphabetically;
/// the first occurrence of a key wins.
pub fn flatten_modules(symbol: Symbol, modules: &Map<String, Value>) -> QuoteRecord {
    let mut record = QuoteRecord::new(symbol);
    let ordered = MODULES
        .iter()
        .filter_map(|name| modules.get(*name))
        .chain(
            modules
                .iter()
                .filter(|(name, _)| !MODULES.contains(&name.as_str()))
                .map(|(_, v)| v),
        );
    for module in ordered {
        if let Value::Object(fields) = module {
            flatten_into(&mut record, fields);
        }
    }
    record
}

fn flatten_into(record: &mut QuoteRecord, fields: &Map<String, Value>) {
    for (key, value) in fields {
        if key == "maxAge" || record.contains(key) {
            continue;
        }
        match value {
            Value::Object(inner) => match inner.get("raw") {
                Some(raw) => {
                    record.insert(key.as_str(), raw.clone());
                }
                None => flatten_into(record, inner),
            },
            other => {
                record.insert(key.as_str(), other.clone());
            }
        }
    }
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_record(&self, symbol: &Symbol) -> Result<QuoteRecord, DataError> {
        self.fetch_summary(symbol)
    }
}
