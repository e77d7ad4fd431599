//! Application configuration.
//!
//! Everything has a default, so running without a config file is the normal
//! case. A TOML file may override any subset of fields:
//!
//! ```toml
//! watchlist = ["CEU.TO", "CCO.TO"]
//!
//! [symbols]
//! exchange_suffix = ".TO"
//!
//! [export]
//! path = "reports/tsx.csv"
//! no_clobber = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SYMBOL_LIST_URL: &str =
    "https://www.tsx.com/files/trading/interlisted-companies.txt";
pub const DEFAULT_QUOTE_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";
pub const DEFAULT_EXPORT_PATH: &str = "tsx_symbols.xlsx";

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Symbols reported on by `watchlist`.
    pub watchlist: Vec<String>,
    pub symbols: SymbolListConfig,
    pub provider: ProviderConfig,
    pub http: HttpConfig,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watchlist: vec!["CEU.TO".into(), "CCO.TO".into(), "TSAT.TO".into()],
            symbols: SymbolListConfig::default(),
            provider: ProviderConfig::default(),
            http: HttpConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Where the listed-company symbol file lives and how to qualify its symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolListConfig {
    pub url: String,
    /// Appended to each raw TSX symbol (`CEU` → `CEU.TO`). Empty keeps raw symbols.
    pub exchange_suffix: String,
}

impl Default for SymbolListConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SYMBOL_LIST_URL.into(),
            exchange_suffix: ".TO".into(),
        }
    }
}

/// Market-data endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Host serving `/v1/test/getcrumb` and `/v10/finance/quoteSummary`.
    pub base_url: String,
    /// Page visited once to obtain session cookies.
    pub cookie_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_BASE_URL.into(),
            cookie_url: DEFAULT_COOKIE_URL.into(),
        }
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub path: PathBuf,
    /// Keep an existing file and write `stem_N.ext` instead of overwriting.
    pub no_clobber: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXPORT_PATH),
            no_clobber: false,
        }
    }
}
