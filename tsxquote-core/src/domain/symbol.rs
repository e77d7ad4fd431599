//! Ticker symbol newtype.

use crate::data::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange ticker identifier in provider form (e.g. `CEU.TO`).
///
/// Always trimmed, upper-case, non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse user or file input into a symbol.
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(DataError::InvalidSymbol(raw.to_string()));
        }
        if !trimmed.chars().all(is_symbol_char) {
            return Err(DataError::InvalidSymbol(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Turn a raw TSX listing symbol into the provider's form.
    ///
    /// `ABX:TSX` → `ABX.TO`, `BBD.B` → `BBD-B.TO`. With an empty suffix the
    /// exchange tag is still stripped but separators are left alone.
    pub fn qualify(raw: &str, suffix: &str) -> Result<Self, DataError> {
        let base = raw.trim().split(':').next().unwrap_or_default();
        if base.is_empty() {
            return Err(DataError::InvalidSymbol(raw.to_string()));
        }
        if suffix.is_empty() {
            return Self::parse(base);
        }
        let dashed = base.replace('.', "-");
        Self::parse(&format!("{dashed}{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Characters a provider ticker may contain (`^` for indices, `=` for FX).
pub(crate) fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
