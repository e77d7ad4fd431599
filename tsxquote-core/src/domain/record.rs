//! Loosely-typed quote record as returned by a market-data provider.

use super::symbol::Symbol;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Provider field set for one symbol.
///
/// Keys are provider-defined (`marketCap`, `trailingPE`, ...) and any of them
/// may be absent. Values are scalars only: numbers, strings or booleans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    pub symbol: Symbol,
    #[serde(rename = "info")]
    fields: BTreeMap<String, Value>,
}

impl QuoteRecord {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            fields: BTreeMap::new(),
        }
    }

    pub fn from_fields<I, K>(symbol: Symbol, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut record = Self::new(symbol);
        for (k, v) in fields {
            record.insert(k, v);
        }
        record
    }

    /// Insert a scalar field. `null`, arrays and objects are ignored.
    ///
    /// Returns `true` when the value was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => false,
            scalar => {
                self.fields.insert(key.into(), scalar);
                true
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Numeric field. Non-finite numbers read as absent.
    pub fn f64(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// First present numeric field among `keys`.
    pub fn first_f64(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|k| self.f64(k))
    }

    /// Non-empty string field.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.str(k))
    }

    /// Date field stored as epoch seconds.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        let secs = self.fields.get(key).and_then(Value::as_i64)?;
        DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
