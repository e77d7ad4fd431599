//! Console reports built from quote records.

pub mod etf;
pub mod format;
pub mod stock;

pub use etf::{EtfReport, EtfVerdict};
pub use stock::StockReport;
