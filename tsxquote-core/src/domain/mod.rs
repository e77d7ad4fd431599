//! Domain types: symbols and quote records.

pub mod record;
pub mod symbol;

pub use record::QuoteRecord;
pub use symbol::Symbol;
