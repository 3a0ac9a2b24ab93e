//! Global market

pub mod pricing;

pub use pricing::{Market, MarketSnapshot, PriceChange, PriceQuote, FALLBACK_PRICE, MIN_PRICE};
