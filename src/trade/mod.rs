//! Inter-region trade

pub mod engine;
pub mod history;
pub mod network;

pub use engine::{TradeEngine, TradeError, TradeTransaction};
pub use history::{TradeDirection, TradeHistory, TradeRecord};
pub use network::{FullyConnected, RegionGraph, TradeNetwork};
