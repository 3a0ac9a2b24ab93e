//! Per-region economy: ledger, production, population and wealth

pub mod economy;
pub mod ledger;
pub mod population;
pub mod production;
pub mod state;

pub use economy::WealthBreakdown;
pub use ledger::{LedgerEntry, ResourceLedger, Withdrawal};
pub use state::{Region, RegionSnapshot, RegionSpec};
