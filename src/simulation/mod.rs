//! Turn-based simulation of the whole economy

pub mod context;
pub mod cycle;
pub mod events;
pub mod handle;
pub mod turn;

pub use context::EconomyContext;
pub use cycle::{EconomicCycle, EconomicPhase};
pub use events::{EconomyEvent, TurnReport};
pub use handle::EconomyHandle;
pub use turn::{Simulation, TurnError};
