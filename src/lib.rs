//! Region Economy - turn-based multi-region economic simulation core

pub mod core;
pub mod market;
pub mod region;
pub mod resources;
pub mod scenario;
pub mod simulation;
pub mod trade;

pub use crate::core::config::EconomyConfig;
pub use crate::core::error::{EconomyError, Result};
pub use scenario::{Scenario, ScenarioLoadError};
pub use simulation::{EconomyEvent, EconomyHandle, Simulation, TurnError, TurnReport};
