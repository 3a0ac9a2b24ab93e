//! Shared handle for callers on several threads
//!
//! Turns never run concurrently: a second `advance_turn` while one is in
//! progress is rejected instead of queued.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::market::MarketSnapshot;
use crate::region::RegionSnapshot;
use crate::simulation::events::TurnReport;
use crate::simulation::turn::{Simulation, TurnError};

#[derive(Debug, Clone)]
pub struct EconomyHandle {
    inner: Arc<Mutex<Simulation>>,
}

impl EconomyHandle {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Advance one turn, or fail fast if another caller holds the economy
    pub fn advance_turn(&self) -> Result<TurnReport, TurnError> {
        let mut simulation = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("Rejected advance_turn: turn already in progress");
                return Err(TurnError::TurnInProgress);
            }
            Err(TryLockError::Poisoned(_)) => return Err(TurnError::Poisoned),
        };
        simulation.advance_turn()
    }

    /// Exclusive access, waiting for any running turn to finish
    pub fn lock(&self) -> Result<MutexGuard<'_, Simulation>, TurnError> {
        self.inner.lock().map_err(|_| TurnError::Poisoned)
    }

    pub fn region(&self, name: &str) -> Option<RegionSnapshot> {
        self.lock().ok()?.region(name)
    }

    pub fn regions(&self) -> Vec<RegionSnapshot> {
        self.lock().map(|s| s.regions()).unwrap_or_default()
    }

    pub fn market_snapshot(&self) -> Option<MarketSnapshot> {
        self.lock().ok().map(|s| s.market_snapshot())
    }
}
