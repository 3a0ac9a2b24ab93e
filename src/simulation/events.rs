//! Outbound notifications published after each turn

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::types::{NationId, Turn};
use crate::simulation::cycle::EconomicPhase;

/// The two notification shapes the economy emits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum EconomyEvent {
    /// A region's reported state changed during the turn
    RegionChanged {
        turn: Turn,
        region: String,
        nation: NationId,
        wealth: i64,
        production: i64,
        wealth_delta: i64,
        production_delta: i64,
        labor: u32,
        satisfaction: f64,
    },
    /// Market-wide prices after repricing
    PricesUpdated {
        turn: Turn,
        prices: BTreeMap<String, f64>,
    },
}

impl EconomyEvent {
    pub fn turn(&self) -> Turn {
        match self {
            EconomyEvent::RegionChanged { turn, .. } | EconomyEvent::PricesUpdated { turn, .. } => {
                *turn
            }
        }
    }
}

/// Outcome of one successful turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub turn: Turn,
    pub phase: EconomicPhase,
    pub trades: usize,
    pub events: Vec<EconomyEvent>,
}

impl TurnReport {
    pub fn region_changes(&self) -> impl Iterator<Item = &EconomyEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, EconomyEvent::RegionChanged { .. }))
    }

    pub fn prices(&self) -> Option<&BTreeMap<String, f64>> {
        self.events.iter().find_map(|e| match e {
            EconomyEvent::PricesUpdated { prices, .. } => Some(prices),
            _ => None,
        })
    }
}
