//! Trade history - per-region imports and exports of the last turn
//!
//! Reporting only; nothing in the simulation reads it back.

use serde::{Deserialize, Serialize};

use crate::core::types::{RegionId, Turn};
use crate::region::Region;
use crate::resources::ResourceRegistry;
use crate::trade::engine::TradeTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Import,
    Export,
}

/// One side of an executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub turn: Turn,
    pub direction: TradeDirection,
    pub partner: String,
    pub resource: String,
    pub shipped: f64,
    pub received: f64,
    /// Wealth credited to this side
    pub credit: i64,
}

/// Records of the most recent turn, indexed by region id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeHistory {
    records: Vec<Vec<TradeRecord>>,
}

impl TradeHistory {
    pub fn new(region_count: usize) -> Self {
        Self {
            records: vec![Vec::new(); region_count],
        }
    }

    /// Drop the previous turn's records
    pub fn clear(&mut self) {
        for list in &mut self.records {
            list.clear();
        }
    }

    pub fn record(&mut self, region: RegionId, record: TradeRecord) {
        if let Some(list) = self.records.get_mut(region.index()) {
            list.push(record);
        } else {
            tracing::warn!("Trade record for unknown region {:?} dropped", region);
        }
    }

    /// Record both sides of an executed trade
    pub fn record_transaction(
        &mut self,
        turn: Turn,
        tx: &TradeTransaction,
        regions: &[Region],
        registry: &ResourceRegistry,
    ) {
        let name_of = |id: RegionId| {
            regions
                .get(id.index())
                .map(|r| r.name.clone())
                .unwrap_or_default()
        };
        let resource = registry.name(tx.resource).to_string();

        self.record(
            tx.exporter,
            TradeRecord {
                turn,
                direction: TradeDirection::Export,
                partner: name_of(tx.importer),
                resource: resource.clone(),
                shipped: tx.shipped,
                received: tx.received,
                credit: tx.exporter_credit,
            },
        );
        self.record(
            tx.importer,
            TradeRecord {
                turn,
                direction: TradeDirection::Import,
                partner: name_of(tx.exporter),
                resource,
                shipped: tx.shipped,
                received: tx.received,
                credit: tx.importer_credit,
            },
        );
    }

    /// Copy of a region's records; empty for unknown regions
    pub fn for_region(&self, region: RegionId) -> Vec<TradeRecord> {
        self.records.get(region.index()).cloned().unwrap_or_default()
    }

    pub fn imports(&self, region: RegionId) -> impl Iterator<Item = &TradeRecord> {
        self.iter_direction(region, TradeDirection::Import)
    }

    pub fn exports(&self, region: RegionId) -> impl Iterator<Item = &TradeRecord> {
        self.iter_direction(region, TradeDirection::Export)
    }

    fn iter_direction(
        &self,
        region: RegionId,
        direction: TradeDirection,
    ) -> impl Iterator<Item = &TradeRecord> {
        self.records
            .get(region.index())
            .into_iter()
            .flatten()
            .filter(move |r| r.direction == direction)
    }

    pub fn total_records(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }
}
