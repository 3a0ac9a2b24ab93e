//! Trade engine - moves surpluses to nearby deficits
//!
//! Runs once per turn after the region economy and before repricing:
//! 1. Pair regions within the trade radius, bounded partners per region
//! 2. Snapshot every region's surplus (production rate − consumption rate)
//! 3. For each pair and resource, ship min(surplus, deficit, cap, stock)
//! 4. Credit both sides from the received value at current prices
//!
//! Regions are processed in id order, which is lexical name order, so
//! competing importers are served deterministically.

use serde::Serialize;
use thiserror::Error;

use crate::core::config::EconomyConfig;
use crate::core::types::{round_to_i64, RegionId, ResourceId};
use crate::market::Market;
use crate::region::Region;
use crate::resources::ResourceRegistry;
use crate::trade::network::TradeNetwork;

/// Failure of a single trade candidate; never aborts the phase
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Trade references unknown region {0:?}")]
    UnknownRegion(RegionId),

    #[error("Region {0:?} cannot trade with itself")]
    SelfTrade(RegionId),

    #[error("Trade references unknown resource {0:?}")]
    UnknownResource(ResourceId),
}

/// One executed transfer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeTransaction {
    pub exporter: RegionId,
    pub importer: RegionId,
    pub resource: ResourceId,
    pub shipped: f64,
    /// Shipped amount after transport losses
    pub received: f64,
    /// Received amount at the pre-repricing market price
    pub value: f64,
    pub exporter_credit: i64,
    pub importer_credit: i64,
}

/// Trade parameters taken from the economy config
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEngine {
    pub radius: u32,
    pub max_partners: usize,
    pub efficiency: f64,
    pub min_volume: f64,
    pub max_volume: f64,
    pub exporter_margin: f64,
    pub importer_margin: f64,
}

impl TradeEngine {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            radius: config.trade_radius,
            max_partners: config.max_trading_partners,
            efficiency: config.trade_efficiency,
            min_volume: config.min_trade_volume,
            max_volume: config.max_trade_volume,
            exporter_margin: config.exporter_margin,
            importer_margin: config.importer_margin,
        }
    }

    /// Discover partner pairs, lower id first
    pub fn find_partners(
        &self,
        regions: &[Region],
        network: &dyn TradeNetwork,
    ) -> Vec<(RegionId, RegionId)> {
        let mut partner_counts = vec![0usize; regions.len()];
        let mut pairs = Vec::new();

        for a in 0..regions.len() {
            for b in (a + 1)..regions.len() {
                if partner_counts[a] >= self.max_partners {
                    break;
                }
                if partner_counts[b] >= self.max_partners {
                    continue;
                }
                let (from, to) = (regions[a].id, regions[b].id);
                if !network.within_radius(from, to, self.radius) {
                    continue;
                }
                partner_counts[a] += 1;
                partner_counts[b] += 1;
                pairs.push((from, to));
            }
        }

        pairs
    }

    /// Execute every viable transfer between the given pairs
    ///
    /// A failing candidate is logged and skipped.
    pub fn execute(
        &self,
        regions: &mut [Region],
        pairs: &[(RegionId, RegionId)],
        registry: &ResourceRegistry,
        market: &Market,
    ) -> Vec<TradeTransaction> {
        let mut remaining: Vec<Vec<f64>> = regions
            .iter()
            .map(|r| registry.ids().map(|id| r.ledger.surplus(id)).collect())
            .collect();

        let mut transactions = Vec::new();
        for &(a, b) in pairs {
            for resource in registry.ids() {
                for (exporter, importer) in [(a, b), (b, a)] {
                    let outcome = self.try_trade(
                        regions,
                        &mut remaining,
                        exporter,
                        importer,
                        resource,
                        registry,
                        market,
                    );
                    match outcome {
                        Ok(Some(tx)) => transactions.push(tx),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!("Skipping trade candidate: {}", e);
                        }
                    }
                }
            }
        }

        transactions
    }

    /// Partner discovery plus execution
    pub fn run(
        &self,
        regions: &mut [Region],
        network: &dyn TradeNetwork,
        registry: &ResourceRegistry,
        market: &Market,
    ) -> Vec<TradeTransaction> {
        let pairs = self.find_partners(regions, network);
        self.execute(regions, &pairs, registry, market)
    }

    #[allow(clippy::too_many_arguments)]
    fn try_trade(
        &self,
        regions: &mut [Region],
        remaining: &mut [Vec<f64>],
        exporter: RegionId,
        importer: RegionId,
        resource: ResourceId,
        registry: &ResourceRegistry,
        market: &Market,
    ) -> Result<Option<TradeTransaction>, TradeError> {
        if exporter == importer {
            return Err(TradeError::SelfTrade(exporter));
        }
        let definition = registry
            .get(resource)
            .ok_or(TradeError::UnknownResource(resource))?;

        let surplus = remaining
            .get(exporter.index())
            .ok_or(TradeError::UnknownRegion(exporter))?
            .get(resource.index())
            .copied()
            .unwrap_or(0.0);
        let deficit = -remaining
            .get(importer.index())
            .ok_or(TradeError::UnknownRegion(importer))?
            .get(resource.index())
            .copied()
            .unwrap_or(0.0);

        if surplus <= self.min_volume || deficit <= 0.0 {
            return Ok(None);
        }

        let (source, destination) = pair_mut(regions, exporter.index(), importer.index())
            .ok_or(TradeError::UnknownRegion(exporter))?;

        let planned = surplus
            .min(deficit)
            .min(self.max_volume)
            .min(source.ledger.quantity(resource));
        if planned < self.min_volume {
            return Ok(None);
        }

        let shipped = source.ledger.remove_resource(resource, planned).amount();
        if shipped <= 0.0 {
            return Ok(None);
        }
        let received = shipped * self.efficiency * definition.transport_factor;
        destination.ledger.add_resource(resource, received);

        let value = received * market.current_price(resource);
        let exporter_credit = round_to_i64(value * self.exporter_margin);
        let importer_credit = round_to_i64(value * self.importer_margin);
        source.wealth = source.wealth.saturating_add(exporter_credit);
        destination.wealth = destination.wealth.saturating_add(importer_credit);

        remaining[exporter.index()][resource.index()] -= shipped;
        remaining[importer.index()][resource.index()] += received;

        tracing::debug!(
            "{} -> {}: {:.2} {} shipped, {:.2} received (+{} / +{})",
            source.name,
            destination.name,
            shipped,
            definition.name,
            received,
            exporter_credit,
            importer_credit
        );

        Ok(Some(TradeTransaction {
            exporter,
            importer,
            resource,
            shipped,
            received,
            value,
            exporter_credit,
            importer_credit,
        }))
    }
}

/// Two distinct mutable regions out of one slice
fn pair_mut(regions: &mut [Region], a: usize, b: usize) -> Option<(&mut Region, &mut Region)> {
    if a == b || a >= regions.len() || b >= regions.len() {
        return None;
    }
    if a < b {
        let (left, right) = regions.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = regions.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}
