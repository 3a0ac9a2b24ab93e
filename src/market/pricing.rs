//! Market pricing - global prices from aggregate supply and demand
//!
//! Once per turn every resource moves from priced to repriced:
//! 1. Aggregate supply (floored) and demand over all regions
//! 2. Target = base × (demand / supply)^elasticity
//! 3. Multiplicative jitter on the target
//! 4. Hard clamp to ±volatility of the current price
//! 5. Append to the bounded history
//!
//! The clamp in step 4 is authoritative; the target only says which way to move.

use std::collections::{BTreeMap, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::EconomyConfig;
use crate::core::types::{ResourceId, Turn};
use crate::region::Region;
use crate::resources::ResourceRegistry;

/// Price reported for resources the market does not know
pub const FALLBACK_PRICE: f64 = 1.0;

/// Aggregate supply never drops below this, so the ratio stays finite
pub const SUPPLY_FLOOR: f64 = 0.1;

/// Absolute lower bound on any price, and the smallest accepted base value
pub const MIN_PRICE: f64 = 0.01;

/// Price state of one resource
#[derive(Debug, Clone, PartialEq)]
struct PriceTrack {
    base: f64,
    current: f64,
    volatility: f64,
    history: VecDeque<f64>,
}

/// Outcome of repricing one resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub resource: ResourceId,
    pub old_price: f64,
    pub target: f64,
    pub new_price: f64,
}

/// Global market, one price track per registered resource
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    prices: Vec<PriceTrack>,
    history_len: usize,
    demand_elasticity: f64,
    jitter: f64,
}

/// Advisory target price before jitter and clamping
pub fn target_price(base: f64, supply: f64, demand: f64, demand_elasticity: f64) -> f64 {
    let ratio = demand.max(0.0) / supply.max(SUPPLY_FLOOR);
    base * ratio.powf(demand_elasticity)
}

/// Keep `target` within ±volatility of `current`
///
/// The `MIN_PRICE` floor only applies inside that band: a price already below
/// the floor may not move down, but it is never lifted past `current + max_move`.
pub fn clamp_to_volatility(current: f64, target: f64, volatility: f64) -> f64 {
    let max_move = current * volatility;
    let lower = (current - max_move).max(MIN_PRICE.min(current));
    target.clamp(lower, current + max_move)
}

/// Sum production and consumption rates per resource over all regions
pub fn aggregate_supply_demand(regions: &[Region], resource_count: usize) -> (Vec<f64>, Vec<f64>) {
    let mut supply = vec![0.0; resource_count];
    let mut demand = vec![0.0; resource_count];
    for region in regions {
        let production = region.ledger.production_rates();
        let consumption = region.ledger.consumption_rates();
        for idx in 0..resource_count {
            supply[idx] += production.get(idx).copied().unwrap_or(0.0);
            demand[idx] += consumption.get(idx).copied().unwrap_or(0.0);
        }
    }
    for s in &mut supply {
        *s = s.max(SUPPLY_FLOOR);
    }
    (supply, demand)
}

impl Market {
    /// Open the market with every price at its base value
    pub fn new(registry: &ResourceRegistry, config: &EconomyConfig) -> Self {
        let prices = registry
            .iter()
            .map(|(_, def)| PriceTrack {
                base: def.base_value,
                current: def.base_value,
                volatility: def.volatility,
                history: VecDeque::from([def.base_value]),
            })
            .collect();

        Self {
            prices,
            history_len: config.price_history_len.max(1),
            demand_elasticity: config.demand_elasticity,
            jitter: config.price_jitter,
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn current_price(&self, resource: ResourceId) -> f64 {
        self.prices
            .get(resource.index())
            .map(|p| p.current)
            .unwrap_or(FALLBACK_PRICE)
    }

    pub fn base_price(&self, resource: ResourceId) -> f64 {
        self.prices
            .get(resource.index())
            .map(|p| p.base)
            .unwrap_or(FALLBACK_PRICE)
    }

    /// Current price relative to base; 1.0 for unknown resources
    pub fn price_ratio(&self, resource: ResourceId) -> f64 {
        self.prices
            .get(resource.index())
            .map(|p| p.current / p.base)
            .unwrap_or(1.0)
    }

    /// Copy of the bounded history, oldest first
    pub fn history(&self, resource: ResourceId) -> Vec<f64> {
        self.prices
            .get(resource.index())
            .map(|p| p.history.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Name-based price lookup with the documented fallback
    pub fn price_of(&self, registry: &ResourceRegistry, name: &str) -> f64 {
        registry
            .id(name)
            .map(|id| self.current_price(id))
            .unwrap_or(FALLBACK_PRICE)
    }

    /// Reprice every resource once
    ///
    /// `supply` and `demand` are indexed by resource id. Draws one jitter
    /// value per resource, in id order, when jitter is enabled.
    pub fn reprice<R: Rng>(
        &mut self,
        supply: &[f64],
        demand: &[f64],
        rng: &mut R,
    ) -> Vec<PriceChange> {
        let mut changes = Vec::with_capacity(self.prices.len());

        for (idx, track) in self.prices.iter_mut().enumerate() {
            let s = supply.get(idx).copied().unwrap_or(SUPPLY_FLOOR);
            let d = demand.get(idx).copied().unwrap_or(0.0);

            let mut target = target_price(track.base, s, d, self.demand_elasticity);
            if self.jitter > 0.0 {
                target *= 1.0 + rng.gen_range(-self.jitter..=self.jitter);
            }

            let old_price = track.current;
            let new_price = clamp_to_volatility(old_price, target, track.volatility);
            track.current = new_price;

            track.history.push_back(new_price);
            while track.history.len() > self.history_len {
                track.history.pop_front();
            }

            changes.push(PriceChange {
                resource: ResourceId(idx as u16),
                old_price,
                target,
                new_price,
            });
        }

        changes
    }

    /// Every current price keyed by resource name
    pub fn price_map(&self, registry: &ResourceRegistry) -> BTreeMap<String, f64> {
        registry
            .ids()
            .map(|id| (registry.name(id).to_string(), self.current_price(id)))
            .collect()
    }

    pub fn snapshot(&self, registry: &ResourceRegistry, turn: Turn) -> MarketSnapshot {
        let prices = registry
            .ids()
            .map(|id| {
                (
                    registry.name(id).to_string(),
                    PriceQuote {
                        current: self.current_price(id),
                        base: self.base_price(id),
                        ratio: self.price_ratio(id),
                        history: self.history(id),
                    },
                )
            })
            .collect();
        MarketSnapshot { turn, prices }
    }
}

/// Read-only view of one resource's price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub current: f64,
    pub base: f64,
    pub ratio: f64,
    pub history: Vec<f64>,
}

/// Read-only view of the whole market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub turn: Turn,
    pub prices: BTreeMap<String, PriceQuote>,
}

impl MarketSnapshot {
    pub fn price(&self, resource: &str) -> f64 {
        self.prices
            .get(resource)
            .map(|q| q.current)
            .unwrap_or(FALLBACK_PRICE)
    }
}
