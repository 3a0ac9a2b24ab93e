//! Turn orchestrator - advances the whole economy one turn
//!
//! Each phase runs over every region before the next phase starts:
//! production → ledger recompute → population → region economy → trade →
//! market repricing → economic cycle.
//!
//! Trade therefore sees post-production balances of every region and never
//! the cycle-scaled values.

use thiserror::Error;

use crate::core::config::EconomyConfig;
use crate::core::error::{EconomyError, Result};
use crate::core::types::Turn;
use crate::market::pricing::aggregate_supply_demand;
use crate::market::MarketSnapshot;
use crate::region::{economy, population, production, Region, RegionSnapshot, RegionSpec};
use crate::resources::{ResourceRegistry, ResourceSpec};
use crate::simulation::context::EconomyContext;
use crate::simulation::cycle::EconomicPhase;
use crate::simulation::events::{EconomyEvent, TurnReport};
use crate::trade::{TradeEngine, TradeNetwork, TradeRecord};

/// Why `advance_turn` did not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnError {
    #[error("A turn is already in progress")]
    TurnInProgress,

    #[error("Turn {turn} aborted: {reason}")]
    InvariantViolation { turn: Turn, reason: String },

    #[error("Simulation state is unavailable after a panic in another turn")]
    Poisoned,
}

/// The economy core: owns the context and exposes the turn trigger and queries
#[derive(Debug)]
pub struct Simulation {
    ctx: EconomyContext,
}

impl Simulation {
    /// See [`EconomyContext::new`] for how region ids are assigned
    pub fn new(
        resources: &[ResourceSpec],
        regions: &[RegionSpec],
        config: EconomyConfig,
        network: Box<dyn TradeNetwork>,
    ) -> Result<Self> {
        Ok(Self {
            ctx: EconomyContext::new(resources, regions, config, network)?,
        })
    }

    pub fn with_region_graph(
        resources: &[ResourceSpec],
        regions: &[RegionSpec],
        config: EconomyConfig,
    ) -> Result<Self> {
        Ok(Self {
            ctx: EconomyContext::with_region_graph(resources, regions, config)?,
        })
    }

    pub fn from_context(ctx: EconomyContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &EconomyContext {
        &self.ctx
    }

    /// Number of completed (or attempted) turns
    pub fn turn(&self) -> Turn {
        self.ctx.turn
    }

    pub fn phase(&self) -> EconomicPhase {
        self.ctx.cycle.phase()
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.ctx.config
    }

    /// Advance the economy by exactly one turn
    pub fn advance_turn(&mut self) -> std::result::Result<TurnReport, TurnError> {
        let ctx = &mut self.ctx;
        ctx.turn += 1;
        let turn = ctx.turn;

        for region in &mut ctx.regions {
            region.begin_turn();
        }

        // Production
        for region in &mut ctx.regions {
            production::update_production(region, &ctx.config, &mut ctx.rng);
            production::run_recipes(region, &ctx.registry, &ctx.config);
        }

        // Ledger recompute
        for region in &mut ctx.regions {
            recompute_ledger(region, &ctx.registry);
        }

        // Population
        for region in &mut ctx.regions {
            population::process_population(region, &ctx.registry, &ctx.config);
        }

        // Region economy
        for region in &mut ctx.regions {
            economy::apply_region_economy(region, &ctx.config);
        }

        // Trade
        ctx.history.clear();
        let transactions = TradeEngine::new(&ctx.config).run(
            &mut ctx.regions,
            ctx.network.as_ref(),
            &ctx.registry,
            &ctx.market,
        );
        for tx in &transactions {
            ctx.history.record_transaction(turn, tx, &ctx.regions, &ctx.registry);
        }

        // Market
        let (supply, demand) = aggregate_supply_demand(&ctx.regions, ctx.registry.len());
        let changes = ctx.market.reprice(&supply, &demand, &mut ctx.rng);
        if let Some(bad) = changes.iter().find(|c| !c.new_price.is_finite()) {
            let reason = format!(
                "price of {} became {}",
                ctx.registry.name(bad.resource),
                bad.new_price
            );
            tracing::warn!("Turn {} aborted: {}", turn, reason);
            return Err(TurnError::InvariantViolation { turn, reason });
        }

        // Economic cycle
        let multiplier = ctx.cycle.multiplier();
        for region in &mut ctx.regions {
            economy::apply_cycle_multiplier(region, multiplier, &ctx.config);
        }
        ctx.cycle.advance();

        let mut events = Vec::with_capacity(ctx.regions.len() + 1);
        for region in &mut ctx.regions {
            if region.end_turn() {
                events.push(region_changed(turn, region));
            }
        }
        events.push(EconomyEvent::PricesUpdated {
            turn,
            prices: ctx.market.price_map(&ctx.registry),
        });

        let total_wealth: i64 = ctx.regions.iter().map(|r| r.wealth).sum();
        tracing::info!(
            "Turn {} complete: {} trades, {} regions changed, total wealth {}",
            turn,
            transactions.len(),
            events.len() - 1,
            total_wealth
        );

        Ok(TurnReport {
            turn,
            phase: ctx.cycle.phase(),
            trades: transactions.len(),
            events,
        })
    }

    /// Snapshot of one region; `None` for unknown names
    pub fn region(&self, name: &str) -> Option<RegionSnapshot> {
        self.ctx.region(name).map(|r| r.snapshot(&self.ctx.registry))
    }

    /// Snapshots of every region in name order
    pub fn regions(&self) -> Vec<RegionSnapshot> {
        self.ctx
            .regions
            .iter()
            .map(|r| r.snapshot(&self.ctx.registry))
            .collect()
    }

    pub fn market_snapshot(&self) -> MarketSnapshot {
        self.ctx.market.snapshot(&self.ctx.registry, self.ctx.turn)
    }

    /// Current price by resource name, with the market's fallback
    pub fn price(&self, resource: &str) -> f64 {
        self.ctx.market.price_of(&self.ctx.registry, resource)
    }

    /// Last turn's trades of one region; empty for unknown names
    pub fn trade_history(&self, name: &str) -> Vec<TradeRecord> {
        self.ctx
            .region_id(name)
            .map(|id| self.ctx.history.for_region(id))
            .unwrap_or_default()
    }

    /// Spend a region's wealth on one infrastructure level
    pub fn upgrade_infrastructure(&mut self, name: &str) -> Result<u32> {
        let ctx = &mut self.ctx;
        let region = ctx
            .region_id(name)
            .and_then(|id| ctx.regions.get_mut(id.index()))
            .ok_or_else(|| EconomyError::UnknownRegion(name.to_string()))?;
        economy::upgrade_infrastructure(region, &ctx.config)
    }
}

fn recompute_ledger(region: &mut Region, registry: &ResourceRegistry) {
    region.ledger.apply_perishability(registry);
    region.ledger.calculate_production(
        registry,
        &region.active_recipes,
        &region.infrastructure_kind,
        region.infrastructure_level,
    );
    region.ledger.calculate_demand(
        registry,
        &region.active_recipes,
        &region.infrastructure_kind,
        region.infrastructure_level,
        region.labor,
    );
    region.ledger.generate();
}

fn region_changed(turn: Turn, region: &Region) -> EconomyEvent {
    EconomyEvent::RegionChanged {
        turn,
        region: region.name.clone(),
        nation: region.nation.clone(),
        wealth: region.wealth,
        production: region.production,
        wealth_delta: region.last_wealth_delta,
        production_delta: region.last_production_delta,
        labor: region.labor,
        satisfaction: region.satisfaction,
    }
}
