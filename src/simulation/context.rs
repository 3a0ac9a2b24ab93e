//! Simulation context - everything one economy owns
//!
//! Regions live in a `Vec` sorted by name, so `RegionId` order is lexical
//! order and every phase iterates deterministically. Names map to ids through
//! an index used for external lookups only.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EconomyConfig;
use crate::core::error::{EconomyError, Result};
use crate::core::types::{RegionId, Turn};
use crate::market::Market;
use crate::region::{Region, RegionSpec};
use crate::resources::{ResourceRegistry, ResourceSpec};
use crate::simulation::cycle::EconomicCycle;
use crate::trade::{RegionGraph, TradeHistory, TradeNetwork};

/// State owned by one simulation; only the turn orchestrator mutates it
pub struct EconomyContext {
    pub(crate) config: EconomyConfig,
    pub(crate) registry: ResourceRegistry,
    pub(crate) regions: Vec<Region>,
    region_index: AHashMap<String, RegionId>,
    pub(crate) market: Market,
    pub(crate) history: TradeHistory,
    pub(crate) cycle: EconomicCycle,
    pub(crate) network: Box<dyn TradeNetwork>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) turn: Turn,
}

impl std::fmt::Debug for EconomyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EconomyContext")
            .field("turn", &self.turn)
            .field("regions", &self.regions.len())
            .field("resources", &self.registry.len())
            .field("phase", &self.cycle.phase())
            .finish()
    }
}

/// Region specs in the order their ids will be assigned
pub fn sorted_region_specs(specs: &[RegionSpec]) -> Vec<RegionSpec> {
    let mut sorted = specs.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

impl EconomyContext {
    /// Validate static data and build the initial state
    ///
    /// Region ids are assigned in lexical name order; `network` must use
    /// the same numbering.
    pub fn new(
        resources: &[ResourceSpec],
        regions: &[RegionSpec],
        config: EconomyConfig,
        network: Box<dyn TradeNetwork>,
    ) -> Result<Self> {
        config.validate().map_err(EconomyError::InvalidConfig)?;
        let registry = ResourceRegistry::new(resources, config.price_volatility)?;

        if regions.is_empty() {
            return Err(EconomyError::MissingRegions);
        }

        let specs = sorted_region_specs(regions);
        let mut region_index = AHashMap::with_capacity(specs.len());
        let mut built = Vec::with_capacity(specs.len());
        for (idx, spec) in specs.iter().enumerate() {
            let id = RegionId(idx as u32);
            if region_index.insert(spec.name.clone(), id).is_some() {
                return Err(EconomyError::DuplicateRegion(spec.name.clone()));
            }
            built.push(Region::from_spec(id, spec, &registry)?);
        }

        let market = Market::new(&registry, &config);
        let history = TradeHistory::new(built.len());
        let cycle = EconomicCycle::new(config.cycle.clone());
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        tracing::info!(
            "Economy initialised: {} regions, {} resources, seed {}",
            built.len(),
            registry.len(),
            config.seed
        );

        Ok(Self {
            config,
            registry,
            regions: built,
            region_index,
            market,
            history,
            cycle,
            network,
            rng,
            turn: 0,
        })
    }

    /// Build with a hop-graph network from each spec's neighbor list
    pub fn with_region_graph(
        resources: &[ResourceSpec],
        regions: &[RegionSpec],
        config: EconomyConfig,
    ) -> Result<Self> {
        let graph = RegionGraph::from_specs(&sorted_region_specs(regions))?;
        Self::new(resources, regions, config, Box::new(graph))
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Regions in id order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn history(&self) -> &TradeHistory {
        &self.history
    }

    pub fn cycle(&self) -> &EconomicCycle {
        &self.cycle
    }

    pub fn network(&self) -> &dyn TradeNetwork {
        self.network.as_ref()
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn region_id(&self, name: &str) -> Option<RegionId> {
        self.region_index.get(name).copied()
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.region_id(name).and_then(|id| self.regions.get(id.index()))
    }
}
