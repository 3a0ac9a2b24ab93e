//! Region - the atomic economic unit

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{EconomyError, Result};
use crate::core::types::{NationId, RegionId, ResourceId};
use crate::region::ledger::{LedgerEntry, ResourceLedger};
use crate::resources::ResourceRegistry;

/// Satisfaction used when a scenario does not set one
pub const DEFAULT_SATISFACTION: f64 = 0.75;

/// Infrastructure type used when a scenario does not set one
pub const DEFAULT_INFRASTRUCTURE_KIND: &str = "general";

/// A region with its own wealth, labor and resource ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub nation: NationId,

    // Economy
    pub wealth: i64,
    /// Production published for the current turn, after the cycle multiplier
    pub production: i64,
    /// Unscaled production carried from turn to turn
    pub base_production: i64,
    pub infrastructure_level: u32,
    pub infrastructure_kind: String,
    pub labor: u32,
    pub satisfaction: f64,

    pub ledger: ResourceLedger,
    /// Outputs of the recipes this region runs
    pub active_recipes: Vec<ResourceId>,

    /// Change over the last completed turn, for reporting only
    pub last_wealth_delta: i64,
    pub last_production_delta: i64,

    pub(crate) turn: TurnScratch,
}

/// Intermediate values tracked while a turn is in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TurnScratch {
    pub start_wealth: i64,
    pub start_production: i64,
    pub start_labor: u32,
    pub start_satisfaction: f64,
    /// Capital investment credited by the population model
    pub investment_bonus: i64,
    /// Wealth change applied by the region economy, before trade
    pub economic_wealth_delta: i64,
}

impl Region {
    /// Build a region from scenario data, resolving every resource name
    pub fn from_spec(id: RegionId, spec: &RegionSpec, registry: &ResourceRegistry) -> Result<Self> {
        spec.validate().map_err(EconomyError::InvalidConfig)?;

        let context = format!("region {}", spec.name);
        let mut ledger = ResourceLedger::new(registry.len());
        for (name, amount) in &spec.stock {
            ledger.set_quantity(registry.resolve(name, &context)?, *amount);
        }
        for (name, amount) in &spec.baseline {
            ledger.set_baseline(registry.resolve(name, &context)?, *amount);
        }
        for (name, modifier) in &spec.terrain_modifiers {
            ledger.set_terrain_modifier(registry.resolve(name, &context)?, *modifier);
        }

        let mut active_recipes = Vec::with_capacity(spec.recipes.len());
        for name in &spec.recipes {
            let id = registry.resolve(name, &context)?;
            let has_recipe = registry.get(id).is_some_and(|d| d.recipe.is_some());
            if !has_recipe {
                return Err(EconomyError::InvalidConfig(format!(
                    "{} activates '{}', which has no recipe",
                    context, name
                )));
            }
            active_recipes.push(id);
        }

        Ok(Self {
            id,
            name: spec.name.clone(),
            nation: NationId::new(spec.nation.clone()),
            wealth: spec.wealth,
            production: spec.production,
            base_production: spec.production,
            infrastructure_level: spec.infrastructure_level,
            infrastructure_kind: spec.infrastructure_kind.clone(),
            labor: spec.labor,
            satisfaction: spec.satisfaction.unwrap_or(DEFAULT_SATISFACTION),
            ledger,
            active_recipes,
            last_wealth_delta: 0,
            last_production_delta: 0,
            turn: TurnScratch::default(),
        })
    }

    /// Record the pre-turn state that deltas are measured against
    pub(crate) fn begin_turn(&mut self) {
        self.turn = TurnScratch {
            start_wealth: self.wealth,
            start_production: self.production,
            start_labor: self.labor,
            start_satisfaction: self.satisfaction,
            investment_bonus: 0,
            economic_wealth_delta: 0,
        };
    }

    /// Close the turn, returning whether any reported field changed
    pub(crate) fn end_turn(&mut self) -> bool {
        self.last_wealth_delta = self.wealth - self.turn.start_wealth;
        self.last_production_delta = self.production - self.turn.start_production;
        self.last_wealth_delta != 0
            || self.last_production_delta != 0
            || self.labor != self.turn.start_labor
            || (self.satisfaction - self.turn.start_satisfaction).abs() > f64::EPSILON
    }

    /// Read-only copy of the externally visible state
    pub fn snapshot(&self, registry: &ResourceRegistry) -> RegionSnapshot {
        let resources = registry
            .ids()
            .filter_map(|id| {
                self.ledger
                    .entry(id)
                    .map(|entry| (registry.name(id).to_string(), *entry))
            })
            .collect();

        RegionSnapshot {
            name: self.name.clone(),
            nation: self.nation.clone(),
            wealth: self.wealth,
            production: self.production,
            infrastructure_level: self.infrastructure_level,
            infrastructure_kind: self.infrastructure_kind.clone(),
            labor: self.labor,
            satisfaction: self.satisfaction,
            wealth_delta: self.last_wealth_delta,
            production_delta: self.last_production_delta,
            resources,
        }
    }
}

/// Serializable copy of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub name: String,
    pub nation: NationId,
    pub wealth: i64,
    pub production: i64,
    pub infrastructure_level: u32,
    pub infrastructure_kind: String,
    pub labor: u32,
    pub satisfaction: f64,
    pub wealth_delta: i64,
    pub production_delta: i64,
    pub resources: BTreeMap<String, LedgerEntry>,
}

impl RegionSnapshot {
    pub fn quantity(&self, resource: &str) -> f64 {
        self.resources.get(resource).map(|e| e.quantity).unwrap_or(0.0)
    }
}

/// Scenario representation of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub nation: String,
    pub wealth: i64,
    pub production: i64,
    pub labor: u32,
    #[serde(default = "default_level")]
    pub infrastructure_level: u32,
    #[serde(default = "default_kind")]
    pub infrastructure_kind: String,
    #[serde(default)]
    pub satisfaction: Option<f64>,
    /// Initial quantities
    #[serde(default)]
    pub stock: BTreeMap<String, f64>,
    /// Natural per-turn yield
    #[serde(default)]
    pub baseline: BTreeMap<String, f64>,
    #[serde(default)]
    pub terrain_modifiers: BTreeMap<String, f64>,
    /// Names of resources whose recipe this region runs
    #[serde(default)]
    pub recipes: Vec<String>,
    /// Adjacent regions for the trade network
    #[serde(default)]
    pub neighbors: Vec<String>,
}

fn default_level() -> u32 {
    1
}

fn default_kind() -> String {
    DEFAULT_INFRASTRUCTURE_KIND.to_string()
}

impl RegionSpec {
    pub fn new(name: impl Into<String>, nation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nation: nation.into(),
            wealth: 0,
            production: 0,
            labor: 0,
            infrastructure_level: 1,
            infrastructure_kind: default_kind(),
            satisfaction: None,
            stock: BTreeMap::new(),
            baseline: BTreeMap::new(),
            terrain_modifiers: BTreeMap::new(),
            recipes: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    pub fn with_economy(mut self, wealth: i64, production: i64, labor: u32) -> Self {
        self.wealth = wealth;
        self.production = production;
        self.labor = labor;
        self
    }

    pub fn with_stock(mut self, resource: &str, amount: f64) -> Self {
        self.stock.insert(resource.to_string(), amount);
        self
    }

    pub fn with_baseline(mut self, resource: &str, per_turn: f64) -> Self {
        self.baseline.insert(resource.to_string(), per_turn);
        self
    }

    pub fn with_neighbor(mut self, neighbor: &str) -> Self {
        self.neighbors.push(neighbor.to_string());
        self
    }

    pub fn with_satisfaction(mut self, satisfaction: f64) -> Self {
        self.satisfaction = Some(satisfaction);
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("region name must not be empty".into());
        }
        if self.infrastructure_level < 1 {
            return Err(format!("{}: infrastructure_level must be >= 1", self.name));
        }
        if self.production < 0 {
            return Err(format!("{}: production must be >= 0", self.name));
        }
        if let Some(s) = self.satisfaction {
            if !(0.0..=1.0).contains(&s) {
                return Err(format!("{}: satisfaction ({}) must be in [0, 1]", self.name, s));
            }
        }
        let negative = self
            .stock
            .values()
            .chain(self.baseline.values())
            .chain(self.terrain_modifiers.values())
            .any(|v| !v.is_finite() || *v < 0.0);
        if negative {
            return Err(format!("{}: resource amounts must be finite and >= 0", self.name));
        }
        Ok(())
    }
}
