//! Resource ledger - region-level resource quantities and per-turn rates
//!
//! Quantities accumulate across turns. Production and consumption rates are
//! recomputed from scratch every turn and never accumulate; they are what the
//! population, economy and trade phases read later in the same turn.

use serde::{Deserialize, Serialize};

use crate::core::types::ResourceId;
use crate::resources::ResourceRegistry;

/// One ledger row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub quantity: f64,
    pub production_rate: f64,
    pub consumption_rate: f64,
}

impl LedgerEntry {
    /// Positive when the region produces more than it consumes
    pub fn surplus(&self) -> f64 {
        self.production_rate - self.consumption_rate
    }
}

/// Result of a removal request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Withdrawal {
    /// The whole requested amount was removed
    Full(f64),
    /// Only this much was available; the entry is now empty
    Partial(f64),
}

impl Withdrawal {
    pub fn amount(self) -> f64 {
        match self {
            Withdrawal::Full(a) | Withdrawal::Partial(a) => a,
        }
    }

    pub fn is_full(self) -> bool {
        matches!(self, Withdrawal::Full(_))
    }
}

/// Per-region ledger, indexed by [`ResourceId`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLedger {
    entries: Vec<LedgerEntry>,
    /// Natural per-turn yield before terrain
    baseline: Vec<f64>,
    /// Terrain multiplier on the natural yield
    terrain: Vec<f64>,
}

impl ResourceLedger {
    /// Empty ledger with one row per registered resource
    pub fn new(resource_count: usize) -> Self {
        Self {
            entries: vec![LedgerEntry::default(); resource_count],
            baseline: vec![0.0; resource_count],
            terrain: vec![1.0; resource_count],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_baseline(&mut self, resource: ResourceId, per_turn: f64) {
        if let Some(slot) = self.baseline.get_mut(resource.index()) {
            *slot = per_turn.max(0.0);
        }
    }

    pub fn set_terrain_modifier(&mut self, resource: ResourceId, modifier: f64) {
        if let Some(slot) = self.terrain.get_mut(resource.index()) {
            *slot = modifier.max(0.0);
        }
    }

    /// Natural yield after terrain
    pub fn natural_yield(&self, resource: ResourceId) -> f64 {
        let idx = resource.index();
        match (self.baseline.get(idx), self.terrain.get(idx)) {
            (Some(base), Some(modifier)) => base * modifier,
            _ => 0.0,
        }
    }

    pub fn entry(&self, resource: ResourceId) -> Option<&LedgerEntry> {
        self.entries.get(resource.index())
    }

    /// Current quantity; unknown resources read as empty
    pub fn quantity(&self, resource: ResourceId) -> f64 {
        self.entry(resource).map(|e| e.quantity).unwrap_or(0.0)
    }

    pub fn surplus(&self, resource: ResourceId) -> f64 {
        self.entry(resource).map(LedgerEntry::surplus).unwrap_or(0.0)
    }

    /// Add each resource's natural per-turn yield
    pub fn generate(&mut self) {
        for idx in 0..self.entries.len() {
            let produced = self.natural_yield(ResourceId(idx as u16));
            self.entries[idx].quantity += produced;
        }
    }

    /// Spoil a fraction of each perishable stock
    pub fn apply_perishability(&mut self, registry: &ResourceRegistry) {
        for (id, def) in registry.iter() {
            if def.perish_rate <= 0.0 {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(id.index()) {
                entry.quantity = (entry.quantity * (1.0 - def.perish_rate)).max(0.0);
            }
        }
    }

    /// Add to one entry, returning the amount actually added
    ///
    /// Negative or non-finite amounts are ignored.
    pub fn add_resource(&mut self, resource: ResourceId, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        match self.entries.get_mut(resource.index()) {
            Some(entry) => {
                entry.quantity += amount;
                amount
            }
            None => 0.0,
        }
    }

    /// Remove from one entry, never driving it below zero
    pub fn remove_resource(&mut self, resource: ResourceId, amount: f64) -> Withdrawal {
        let Some(entry) = self.entries.get_mut(resource.index()) else {
            return Withdrawal::Partial(0.0);
        };
        if !amount.is_finite() || amount <= 0.0 {
            return Withdrawal::Full(0.0);
        }
        if entry.quantity >= amount {
            entry.quantity -= amount;
            Withdrawal::Full(amount)
        } else {
            let removed = entry.quantity;
            entry.quantity = 0.0;
            Withdrawal::Partial(removed)
        }
    }

    /// Name-based removal for callers outside the simulation
    pub fn remove_by_name(
        &mut self,
        registry: &ResourceRegistry,
        name: &str,
        amount: f64,
    ) -> Withdrawal {
        match registry.id(name) {
            Some(id) => self.remove_resource(id, amount),
            None => Withdrawal::Partial(0.0),
        }
    }

    pub fn set_quantity(&mut self, resource: ResourceId, amount: f64) {
        if let Some(entry) = self.entries.get_mut(resource.index()) {
            entry.quantity = amount.max(0.0);
        }
    }

    /// Check if the ledger holds at least the given amounts
    pub fn has_materials(&self, requirements: &[(ResourceId, f64)]) -> bool {
        requirements
            .iter()
            .all(|(res, amount)| self.quantity(*res) >= *amount)
    }

    /// Recompute production rates from natural yield and runnable recipes
    ///
    /// Quantities are untouched.
    pub fn calculate_production(
        &mut self,
        registry: &ResourceRegistry,
        active_recipes: &[ResourceId],
        infrastructure_kind: &str,
        infrastructure_level: u32,
    ) {
        for idx in 0..self.entries.len() {
            self.entries[idx].production_rate = self.natural_yield(ResourceId(idx as u16));
        }

        for &output in active_recipes {
            let Some(recipe) = registry.get(output).and_then(|d| d.recipe.as_ref()) else {
                continue;
            };
            if !recipe.infrastructure_allows(infrastructure_kind, infrastructure_level) {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(output.index()) {
                entry.production_rate += recipe.effective_output();
            }
        }
    }

    /// Recompute consumption rates from population needs and recipe inputs
    ///
    /// Quantities are untouched.
    pub fn calculate_demand(
        &mut self,
        registry: &ResourceRegistry,
        active_recipes: &[ResourceId],
        infrastructure_kind: &str,
        infrastructure_level: u32,
        labor: u32,
    ) {
        for (id, def) in registry.iter() {
            if let Some(entry) = self.entries.get_mut(id.index()) {
                entry.consumption_rate = def.consumption_per_labor * labor as f64;
            }
        }

        for &output in active_recipes {
            let Some(recipe) = registry.get(output).and_then(|d| d.recipe.as_ref()) else {
                continue;
            };
            if !recipe.infrastructure_allows(infrastructure_kind, infrastructure_level) {
                continue;
            }
            for input in recipe.consumed_inputs() {
                if let Some(entry) = self.entries.get_mut(input.resource.index()) {
                    entry.consumption_rate += input.amount;
                }
            }
        }
    }

    /// Copy of every entry
    pub fn get_all(&self) -> Vec<LedgerEntry> {
        self.entries.clone()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.quantity).collect()
    }

    pub fn production_rates(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.production_rate).collect()
    }

    pub fn consumption_rates(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.consumption_rate).collect()
    }

    /// Sum of production minus consumption over all resources
    pub fn net_balance(&self) -> f64 {
        self.entries.iter().map(LedgerEntry::surplus).sum()
    }

    #[cfg(test)]
    pub(crate) fn set_rates(&mut self, resource: ResourceId, production: f64, consumption: f64) {
        if let Some(entry) = self.entries.get_mut(resource.index()) {
            entry.production_rate = production;
            entry.consumption_rate = consumption;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{RecipeInputSpec, RecipeSpec, ResourceSpec};

    const FOOD: ResourceId = ResourceId(0);
    const ORE: ResourceId = ResourceId(1);
    const IRON: ResourceId = ResourceId(2);

    fn registry() -> ResourceRegistry {
        ResourceRegistry::new(
            &[
                ResourceSpec::raw("Food", 10.0).essential(0.5).with_perish_rate(0.1),
                ResourceSpec::raw("Ore", 5.0),
                ResourceSpec::raw("Iron", 20.0).with_recipe(RecipeSpec {
                    inputs: vec![RecipeInputSpec {
                        resource: "Ore".into(),
                        amount: 3.0,
                        consumed: true,
                    }],
                    output_amount: 2.0,
                    infrastructure: Some(crate::resources::InfrastructureRequirement {
                        kind: "forge".into(),
                        min_level: 2,
                    }),
                    efficiency: 1.0,
                }),
            ],
            0.2,
        )
        .unwrap()
    }

    #[test]
    fn test_ledger_add_remove() {
        let mut ledger = ResourceLedger::new(3);

        assert!((ledger.add_resource(FOOD, 30.0) - 30.0).abs() < 1e-9);
        assert_eq!(ledger.remove_resource(FOOD, 20.0), Withdrawal::Full(20.0));
        assert!((ledger.quantity(FOOD) - 10.0).abs() < 1e-9);

        // More than available empties the entry and reports partial
        let result = ledger.remove_resource(FOOD, 25.0);
        assert!(!result.is_full());
        assert!((result.amount() - 10.0).abs() < 1e-9);
        assert_eq!(ledger.quantity(FOOD), 0.0);
    }

    #[test]
    fn test_remove_unknown_resource_is_noop() {
        let registry = registry();
        let mut ledger = ResourceLedger::new(3);
        ledger.add_resource(FOOD, 5.0);

        assert_eq!(ledger.remove_resource(ResourceId(42), 1.0), Withdrawal::Partial(0.0));
        assert_eq!(
            ledger.remove_by_name(&registry, "Unobtainium", 1.0),
            Withdrawal::Partial(0.0)
        );
        assert!((ledger.quantity(FOOD) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_ignores_negative_amounts() {
        let mut ledger = ResourceLedger::new(3);
        assert_eq!(ledger.add_resource(FOOD, -5.0), 0.0);
        assert_eq!(ledger.add_resource(FOOD, f64::NAN), 0.0);
        assert_eq!(ledger.quantity(FOOD), 0.0);
    }

    #[test]
    fn test_generate_applies_terrain() {
        let mut ledger = ResourceLedger::new(3);
        ledger.set_baseline(FOOD, 10.0);
        ledger.set_terrain_modifier(FOOD, 1.5);
        ledger.set_baseline(ORE, 4.0);

        ledger.generate();

        assert!((ledger.quantity(FOOD) - 15.0).abs() < 1e-9);
        assert!((ledger.quantity(ORE) - 4.0).abs() < 1e-9);
        assert_eq!(ledger.quantity(IRON), 0.0);
    }

    #[test]
    fn test_perishability() {
        let registry = registry();
        let mut ledger = ResourceLedger::new(3);
        ledger.set_quantity(FOOD, 100.0);
        ledger.set_quantity(ORE, 100.0);

        ledger.apply_perishability(&registry);

        assert!((ledger.quantity(FOOD) - 90.0).abs() < 1e-9);
        assert!((ledger.quantity(ORE) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_recomputed_not_accumulated() {
        let registry = registry();
        let mut ledger = ResourceLedger::new(3);
        ledger.set_baseline(ORE, 6.0);

        for _ in 0..3 {
            ledger.calculate_production(&registry, &[IRON], "forge", 2);
            ledger.calculate_demand(&registry, &[IRON], "forge", 2, 100);
        }

        assert!((ledger.production_rates()[ORE.index()] - 6.0).abs() < 1e-9);
        assert!((ledger.production_rates()[IRON.index()] - 2.0).abs() < 1e-9);
        assert!((ledger.consumption_rates()[ORE.index()] - 3.0).abs() < 1e-9);
        assert!((ledger.consumption_rates()[FOOD.index()] - 50.0).abs() < 1e-9);
        // Rate computation leaves stock alone
        assert_eq!(ledger.quantity(ORE), 0.0);
    }

    #[test]
    fn test_recipe_rates_need_infrastructure() {
        let registry = registry();
        let mut ledger = ResourceLedger::new(3);

        ledger.calculate_production(&registry, &[IRON], "forge", 1);
        ledger.calculate_demand(&registry, &[IRON], "farm", 5, 0);

        assert_eq!(ledger.production_rates()[IRON.index()], 0.0);
        assert_eq!(ledger.consumption_rates()[ORE.index()], 0.0);
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut ledger = ResourceLedger::new(3);
        ledger.add_resource(FOOD, 5.0);

        let mut snapshot = ledger.get_all();
        snapshot[FOOD.index()].quantity = 999.0;

        assert!((ledger.quantity(FOOD) - 5.0).abs() < 1e-9);
    }
}
