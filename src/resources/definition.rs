//! Resource definitions and production recipes
//!
//! Definitions are immutable once the registry is built. Scenario files
//! describe them with the `*Spec` types, which reference other resources by
//! name; the registry resolves those names into [`ResourceId`]s.

use serde::{Deserialize, Serialize};

use crate::core::types::ResourceId;
use crate::market::pricing::MIN_PRICE;

/// Broad class of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Raw,
    Processed,
    Abstract,
}

/// Infrastructure a region must have for a recipe to fire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureRequirement {
    /// Infrastructure type name, matched exactly against the region's kind
    pub kind: String,
    pub min_level: u32,
}

impl InfrastructureRequirement {
    pub fn is_met(&self, kind: &str, level: u32) -> bool {
        self.kind == kind && level >= self.min_level
    }
}

/// One input of a recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInput {
    pub resource: ResourceId,
    pub amount: f64,
    /// Non-consumed inputs must be present but are left in the ledger
    pub consumed: bool,
}

/// A resolved production recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub inputs: Vec<RecipeInput>,
    /// Output per firing, before efficiency
    pub output_amount: f64,
    pub requirement: Option<InfrastructureRequirement>,
    pub efficiency: f64,
}

impl Recipe {
    /// Output of one firing with no quality adjustment
    pub fn effective_output(&self) -> f64 {
        self.output_amount * self.efficiency
    }

    /// Whether a region with this infrastructure may run the recipe
    pub fn infrastructure_allows(&self, kind: &str, level: u32) -> bool {
        self.requirement
            .as_ref()
            .map_or(true, |req| req.is_met(kind, level))
    }

    pub fn consumed_inputs(&self) -> impl Iterator<Item = &RecipeInput> {
        self.inputs.iter().filter(|input| input.consumed)
    }
}

/// A fully resolved resource definition
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    pub name: String,
    pub category: ResourceCategory,
    /// Market base price
    pub base_value: f64,
    /// Per-turn price volatility cap, in (0, 1)
    pub volatility: f64,
    /// Fraction of stock lost every turn, in [0, 1]
    pub perish_rate: f64,
    /// Fraction of a shipment that survives transport, in (0, 1]
    pub transport_factor: f64,
    /// Essential resources drive satisfaction
    pub essential: bool,
    /// Population consumption table entry
    pub consumption_per_labor: f64,
    pub recipe: Option<Recipe>,
}

// ============================================================================
// Scenario representation
// ============================================================================

/// Serialized form of a resource definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub name: String,
    pub category: ResourceCategory,
    pub base_value: f64,
    /// Falls back to `EconomyConfig::price_volatility`
    #[serde(default)]
    pub volatility: Option<f64>,
    #[serde(default)]
    pub perish_rate: f64,
    #[serde(default = "default_factor")]
    pub transport_factor: f64,
    #[serde(default)]
    pub essential: bool,
    #[serde(default)]
    pub consumption_per_labor: f64,
    #[serde(default)]
    pub recipe: Option<RecipeSpec>,
}

/// Serialized form of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSpec {
    #[serde(default)]
    pub inputs: Vec<RecipeInputSpec>,
    pub output_amount: f64,
    #[serde(default)]
    pub infrastructure: Option<InfrastructureRequirement>,
    #[serde(default = "default_factor")]
    pub efficiency: f64,
}

/// Serialized form of a recipe input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeInputSpec {
    pub resource: String,
    pub amount: f64,
    #[serde(default = "default_consumed")]
    pub consumed: bool,
}

fn default_factor() -> f64 {
    1.0
}

fn default_consumed() -> bool {
    true
}

impl ResourceSpec {
    /// Minimal raw resource, handy for tests and generated scenarios
    pub fn raw(name: impl Into<String>, base_value: f64) -> Self {
        Self {
            name: name.into(),
            category: ResourceCategory::Raw,
            base_value,
            volatility: None,
            perish_rate: 0.0,
            transport_factor: 1.0,
            essential: false,
            consumption_per_labor: 0.0,
            recipe: None,
        }
    }

    pub fn essential(mut self, consumption_per_labor: f64) -> Self {
        self.essential = true;
        self.consumption_per_labor = consumption_per_labor;
        self
    }

    pub fn with_consumption(mut self, consumption_per_labor: f64) -> Self {
        self.consumption_per_labor = consumption_per_labor;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    pub fn with_perish_rate(mut self, perish_rate: f64) -> Self {
        self.perish_rate = perish_rate;
        self
    }

    pub fn with_recipe(mut self, recipe: RecipeSpec) -> Self {
        self.category = ResourceCategory::Processed;
        self.recipe = Some(recipe);
        self
    }

    /// Check numeric ranges that do not depend on other definitions
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("resource name must not be empty".into());
        }
        if !self.base_value.is_finite() || self.base_value < MIN_PRICE {
            return Err(format!(
                "{}: base_value ({}) must be finite and at least {}",
                self.name, self.base_value, MIN_PRICE
            ));
        }
        if let Some(v) = self.volatility {
            if !(v > 0.0 && v < 1.0) {
                return Err(format!("{}: volatility ({}) must be in (0, 1)", self.name, v));
            }
        }
        if !(0.0..=1.0).contains(&self.perish_rate) {
            return Err(format!("{}: perish_rate must be in [0, 1]", self.name));
        }
        if !(self.transport_factor > 0.0 && self.transport_factor <= 1.0) {
            return Err(format!("{}: transport_factor must be in (0, 1]", self.name));
        }
        if self.consumption_per_labor < 0.0 {
            return Err(format!("{}: consumption_per_labor must be >= 0", self.name));
        }
        if let Some(recipe) = &self.recipe {
            if !(recipe.output_amount > 0.0) || !(recipe.efficiency > 0.0) {
                return Err(format!(
                    "{}: recipe output and efficiency must be positive",
                    self.name
                ));
            }
            if recipe.inputs.iter().any(|input| !(input.amount > 0.0)) {
                return Err(format!("{}: recipe input amounts must be positive", self.name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smelt() -> Recipe {
        Recipe {
            inputs: vec![RecipeInput {
                resource: ResourceId(0),
                amount: 3.0,
                consumed: true,
            }],
            output_amount: 2.0,
            requirement: Some(InfrastructureRequirement {
                kind: "forge".into(),
                min_level: 2,
            }),
            efficiency: 1.5,
        }
    }

    #[test]
    fn test_recipe_effective_output() {
        assert!((smelt().effective_output() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_infrastructure_requirement() {
        let recipe = smelt();
        assert!(recipe.infrastructure_allows("forge", 2));
        assert!(recipe.infrastructure_allows("forge", 5));
        assert!(!recipe.infrastructure_allows("forge", 1));
        assert!(!recipe.infrastructure_allows("farm", 9));
    }

    #[test]
    fn test_recipe_without_requirement_always_allowed() {
        let mut recipe = smelt();
        recipe.requirement = None;
        assert!(recipe.infrastructure_allows("anything", 1));
    }

    #[test]
    fn test_spec_validation() {
        assert!(ResourceSpec::raw("Food", 10.0).validate().is_ok());
        assert!(ResourceSpec::raw("Food", 0.0).validate().is_err());
        assert!(ResourceSpec::raw("Food", 1.0).with_volatility(1.5).validate().is_err());
        assert!(ResourceSpec::raw("Food", 1.0).with_perish_rate(-0.1).validate().is_err());
        assert!(ResourceSpec::raw(" ", 1.0).validate().is_err());
    }

    #[test]
    fn test_base_value_below_price_floor_rejected() {
        assert!(ResourceSpec::raw("Dust", 0.005).validate().is_err());
        assert!(ResourceSpec::raw("Dust", f64::INFINITY).validate().is_err());
        assert!(ResourceSpec::raw("Dust", f64::NAN).validate().is_err());
        assert!(ResourceSpec::raw("Dust", MIN_PRICE).validate().is_ok());
    }

    #[test]
    fn test_recipe_spec_defaults_from_toml() {
        let spec: ResourceSpec = toml::from_str(
            r#"
            name = "Tools"
            category = "processed"
            base_value = 20.0

            [recipe]
            output_amount = 2.0
            inputs = [
                { resource = "Iron", amount = 3.0 },
                { resource = "Anvil", amount = 1.0, consumed = false },
            ]
            infrastructure = { kind = "forge", min_level = 2 }
            "#,
        )
        .unwrap();

        let recipe = spec.recipe.unwrap();
        assert!((recipe.efficiency - 1.0).abs() < 1e-9);
        assert!(recipe.inputs[0].consumed);
        assert!(!recipe.inputs[1].consumed);
        assert!((spec.transport_factor - 1.0).abs() < 1e-9);
        assert_eq!(spec.volatility, None);
    }
}
