//! Production engine - region output and recipe transformations
//!
//! Each turn this:
//! - Derives the region's abstract production value (Cobb-Douglas or carried
//!   over, per [`ProductionModel`]) and applies a bounded random fluctuation
//! - Fires every active recipe whose inputs and infrastructure are present:
//!   consumes inputs, adds output to the ledger
//!
//! A recipe that cannot fire is skipped for the turn. There is no partial
//! execution.

use rand::Rng;

use crate::core::config::{EconomyConfig, ProductionModel};
use crate::core::types::{round_to_i64, ResourceId};
use crate::region::state::Region;
use crate::resources::ResourceRegistry;

/// Largest output bonus from abundant recipe inputs
const MAX_QUALITY_BONUS: f64 = 0.25;

/// Bonus per multiple of the required input amount held
const QUALITY_STEP: f64 = 0.05;

/// Result of a single recipe firing
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeFiring {
    pub output: ResourceId,
    pub amount: f64,
}

/// `productivity × labor^α × infrastructure^β`, rounded
pub fn cobb_douglas(config: &EconomyConfig, labor: u32, infrastructure_level: u32) -> i64 {
    let output = config.productivity_factor
        * (labor as f64).powf(config.labor_elasticity)
        * (infrastructure_level as f64).powf(config.capital_elasticity);
    round_to_i64(output)
}

/// Draw the integer production fluctuation in `[-bound, bound]`
pub fn production_fluctuation<R: Rng>(rng: &mut R, bound: i64) -> i64 {
    rng.gen_range(-bound..=bound)
}

/// Recompute the region's production value for this turn
///
/// Always draws exactly one fluctuation so the random stream stays aligned
/// regardless of the production model.
pub fn update_production<R: Rng>(region: &mut Region, config: &EconomyConfig, rng: &mut R) -> i64 {
    let base = match config.production_model {
        ProductionModel::Fluctuating => region.base_production,
        ProductionModel::CobbDouglas => {
            cobb_douglas(config, region.labor, region.infrastructure_level)
        }
    };
    let delta = production_fluctuation(rng, config.production_fluctuation);
    region.base_production = base.saturating_add(delta).max(0);
    region.production = region.base_production;
    region.production
}

/// Output multiplier from how comfortably the inputs cover one firing
fn input_quality(region: &Region, inputs: &[(ResourceId, f64)]) -> f64 {
    let coverage = inputs
        .iter()
        .map(|(res, amount)| region.ledger.quantity(*res) / amount)
        .fold(f64::INFINITY, f64::min);
    if !coverage.is_finite() {
        return 1.0;
    }
    1.0 + (QUALITY_STEP * (coverage - 1.0)).clamp(0.0, MAX_QUALITY_BONUS)
}

/// Fire every active recipe the region can satisfy
///
/// Returns the firings for tracking/events.
pub fn run_recipes(
    region: &mut Region,
    registry: &ResourceRegistry,
    config: &EconomyConfig,
) -> Vec<RecipeFiring> {
    let mut firings = Vec::new();

    for output in region.active_recipes.clone() {
        let Some(recipe) = registry.get(output).and_then(|d| d.recipe.as_ref()) else {
            continue;
        };

        if !recipe.infrastructure_allows(&region.infrastructure_kind, region.infrastructure_level) {
            continue;
        }

        // Every input, consumed or not, must be on hand
        let requirements: Vec<(ResourceId, f64)> = recipe
            .inputs
            .iter()
            .map(|input| (input.resource, input.amount))
            .collect();
        if !region.ledger.has_materials(&requirements) {
            continue;
        }

        let quality = if config.input_quality_enabled {
            input_quality(region, &requirements)
        } else {
            1.0
        };

        for input in recipe.consumed_inputs() {
            region.ledger.remove_resource(input.resource, input.amount);
        }

        let amount = recipe.effective_output() * quality;
        region.ledger.add_resource(output, amount);

        tracing::debug!(
            "Recipe fired in {}: {:.2} {}",
            region.name,
            amount,
            registry.name(output)
        );

        firings.push(RecipeFiring { output, amount });
    }

    firings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RegionId;
    use crate::region::state::RegionSpec;
    use crate::resources::{InfrastructureRequirement, RecipeInputSpec, RecipeSpec, ResourceSpec};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ORE: ResourceId = ResourceId(0);
    const ANVIL: ResourceId = ResourceId(1);
    const IRON: ResourceId = ResourceId(2);

    fn registry() -> ResourceRegistry {
        ResourceRegistry::new(
            &[
                ResourceSpec::raw("Ore", 5.0),
                ResourceSpec::raw("Anvil", 50.0),
                ResourceSpec::raw("Iron", 20.0).with_recipe(RecipeSpec {
                    inputs: vec![
                        RecipeInputSpec {
                            resource: "Ore".into(),
                            amount: 3.0,
                            consumed: true,
                        },
                        RecipeInputSpec {
                            resource: "Anvil".into(),
                            amount: 1.0,
                            consumed: false,
                        },
                    ],
                    output_amount: 2.0,
                    infrastructure: Some(InfrastructureRequirement {
                        kind: "forge".into(),
                        min_level: 2,
                    }),
                    efficiency: 1.5,
                }),
            ],
            0.2,
        )
        .unwrap()
    }

    fn smithy(ore: f64, anvils: f64, level: u32) -> Region {
        let mut spec = RegionSpec::new("Smithy", "North")
            .with_economy(100, 50, 100)
            .with_stock("Ore", ore)
            .with_stock("Anvil", anvils);
        spec.infrastructure_kind = "forge".into();
        spec.infrastructure_level = level;
        spec.recipes.push("Iron".into());
        Region::from_spec(RegionId(0), &spec, &registry()).unwrap()
    }

    #[test]
    fn test_cobb_douglas() {
        let config = EconomyConfig::default();
        // 100^0.7 = 25.12
        assert_eq!(cobb_douglas(&config, 100, 1), 25);
        // 100^0.7 * 4^0.3 = 25.12 * 1.516 = 38.08
        assert_eq!(cobb_douglas(&config, 100, 4), 38);
        assert_eq!(cobb_douglas(&config, 0, 3), 0);
    }

    #[test]
    fn test_fluctuation_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let delta = production_fluctuation(&mut rng, 2);
            assert!((-2..=2).contains(&delta));
        }
    }

    #[test]
    fn test_update_production_models() {
        let mut config = EconomyConfig::default();
        config.production_fluctuation = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut region = smithy(0.0, 0.0, 1);
        assert_eq!(update_production(&mut region, &config, &mut rng), 50);

        config.production_model = ProductionModel::CobbDouglas;
        assert_eq!(update_production(&mut region, &config, &mut rng), 25);
    }

    #[test]
    fn test_production_never_negative() {
        let config = EconomyConfig {
            production_fluctuation: 5,
            ..EconomyConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut region = smithy(0.0, 0.0, 1);
        region.base_production = 0;

        for _ in 0..50 {
            assert!(update_production(&mut region, &config, &mut rng) >= 0);
        }
    }

    #[test]
    fn test_recipe_fires_and_keeps_catalyst() {
        let mut region = smithy(10.0, 1.0, 2);
        let firings = run_recipes(&mut region, &registry(), &EconomyConfig::default());

        assert_eq!(firings.len(), 1);
        assert!((region.ledger.quantity(ORE) - 7.0).abs() < 1e-9);
        assert!((region.ledger.quantity(ANVIL) - 1.0).abs() < 1e-9);
        assert!((region.ledger.quantity(IRON) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_recipe_skipped_without_inputs() {
        // Missing catalyst
        let mut region = smithy(10.0, 0.0, 2);
        assert!(run_recipes(&mut region, &registry(), &EconomyConfig::default()).is_empty());
        assert!((region.ledger.quantity(ORE) - 10.0).abs() < 1e-9);

        // Not enough ore
        let mut region = smithy(2.0, 1.0, 2);
        assert!(run_recipes(&mut region, &registry(), &EconomyConfig::default()).is_empty());
        assert!((region.ledger.quantity(ORE) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_recipe_skipped_without_infrastructure() {
        let mut region = smithy(10.0, 1.0, 1);
        assert!(run_recipes(&mut region, &registry(), &EconomyConfig::default()).is_empty());
        assert_eq!(region.ledger.quantity(IRON), 0.0);
    }

    #[test]
    fn test_input_quality_bonus() {
        let config = EconomyConfig {
            input_quality_enabled: true,
            ..EconomyConfig::default()
        };

        // Anvil coverage is 1x, so no bonus
        let mut region = smithy(30.0, 1.0, 2);
        let firings = run_recipes(&mut region, &registry(), &config);
        assert!((firings[0].amount - 3.0).abs() < 1e-9);

        // Coverage 3x on both inputs: 1 + 0.05 * 2 = 1.1
        let mut region = smithy(9.0, 3.0, 2);
        let firings = run_recipes(&mut region, &registry(), &config);
        assert!((firings[0].amount - 3.3).abs() < 1e-9);

        // Huge coverage caps at +25%
        let mut region = smithy(3000.0, 1000.0, 2);
        let firings = run_recipes(&mut region, &registry(), &config);
        assert!((firings[0].amount - 3.75).abs() < 1e-9);
    }
}
