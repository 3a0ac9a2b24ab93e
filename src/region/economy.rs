//! Region economy - wealth aggregation, maintenance and infrastructure
//!
//! The wealth change for a turn is built up from separate terms and applied
//! in one step, so a region is never observed half-updated.

use serde::{Deserialize, Serialize};

use crate::core::config::EconomyConfig;
use crate::core::error::{EconomyError, Result};
use crate::core::types::round_to_i64;
use crate::region::population::UNREST_THRESHOLD;
use crate::region::state::Region;

/// Terms of one turn's wealth change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthBreakdown {
    pub production_income: i64,
    /// Rounded sum of (production rate - consumption rate)
    pub resource_balance: i64,
    pub satisfaction_penalty: i64,
    pub investment: i64,
    pub maintenance: i64,
    pub total: i64,
}

/// Per-turn upkeep of the region's infrastructure
pub fn maintenance_cost(config: &EconomyConfig, infrastructure_level: u32) -> i64 {
    config
        .maintenance_per_level
        .saturating_mul(infrastructure_level as i64)
}

/// Price of raising infrastructure by one level
pub fn upgrade_cost(config: &EconomyConfig, infrastructure_level: u32) -> i64 {
    config
        .upgrade_cost_per_level
        .saturating_mul(infrastructure_level as i64)
}

/// Wealth lost to unrest
pub fn satisfaction_penalty(config: &EconomyConfig, satisfaction: f64) -> i64 {
    if satisfaction < UNREST_THRESHOLD {
        round_to_i64((UNREST_THRESHOLD - satisfaction) * config.satisfaction_penalty_factor)
    } else {
        0
    }
}

/// Compute, without applying, this turn's wealth change
pub fn compute_wealth_change(region: &Region, config: &EconomyConfig) -> WealthBreakdown {
    let production_income = region.production.saturating_mul(config.wealth_multiplier);
    let resource_balance = round_to_i64(region.ledger.net_balance());
    let satisfaction_penalty = satisfaction_penalty(config, region.satisfaction);
    let investment = region.turn.investment_bonus;
    let maintenance = maintenance_cost(config, region.infrastructure_level);

    let total = production_income
        .saturating_add(resource_balance)
        .saturating_sub(satisfaction_penalty)
        .saturating_add(investment)
        .saturating_sub(maintenance);

    WealthBreakdown {
        production_income,
        resource_balance,
        satisfaction_penalty,
        investment,
        maintenance,
        total,
    }
}

/// Apply this turn's wealth change in one step
pub fn apply_region_economy(region: &mut Region, config: &EconomyConfig) -> WealthBreakdown {
    let breakdown = compute_wealth_change(region, config);
    let before = region.wealth;
    region.wealth = before.saturating_add(breakdown.total).max(config.wealth_floor);
    region.turn.economic_wealth_delta = region.wealth - before;
    breakdown
}

/// Scale the turn's economic growth and production by the cycle multiplier
///
/// Trade income is not scaled; only the delta recorded by
/// [`apply_region_economy`] is. Published production is derived from the
/// unscaled base, which is left untouched.
pub fn apply_cycle_multiplier(region: &mut Region, multiplier: f64, config: &EconomyConfig) {
    let adjustment = round_to_i64(region.turn.economic_wealth_delta as f64 * (multiplier - 1.0));
    region.wealth = region.wealth.saturating_add(adjustment).max(config.wealth_floor);
    region.production = round_to_i64(region.base_production as f64 * multiplier).max(0);
}

/// Spend wealth to raise infrastructure by one level
///
/// Returns the new level. A region that cannot afford the upgrade is left
/// untouched.
pub fn upgrade_infrastructure(region: &mut Region, config: &EconomyConfig) -> Result<u32> {
    let cost = upgrade_cost(config, region.infrastructure_level);
    if region.wealth < cost {
        return Err(EconomyError::InsufficientWealth {
            region: region.name.clone(),
            cost,
            wealth: region.wealth,
        });
    }
    region.wealth -= cost;
    region.infrastructure_level = region.infrastructure_level.saturating_add(1);
    tracing::info!(
        "{} upgraded infrastructure to level {} for {}",
        region.name,
        region.infrastructure_level,
        cost
    );
    Ok(region.infrastructure_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RegionId, ResourceId};
    use crate::region::state::RegionSpec;
    use crate::resources::{ResourceRegistry, ResourceSpec};

    fn region(wealth: i64, production: i64) -> Region {
        let registry = ResourceRegistry::new(
            &[ResourceSpec::raw("Food", 10.0), ResourceSpec::raw("Iron", 20.0)],
            0.2,
        )
        .unwrap();
        let spec = RegionSpec::new("Avalon", "North").with_economy(wealth, production, 100);
        let mut region = Region::from_spec(RegionId(0), &spec, &registry).unwrap();
        region.begin_turn();
        region
    }

    #[test]
    fn test_basic_wealth_change() {
        let config = EconomyConfig::default();
        let mut r = region(100, 50);

        let breakdown = apply_region_economy(&mut r, &config);

        assert_eq!(breakdown.production_income, 100);
        assert_eq!(breakdown.maintenance, 1);
        assert_eq!(breakdown.total, 99);
        assert_eq!(r.wealth, 199);
        assert_eq!(r.turn.economic_wealth_delta, 99);
    }

    #[test]
    fn test_resource_balance_moves_wealth() {
        let config = EconomyConfig::default();
        let mut r = region(100, 0);
        r.ledger.set_rates(ResourceId(0), 12.4, 2.0);
        r.ledger.set_rates(ResourceId(1), 0.0, 30.0);

        let breakdown = compute_wealth_change(&r, &config);
        // 10.4 - 30 = -19.6
        assert_eq!(breakdown.resource_balance, -20);
    }

    #[test]
    fn test_satisfaction_penalty() {
        let config = EconomyConfig::default();
        assert_eq!(satisfaction_penalty(&config, 0.0), 10);
        assert_eq!(satisfaction_penalty(&config, 0.3), 4);
        assert_eq!(satisfaction_penalty(&config, 0.5), 0);
        assert_eq!(satisfaction_penalty(&config, 0.9), 0);
    }

    #[test]
    fn test_maintenance_linear_in_level() {
        let config = EconomyConfig {
            maintenance_per_level: 3,
            ..EconomyConfig::default()
        };
        assert_eq!(maintenance_cost(&config, 1), 3);
        assert_eq!(maintenance_cost(&config, 4), 12);
    }

    #[test]
    fn test_wealth_floor() {
        let config = EconomyConfig {
            wealth_floor: -50,
            maintenance_per_level: 1000,
            ..EconomyConfig::default()
        };
        let mut r = region(0, 0);
        apply_region_economy(&mut r, &config);
        assert_eq!(r.wealth, -50);
    }

    #[test]
    fn test_cycle_scales_economic_delta_and_production() {
        let config = EconomyConfig::default();
        let mut r = region(100, 50);
        apply_region_economy(&mut r, &config);

        // Trade income is not scaled
        r.wealth += 40;
        apply_cycle_multiplier(&mut r, 1.1, &config);

        // 99 * 0.1 = 9.9 -> 10
        assert_eq!(r.wealth, 100 + 99 + 40 + 10);
        assert_eq!(r.production, 55);
        assert_eq!(r.base_production, 50);
    }

    #[test]
    fn test_upgrade_infrastructure() {
        let config = EconomyConfig::default();
        let mut r = region(250, 0);

        assert_eq!(upgrade_infrastructure(&mut r, &config).unwrap(), 2);
        assert_eq!(r.wealth, 150);

        // Level 2 costs 200
        let err = upgrade_infrastructure(&mut r, &config).unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientWealth { cost: 200, .. }));
        assert_eq!(r.infrastructure_level, 2);
        assert_eq!(r.wealth, 150);
    }
}
