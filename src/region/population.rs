//! Population system - satisfaction, consumption and labor
//!
//! Satisfaction is the average coverage of essential needs. It feeds back
//! into labor (shrinking below 0.5, growing above 0.8) and, when high, into a
//! small capital investment credited to the region's wealth this turn.

use crate::core::config::EconomyConfig;
use crate::core::types::round_to_i64;
use crate::region::state::Region;
use crate::resources::ResourceRegistry;

/// Below this satisfaction labor declines and wealth is penalised
pub const UNREST_THRESHOLD: f64 = 0.5;

/// Above this satisfaction labor grows and capital is reinvested
pub const PROSPERITY_THRESHOLD: f64 = 0.8;

/// Labor movement for one turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaborChange {
    pub delta: i64,
    pub investment: i64,
}

/// Recompute satisfaction from essential needs
///
/// Returns `None` and leaves satisfaction unchanged when the registry defines
/// no essential resources.
pub fn update_satisfaction(region: &mut Region, registry: &ResourceRegistry) -> Option<f64> {
    let mut total = 0.0;
    let mut count = 0usize;

    for (id, def) in registry.essentials() {
        let required = def.consumption_per_labor * region.labor as f64;
        let coverage = if required <= 0.0 {
            1.0
        } else {
            (region.ledger.quantity(id) / required).min(1.0)
        };
        total += coverage;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    region.satisfaction = (total / count as f64).clamp(0.0, 1.0);
    Some(region.satisfaction)
}

/// Remove this turn's population needs from the ledger
///
/// Returns the total unmet amount across all resources.
pub fn consume_needs(region: &mut Region, registry: &ResourceRegistry) -> f64 {
    let mut unmet = 0.0;
    for (id, def) in registry.iter() {
        let required = def.consumption_per_labor * region.labor as f64;
        if required <= 0.0 {
            continue;
        }
        let taken = region.ledger.remove_resource(id, required);
        unmet += required - taken.amount();
    }
    unmet
}

/// Grow or shrink labor from the current satisfaction
pub fn update_labor(region: &mut Region, config: &EconomyConfig) -> LaborChange {
    let s = region.satisfaction;
    let labor = region.labor as f64;

    if s < UNREST_THRESHOLD {
        let decline = round_to_i64(labor * (UNREST_THRESHOLD - s) * config.labor_decline_rate);
        let decline = u32::try_from(decline.max(0)).unwrap_or(u32::MAX);
        region.labor = region.labor.saturating_sub(decline);
        LaborChange {
            delta: -(decline as i64),
            investment: 0,
        }
    } else if s > PROSPERITY_THRESHOLD {
        let surplus = s - PROSPERITY_THRESHOLD;
        let growth = round_to_i64(labor * surplus * config.labor_growth_rate);
        let growth = u32::try_from(growth.max(0)).unwrap_or(u32::MAX);
        region.labor = region.labor.saturating_add(growth);

        let investment = round_to_i64(surplus * config.investment_bonus);
        region.turn.investment_bonus += investment;
        LaborChange {
            delta: growth as i64,
            investment,
        }
    } else {
        LaborChange::default()
    }
}

/// Run the whole population phase for one region
pub fn process_population(
    region: &mut Region,
    registry: &ResourceRegistry,
    config: &EconomyConfig,
) -> LaborChange {
    update_satisfaction(region, registry);
    let unmet = consume_needs(region, registry);
    if unmet > 0.0 {
        tracing::debug!("{} is short {:.1} units of needs", region.name, unmet);
    }
    update_labor(region, config)
}
