//! Economy configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. A scenario file may override any
//! subset of them; missing fields fall back to [`Default`].

use serde::{Deserialize, Serialize};

/// Which formula is authoritative for a region's production value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionModel {
    /// Production carries over between turns and drifts by the random fluctuation
    #[default]
    Fluctuating,
    /// Production is recomputed every turn from labor and infrastructure
    CobbDouglas,
}

/// Economic cycle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    pub recovery_multiplier: f64,
    pub expansion_multiplier: f64,
    pub peak_multiplier: f64,
    pub contraction_multiplier: f64,
    /// Turns spent in each phase before moving on. Zero pins the cycle.
    pub turns_per_phase: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            recovery_multiplier: 1.0,
            expansion_multiplier: 1.1,
            peak_multiplier: 1.0,
            contraction_multiplier: 0.9,
            turns_per_phase: 12,
        }
    }
}

/// Configuration for the economy systems
///
/// These values have been tuned to keep wealth and prices moving without
/// runaway growth. Changing them will affect pacing of the whole economy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // === PRODUCTION ===
    /// Total factor productivity in the Cobb-Douglas formula
    pub productivity_factor: f64,

    /// Exponent applied to labor, in (0, 1]
    pub labor_elasticity: f64,

    /// Exponent applied to infrastructure level, in (0, 1]
    pub capital_elasticity: f64,

    pub production_model: ProductionModel,

    /// Bound of the per-turn integer fluctuation applied to production
    pub production_fluctuation: i64,

    /// When enabled, abundant recipe inputs raise recipe output slightly
    pub input_quality_enabled: bool,

    // === REGION ECONOMY ===
    /// Wealth generated per unit of production
    pub wealth_multiplier: i64,

    /// Wealth lost per point of satisfaction below 0.5
    ///
    /// At 20, a region at satisfaction 0.0 loses 10 wealth per turn.
    pub satisfaction_penalty_factor: f64,

    /// Fraction of labor lost per point of satisfaction shortfall below 0.5
    pub labor_decline_rate: f64,

    /// Fraction of labor gained per point of satisfaction surplus above 0.8
    pub labor_growth_rate: f64,

    /// Wealth reinvested per point of satisfaction surplus above 0.8
    pub investment_bonus: f64,

    /// Wealth paid every turn per infrastructure level
    pub maintenance_per_level: i64,

    /// Wealth cost of an upgrade, multiplied by the current level
    pub upgrade_cost_per_level: i64,

    /// Wealth never drops below this value
    pub wealth_floor: i64,

    // === MARKET ===
    /// Exponent applied to the demand/supply ratio, in (0, 0.5]
    pub demand_elasticity: f64,

    /// Default per-turn volatility cap for resources that do not set one
    pub price_volatility: f64,

    /// Bound of the multiplicative random jitter applied to target prices
    pub price_jitter: f64,

    /// Maximum number of entries kept in each price history
    pub price_history_len: usize,

    // === TRADE ===
    /// Maximum partner distance as reported by the trade network
    pub trade_radius: u32,

    /// Partners a region may trade with in a single turn
    pub max_trading_partners: usize,

    /// Fraction of shipped goods that arrive, in (0, 1]
    pub trade_efficiency: f64,

    /// Shipments below this amount are not executed
    pub min_trade_volume: f64,

    /// Upper bound for a single shipment of one resource
    pub max_trade_volume: f64,

    /// Share of the received value credited to the exporter
    pub exporter_margin: f64,

    /// Share of the received value credited to the importer
    pub importer_margin: f64,

    // === CYCLE ===
    pub cycle: CycleConfig,

    // === DETERMINISM ===
    /// Seed for the simulation random stream
    pub seed: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            // Production (0.7 + 0.3 keeps constant returns to scale)
            productivity_factor: 1.0,
            labor_elasticity: 0.7,
            capital_elasticity: 0.3,
            production_model: ProductionModel::Fluctuating,
            production_fluctuation: 2,
            input_quality_enabled: false,

            // Region economy
            wealth_multiplier: 2,
            satisfaction_penalty_factor: 20.0,
            labor_decline_rate: 0.1,
            labor_growth_rate: 0.05,
            investment_bonus: 25.0,
            maintenance_per_level: 1,
            upgrade_cost_per_level: 100,
            wealth_floor: -10_000,

            // Market
            demand_elasticity: 0.3,
            price_volatility: 0.2,
            price_jitter: 0.05,
            price_history_len: 20,

            // Trade
            trade_radius: 2,
            max_trading_partners: 3,
            trade_efficiency: 0.8,
            min_trade_volume: 1.0,
            max_trade_volume: 50.0,
            exporter_margin: 0.5,
            importer_margin: 0.25,

            cycle: CycleConfig::default(),

            seed: 12345,
        }
    }
}

impl EconomyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("labor_elasticity", self.labor_elasticity),
            ("capital_elasticity", self.capital_elasticity),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{} ({}) must be in (0, 1]", name, value));
            }
        }

        if !(self.demand_elasticity > 0.0 && self.demand_elasticity <= 0.5) {
            return Err(format!(
                "demand_elasticity ({}) must be in (0, 0.5]",
                self.demand_elasticity
            ));
        }

        // Volatility of 1.0 or more would allow a price to reach zero
        if !(self.price_volatility > 0.0 && self.price_volatility < 1.0) {
            return Err(format!(
                "price_volatility ({}) must be in (0, 1)",
                self.price_volatility
            ));
        }

        if !(0.0..1.0).contains(&self.price_jitter) {
            return Err(format!("price_jitter ({}) must be in [0, 1)", self.price_jitter));
        }

        if !(self.trade_efficiency > 0.0 && self.trade_efficiency <= 1.0) {
            return Err(format!(
                "trade_efficiency ({}) must be in (0, 1]",
                self.trade_efficiency
            ));
        }

        if self.exporter_margin < self.importer_margin {
            return Err(format!(
                "exporter_margin ({}) should be >= importer_margin ({})",
                self.exporter_margin, self.importer_margin
            ));
        }

        if self.min_trade_volume <= 0.0 || self.max_trade_volume < self.min_trade_volume {
            return Err(format!(
                "trade volumes must satisfy 0 < min ({}) <= max ({})",
                self.min_trade_volume, self.max_trade_volume
            ));
        }

        if self.productivity_factor <= 0.0 {
            return Err("productivity_factor must be positive".into());
        }

        if self.production_fluctuation < 0 || self.maintenance_per_level < 0 {
            return Err("production_fluctuation and maintenance_per_level must be >= 0".into());
        }

        if self.price_history_len == 0 {
            return Err("price_history_len must be at least 1".into());
        }

        let c = &self.cycle;
        if [
            c.recovery_multiplier,
            c.expansion_multiplier,
            c.peak_multiplier,
            c.contraction_multiplier,
        ]
        .iter()
        .any(|m| !(*m > 0.0))
        {
            return Err("cycle multipliers must be positive".into());
        }

        Ok(())
    }
}
