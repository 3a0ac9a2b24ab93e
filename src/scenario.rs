//! Scenario loading - static economy data from TOML
//!
//! A scenario file has an optional `[settings]` table (any subset of
//! [`EconomyConfig`]), a `[[resources]]` array and a `[[regions]]` array.
//! Region `neighbors` become the hop-graph trade network.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::EconomyConfig;
use crate::core::error::Result;
use crate::region::RegionSpec;
use crate::resources::ResourceSpec;
use crate::simulation::Simulation;

/// Error type for scenario loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioLoadError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub settings: EconomyConfig,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
}

impl Scenario {
    pub fn load_from_toml(path: &Path) -> std::result::Result<Self, ScenarioLoadError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScenarioLoadError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> std::result::Result<Self, ScenarioLoadError> {
        toml::from_str(content).map_err(|e| ScenarioLoadError::Parse(e.to_string()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = seed;
        self
    }

    /// Validate and build a ready-to-run simulation
    pub fn build(&self) -> Result<Simulation> {
        Simulation::with_region_graph(&self.resources, &self.regions, self.settings.clone())
    }

    /// Load a file and build its simulation in one step
    pub fn load(path: &Path) -> Result<Simulation> {
        Self::load_from_toml(path)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EconomyError;

    const SMALL: &str = r#"
        [settings]
        seed = 7
        trade_radius = 1

        [[resources]]
        name = "Grain"
        category = "raw"
        base_value = 4.0
        essential = true
        consumption_per_labor = 0.2
        perish_rate = 0.05

        [[regions]]
        name = "Vale"
        nation = "Aldor"
        wealth = 100
        production = 20
        labor = 50
        baseline = { Grain = 15.0 }
        neighbors = ["Ridge"]

        [[regions]]
        name = "Ridge"
        nation = "Aldor"
        wealth = 80
        production = 10
        labor = 30
    "#;

    #[test]
    fn test_parse_small_scenario() {
        let scenario = Scenario::parse_toml(SMALL).unwrap();
        assert_eq!(scenario.settings.seed, 7);
        assert_eq!(scenario.settings.trade_radius, 1);
        assert_eq!(scenario.settings.max_trading_partners, 3);
        assert_eq!(scenario.resources.len(), 1);
        assert_eq!(scenario.regions[0].baseline["Grain"], 15.0);
        assert_eq!(scenario.regions[1].infrastructure_level, 1);
    }

    #[test]
    fn test_build_simulation() {
        let sim = Scenario::parse_toml(SMALL).unwrap().build().unwrap();
        let names: Vec<String> = sim.regions().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Ridge", "Vale"]);
    }

    #[test]
    fn test_parse_error() {
        let err = Scenario::parse_toml("[[regions]]\nname = 5").unwrap_err();
        assert!(matches!(err, ScenarioLoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Scenario::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, EconomyError::Scenario(ScenarioLoadError::Io(_))));
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let mut scenario = Scenario::parse_toml(SMALL).unwrap();
        scenario.regions[1].neighbors.push("Atlantis".into());
        assert!(matches!(scenario.build(), Err(EconomyError::UnknownRegion(_))));
    }
}
