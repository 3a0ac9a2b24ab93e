//! Economic cycle - a slow global boom/bust multiplier

use serde::{Deserialize, Serialize};

use crate::core::config::CycleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EconomicPhase {
    Recovery,
    Expansion,
    Peak,
    Contraction,
}

impl EconomicPhase {
    pub fn next(self) -> Self {
        match self {
            EconomicPhase::Recovery => EconomicPhase::Expansion,
            EconomicPhase::Expansion => EconomicPhase::Peak,
            EconomicPhase::Peak => EconomicPhase::Contraction,
            EconomicPhase::Contraction => EconomicPhase::Recovery,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomicCycle {
    phase: EconomicPhase,
    turns_in_phase: u32,
    config: CycleConfig,
}

impl EconomicCycle {
    /// A new cycle starts at its peak
    pub fn new(config: CycleConfig) -> Self {
        Self {
            phase: EconomicPhase::Peak,
            turns_in_phase: 0,
            config,
        }
    }

    pub fn phase(&self) -> EconomicPhase {
        self.phase
    }

    pub fn multiplier(&self) -> f64 {
        match self.phase {
            EconomicPhase::Recovery => self.config.recovery_multiplier,
            EconomicPhase::Expansion => self.config.expansion_multiplier,
            EconomicPhase::Peak => self.config.peak_multiplier,
            EconomicPhase::Contraction => self.config.contraction_multiplier,
        }
    }

    /// Count one turn, moving to the next phase when this one is used up
    pub fn advance(&mut self) -> Option<EconomicPhase> {
        if self.config.turns_per_phase == 0 {
            return None;
        }
        self.turns_in_phase += 1;
        if self.turns_in_phase < self.config.turns_per_phase {
            return None;
        }
        self.turns_in_phase = 0;
        self.phase = self.phase.next();
        tracing::info!("Economy entered {:?} (x{:.2})", self.phase, self.multiplier());
        Some(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_wraps() {
        let mut phase = EconomicPhase::Recovery;
        for _ in 0..4 {
            phase = phase.next();
        }
        assert_eq!(phase, EconomicPhase::Recovery);
    }

    #[test]
    fn test_advance_every_n_turns() {
        let mut cycle = EconomicCycle::new(CycleConfig {
            turns_per_phase: 2,
            ..CycleConfig::default()
        });
        assert_eq!(cycle.phase(), EconomicPhase::Peak);
        assert!((cycle.multiplier() - 1.0).abs() < 1e-9);

        assert_eq!(cycle.advance(), None);
        assert_eq!(cycle.advance(), Some(EconomicPhase::Contraction));
        assert!((cycle.multiplier() - 0.9).abs() < 1e-9);

        cycle.advance();
        cycle.advance();
        cycle.advance();
        assert_eq!(cycle.advance(), Some(EconomicPhase::Expansion));
        assert!((cycle.multiplier() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_turns_pins_phase() {
        let mut cycle = EconomicCycle::new(CycleConfig {
            turns_per_phase: 0,
            ..CycleConfig::default()
        });
        for _ in 0..100 {
            assert_eq!(cycle.advance(), None);
        }
        assert_eq!(cycle.phase(), EconomicPhase::Peak);
    }
}
