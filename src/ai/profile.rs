//! Strategy profile: archetype classification output plus the live
//! aggression/risk dials that bias every evaluator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse strategic classification of a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Aggro,
    Control,
    Midrange,
    Combo,
    Tempo,
    Ramp,
    Tribal,
}

impl Archetype {
    /// Baseline (aggression, risk tolerance) installed on classification
    pub fn baseline(&self) -> (f64, f64) {
        match self {
            Archetype::Aggro => (0.8, 0.7),
            Archetype::Control => (0.3, 0.3),
            Archetype::Midrange => (0.5, 0.5),
            Archetype::Combo => (0.4, 0.6),
            Archetype::Tempo => (0.65, 0.5),
            Archetype::Ramp => (0.4, 0.4),
            Archetype::Tribal => (0.6, 0.5),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Aggro => "aggro",
            Archetype::Control => "control",
            Archetype::Midrange => "midrange",
            Archetype::Combo => "combo",
            Archetype::Tempo => "tempo",
            Archetype::Ramp => "ramp",
            Archetype::Tribal => "tribal",
        };
        write!(f, "{}", name)
    }
}

/// Coarse game progress, derived from the turn number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStage {
    Early,
    Mid,
    Late,
}

impl GameStage {
    pub fn from_turn(turn: u32) -> Self {
        if turn <= 3 {
            GameStage::Early
        } else if turn <= 8 {
            GameStage::Mid
        } else {
            GameStage::Late
        }
    }
}

/// The live strategy dials. Mutated only by the StrategyAdapter between
/// decisions, never mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyProfile {
    pub archetype: Archetype,
    /// 0 = fully defensive, 1 = all-in
    pub aggression: f64,
    /// 0 = risk-averse, 1 = gambles freely
    pub risk_tolerance: f64,
}

impl StrategyProfile {
    pub fn new(archetype: Archetype) -> Self {
        let (aggression, risk_tolerance) = archetype.baseline();
        StrategyProfile {
            archetype,
            aggression,
            risk_tolerance,
        }
    }

    /// Clamp both dials into the safe operating range
    pub fn clamp(&mut self) {
        self.aggression = self.aggression.clamp(0.1, 0.9);
        self.risk_tolerance = self.risk_tolerance.clamp(0.1, 0.9);
    }
}

impl Default for StrategyProfile {
    fn default() -> Self {
        StrategyProfile::new(Archetype::Midrange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baselines_in_range() {
        for archetype in [
            Archetype::Aggro,
            Archetype::Control,
            Archetype::Midrange,
            Archetype::Combo,
            Archetype::Tempo,
            Archetype::Ramp,
            Archetype::Tribal,
        ] {
            let (aggression, risk) = archetype.baseline();
            assert!((0.1..=0.9).contains(&aggression), "{archetype} aggression");
            assert!((0.1..=0.9).contains(&risk), "{archetype} risk");
        }
    }

    #[test]
    fn test_stage_boundaries() {
        assert_eq!(GameStage::from_turn(1), GameStage::Early);
        assert_eq!(GameStage::from_turn(3), GameStage::Early);
        assert_eq!(GameStage::from_turn(4), GameStage::Mid);
        assert_eq!(GameStage::from_turn(8), GameStage::Mid);
        assert_eq!(GameStage::from_turn(9), GameStage::Late);
        assert_eq!(GameStage::from_turn(20), GameStage::Late);
    }

    #[test]
    fn test_clamp() {
        let mut profile = StrategyProfile::default();
        profile.aggression = 1.7;
        profile.risk_tolerance = -0.2;
        profile.clamp();
        assert_eq!(profile.aggression, 0.9);
        assert_eq!(profile.risk_tolerance, 0.1);
    }
}
