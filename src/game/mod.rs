//! Game world model and the seams to the external rules engine

pub mod actions;
pub mod combat;
pub mod logger;
pub mod phase;
pub mod rules;
pub mod snapshot;
pub mod zones;

pub use actions::Action;
pub use combat::CombatState;
pub use logger::{DecisionLogger, LogEntry, VerbosityLevel};
pub use phase::{Phase, Step, TurnStructure};
pub use rules::{AbilityOracle, AbilityText, CombatOutcome, CombatResolver, GameOutcome, RulesEngine};
pub use snapshot::StateSnapshot;
pub use zones::{CardZone, PlayerZones, Zone};
