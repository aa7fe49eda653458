//! Decision engine: the single entry point the turn-loop driver calls
//!
//! `recommend_action` classifies how high-stakes the decision is, runs
//! MCTS for critical ones and the sequence planner otherwise, and walks
//! an explicit fallback chain when a search fails: planner, then
//! single-step ranking, then the first turn-ending action, then the
//! first legal action. Only an empty legal set yields `None`.

use crate::ai::action_eval::ActionEvaluator;
use crate::ai::mcts::{MctsConfig, MctsEngine};
use crate::ai::planner::{PlannerConfig, SequencePlanner};
use crate::ai::position::PositionEvaluator;
use crate::ai::profile::{GameStage, StrategyProfile};
use crate::ai::strategy::StrategyAdapter;
use crate::ai::threat::ThreatAssessment;
use crate::ai::SearchContext;
use crate::core::{CardId, PlayerId};
use crate::error::{DecisionError, Result};
use crate::game::{AbilityOracle, Action, CombatResolver, DecisionLogger, RulesEngine, StateSnapshot};
use serde::{Deserialize, Serialize};

/// Engine-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RNG seed: fixes exploration sampling and rollouts for replay
    pub seed: u64,
    pub planner: PlannerConfig,
    pub mcts: MctsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            seed: 42,
            planner: PlannerConfig::default(),
            mcts: MctsConfig::default(),
        }
    }
}

/// Diagnostic bundle describing the engine's view of a state
#[derive(Debug, Clone)]
pub struct StrategicAnalysis {
    pub position_score: f64,
    pub stage: GameStage,
    pub profile: StrategyProfile,
    pub threat: ThreatAssessment,
    pub critical: bool,
}

/// The decision-making core. Owns the rules-engine handle and all search
/// machinery; the driver owns the mutable game state.
pub struct DecisionEngine<R: RulesEngine> {
    rules: R,
    perspective: PlayerId,
    profile: StrategyProfile,
    adapter: StrategyAdapter,
    position: PositionEvaluator,
    evaluator: ActionEvaluator,
    planner: SequencePlanner,
    mcts: MctsEngine,
    logger: DecisionLogger,
    rng: rand_chacha::ChaCha12Rng,
}

impl<R: RulesEngine> DecisionEngine<R> {
    pub fn new(rules: R, perspective: PlayerId) -> Self {
        Self::with_config(rules, perspective, EngineConfig::default())
    }

    pub fn with_config(rules: R, perspective: PlayerId, config: EngineConfig) -> Self {
        use rand::SeedableRng;
        DecisionEngine {
            rules,
            perspective,
            profile: StrategyProfile::default(),
            adapter: StrategyAdapter::new(),
            position: PositionEvaluator::new(),
            evaluator: ActionEvaluator::new(),
            planner: SequencePlanner::with_config(config.planner),
            mcts: MctsEngine::with_config(config.mcts),
            logger: DecisionLogger::new(),
            rng: rand_chacha::ChaCha12Rng::seed_from_u64(config.seed),
        }
    }

    pub fn set_combat_resolver(&mut self, resolver: Box<dyn CombatResolver>) {
        self.evaluator.set_combat_resolver(resolver);
    }

    pub fn set_ability_oracle(&mut self, oracle: Box<dyn AbilityOracle>) {
        self.evaluator.set_ability_oracle(oracle);
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    pub fn logger(&self) -> &DecisionLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut DecisionLogger {
        &mut self.logger
    }

    pub fn mcts(&self) -> &MctsEngine {
        &self.mcts
    }

    /// Pick the best action, or `None` when there is nothing legal to do
    /// (the driver handles stuck states).
    pub fn recommend_action(&mut self, state: &StateSnapshot, legal: &[Action]) -> Option<Action> {
        if legal.is_empty() {
            self.logger.fallback("no legal actions; deferring to driver");
            return None;
        }

        // Refresh strategy before searching; never mid-search
        self.adapter
            .maybe_reclassify(state, self.perspective, &mut self.profile, &self.logger);
        let position_score = self.position.evaluate(state, self.perspective, &self.profile);
        let opponent_archetype = self.adapter.estimate_opponent(state, self.perspective);
        self.adapter
            .adapt(state, self.perspective, opponent_archetype, &mut self.profile, position_score);

        // A winning line on the table outranks any search
        if let Some(action) = self.find_lethal(state, legal) {
            self.logger.decision(&format!("taking lethal {} action", action.kind()));
            return Some(action);
        }

        let critical = self.is_critical(state, legal, position_score);
        let action = match self.decide(state, legal, critical) {
            Ok(action) => action,
            Err(err) => {
                self.logger.fallback(&format!(
                    "all searches failed in {:?} ({err}); using default action",
                    state.turn.current_phase()
                ));
                Self::default_action(legal)
            }
        };

        let card = action.card().map(|id| id.to_string()).unwrap_or_else(|| "-".into());
        self.logger.decision(&format!(
            "chose {} (card {card}, {:?}, critical: {critical})",
            action.kind(),
            state.turn.current_step
        ));
        Some(action)
    }

    /// MCTS on critical decisions, planner otherwise, ranking as the
    /// common backstop. Fallback order is explicit here, not hidden in
    /// error handling.
    fn decide(&mut self, state: &StateSnapshot, legal: &[Action], critical: bool) -> Result<Action> {
        if critical {
            let ctx = SearchContext {
                rules: &self.rules,
                perspective: self.perspective,
                profile: &self.profile,
                position: &self.position,
                actions: &self.evaluator,
                logger: &self.logger,
            };
            match self.mcts.search(&ctx, state, legal, &mut self.rng) {
                Ok(action) => return Ok(action),
                Err(err) => self.logger.fallback(&format!("mcts failed ({err}); falling back to planner")),
            }
        }

        {
            let ctx = SearchContext {
                rules: &self.rules,
                perspective: self.perspective,
                profile: &self.profile,
                position: &self.position,
                actions: &self.evaluator,
                logger: &self.logger,
            };
            let (sequence, value) = self.planner.plan(&ctx, state, legal, &mut self.rng, None);
            match sequence.first() {
                Some(first) if value.is_finite() => return Ok(first.clone()),
                Some(_) => self.logger.fallback(&format!("planner value out of range ({value}); ranking instead")),
                None => self.logger.fallback("planner produced no sequence; ranking instead"),
            }
        }

        let ranked = self.evaluator.rank(state, legal, self.perspective, &self.profile);
        match ranked.first() {
            Some(&(index, _)) => Ok(legal[index].clone()),
            None => Err(DecisionError::EmptySearch("action ranking came back empty".to_string())),
        }
    }

    /// Last resort: prefer ending the turn over a random commitment
    fn default_action(legal: &[Action]) -> Action {
        legal
            .iter()
            .find(|action| action.is_turn_ending())
            .cloned()
            .unwrap_or_else(|| legal[0].clone())
    }

    /// Best game-ending action in the legal set, if any
    fn find_lethal(&self, state: &StateSnapshot, legal: &[Action]) -> Option<Action> {
        let mut best: Option<(&Action, f64)> = None;
        for action in legal {
            if self.evaluator.is_lethal(state, action, self.perspective) {
                let score = self.evaluator.evaluate(state, action, self.perspective, &self.profile);
                if best.map(|(_, s)| score > s).unwrap_or(true) {
                    best = Some((action, score));
                }
            }
        }
        best.map(|(action, _)| action.clone())
    }

    /// High-stakes decisions get the expensive search: any hard signal
    /// (low life, lethal in the air either way), or two soft ones
    /// (complex board, late game, combat declaration, wide action list,
    /// desperate position).
    fn is_critical(&self, state: &StateSnapshot, legal: &[Action], position_score: f64) -> bool {
        let threat = ThreatAssessment::analyze(state, self.perspective);

        if state.life_of(self.perspective) <= 5 {
            return true;
        }
        if threat.under_lethal_threat || threat.lethal_on_board {
            return true;
        }

        let mut soft = 0;
        if state.permanent_count() > 12 {
            soft += 1;
        }
        if state.turn.turn_number >= 9 {
            soft += 1;
        }
        if state.turn.current_step.is_combat_declaration() {
            soft += 1;
        }
        if legal.len() > 15 {
            soft += 1;
        }
        if position_score < -0.5 {
            soft += 1;
        }
        soft >= 2
    }

    /// Should this ability be activated now, and with what confidence?
    /// Unresolvable abilities default to a medium-confidence accept; the
    /// driver knows things about them that we cannot see.
    pub fn recommend_ability(&self, state: &StateSnapshot, card_id: CardId, ability_index: usize) -> (bool, f64) {
        if !self.evaluator.can_resolve_ability(state, card_id, ability_index) {
            return (true, 0.6);
        }

        let action = Action::ActivateAbility { card_id, ability_index };
        let score = self.evaluator.evaluate(state, &action, self.perspective, &self.profile);
        // Ability scores cap at 2.0 on the shared action scale
        let confidence = (score / 2.0).clamp(0.0, 1.0);
        (confidence >= 0.3, confidence)
    }

    /// Pick `count` cards to discard, keeping the most valuable hand
    pub fn choose_discards(&self, state: &StateSnapshot, count: usize) -> Vec<CardId> {
        let hand = state.hand(self.perspective);
        let lands_in_reach =
            state.lands_of(self.perspective).count() + hand.iter().filter_map(|&id| state.card(id)).filter(|c| c.is_land()).count();

        let mut scored: Vec<(CardId, f64)> = hand
            .iter()
            .map(|&id| {
                let keep_value = match state.card(id) {
                    None => 0.0,
                    // Excess lands go first; a land we still need does not
                    Some(card) if card.is_land() => {
                        if lands_in_reach > 5 {
                            0.3
                        } else {
                            1.5
                        }
                    }
                    Some(card) => crate::ai::action_eval::base_card_quality(card),
                };
                (id, keep_value)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.into_iter().take(count).map(|(id, _)| id).collect()
    }

    /// Diagnostic view of the current state, for the driver's benefit
    pub fn analyze(&mut self, state: &StateSnapshot) -> StrategicAnalysis {
        self.adapter
            .maybe_reclassify(state, self.perspective, &mut self.profile, &self.logger);
        let position_score = self.position.evaluate(state, self.perspective, &self.profile);

        StrategicAnalysis {
            position_score,
            stage: GameStage::from_turn(state.turn.turn_number),
            profile: self.profile,
            threat: ThreatAssessment::analyze(state, self.perspective),
            critical: self.is_critical(state, &[], position_score),
        }
    }
}
