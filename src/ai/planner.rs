//! Depth-bounded best-first planning over action sequences
//!
//! Expands only a pruned beam of candidates per level: the top scoring
//! actions, anything above the always-keep threshold, a mandatory land
//! drop, and a small random exploration sample sized by risk tolerance.
//! Each expansion clones the snapshot, applies the action through the
//! rules engine, and recurses one level shallower.

use crate::ai::SearchContext;
use crate::game::{Action, RulesEngine, StateSnapshot};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tuning knobs for the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Starting depth before board/branching reductions
    pub base_depth: u32,

    /// Weight of the discounted future value vs the immediate score
    pub discount: f64,

    /// Actions scoring at least this are never pruned
    pub keep_threshold: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            base_depth: 3,
            discount: 0.9,
            keep_threshold: 4.0,
        }
    }
}

/// Planner over cloned snapshots. Stateless between calls.
#[derive(Debug, Default, Clone)]
pub struct SequencePlanner {
    pub config: PlannerConfig,
}

impl SequencePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        SequencePlanner { config }
    }

    /// Depth shrinks on wide boards and wide action lists
    pub fn dynamic_depth(&self, state: &StateSnapshot, candidate_count: usize) -> u32 {
        let mut depth = self.config.base_depth as i32;
        if state.permanent_count() > 10 {
            depth -= 1;
        }
        if candidate_count > 15 {
            depth -= 1;
        }
        depth.max(1) as u32
    }

    /// Plan from `state` over `legal`. Returns the best action sequence
    /// and its combined value. Depth defaults dynamically when `None`.
    pub fn plan<R: RulesEngine>(
        &self,
        ctx: &SearchContext<'_, R>,
        state: &StateSnapshot,
        legal: &[Action],
        rng: &mut ChaCha12Rng,
        depth: Option<u32>,
    ) -> (Vec<Action>, f64) {
        let depth = depth.unwrap_or_else(|| self.dynamic_depth(state, legal.len()));
        self.plan_inner(ctx, state, legal, depth, rng)
    }

    fn plan_inner<R: RulesEngine>(
        &self,
        ctx: &SearchContext<'_, R>,
        state: &StateSnapshot,
        legal: &[Action],
        depth: u32,
        rng: &mut ChaCha12Rng,
    ) -> (Vec<Action>, f64) {
        if depth == 0 || legal.is_empty() {
            return (Vec::new(), ctx.position.evaluate(state, ctx.perspective, ctx.profile));
        }

        let keep = self.select_candidates(ctx, state, legal, depth, rng);

        let mut best_sequence = Vec::new();
        let mut best_value = f64::NEG_INFINITY;

        for (index, score) in keep {
            let action = &legal[index];

            let mut next = state.clone();
            ctx.rules.apply_action(&mut next, action);
            let next_legal = ctx.rules.legal_actions(&next);

            let (future_sequence, future_value) = if next_legal.is_empty() {
                (Vec::new(), ctx.position.evaluate(&next, ctx.perspective, ctx.profile))
            } else {
                self.plan_inner(ctx, &next, &next_legal, depth - 1, rng)
            };

            // Immediate score lives on the 0-5 action scale, future value
            // on [-1, 1]; tanh folds the immediate part into the same range
            let immediate = (score - 1.0).tanh();
            let mut value = (1.0 - self.config.discount) * immediate + self.config.discount * future_value;
            value += self.strategy_bonus(ctx, action);

            if value > best_value {
                best_value = value;
                best_sequence = std::iter::once(action.clone()).chain(future_sequence).collect();
            }
        }

        if best_sequence.is_empty() {
            // Nothing survived pruning (can only happen on empty keeps)
            return (Vec::new(), ctx.position.evaluate(state, ctx.perspective, ctx.profile));
        }

        (best_sequence, best_value)
    }

    /// Quick-score all actions and build the pruned candidate set
    fn select_candidates<R: RulesEngine>(
        &self,
        ctx: &SearchContext<'_, R>,
        state: &StateSnapshot,
        legal: &[Action],
        depth: u32,
        rng: &mut ChaCha12Rng,
    ) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = legal
            .iter()
            .enumerate()
            .map(|(i, action)| (i, ctx.actions.evaluate(state, action, ctx.perspective, ctx.profile)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        let window = (8i32 - 2 * depth as i32).max(3) as usize;
        let mut keep: Vec<(usize, f64)> = Vec::new();
        let mut kept = vec![false; legal.len()];

        for &(index, score) in scored.iter() {
            let in_window = keep.len() < window;
            // Never prune an obviously great play
            let must_keep = score >= self.config.keep_threshold;
            if in_window || must_keep {
                keep.push((index, score));
                kept[index] = true;
            }
        }

        // The land drop is effectively mandatory while unused
        let land_unused = state
            .player(ctx.perspective)
            .map(|p| p.can_play_land())
            .unwrap_or(false);
        if land_unused {
            if let Some(&(index, score)) = scored.iter().find(|&&(index, _)| {
                !kept[index]
                    && matches!(&legal[index], Action::PlayCard { card_id }
                        if state.card(*card_id).map(|c| c.is_land()).unwrap_or(false))
            }) {
                keep.push((index, score));
                kept[index] = true;
            }
        }

        // Exploration sample for line diversity, sized by risk appetite
        let extras = (ctx.profile.risk_tolerance * 2.0).round() as usize;
        if extras > 0 {
            let mut remaining: Vec<(usize, f64)> = scored.iter().copied().filter(|&(index, _)| !kept[index]).collect();
            remaining.shuffle(rng);
            for &(index, score) in remaining.iter().take(extras) {
                keep.push((index, score));
                kept[index] = true;
            }
        }

        keep
    }

    /// Archetype bias: aggro pushes board-impacting lines, control pushes
    /// card advantage and removal
    fn strategy_bonus<R: RulesEngine>(&self, ctx: &SearchContext<'_, R>, action: &Action) -> f64 {
        use crate::ai::profile::Archetype;

        let board_impacting = matches!(action, Action::DeclareAttackers { .. } | Action::PlayCard { .. });
        let control_shaped = matches!(action, Action::DeclareBlockers { .. } | Action::ActivateAbility { .. });

        match ctx.profile.archetype {
            Archetype::Aggro | Archetype::Tempo if board_impacting => ctx.profile.aggression * 0.05,
            Archetype::Control if control_shaped => (1.0 - ctx.profile.aggression) * 0.05,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ActionEvaluator, PositionEvaluator, SearchContext, StrategyProfile};
    use crate::core::PlayerId;
    use crate::game::{DecisionLogger, GameOutcome};
    use rand::SeedableRng;

    /// Rules stub: every action ends the game in a fixed number of steps
    struct CountdownRules {
        steps: u32,
    }

    impl RulesEngine for CountdownRules {
        fn legal_actions(&self, state: &StateSnapshot) -> Vec<Action> {
            if state.turn.turn_number > self.steps {
                return Vec::new();
            }
            vec![Action::EndTurn, Action::PassPriority]
        }

        fn apply_action(&self, state: &mut StateSnapshot, _action: &Action) {
            state.turn.turn_number += 1;
        }

        fn is_terminal(&self, state: &StateSnapshot) -> Option<GameOutcome> {
            (state.turn.turn_number > self.steps).then_some(GameOutcome::Draw)
        }
    }

    fn make_ctx<'a>(
        rules: &'a CountdownRules,
        perspective: PlayerId,
        profile: &'a StrategyProfile,
        position: &'a PositionEvaluator,
        actions: &'a ActionEvaluator,
        logger: &'a DecisionLogger,
    ) -> SearchContext<'a, CountdownRules> {
        SearchContext {
            rules,
            perspective,
            profile,
            position,
            actions,
            logger,
        }
    }

    #[test]
    fn test_depth_zero_returns_position_value() {
        let state = StateSnapshot::new_two_player("A", "B", 20);
        let perspective = state.players[0].id;
        let rules = CountdownRules { steps: 3 };
        let profile = StrategyProfile::default();
        let position = PositionEvaluator::new();
        let actions = ActionEvaluator::new();
        let logger = DecisionLogger::new();
        let ctx = make_ctx(&rules, perspective, &profile, &position, &actions, &logger);

        let planner = SequencePlanner::new();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let legal = rules.legal_actions(&state);

        let (sequence, value) = planner.plan(&ctx, &state, &legal, &mut rng, Some(0));
        assert!(sequence.is_empty());
        assert_eq!(value, position.evaluate(&state, perspective, &profile));
    }

    #[test]
    fn test_dynamic_depth_shrinks() {
        let planner = SequencePlanner::new();
        let mut state = StateSnapshot::new_two_player("A", "B", 20);

        assert_eq!(planner.dynamic_depth(&state, 4), 3);
        assert_eq!(planner.dynamic_depth(&state, 16), 2);

        // Crowd the board past ten permanents
        let p1 = state.players[0].id;
        for _ in 0..11 {
            let mut card = crate::core::Card::new(crate::core::CardId::new(0), "Forest", p1);
            card.types.push(crate::core::CardType::Land);
            let id = state.add_card(card);
            state.battlefield.add(id);
        }
        assert_eq!(planner.dynamic_depth(&state, 4), 2);
        assert_eq!(planner.dynamic_depth(&state, 16), 1);
        // Floor is 1 even for a five-reduction nightmare
        assert!(planner.dynamic_depth(&state, 100) >= 1);
    }

    #[test]
    fn test_plan_returns_sequence() {
        let state = StateSnapshot::new_two_player("A", "B", 20);
        let perspective = state.players[0].id;
        let rules = CountdownRules { steps: 5 };
        let profile = StrategyProfile::default();
        let position = PositionEvaluator::new();
        let actions = ActionEvaluator::new();
        let logger = DecisionLogger::new();
        let ctx = make_ctx(&rules, perspective, &profile, &position, &actions, &logger);

        let planner = SequencePlanner::new();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let legal = rules.legal_actions(&state);

        let (sequence, value) = planner.plan(&ctx, &state, &legal, &mut rng, None);
        assert!(!sequence.is_empty());
        assert!(value.is_finite());
    }

    #[test]
    fn test_plan_deterministic_with_seed() {
        let state = StateSnapshot::new_two_player("A", "B", 20);
        let perspective = state.players[0].id;
        let rules = CountdownRules { steps: 5 };
        let profile = StrategyProfile::default();
        let position = PositionEvaluator::new();
        let actions = ActionEvaluator::new();
        let logger = DecisionLogger::new();
        let ctx = make_ctx(&rules, perspective, &profile, &position, &actions, &logger);

        let planner = SequencePlanner::new();
        let legal = rules.legal_actions(&state);

        let mut rng1 = ChaCha12Rng::seed_from_u64(99);
        let mut rng2 = ChaCha12Rng::seed_from_u64(99);
        let run1 = planner.plan(&ctx, &state, &legal, &mut rng1, None);
        let run2 = planner.plan(&ctx, &state, &legal, &mut rng2, None);

        assert_eq!(run1.0, run2.0);
        assert_eq!(run1.1, run2.1);
    }
}
