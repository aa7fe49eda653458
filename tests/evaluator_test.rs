//! Evaluator contract tests: bounds, anti-symmetry, ordering, and
//! snapshot serialization

mod common;

use common::{basic_land, burn_spell, creature, into_hand, onto_battlefield};
use mtg_tactician::ai::{ActionEvaluator, Archetype, PositionEvaluator, SequencePlanner, StrategyProfile};
use mtg_tactician::ai::SearchContext;
use mtg_tactician::game::{Action, DecisionLogger, RulesEngine, StateSnapshot};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

fn lopsided_state() -> (StateSnapshot, mtg_tactician::core::PlayerId, mtg_tactician::core::PlayerId) {
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let them = state.players[1].id;
    state.turn.turn_number = 7;

    for _ in 0..4 {
        onto_battlefield(&mut state, us, basic_land("Forest", us));
    }
    onto_battlefield(&mut state, us, creature("Craw Wurm", "4GG", 6, 4, us));
    onto_battlefield(&mut state, us, creature("Grizzly Bears", "1G", 2, 2, us));
    onto_battlefield(&mut state, them, basic_land("Swamp", them));
    onto_battlefield(&mut state, them, creature("Scathe Zombies", "2B", 2, 2, them));
    state.player_mut(them).unwrap().life = 11;
    into_hand(&mut state, us, creature("Llanowar Elves", "G", 1, 1, us));

    (state, us, them)
}

#[test]
fn position_scores_stay_in_unit_interval() {
    let (state, us, them) = lopsided_state();
    let evaluator = PositionEvaluator::new();

    for archetype in [
        Archetype::Aggro,
        Archetype::Control,
        Archetype::Midrange,
        Archetype::Combo,
        Archetype::Tempo,
        Archetype::Ramp,
        Archetype::Tribal,
    ] {
        let profile = StrategyProfile::new(archetype);
        for perspective in [us, them] {
            let score = evaluator.evaluate(&state, perspective, &profile);
            assert!((-1.0..=1.0).contains(&score), "{archetype}: {score}");
        }
    }
}

#[test]
fn position_is_antisymmetric() {
    let (state, us, them) = lopsided_state();
    let evaluator = PositionEvaluator::new();
    let profile = StrategyProfile::default();

    let ours = evaluator.evaluate(&state, us, &profile);
    let theirs = evaluator.evaluate(&state, them, &profile);

    assert!(ours > 0.0, "the built state favors us: {ours}");
    assert!((ours + theirs).abs() < 1e-9, "{ours} vs {theirs}");
}

#[test]
fn evaluation_is_deterministic() {
    let (state, us, _) = lopsided_state();
    let position = PositionEvaluator::new();
    let actions = ActionEvaluator::new();
    let profile = StrategyProfile::default();

    let action = Action::PlayCard {
        card_id: state.hand(us)[0],
    };

    let p1 = position.evaluate(&state, us, &profile);
    let p2 = position.evaluate(&state, us, &profile);
    assert_eq!(p1, p2);

    let a1 = actions.evaluate(&state, &action, us, &profile);
    let a2 = actions.evaluate(&state, &action, us, &profile);
    assert_eq!(a1, a2);
}

#[test]
fn planner_depth_zero_equals_position_value() {
    let (state, us, _) = lopsided_state();
    let rules = common::MiniRules;
    let position = PositionEvaluator::new();
    let actions = ActionEvaluator::new();
    let profile = StrategyProfile::default();
    let logger = DecisionLogger::new();

    let ctx = SearchContext {
        rules: &rules,
        perspective: us,
        profile: &profile,
        position: &position,
        actions: &actions,
        logger: &logger,
    };

    let legal = rules.legal_actions(&state);
    let planner = SequencePlanner::new();
    let mut rng = ChaCha12Rng::seed_from_u64(3);

    let (sequence, value) = planner.plan(&ctx, &state, &legal, &mut rng, Some(0));
    assert!(sequence.is_empty());
    assert_eq!(value, position.evaluate(&state, us, &profile));
}

#[test]
fn land_play_outscores_spell_while_drop_unused() {
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    state.turn.turn_number = 2;
    onto_battlefield(&mut state, us, basic_land("Mountain", us));

    let land = into_hand(&mut state, us, basic_land("Mountain", us));
    let spell = into_hand(&mut state, us, burn_spell("Shock", "R", 2, us));

    let actions = ActionEvaluator::new();
    let profile = StrategyProfile::default();

    let land_score = actions.evaluate(&state, &Action::PlayCard { card_id: land }, us, &profile);
    let spell_score = actions.evaluate(&state, &Action::PlayCard { card_id: spell }, us, &profile);
    assert!(land_score > spell_score, "{land_score} vs {spell_score}");

    // Once the drop is used the ordering flips
    state.player_mut(us).unwrap().play_land();
    let land_score_after = actions.evaluate(&state, &Action::PlayCard { card_id: land }, us, &profile);
    assert!(land_score_after < spell_score, "{land_score_after} vs {spell_score}");
}

#[test]
fn snapshot_serde_round_trip_preserves_evaluation() {
    let (state, us, _) = lopsided_state();
    let evaluator = PositionEvaluator::new();
    let profile = StrategyProfile::default();

    let json = serde_json::to_string(&state).expect("snapshot serializes");
    let restored: StateSnapshot = serde_json::from_str(&json).expect("snapshot deserializes");

    assert_eq!(restored.players.len(), state.players.len());
    assert_eq!(restored.permanent_count(), state.permanent_count());
    assert_eq!(
        evaluator.evaluate(&restored, us, &profile),
        evaluator.evaluate(&state, us, &profile)
    );
}

#[test]
fn cloned_branch_evaluation_does_not_disturb_original() {
    let (state, us, them) = lopsided_state();
    let evaluator = PositionEvaluator::new();
    let profile = StrategyProfile::default();
    let before = evaluator.evaluate(&state, us, &profile);

    let mut branch = state.clone();
    let rules = common::MiniRules;
    for action in rules.legal_actions(&branch) {
        let mut fork = branch.clone();
        rules.apply_action(&mut fork, &action);
    }
    branch.player_mut(them).unwrap().lose_life(10);

    assert_eq!(evaluator.evaluate(&state, us, &profile), before);
}
