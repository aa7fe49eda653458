//! End-to-end decision scenarios against the MiniRules engine

mod common;

use common::{basic_land, burn_spell, creature, into_hand, onto_battlefield, MiniRules};
use mtg_tactician::ai::{ActionEvaluator, DecisionEngine, MctsEngine, PositionEvaluator, SearchContext, StrategyProfile};
use mtg_tactician::game::{Action, DecisionLogger, RulesEngine, StateSnapshot};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

#[test]
fn land_drop_recommended_with_unused_land_budget() {
    // Empty board apart from two untapped lands; hand holds a two-drop
    // creature and a land; no land played this turn.
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    state.turn.turn_number = 2;

    onto_battlefield(&mut state, us, basic_land("Forest", us));
    onto_battlefield(&mut state, us, basic_land("Forest", us));
    into_hand(&mut state, us, creature("Grizzly Bears", "1G", 2, 2, us));
    let land_in_hand = into_hand(&mut state, us, basic_land("Forest", us));

    let rules = MiniRules;
    let legal = rules.legal_actions(&state);
    assert!(legal.len() >= 3, "expected play options plus end turn: {legal:?}");

    let mut engine = DecisionEngine::new(MiniRules, us);
    engine.logger_mut().enable_capture();

    let action = engine.recommend_action(&state, &legal).expect("an action");
    assert_eq!(
        action,
        Action::PlayCard { card_id: land_in_hand },
        "the free land drop should come first"
    );
}

#[test]
fn lethal_attack_selected_when_unblockable() {
    // Our attacker's unblocked power meets the opponent's life total and
    // they have no creatures to block with.
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let them = state.players[1].id;
    state.turn.turn_number = 6;
    state.player_mut(them).unwrap().life = 5;

    let wurm = onto_battlefield(&mut state, us, creature("Craw Wurm", "4GG", 6, 4, us));

    let rules = MiniRules;
    let legal = rules.legal_actions(&state);

    let mut engine = DecisionEngine::new(MiniRules, us);
    engine.logger_mut().enable_capture();

    let action = engine.recommend_action(&state, &legal).expect("an action");
    match action {
        Action::DeclareAttackers { ref attackers } => {
            assert!(attackers.contains(&wurm), "the lethal attacker must be in the attack");
        }
        other => panic!("expected an attack, got {other:?}"),
    }
}

#[test]
fn lethal_burn_selected_over_passing() {
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let them = state.players[1].id;
    state.player_mut(them).unwrap().life = 3;

    onto_battlefield(&mut state, us, basic_land("Mountain", us));
    let bolt = into_hand(&mut state, us, burn_spell("Lightning Bolt", "R", 3, us));

    let rules = MiniRules;
    let legal = rules.legal_actions(&state);

    let mut engine = DecisionEngine::new(MiniRules, us);
    let action = engine.recommend_action(&state, &legal).expect("an action");
    assert_eq!(action, Action::PlayCard { card_id: bolt });
}

#[test]
fn mcts_concentrates_visits_on_winning_burn() {
    // Opponent at 1 life, a castable 3-damage burn spell in hand: the
    // tree should pour its visits into that play and return it.
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let them = state.players[1].id;
    state.player_mut(them).unwrap().life = 1;

    onto_battlefield(&mut state, us, basic_land("Mountain", us));
    let bolt = into_hand(&mut state, us, burn_spell("Lightning Bolt", "R", 3, us));

    let rules = MiniRules;
    let legal = rules.legal_actions(&state);
    assert!(legal.contains(&Action::PlayCard { card_id: bolt }));

    let profile = StrategyProfile::default();
    let position = PositionEvaluator::new();
    let actions = ActionEvaluator::new();
    let logger = DecisionLogger::new();
    let ctx = SearchContext {
        rules: &rules,
        perspective: us,
        profile: &profile,
        position: &position,
        actions: &actions,
        logger: &logger,
    };

    let mut mcts = MctsEngine::new();
    let mut rng = ChaCha12Rng::seed_from_u64(5);
    let picked = mcts.search(&ctx, &state, &legal, &mut rng).expect("search succeeds");

    assert_eq!(picked, Action::PlayCard { card_id: bolt });

    let visits = mcts.root_visits();
    let bolt_visits = visits
        .iter()
        .find(|(action, _)| *action == Action::PlayCard { card_id: bolt })
        .map(|(_, v)| *v)
        .unwrap();
    let max_visits = visits.iter().map(|(_, v)| *v).max().unwrap();
    assert_eq!(bolt_visits, max_visits, "burn spell should have the most visits: {visits:?}");
}

#[test]
fn recommendation_is_deterministic_for_fixed_seed() {
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    state.turn.turn_number = 4;

    for _ in 0..3 {
        onto_battlefield(&mut state, us, basic_land("Island", us));
    }
    into_hand(&mut state, us, creature("Wind Drake", "2U", 2, 2, us));
    into_hand(&mut state, us, creature("Merfolk of the Pearl Trident", "U", 1, 1, us));
    into_hand(&mut state, us, basic_land("Island", us));

    let rules = MiniRules;
    let legal = rules.legal_actions(&state);

    let mut first = DecisionEngine::new(MiniRules, us);
    let mut second = DecisionEngine::new(MiniRules, us);

    let pick1 = first.recommend_action(&state, &legal);
    let pick2 = second.recommend_action(&state, &legal);
    assert_eq!(pick1, pick2);

    // And stable when asked again on untouched engines with equal state
    let mut third = DecisionEngine::new(MiniRules, us);
    assert_eq!(third.recommend_action(&state, &legal), pick1);
}

#[test]
fn stuck_state_yields_none() {
    let state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let mut engine = DecisionEngine::new(MiniRules, us);
    assert_eq!(engine.recommend_action(&state, &[]), None);
}

#[test]
fn analyze_reports_threat_and_stage() {
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    let them = state.players[1].id;
    state.turn.turn_number = 10;
    state.player_mut(us).unwrap().life = 4;

    onto_battlefield(&mut state, them, creature("Shivan Dragon", "4RR", 5, 5, them));

    let mut engine = DecisionEngine::new(MiniRules, us);
    let analysis = engine.analyze(&state);

    assert_eq!(analysis.stage, mtg_tactician::ai::GameStage::Late);
    assert!(analysis.threat.incoming_power >= 5);
    assert!(analysis.threat.under_lethal_threat);
    assert!(analysis.critical);
    assert!(analysis.position_score < 0.0);
}

#[test]
fn full_turn_against_mini_rules_plays_out() {
    // Drive a few decisions through the engine, applying each one, and
    // check the loop makes forward progress without getting stuck.
    let mut state = StateSnapshot::new_two_player("Us", "Them", 20);
    let us = state.players[0].id;
    state.turn.turn_number = 3;

    onto_battlefield(&mut state, us, basic_land("Forest", us));
    onto_battlefield(&mut state, us, basic_land("Forest", us));
    into_hand(&mut state, us, basic_land("Forest", us));
    into_hand(&mut state, us, creature("Grizzly Bears", "1G", 2, 2, us));

    let rules = MiniRules;
    let mut engine = DecisionEngine::new(MiniRules, us);
    engine.logger_mut().enable_capture();

    let mut decisions = 0;
    for _ in 0..12 {
        if state.turn.active_player != us {
            break;
        }
        let legal = rules.legal_actions(&state);
        let Some(action) = engine.recommend_action(&state, &legal) else {
            break;
        };
        let ended = action.is_turn_ending();
        rules.apply_action(&mut state, &action);
        decisions += 1;
        if ended {
            break;
        }
    }

    assert!(decisions >= 3, "should play land, cast, and eventually pass: {decisions}");
    // Both cards left the hand along the way
    assert!(state.hand(us).is_empty(), "hand should be emptied: {:?}", state.hand(us));
}
