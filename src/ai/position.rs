//! Holistic board evaluation
//!
//! Scores the overall game state from a player's perspective as a value
//! in [-1, 1]. Every sub-score is anti-symmetric (computed as a
//! difference between the two sides), so swapping perspective negates
//! the result exactly.

use crate::ai::profile::{Archetype, GameStage, StrategyProfile};
use crate::ai::threat::ThreatAssessment;
use crate::core::{Card, PlayerId};
use crate::game::StateSnapshot;

/// Worth of one creature on the battlefield, the common currency for
/// material and trade comparisons
pub(crate) fn creature_worth(card: &Card) -> f64 {
    let power = card.current_power().max(0) as f64;
    let toughness = card.current_toughness().max(0) as f64;
    let mut value = 1.0 + power * 0.15 + toughness * 0.10 + card.mana_cost.cmc() as f64 * 0.05;

    if card.has_flying() {
        value += power * 0.10;
    }
    if card.has_double_strike() {
        value += 0.10 + power * 0.15;
    } else if card.has_first_strike() {
        value += power * 0.05;
    }
    if card.has_deathtouch() {
        value += 0.25;
    }
    if card.has_lifelink() {
        value += power * 0.10;
    }
    if power > 1.0 && card.has_trample() {
        value += (power - 1.0) * 0.05;
    }
    if card.has_vigilance() {
        value += (power + toughness) * 0.05;
    }
    if card.has_menace() {
        value += power * 0.04;
    }
    if card.has_indestructible() {
        value += 0.70;
    }
    if card.has_keyword(&crate::core::Keyword::Hexproof) {
        value += 0.35;
    }
    if card.has_defender() {
        value -= power * 0.09 + 0.40;
    }

    value.max(0.0)
}

/// Worth of any permanent
fn permanent_worth(card: &Card) -> f64 {
    if card.is_creature() {
        creature_worth(card)
    } else if card.is_land() {
        1.0
    } else if card.is_planeswalker() {
        3.0 + card.loyalty.unwrap_or(0) as f64 * 0.3 + card.get_counter("loyalty") as f64 * 0.3
    } else {
        0.5 + card.mana_cost.cmc() as f64 * 0.3
    }
}

/// The game's starting life total, taken as the max across players
pub(crate) fn starting_life(state: &StateSnapshot) -> i32 {
    state.players.iter().map(|p| p.starting_life).max().unwrap_or(20)
}

/// Difference-over-sum normalization; 0 when both sides are empty
fn ratio_diff(mine: f64, theirs: f64) -> f64 {
    let total = mine + theirs;
    if total < 1e-9 {
        0.0
    } else {
        (mine - theirs) / total
    }
}

/// Sub-score weights, varied by stage and archetype
struct Weights {
    material: f64,
    card_advantage: f64,
    board_pt: f64,
    tempo: f64,
    life: f64,
    mana_development: f64,
    planeswalkers: f64,
    synergy: f64,
    win_proximity: f64,
}

impl Weights {
    fn for_context(stage: GameStage, archetype: Archetype) -> Self {
        let mut w = match stage {
            GameStage::Early => Weights {
                material: 0.8,
                card_advantage: 0.7,
                board_pt: 0.6,
                tempo: 0.8,
                life: 0.3,
                mana_development: 0.9,
                planeswalkers: 0.3,
                synergy: 0.3,
                win_proximity: 0.4,
            },
            GameStage::Mid => Weights {
                material: 1.0,
                card_advantage: 0.8,
                board_pt: 0.7,
                tempo: 0.5,
                life: 0.6,
                mana_development: 0.5,
                planeswalkers: 0.4,
                synergy: 0.3,
                win_proximity: 0.9,
            },
            GameStage::Late => Weights {
                material: 0.9,
                card_advantage: 0.7,
                board_pt: 0.8,
                tempo: 0.3,
                life: 0.9,
                mana_development: 0.2,
                planeswalkers: 0.4,
                synergy: 0.3,
                win_proximity: 1.2,
            },
        };

        match archetype {
            Archetype::Aggro => {
                w.win_proximity *= 1.3;
                w.board_pt *= 1.2;
                w.life *= 0.7;
            }
            Archetype::Control => {
                w.card_advantage *= 1.4;
                w.material *= 1.1;
            }
            Archetype::Midrange => {}
            Archetype::Combo => {
                w.card_advantage *= 1.2;
                w.win_proximity *= 1.1;
            }
            Archetype::Tempo => {
                w.tempo *= 1.4;
            }
            Archetype::Ramp => {
                w.mana_development *= 1.5;
            }
            Archetype::Tribal => {
                w.synergy *= 1.8;
            }
        }

        w
    }
}

/// Static position evaluator. Deterministic, side-effect free, total:
/// a snapshot it cannot interpret scores 0.
#[derive(Debug, Default)]
pub struct PositionEvaluator;

impl PositionEvaluator {
    pub fn new() -> Self {
        PositionEvaluator
    }

    /// Score the state from `perspective`. Output is clamped to [-1, 1].
    pub fn evaluate(&self, state: &StateSnapshot, perspective: PlayerId, profile: &StrategyProfile) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return 0.0;
        };

        let my_life = state.life_of(perspective);
        let opp_life = state.life_of(opponent);

        // Decided games dominate every heuristic consideration
        if opp_life <= 0 && my_life > 0 {
            return 1.0;
        }
        if my_life <= 0 && opp_life > 0 {
            return -1.0;
        }

        let stage = GameStage::from_turn(state.turn.turn_number);
        let w = Weights::for_context(stage, profile.archetype);

        // Life differences read relative to the game's starting total, so
        // a 5-point swing means the same thing in a 20-life duel and a
        // 40-life variant
        let life_scale = (starting_life(state) as f64 * 0.75).max(1.0);

        let sum = w.material * self.material(state, perspective, opponent)
            + w.card_advantage * self.card_advantage(state, perspective, opponent)
            + w.board_pt * self.board_pt(state, perspective, opponent)
            + w.tempo * self.tempo(state, perspective, opponent)
            + w.life * ((my_life - opp_life) as f64 / life_scale).tanh()
            + w.mana_development * self.mana_development(state, perspective, opponent)
            + w.planeswalkers * self.planeswalkers(state, perspective, opponent)
            + w.synergy * self.synergy(state, perspective, opponent)
            + w.win_proximity * self.win_proximity(state, perspective, opponent);

        sum.tanh()
    }

    fn material(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        let mine: f64 = state.battlefield_of(perspective).map(permanent_worth).sum();
        let theirs: f64 = state.battlefield_of(opponent).map(permanent_worth).sum();
        ratio_diff(mine, theirs)
    }

    fn card_advantage(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        ratio_diff(state.hand(perspective).len() as f64, state.hand(opponent).len() as f64)
    }

    fn board_pt(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        let mine = (state.board_power(perspective) + state.board_toughness(perspective)) as f64;
        let theirs = (state.board_power(opponent) + state.board_toughness(opponent)) as f64;
        ((mine - theirs) / 12.0).tanh()
    }

    /// Mana invested on board per land: rewards spending mana, not
    /// hoarding lands
    fn tempo(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        let invested = |player: PlayerId| -> f64 {
            let spent: u32 = state
                .battlefield_of(player)
                .filter(|c| !c.is_land())
                .map(|c| c.mana_cost.cmc() as u32)
                .sum();
            let lands = state.lands_of(player).count().max(1);
            spent as f64 / lands as f64
        };
        ((invested(perspective) - invested(opponent)) / 3.0).tanh()
    }

    fn mana_development(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        ratio_diff(
            state.lands_of(perspective).count() as f64,
            state.lands_of(opponent).count() as f64,
        )
    }

    fn planeswalkers(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        ratio_diff(
            state.battlefield_of(perspective).filter(|c| c.is_planeswalker()).count() as f64,
            state.battlefield_of(opponent).filter(|c| c.is_planeswalker()).count() as f64,
        )
    }

    /// Tribal concentration: how much of the board shares a creature type
    fn synergy(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        let concentration = |player: PlayerId| -> f64 {
            let creatures: Vec<&Card> = state.creatures_of(player).collect();
            if creatures.len() < 2 {
                return 0.0;
            }
            let mut best = 0usize;
            for card in &creatures {
                for subtype in &card.subtypes {
                    let count = creatures
                        .iter()
                        .filter(|other| other.subtypes.iter().any(|s| s == subtype))
                        .count();
                    best = best.max(count);
                }
            }
            ((best.saturating_sub(1)) as f64 / 4.0).min(1.0)
        };
        concentration(perspective) - concentration(opponent)
    }

    /// How close each side is to closing the game through combat
    fn win_proximity(&self, state: &StateSnapshot, perspective: PlayerId, opponent: PlayerId) -> f64 {
        let proximity = |side: PlayerId, enemy: PlayerId| -> f64 {
            let life = state.life_of(enemy).max(1) as f64;
            let threat = ThreatAssessment::analyze(state, side);
            (threat.unblocked_power as f64 / life).min(1.5)
        };
        (proximity(perspective, opponent) - proximity(opponent, perspective)) / 1.5
    }
}
