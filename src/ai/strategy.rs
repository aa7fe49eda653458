//! Archetype classification and live strategy adaptation
//!
//! Reclassifies the controlled deck at a fixed turn cadence from every
//! card we have observed, estimates the opponent's archetype from their
//! visible cards only, and recomputes the live aggression/risk dials as
//! baseline plus weighted situational deltas.

use crate::ai::profile::{Archetype, GameStage, StrategyProfile};
use crate::core::{Card, PlayerId};
use crate::game::{DecisionLogger, StateSnapshot};

/// How a side's board stacks up, as seen by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardPosition {
    Dominating,
    Ahead,
    Even,
    Behind,
    Struggling,
}

impl BoardPosition {
    fn from_score(score: f64) -> Self {
        if score > 0.5 {
            BoardPosition::Dominating
        } else if score > 0.15 {
            BoardPosition::Ahead
        } else if score >= -0.15 {
            BoardPosition::Even
        } else if score >= -0.5 {
            BoardPosition::Behind
        } else {
            BoardPosition::Struggling
        }
    }
}

/// Feature totals extracted from a set of observed cards
#[derive(Debug, Default)]
struct DeckFeatures {
    cards: usize,
    creatures: usize,
    lands: usize,
    instants_sorceries: usize,
    cheap_spells: usize,
    expensive_spells: usize,
    total_cmc: u32,
    colors: usize,
    counter_text: usize,
    draw_text: usize,
    tutor_text: usize,
    ramp_text: usize,
    aggressive_keywords: usize,
    tribal_peak: usize,
}

impl DeckFeatures {
    fn extract<'a>(cards: impl Iterator<Item = &'a Card>) -> Self {
        let mut features = DeckFeatures::default();
        let mut color_seen = [false; 5];
        let mut subtype_counts: Vec<(String, usize)> = Vec::new();

        for card in cards {
            features.cards += 1;
            let cmc = card.mana_cost.cmc();
            features.total_cmc += cmc as u32;

            if card.is_land() {
                features.lands += 1;
            } else if cmc <= 2 {
                features.cheap_spells += 1;
            } else if cmc >= 5 {
                features.expensive_spells += 1;
            }

            if card.is_creature() {
                features.creatures += 1;
                for subtype in &card.subtypes {
                    if let Some(entry) = subtype_counts.iter_mut().find(|(s, _)| s == subtype) {
                        entry.1 += 1;
                    } else {
                        subtype_counts.push((subtype.clone(), 1));
                    }
                }
            }
            if card.is_instant() || card.is_sorcery() {
                features.instants_sorceries += 1;
            }

            for color in card.mana_cost.colors() {
                use crate::core::Color;
                let slot = match color {
                    Color::White => 0,
                    Color::Blue => 1,
                    Color::Black => 2,
                    Color::Red => 3,
                    Color::Green => 4,
                    Color::Colorless => continue,
                };
                color_seen[slot] = true;
            }

            let text = card.text.to_lowercase();
            if text.contains("counter target") {
                features.counter_text += 1;
            }
            if text.contains("draw") {
                features.draw_text += 1;
            }
            if text.contains("search your library") {
                features.tutor_text += 1;
            }
            if text.contains("add {") || text.contains("additional land") {
                features.ramp_text += 1;
            }

            use crate::core::Keyword;
            for keyword in [Keyword::Haste, Keyword::FirstStrike, Keyword::DoubleStrike, Keyword::Menace, Keyword::Trample] {
                if card.has_keyword(&keyword) {
                    features.aggressive_keywords += 1;
                }
            }
        }

        features.colors = color_seen.iter().filter(|&&c| c).count();
        features.tribal_peak = subtype_counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
        features
    }

    fn nonland(&self) -> usize {
        self.cards.saturating_sub(self.lands).max(1)
    }

    fn avg_cmc(&self) -> f64 {
        self.total_cmc as f64 / self.nonland() as f64
    }
}

/// Classifies archetypes and adapts the live profile
#[derive(Debug)]
pub struct StrategyAdapter {
    /// Reclassify every this many turns
    pub recompute_interval: u32,
    last_classified_turn: Option<u32>,
}

impl Default for StrategyAdapter {
    fn default() -> Self {
        StrategyAdapter {
            recompute_interval: 3,
            last_classified_turn: None,
        }
    }
}

impl StrategyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score the feature set against every archetype; highest wins
    fn classify(features: &DeckFeatures) -> Archetype {
        if features.cards == 0 {
            return Archetype::Midrange;
        }

        let creature_ratio = features.creatures as f64 / features.nonland() as f64;
        let avg_cmc = features.avg_cmc();
        let nonland = features.nonland() as f64;

        let aggro = creature_ratio * 2.0
            + if avg_cmc <= 2.5 { 1.5 } else { 0.0 }
            + features.aggressive_keywords as f64 * 0.4
            + features.cheap_spells as f64 / nonland;
        let control = features.counter_text as f64 * 0.8
            + features.draw_text as f64 * 0.4
            + if creature_ratio < 0.35 { 1.0 } else { 0.0 }
            + if avg_cmc >= 3.5 { 0.5 } else { 0.0 };
        let midrange = 1.0
            + if (2.5..=3.5).contains(&avg_cmc) { 1.0 } else { 0.0 }
            + if (0.35..=0.65).contains(&creature_ratio) { 0.8 } else { 0.0 };
        let combo = features.tutor_text as f64 * 1.0
            + features.draw_text as f64 * 0.3
            + if features.colors >= 3 { 0.3 } else { 0.0 };
        let tempo = features.instants_sorceries as f64 / nonland * 1.5
            + if avg_cmc <= 3.0 { 0.5 } else { 0.0 }
            + creature_ratio * 0.8;
        let ramp = features.ramp_text as f64 * 1.0 + features.expensive_spells as f64 / nonland * 2.0;
        let tribal = if features.creatures >= 3 {
            features.tribal_peak as f64 / features.creatures.max(1) as f64 * 3.0
        } else {
            0.0
        };

        let scored = [
            (Archetype::Aggro, aggro),
            (Archetype::Control, control),
            (Archetype::Midrange, midrange),
            (Archetype::Combo, combo),
            (Archetype::Tempo, tempo),
            (Archetype::Ramp, ramp),
            (Archetype::Tribal, tribal),
        ];

        let mut best = (Archetype::Midrange, f64::NEG_INFINITY);
        for (archetype, score) in scored {
            if score > best.1 {
                best = (archetype, score);
            }
        }
        best.0
    }

    /// Classify our deck from everything we have observed of it: hand,
    /// our battlefield permanents, and our graveyard
    pub fn classify_own(&self, state: &StateSnapshot, perspective: PlayerId) -> Archetype {
        let hand_cards = state.hand(perspective).iter().filter_map(|&id| state.card(id));
        let board_cards = state.battlefield_of(perspective);
        let graveyard_cards = state
            .zones(perspective)
            .map(|z| z.graveyard.cards.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| state.card(id))
            .collect::<Vec<_>>();

        let features = DeckFeatures::extract(hand_cards.chain(board_cards).chain(graveyard_cards));
        Self::classify(&features)
    }

    /// Estimate the opponent's archetype from their visible cards only
    /// (battlefield and graveyard; their hand is hidden information)
    pub fn estimate_opponent(&self, state: &StateSnapshot, perspective: PlayerId) -> Archetype {
        let Some(opponent) = state.opponent_of(perspective) else {
            return Archetype::Midrange;
        };
        let board_cards = state.battlefield_of(opponent);
        let graveyard_cards = state
            .zones(opponent)
            .map(|z| z.graveyard.cards.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| state.card(id))
            .collect::<Vec<_>>();

        let features = DeckFeatures::extract(board_cards.chain(graveyard_cards));
        Self::classify(&features)
    }

    /// Reclassify on the configured cadence and install the archetype
    /// baseline into the profile
    pub fn maybe_reclassify(
        &mut self,
        state: &StateSnapshot,
        perspective: PlayerId,
        profile: &mut StrategyProfile,
        logger: &DecisionLogger,
    ) {
        let turn = state.turn.turn_number;
        let due = match self.last_classified_turn {
            None => true,
            Some(last) => turn >= last + self.recompute_interval,
        };
        if !due {
            return;
        }

        let archetype = self.classify_own(state, perspective);
        if archetype != profile.archetype {
            logger.strategy(&format!("reclassified deck as {} (turn {})", archetype, turn));
        }
        *profile = StrategyProfile::new(archetype);
        self.last_classified_turn = Some(turn);
    }

    /// Recompute the live dials: archetype baseline plus weighted deltas
    /// from the current situation, clamped to the safe range.
    pub fn adapt(
        &self,
        state: &StateSnapshot,
        perspective: PlayerId,
        opponent_archetype: Archetype,
        profile: &mut StrategyProfile,
        position_score: f64,
    ) {
        let (base_aggression, base_risk) = profile.archetype.baseline();
        let mut aggression = base_aggression;
        let mut risk = base_risk;

        // Board position: press advantages carefully, gamble when losing
        match BoardPosition::from_score(position_score) {
            BoardPosition::Dominating => {
                aggression += 0.10;
                risk -= 0.10;
            }
            BoardPosition::Ahead => {
                aggression += 0.05;
            }
            BoardPosition::Even => {}
            BoardPosition::Behind => {
                risk += 0.10;
            }
            BoardPosition::Struggling => {
                aggression += 0.05;
                risk += 0.20;
            }
        }

        // Stage x archetype
        let stage = GameStage::from_turn(state.turn.turn_number);
        aggression += match (profile.archetype, stage) {
            (Archetype::Aggro, GameStage::Early) => 0.10,
            (Archetype::Aggro, GameStage::Late) => -0.05,
            (Archetype::Control, GameStage::Early) => -0.10,
            (Archetype::Control, GameStage::Late) => 0.10,
            (Archetype::Ramp, GameStage::Early) => -0.10,
            (Archetype::Ramp, GameStage::Late) => 0.15,
            (Archetype::Combo, GameStage::Late) => 0.10,
            _ => 0.0,
        };

        // Life differential, scaled by archetype sensitivity
        if let Some(opponent) = state.opponent_of(perspective) {
            let life_diff = state.life_of(perspective) - state.life_of(opponent);
            let life_scale = crate::ai::position::starting_life(state).max(1) as f64;
            let sensitivity = match profile.archetype {
                Archetype::Aggro => 0.10,
                Archetype::Control => 0.25,
                _ => 0.18,
            };
            aggression += (life_diff as f64 / life_scale).clamp(-1.0, 1.0) * sensitivity;
        }

        // Complex boards punish reckless lines
        if state.permanent_count() > 12 {
            risk -= 0.05;
        }

        // Card advantage magnitude
        if let Some(opponent) = state.opponent_of(perspective) {
            let advantage = state.hand(perspective).len() as i32 - state.hand(opponent).len() as i32;
            if advantage >= 3 {
                aggression += 0.05;
            } else if advantage <= -3 {
                aggression -= 0.05;
                risk += 0.05;
            }
        }

        // Matchup table
        let (matchup_aggression, matchup_risk) = match (profile.archetype, opponent_archetype) {
            (Archetype::Aggro, Archetype::Control) => (0.10, 0.05),
            (Archetype::Aggro, Archetype::Aggro) => (0.0, -0.05),
            (Archetype::Control, Archetype::Aggro) => (-0.10, -0.05),
            (Archetype::Control, Archetype::Combo) => (0.05, 0.05),
            (Archetype::Combo, Archetype::Aggro) => (-0.05, 0.10),
            (Archetype::Ramp, Archetype::Aggro) => (-0.10, 0.0),
            (_, Archetype::Combo) => (0.05, 0.0),
            _ => (0.0, 0.0),
        };
        aggression += matchup_aggression;
        risk += matchup_risk;

        // Very late games have to end
        if state.turn.turn_number >= 12 {
            risk += 0.10;
        }

        profile.aggression = aggression;
        profile.risk_tolerance = risk;
        profile.clamp();
    }
}
