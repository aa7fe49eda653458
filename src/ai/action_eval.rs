//! Per-action heuristic evaluation
//!
//! Scores a single candidate action (play, attack, block, ability, pass)
//! on an open-ended scale of roughly 0-5. Total over the whole action
//! space: an action whose card or ability cannot be resolved gets a
//! neutral low score, and an ability whose cost cannot be paid scores 0.

use crate::ai::position::creature_worth;
use crate::ai::profile::{GameStage, StrategyProfile};
use crate::ai::threat;
use crate::core::{Card, CardId, CardType, ManaCost, PlayerId};
use crate::game::{AbilityOracle, AbilityText, Action, CombatResolver, StateSnapshot, Step};
use std::cmp::Ordering;

/// Score for actions referencing entities we cannot resolve
const NEUTRAL_LOW: f64 = 0.1;

/// Added when an action wins the game on the spot
const LETHAL_BONUS: f64 = 4.0;

/// Clamped [0,1] ability values are rescaled by this so a strong ability
/// competes with a good on-curve play
const ABILITY_SCALE: f64 = 2.0;

/// Per-action evaluator. Owns the optional external resolvers; with
/// neither present every path falls back to closed-form estimates.
#[derive(Default)]
pub struct ActionEvaluator {
    combat: Option<Box<dyn CombatResolver>>,
    abilities: Option<Box<dyn AbilityOracle>>,
}

impl ActionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_combat_resolver(&mut self, resolver: Box<dyn CombatResolver>) {
        self.combat = Some(resolver);
    }

    pub fn set_ability_oracle(&mut self, oracle: Box<dyn AbilityOracle>) {
        self.abilities = Some(oracle);
    }

    /// Score one action. Higher is better; typical range 0-5.
    pub fn evaluate(
        &self,
        state: &StateSnapshot,
        action: &Action,
        perspective: PlayerId,
        profile: &StrategyProfile,
    ) -> f64 {
        match action {
            Action::PlayCard { card_id } => self.evaluate_play(state, *card_id, perspective, profile),
            Action::DeclareAttackers { attackers } => self.evaluate_attack(state, attackers, perspective, profile),
            Action::DeclareBlockers { attacker, blockers } => {
                self.evaluate_block(state, *attacker, blockers, perspective)
            }
            Action::ActivateAbility { card_id, ability_index } => {
                self.evaluate_ability(state, *card_id, *ability_index, perspective, profile)
            }
            Action::EndTurn | Action::PassPriority => 0.05,
        }
    }

    /// Score every legal action, best first. Ties keep list order so the
    /// result is deterministic.
    pub fn rank(
        &self,
        state: &StateSnapshot,
        legal: &[Action],
        perspective: PlayerId,
        profile: &StrategyProfile,
    ) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = legal
            .iter()
            .enumerate()
            .map(|(i, action)| (i, self.evaluate(state, action, perspective, profile)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        scored
    }

    /// Would this action end the game in our favor right now?
    pub fn is_lethal(&self, state: &StateSnapshot, action: &Action, perspective: PlayerId) -> bool {
        let Some(opponent) = state.opponent_of(perspective) else {
            return false;
        };
        let opp_life = state.life_of(opponent);
        if opp_life <= 0 {
            return false;
        }

        match action {
            Action::DeclareAttackers { attackers } => {
                if let Some(resolver) = &self.combat {
                    if let Some(outcome) = resolver.simulate_combat(state, attackers, None) {
                        return outcome.damage_to_opponent >= opp_life;
                    }
                }
                self.unblocked_power(state, attackers, opponent) >= opp_life
            }
            Action::PlayCard { card_id } => state
                .card(*card_id)
                .filter(|c| c.is_instant() || c.is_sorcery())
                .and_then(|c| parse_damage_amount(&c.text))
                .is_some_and(|damage| damage >= opp_life),
            Action::ActivateAbility { card_id, ability_index } => self
                .resolve_ability_text(state, *card_id, *ability_index)
                .and_then(|ability| parse_damage_amount(&ability.effect_text))
                .is_some_and(|damage| damage >= opp_life),
            _ => false,
        }
    }

    // ---- PlayCard ---------------------------------------------------

    fn evaluate_play(&self, state: &StateSnapshot, card_id: CardId, perspective: PlayerId, profile: &StrategyProfile) -> f64 {
        let Some(card) = state.card(card_id) else {
            return NEUTRAL_LOW;
        };

        if card.is_land() {
            return self.evaluate_land_drop(state, perspective);
        }

        let mut value = base_card_quality(card);
        value += self.synergy_value(state, card, perspective);
        value += self.tempo_value(state, card);
        value += self.tactical_value(state, card, perspective, profile);

        // A burn spell that closes the game outweighs everything else
        if card.is_instant() || card.is_sorcery() {
            if let (Some(damage), Some(opponent)) = (parse_damage_amount(&card.text), state.opponent_of(perspective)) {
                let opp_life = state.life_of(opponent);
                if opp_life > 0 && damage >= opp_life {
                    value += LETHAL_BONUS;
                }
            }
        }

        // Sorcery-speed cards are best deployed in the first main phase
        if card.is_creature() && state.turn.current_step == Step::Main1 {
            value += 0.1;
        }

        value
    }

    fn evaluate_land_drop(&self, state: &StateSnapshot, perspective: PlayerId) -> f64 {
        let can_drop = state.player(perspective).map(|p| p.can_play_land()).unwrap_or(false);
        if !can_drop {
            return 0.2;
        }

        // The free land drop is almost never wrong; missing one early is
        // a whole turn of tempo.
        let stage_bonus = match GameStage::from_turn(state.turn.turn_number) {
            GameStage::Early => 0.5,
            GameStage::Mid => 0.2,
            GameStage::Late => 0.0,
        };
        3.0 + stage_bonus
    }

    fn synergy_value(&self, state: &StateSnapshot, card: &Card, perspective: PlayerId) -> f64 {
        let board: Vec<&Card> = state.battlefield_of(perspective).collect();
        if board.is_empty() {
            return 0.0;
        }

        let mut synergy = 0.0;
        let text = card.text.to_lowercase();

        // Shared creature types
        let shared = card
            .subtypes
            .iter()
            .filter(|s| board.iter().any(|b| b.subtypes.iter().any(|bs| bs == *s)))
            .count();
        synergy += (shared as f64 * 0.1).min(0.3);

        // Tribal payoff: the card names a type we already play
        if !text.is_empty()
            && board
                .iter()
                .flat_map(|b| b.subtypes.iter())
                .any(|s| text.contains(&s.to_lowercase()))
        {
            synergy += 0.3;
        }

        // Mechanic overlap, each theme capped
        for theme in ["sacrifice", "graveyard", "+1/+1", "discard", "artifact", "enchantment", "gain life"] {
            if text.contains(theme) {
                let on_board = board.iter().filter(|b| b.text.to_lowercase().contains(theme)).count();
                synergy += (on_board as f64 * 0.15).min(0.45);
            }
        }

        // Color overlap
        if !card.colors.is_empty() {
            let matching = card
                .colors
                .iter()
                .filter(|c| board.iter().any(|b| b.colors.contains(c)))
                .count();
            synergy += matching as f64 / card.colors.len() as f64 * 0.1;
        }

        synergy.min(1.2)
    }

    /// Tempo is measured against the turn's expected mana (the curve),
    /// not the mana left right now, so a play's score does not depend on
    /// whether the land drop happened first.
    fn tempo_value(&self, state: &StateSnapshot, card: &Card) -> f64 {
        let turn = state.turn.turn_number.max(1) as f64;
        let cmc = card.mana_cost.cmc() as f64;
        if cmc == 0.0 {
            return 0.0;
        }

        let mut tempo = 0.0;
        // On-curve: the play lines up with the turn's mana
        if (cmc - turn).abs() < 0.5 {
            tempo += 0.3;
        }
        // How much of the turn's mana the play puts to use
        tempo += (cmc / turn).min(1.0) * 0.2;
        tempo
    }

    fn tactical_value(&self, state: &StateSnapshot, card: &Card, perspective: PlayerId, profile: &StrategyProfile) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return 0.0;
        };

        let mine = state.board_power(perspective) + state.board_toughness(perspective);
        let theirs = state.board_power(opponent) + state.board_toughness(opponent);
        let life_diff = state.life_of(perspective) - state.life_of(opponent);
        let behind = theirs > mine + 4 || life_diff < -5;
        let ahead = mine > theirs + 4 || life_diff > 5;

        let text = card.text.to_lowercase();
        let power = card.current_power().max(0) as i32;
        let toughness = card.current_toughness().max(0) as i32;
        let mut value = 0.0;

        if behind {
            if card.is_creature() && toughness >= power {
                value += 0.2;
            }
            if text.contains("destroy") || text.contains("exile") {
                value += 0.25;
            }
            if text.contains("gain") && text.contains("life") {
                value += 0.15;
            }
            value *= 1.0 + (1.0 - profile.aggression) * 0.3;
        } else if ahead {
            if card.is_creature() && power > toughness {
                value += 0.2;
            }
            if card.has_haste() {
                value += 0.15;
            }
            if parse_damage_amount(&card.text).is_some() {
                value += 0.1;
            }
            value *= 1.0 + profile.aggression * 0.3;
        }

        value
    }

    // ---- Combat -----------------------------------------------------

    fn unblocked_power(&self, state: &StateSnapshot, attackers: &[CardId], opponent: PlayerId) -> i32 {
        let blockers: Vec<&Card> = state.creatures_of(opponent).filter(|c| !c.tapped).collect();
        attackers
            .iter()
            .filter_map(|id| state.card(*id))
            .filter(|attacker| !blockers.iter().any(|blocker| threat::can_block(attacker, blocker)))
            .map(|attacker| attacker.current_power().max(0) as i32)
            .sum()
    }

    fn evaluate_attack(&self, state: &StateSnapshot, attackers: &[CardId], perspective: PlayerId, profile: &StrategyProfile) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return NEUTRAL_LOW;
        };
        let opp_life = state.life_of(opponent);
        let aggression_scale = 0.8 + profile.aggression * 0.4;

        // Preferred path: ask the combat resolver for the real outcome
        if let Some(resolver) = &self.combat {
            if let Some(outcome) = resolver.simulate_combat(state, attackers, None) {
                let mut value = outcome.damage_to_opponent as f64 * 0.15 + outcome.blockers_lost as f64 * 0.25
                    - outcome.attackers_lost as f64 * 0.30
                    + outcome.life_gained as f64 * 0.05;
                if opp_life > 0 && outcome.damage_to_opponent >= opp_life {
                    value += LETHAL_BONUS;
                }
                return value.max(0.0) * aggression_scale;
            }
        }

        // Closed-form estimate: power through, discounted by the defense
        let cards: Vec<&Card> = attackers.iter().filter_map(|id| state.card(*id)).collect();
        if cards.is_empty() {
            return NEUTRAL_LOW;
        }

        let blockers: Vec<&Card> = state.creatures_of(opponent).filter(|c| !c.tapped).collect();
        let total_power: i32 = cards.iter().map(|c| c.current_power().max(0) as i32).sum();
        let blocker_toughness: i32 = blockers.iter().map(|c| c.current_toughness().max(0) as i32).sum();
        let at_risk = cards
            .iter()
            .filter(|attacker| {
                blockers
                    .iter()
                    .any(|blocker| threat::can_block(attacker, blocker) && threat::can_destroy_attacker(attacker, blocker))
            })
            .count();

        let mut value = total_power as f64 * 0.12 - blocker_toughness as f64 * 0.06 - blockers.len() as f64 * 0.05;
        value -= at_risk as f64 * 0.10;

        if opp_life > 0 && self.unblocked_power(state, attackers, opponent) >= opp_life {
            value += LETHAL_BONUS;
        }

        value.max(0.0) * aggression_scale
    }

    fn evaluate_block(&self, state: &StateSnapshot, attacker_id: CardId, blockers: &[CardId], perspective: PlayerId) -> f64 {
        let Some(attacker) = state.card(attacker_id) else {
            return NEUTRAL_LOW;
        };
        let blocker_cards: Vec<&Card> = blockers.iter().filter_map(|id| state.card(*id)).collect();
        if blocker_cards.is_empty() {
            return NEUTRAL_LOW;
        }

        let defender = state.player(perspective);
        let my_life = defender.map(|p| p.life).unwrap_or(0).max(1);
        let life_scarce = defender.map(|p| p.life_fraction() < 0.4).unwrap_or(false);
        let attacker_power = attacker.current_power().max(0) as i32;

        // Damage prevention matters more the less life we have to spare
        let sensitivity = if attacker_power >= my_life {
            0.35
        } else if life_scarce {
            0.20
        } else {
            0.08
        };
        let mut value = attacker_power as f64 * sensitivity;

        let block_power: i32 = blocker_cards.iter().map(|c| c.current_power().max(0) as i32).sum();
        let kills_attacker = !attacker.has_indestructible()
            && (block_power >= attacker.current_toughness() as i32
                || blocker_cards.iter().any(|b| b.has_deathtouch() && b.current_power() > 0));
        if kills_attacker {
            value += 0.3 + creature_worth(attacker) * 0.1;
        }

        for blocker in &blocker_cards {
            if threat::can_destroy_blocker(attacker, blocker) {
                value -= creature_worth(blocker) * 0.15;
            }
        }

        value.max(0.0)
    }

    // ---- Abilities --------------------------------------------------

    /// Whether the ability can be resolved at all, via the oracle or the
    /// card's own ability list
    pub fn can_resolve_ability(&self, state: &StateSnapshot, card_id: CardId, ability_index: usize) -> bool {
        self.resolve_ability_text(state, card_id, ability_index).is_some()
    }

    fn resolve_ability_text(&self, state: &StateSnapshot, card_id: CardId, ability_index: usize) -> Option<AbilityText> {
        if let Some(oracle) = &self.abilities {
            if let Some(resolved) = oracle.resolve_ability(state, card_id, ability_index) {
                return Some(resolved);
            }
        }
        state.card(card_id).and_then(|card| {
            card.abilities.get(ability_index).map(|ability| AbilityText {
                cost_text: ability.cost_text.clone(),
                effect_text: ability.effect_text.clone(),
            })
        })
    }

    fn evaluate_ability(
        &self,
        state: &StateSnapshot,
        card_id: CardId,
        ability_index: usize,
        perspective: PlayerId,
        profile: &StrategyProfile,
    ) -> f64 {
        if state.card(card_id).is_none() {
            return NEUTRAL_LOW;
        }
        let Some(ability) = self.resolve_ability_text(state, card_id, ability_index) else {
            return NEUTRAL_LOW;
        };

        // An unpayable cost makes the action unplayable, not an error
        let Some(cost) = self.ability_cost_value(state, &ability.cost_text, perspective) else {
            return 0.0;
        };
        let effect = self.ability_effect_value(state, &ability.effect_text, perspective);
        let context = self.ability_context_value(state, &ability.effect_text, perspective, profile);

        (cost + effect + context).clamp(0.0, 1.0) * ABILITY_SCALE
    }

    /// Negative value of paying the cost; None when the cost cannot be
    /// paid at all (no sacrifice fodder, empty hand, lethal life payment)
    fn ability_cost_value(&self, state: &StateSnapshot, cost_text: &str, perspective: PlayerId) -> Option<f64> {
        let text = cost_text.to_lowercase();
        let mut cost = 0.0;

        let mana = parse_mana_tokens(cost_text);
        if mana.cmc() > 0 {
            let available = state.available_mana(perspective).max(1) as f64;
            cost -= (mana.cmc() as f64 / available).min(1.0) * 0.4;
        }

        if text.contains("{t}") || text.split(',').any(|tok| tok.trim() == "t" || tok.trim() == "tap") || text.contains("tap this") {
            cost -= match state.turn.current_step {
                Step::Main2 | Step::End => 0.05,
                step if step.is_combat_declaration() => 0.20,
                _ => 0.15,
            };
        }

        if text.contains("sacrifice") {
            if text.contains("creature") && state.creatures_of(perspective).count() == 0 {
                return None;
            }
            if text.contains("land") && state.lands_of(perspective).count() == 0 {
                return None;
            }
            cost -= 0.25;
            // Board already thin: every permanent is precious
            if state.battlefield_of(perspective).count() <= 2 {
                cost -= 0.25;
            }
        }

        if text.contains("discard") {
            let hand = state.hand(perspective).len();
            if hand == 0 {
                return None;
            }
            cost -= if hand <= 1 { 0.35 } else { 0.15 };
        }

        if let Some(life) = parse_pay_life(&text) {
            match state.player(perspective) {
                Some(player) if player.can_pay_life(life) => {
                    cost -= (life as f64 / player.life.max(1) as f64) * 0.6;
                }
                _ => return None,
            }
        }

        Some(cost)
    }

    fn ability_effect_value(&self, state: &StateSnapshot, effect_text: &str, perspective: PlayerId) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return 0.15;
        };

        let value = match categorize_effect(effect_text) {
            EffectKind::Draw(count) => {
                // Card draw gets better as the hand empties
                let hand = state.hand(perspective).len() as f64;
                (0.3 + 0.08 * count as f64) * (1.0 + (4.0 - hand).max(0.0) * 0.15)
            }
            EffectKind::Damage(amount) => {
                let opp_life = state.life_of(opponent);
                if opp_life > 0 && amount >= opp_life {
                    1.0
                } else {
                    let mut v = 0.2 + amount as f64 * 0.05;
                    let kills_something = state
                        .creatures_of(opponent)
                        .any(|c| (c.current_toughness() as i32) <= amount && !c.has_indestructible());
                    if kills_something {
                        v += 0.15;
                    }
                    v
                }
            }
            EffectKind::Removal => {
                let mut v = 0.4;
                if state.creatures_of(opponent).any(|c| c.current_power() >= 4) {
                    v += 0.2;
                } else if state.creatures_of(opponent).next().is_some() {
                    v += 0.1;
                }
                v
            }
            EffectKind::Pump => {
                if state.turn.current_step.is_combat_declaration() {
                    0.40
                } else {
                    0.25
                }
            }
            EffectKind::Lifegain(amount) => {
                let my_life = state.life_of(perspective);
                0.08 + amount as f64 * 0.02 + if my_life <= 8 { 0.25 } else { 0.0 }
            }
            EffectKind::Token => 0.35,
            EffectKind::CounterSpell => {
                if state.stack.is_empty() {
                    0.25
                } else {
                    0.50
                }
            }
            EffectKind::Tutor => 0.45,
            EffectKind::Mana => {
                if state.turn.current_step.is_sorcery_speed()
                    && GameStage::from_turn(state.turn.turn_number) == GameStage::Early
                {
                    0.30
                } else {
                    0.15
                }
            }
            EffectKind::Untap => 0.20,
            EffectKind::Unknown => 0.15,
        };

        value.clamp(0.0, 1.0)
    }

    fn ability_context_value(
        &self,
        state: &StateSnapshot,
        effect_text: &str,
        perspective: PlayerId,
        profile: &StrategyProfile,
    ) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return 0.0;
        };
        let mut context = 0.0;

        match categorize_effect(effect_text) {
            EffectKind::Damage(_) | EffectKind::Pump | EffectKind::Token => {
                context += (profile.aggression - 0.5) * 0.1;
            }
            EffectKind::Draw(_) | EffectKind::Tutor | EffectKind::CounterSpell | EffectKind::Removal => {
                context += (0.5 - profile.aggression) * 0.1;
            }
            _ => {}
        }

        let behind =
            state.board_power(opponent) + state.board_toughness(opponent) > state.board_power(perspective) + state.board_toughness(perspective) + 4;
        if behind && matches!(categorize_effect(effect_text), EffectKind::Removal) {
            context += 0.1;
        }

        if GameStage::from_turn(state.turn.turn_number) == GameStage::Late
            && matches!(categorize_effect(effect_text), EffectKind::Damage(_))
        {
            context += 0.05;
        }

        context
    }
}

// ---- Effect parsing -------------------------------------------------

/// Coarse effect categories the activation pricing understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectKind {
    Draw(u32),
    Damage(i32),
    Removal,
    Pump,
    Lifegain(i32),
    Token,
    CounterSpell,
    Tutor,
    Mana,
    Untap,
    Unknown,
}

fn categorize_effect(effect_text: &str) -> EffectKind {
    let text = effect_text.to_lowercase();

    if text.contains("counter target") {
        EffectKind::CounterSpell
    } else if let Some(amount) = parse_damage_amount(&text) {
        EffectKind::Damage(amount)
    } else if text.contains("destroy target") || text.contains("exile target") {
        EffectKind::Removal
    } else if text.contains("draw") {
        EffectKind::Draw(parse_draw_count(&text))
    } else if text.contains("search your library") {
        EffectKind::Tutor
    } else if text.contains("create") && text.contains("token") {
        EffectKind::Token
    } else if let Some(amount) = parse_life_gain(&text) {
        EffectKind::Lifegain(amount)
    } else if text.contains("gets +") || text.contains("get +") || text.contains("+1/+1") {
        EffectKind::Pump
    } else if text.contains("untap") {
        EffectKind::Untap
    } else if text.contains("add {") || text.starts_with("add ") {
        EffectKind::Mana
    } else {
        EffectKind::Unknown
    }
}

/// Extract N from "deals N damage"
pub(crate) fn parse_damage_amount(text: &str) -> Option<i32> {
    let lower = text.to_lowercase();
    let idx = lower.find("deals ")?;
    let rest = &lower[idx + "deals ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if !rest[digits.len()..].trim_start().starts_with("damage") {
        return None;
    }
    digits.parse().ok()
}

fn parse_draw_count(text: &str) -> u32 {
    let Some(idx) = text.find("draw ") else {
        return 1;
    };
    let rest = &text[idx + "draw ".len()..];
    if rest.starts_with("two") {
        2
    } else if rest.starts_with("three") {
        3
    } else {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(1)
    }
}

fn parse_life_gain(text: &str) -> Option<i32> {
    let idx = text.find("gain ")?;
    let rest = &text[idx + "gain ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with("life") {
        return None;
    }
    digits.parse().ok()
}

fn parse_pay_life(text: &str) -> Option<i32> {
    let idx = text.find("pay ")?;
    let rest = &text[idx + "pay ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with("life") {
        return None;
    }
    digits.parse().ok()
}

/// Parse only the tokens of a cost string that are pure mana symbols, so
/// prose like "Sacrifice a Creature" never reads as colorless pips
fn parse_mana_tokens(cost_text: &str) -> ManaCost {
    let mut combined = String::new();
    for token in cost_text.split(&[',', ':'][..]) {
        let cleaned: String = token.chars().filter(|c| !c.is_whitespace() && *c != '{' && *c != '}').collect();
        if !cleaned.is_empty() && cleaned.chars().all(|c| c.is_ascii_digit() || "WUBRGC".contains(c)) {
            combined.push_str(&cleaned);
        }
    }
    ManaCost::from_string(&combined)
}

/// Base card quality: curve value, type weights, stat profile, keywords
pub(crate) fn base_card_quality(card: &Card) -> f64 {
    let mut value = 0.0;
    let cmc = card.mana_cost.cmc() as f64;

    // Curve value peaks in the 2-4 range
    value += if (2.0..=4.0).contains(&cmc) {
        cmc * 0.2
    } else if cmc == 1.0 {
        0.22
    } else if cmc == 0.0 {
        0.12
    } else if cmc <= 6.0 {
        1.0 + (cmc - 4.0) * 0.12
    } else {
        1.24 + (cmc - 6.0) * 0.07
    };

    // Color-hungry costs are harder to deploy on curve
    if card.mana_cost.colored_pips() >= 3 {
        value -= 0.05;
    }

    for card_type in &card.types {
        value += match card_type {
            CardType::Creature => 0.6,
            CardType::Instant => 0.5,
            CardType::Sorcery => 0.45,
            CardType::Enchantment => 0.4,
            CardType::Artifact => 0.4,
            CardType::Planeswalker => 0.9,
            CardType::Land => 0.3,
        };
    }
    if card.types.len() > 1 {
        value += 0.05;
    }

    if card.is_creature() {
        let power = card.power.unwrap_or(0).max(0) as f64;
        let toughness = card.toughness.unwrap_or(0).max(0) as f64;

        // Stat profiles: glass cannons and walls are worth less than the
        // sum of their numbers
        let mut stats = if power >= 2.0 * toughness && toughness > 0.0 {
            power * 0.7 + toughness * 0.3
        } else if toughness >= 2.0 * power && power > 0.0 {
            power * 0.4 + toughness * 0.6
        } else {
            (power + toughness) / 2.0
        } / 4.0;

        if cmc > 0.0 {
            let efficiency = (power + toughness) / cmc;
            if efficiency > 2.0 {
                stats *= 1.3;
            } else if efficiency > 1.0 {
                stats *= 1.1;
            }
        }
        if power == 0.0 {
            stats *= 0.5;
        }
        value += stats;
    }

    let mut keyword_value = 0.0;
    let mut keyword_count = 0usize;
    for keyword in &card.keywords {
        let weight = match keyword {
            crate::core::Keyword::Flying => 0.30,
            crate::core::Keyword::DoubleStrike => 0.35,
            crate::core::Keyword::FirstStrike => 0.15,
            crate::core::Keyword::Deathtouch => 0.25,
            crate::core::Keyword::Lifelink => 0.20,
            crate::core::Keyword::Trample => 0.15,
            crate::core::Keyword::Haste => 0.20,
            crate::core::Keyword::Vigilance => 0.15,
            crate::core::Keyword::Menace => 0.15,
            crate::core::Keyword::Indestructible => 0.30,
            crate::core::Keyword::Hexproof => 0.25,
            crate::core::Keyword::Reach => 0.10,
            crate::core::Keyword::Shroud => 0.15,
            crate::core::Keyword::Defender => -0.10,
            crate::core::Keyword::Other(_) => 0.05,
        };
        if weight != 0.0 {
            keyword_value += weight;
            keyword_count += 1;
        }
    }
    if keyword_count > 1 {
        keyword_value *= 1.0 + (keyword_count - 1) as f64 * 0.1;
    }
    value + keyword_value
}
