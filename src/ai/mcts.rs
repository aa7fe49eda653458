//! Monte-Carlo tree search for critical decisions
//!
//! Nodes live in an arena indexed by `NodeId`; parent/child links are
//! indices, so the tree has no reference cycles and is dropped wholesale
//! after every decision. Each node owns its snapshot: a simulation clones
//! from its node, never from a sibling.

use crate::ai::profile::GameStage;
use crate::ai::SearchContext;
use crate::core::PlayerId;
use crate::error::{DecisionError, Result};
use crate::game::{Action, RulesEngine, StateSnapshot};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// MCTS tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    /// PUCT exploration constant
    pub c_puct: f64,

    /// Simulation count before board/branching adjustments
    pub base_simulations: u32,

    /// Hard cap on actions applied per rollout
    pub max_rollout_steps: u32,

    /// Rollout stops this many turns past the root
    pub rollout_turn_horizon: u32,

    /// Minimum prior probability mass per edge, so a bad quick score
    /// never starves an action of exploration entirely
    pub prior_floor: f64,

    /// Node allocation cap
    pub max_nodes: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            c_puct: 1.4,
            base_simulations: 100,
            max_rollout_steps: 24,
            rollout_turn_horizon: 5,
            prior_floor: 0.05,
            max_nodes: 10_000,
        }
    }
}

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    const NONE: NodeId = NodeId(u32::MAX);

    fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge from a node to the child reached by one action
#[derive(Debug, Clone)]
struct Edge {
    action: Action,
    prior: f64,
    child: NodeId,
    visits: u32,
    value_sum: f64,
}

impl Edge {
    fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

/// One search node. Owns its snapshot.
#[derive(Debug)]
struct MctsNode {
    state: StateSnapshot,
    #[allow(dead_code)]
    parent: NodeId,
    to_move: PlayerId,
    visits: u32,
    terminal: bool,
    edges: Vec<Edge>,
}

/// Counters from the last search
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub simulations: u32,
    pub nodes_expanded: u32,
    pub max_depth: u32,
}

/// The search engine. Reused across decisions; the tree itself is
/// cleared at the start of every search.
#[derive(Debug, Default)]
pub struct MctsEngine {
    pub config: MctsConfig,
    nodes: Vec<MctsNode>,
    stats: SearchStats,
}

impl MctsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MctsConfig) -> Self {
        MctsEngine {
            config,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Visit counts of the root's children after a search
    pub fn root_visits(&self) -> Vec<(Action, u32)> {
        self.nodes
            .first()
            .map(|root| root.edges.iter().map(|e| (e.action.clone(), e.visits)).collect())
            .unwrap_or_default()
    }

    /// Simulation budget for this decision: smaller on wide boards and
    /// wide action lists, larger for combat declarations and late turns
    pub fn simulation_budget(&self, state: &StateSnapshot, legal_count: usize) -> u32 {
        let mut simulations = self.config.base_simulations;

        let permanents = state.permanent_count();
        if permanents > 15 {
            simulations = 50;
        } else if permanents > 10 {
            simulations = 75;
        }

        if legal_count > 20 {
            simulations = (simulations / 2).max(30);
        }

        if state.turn.current_step.is_combat_declaration() {
            simulations = (simulations + 50).min(200);
        }

        if GameStage::from_turn(state.turn.turn_number) == GameStage::Late {
            simulations = ((simulations as f64 * 1.5) as u32).min(200);
        }

        simulations
    }

    /// Run the search and return the robust child: the root action with
    /// the highest visit count, not the highest mean value.
    pub fn search<R: RulesEngine>(
        &mut self,
        ctx: &SearchContext<'_, R>,
        state: &StateSnapshot,
        legal: &[Action],
        rng: &mut ChaCha12Rng,
    ) -> Result<Action> {
        if legal.is_empty() {
            return Err(DecisionError::NoLegalActions);
        }

        self.nodes.clear();
        self.stats = SearchStats::default();

        let budget = self.simulation_budget(state, legal.len());

        let root = self.alloc(MctsNode {
            state: state.clone(),
            parent: NodeId::NONE,
            to_move: state.turn.active_player,
            visits: 0,
            terminal: false,
            edges: Vec::new(),
        });
        self.expand_node(ctx, root, Some(legal));

        if self.nodes[root.index()].terminal || self.nodes[root.index()].edges.is_empty() {
            return Err(DecisionError::EmptySearch("root state is terminal".to_string()));
        }

        for _ in 0..budget {
            if self.nodes.len() >= self.config.max_nodes {
                break;
            }
            self.simulate_once(ctx, root, rng);
        }

        let root_node = &self.nodes[root.index()];
        let mut best: Option<&Edge> = None;
        for edge in &root_node.edges {
            if best.map(|b| edge.visits > b.visits).unwrap_or(true) {
                best = Some(edge);
            }
        }

        let best = best.ok_or_else(|| DecisionError::EmptySearch("no root edges".to_string()))?;
        if !best.mean_value().is_finite() {
            return Err(DecisionError::ValueOutOfRange(best.mean_value()));
        }

        #[cfg(feature = "verbose-logging")]
        ctx.logger.search(&format!(
            "mcts: {} simulations, {} nodes, best '{}' with {} visits (mean {:.3})",
            self.stats.simulations,
            self.nodes.len(),
            best.action.kind(),
            best.visits,
            best.mean_value()
        ));

        Ok(best.action.clone())
    }

    fn alloc(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// One simulation: select down to an unexpanded edge or terminal
    /// node, expand, roll out, backpropagate.
    fn simulate_once<R: RulesEngine>(&mut self, ctx: &SearchContext<'_, R>, root: NodeId, rng: &mut ChaCha12Rng) {
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = root;

        let value = loop {
            if self.nodes[current.index()].terminal {
                break Self::state_value(&self.nodes[current.index()].state, ctx.perspective);
            }

            let edge_idx = self.select_edge(current);
            path.push((current, edge_idx));

            let child = self.nodes[current.index()].edges[edge_idx].child;
            if child.is_none() {
                let child = self.expand_child(ctx, current, edge_idx);
                break self.rollout(ctx, child, rng);
            }
            current = child;
        };

        self.stats.simulations += 1;
        self.stats.max_depth = self.stats.max_depth.max(path.len() as u32);
        self.backpropagate(ctx.perspective, &path, value);
    }

    /// PUCT: Q(child) + c * prior * sqrt(sibling visits) / (1 + visits)
    fn select_edge(&self, node_id: NodeId) -> usize {
        let node = &self.nodes[node_id.index()];
        let total_visits: u32 = node.edges.iter().map(|e| e.visits).sum();
        let sqrt_total = (total_visits.max(1) as f64).sqrt();

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, edge) in node.edges.iter().enumerate() {
            let exploit = edge.mean_value();
            let explore = self.config.c_puct * edge.prior * sqrt_total / (1.0 + edge.visits as f64);
            let score = exploit + explore;
            if score > best_score {
                best_score = score;
                best = i;
            }
        }
        best
    }

    /// Clone the parent state, apply the edge action, expand the child
    fn expand_child<R: RulesEngine>(&mut self, ctx: &SearchContext<'_, R>, parent: NodeId, edge_idx: usize) -> NodeId {
        let mut next = self.nodes[parent.index()].state.clone();
        let action = self.nodes[parent.index()].edges[edge_idx].action.clone();
        ctx.rules.apply_action(&mut next, &action);

        let to_move = next.turn.active_player;
        let child = self.alloc(MctsNode {
            state: next,
            parent,
            to_move,
            visits: 0,
            terminal: false,
            edges: Vec::new(),
        });
        self.nodes[parent.index()].edges[edge_idx].child = child;
        self.expand_node(ctx, child, None);
        self.stats.nodes_expanded += 1;
        child
    }

    /// Generate edges with priors from normalized quick scores
    fn expand_node<R: RulesEngine>(&mut self, ctx: &SearchContext<'_, R>, node_id: NodeId, provided: Option<&[Action]>) {
        let is_terminal = {
            let state = &self.nodes[node_id.index()].state;
            ctx.rules.is_terminal(state).is_some() || Self::decided(state)
        };
        if is_terminal {
            self.nodes[node_id.index()].terminal = true;
            return;
        }

        let (actions, scores) = {
            let node = &self.nodes[node_id.index()];
            let actions: Vec<Action> = match provided {
                Some(actions) => actions.to_vec(),
                None => ctx.rules.legal_actions(&node.state),
            };
            let scores: Vec<f64> = actions
                .iter()
                .map(|action| {
                    ctx.actions
                        .evaluate(&node.state, action, node.to_move, ctx.profile)
                        .max(0.0)
                        + self.config.prior_floor
                })
                .collect();
            (actions, scores)
        };

        if actions.is_empty() {
            self.nodes[node_id.index()].terminal = true;
            return;
        }

        let total: f64 = scores.iter().sum();
        let edges: Vec<Edge> = actions
            .into_iter()
            .zip(scores)
            .map(|(action, score)| Edge {
                action,
                prior: score / total,
                child: NodeId::NONE,
                visits: 0,
                value_sum: 0.0,
            })
            .collect();
        self.nodes[node_id.index()].edges = edges;
    }

    /// Policy-guided playout with a step budget and turn horizon
    fn rollout<R: RulesEngine>(&mut self, ctx: &SearchContext<'_, R>, node_id: NodeId, rng: &mut ChaCha12Rng) -> f64 {
        let mut state = self.nodes[node_id.index()].state.clone();
        let horizon = state.turn.turn_number + self.config.rollout_turn_horizon;

        for _ in 0..self.config.max_rollout_steps {
            if ctx.rules.is_terminal(&state).is_some() || Self::decided(&state) {
                break;
            }
            if state.turn.turn_number > horizon {
                break;
            }
            let actions = ctx.rules.legal_actions(&state);
            if actions.is_empty() {
                break;
            }
            let pick = Self::rollout_policy_pick(&state, &actions, rng);
            ctx.rules.apply_action(&mut state, &actions[pick]);
        }

        Self::state_value(&state, ctx.perspective)
    }

    /// Rollout action preference: land drop first, then cheap spells,
    /// combat, abilities, and phase advancement last, with randomness
    fn rollout_policy_pick(state: &StateSnapshot, actions: &[Action], rng: &mut ChaCha12Rng) -> usize {
        let turn_player = state.turn.active_player;
        let weights: Vec<f64> = actions
            .iter()
            .map(|action| match action {
                Action::PlayCard { card_id } => match state.card(*card_id) {
                    Some(card)
                        if card.is_land()
                            && state.player(turn_player).map(|p| p.can_play_land()).unwrap_or(false) =>
                    {
                        8.0
                    }
                    Some(card) if card.mana_cost.cmc() <= 3 => 5.0,
                    Some(_) => 3.0,
                    None => 1.0,
                },
                Action::DeclareAttackers { .. } | Action::DeclareBlockers { .. } => 4.0,
                // Tapping for mana is a wasted rollout step unless the
                // engine forces it; keep it level with passing
                Action::ActivateAbility { card_id, ability_index } => {
                    match state.card(*card_id).and_then(|c| c.abilities.get(*ability_index)) {
                        Some(ability) if ability.is_mana_ability => 1.0,
                        _ => 2.0,
                    }
                }
                Action::EndTurn | Action::PassPriority => 1.0,
            })
            .collect();

        let total: f64 = weights.iter().sum();
        let mut roll = rng.gen::<f64>() * total;
        for (i, weight) in weights.iter().enumerate() {
            roll -= weight;
            if roll <= 0.0 {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Reward sign alternates with the player to move: an edge's value
    /// sum is from the view of the player who takes that action.
    fn backpropagate(&mut self, perspective: PlayerId, path: &[(NodeId, usize)], value: f64) {
        for &(node_id, edge_idx) in path.iter().rev() {
            let node = &mut self.nodes[node_id.index()];
            node.visits += 1;
            let edge = &mut node.edges[edge_idx];
            edge.visits += 1;
            edge.value_sum += if node.to_move == perspective { value } else { -value };
        }
    }

    fn decided(state: &StateSnapshot) -> bool {
        state.players.iter().any(|p| p.life <= 0 || p.has_lost)
    }

    /// End-of-rollout evaluation: decisive results are +-1, everything
    /// else a blended life/card/board/power heuristic
    fn state_value(state: &StateSnapshot, perspective: PlayerId) -> f64 {
        let Some(opponent) = state.opponent_of(perspective) else {
            return 0.0;
        };
        let my_life = state.life_of(perspective);
        let opp_life = state.life_of(opponent);

        if opp_life <= 0 && my_life > 0 {
            return 1.0;
        }
        if my_life <= 0 && opp_life > 0 {
            return -1.0;
        }
        if my_life <= 0 && opp_life <= 0 {
            return 0.0;
        }

        let life_scale = crate::ai::position::starting_life(state).max(1) as f64;
        let life = (my_life - opp_life) as f64 / life_scale;
        let cards = (state.hand(perspective).len() as f64 - state.hand(opponent).len() as f64) / 5.0;
        let board = (state.battlefield_of(perspective).count() as f64 - state.battlefield_of(opponent).count() as f64) / 6.0;
        let power = (state.board_power(perspective) - state.board_power(opponent)) as f64 / 10.0;

        (0.5 * life + 0.2 * cards + 0.15 * board + 0.15 * power).tanh()
    }
}
