//! Core Monte Carlo Tree Search decision loop.
//!
//! One call to [`TreeSearchEngine::search`] builds a fresh tree rooted at the given state, runs
//! the configured number of playouts (selection, expansion, rollout, backpropagation), and reads
//! the chosen action off the root's children. Each iteration runs to completion before the
//! budget is checked again, so the statistics are consistent whenever the loop stops.
use crate::game::oracle::{GameOracle, Player};
use crate::mcts::config::{FinalActionPolicy, SearchConfig};
use crate::mcts::mcts_result::{ChildStats, SearchResult, Termination};
use crate::mcts::node::NodeId;
use crate::mcts::rollout::{rollout, terminal_outcome};
use crate::mcts::selection::{descend, signed_winrate};
use crate::mcts::tree::SearchTree;
use crate::{MctsError, Result};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::time::Instant;

/// Picks an action for the player to move at `state`.
///
/// Convenience wrapper around [`TreeSearchEngine::search`] that drops the statistics.
pub fn decide<G: GameOracle>(
    oracle: &G,
    state: &G::State,
    config: &SearchConfig,
) -> Result<G::Action> {
    TreeSearchEngine::new(oracle, config)
        .search(state)
        .map(|result| result.action)
}

/// UCT search over a [`GameOracle`]
pub struct TreeSearchEngine<'a, G: GameOracle> {
    oracle: &'a G,
    config: &'a SearchConfig,
}

impl<'a, G: GameOracle> TreeSearchEngine<'a, G> {
    pub fn new(oracle: &'a G, config: &'a SearchConfig) -> Self {
        Self { oracle, config }
    }

    pub fn config(&self) -> &SearchConfig {
        self.config
    }

    /// Runs one full decision from `state`.
    ///
    /// # Errors
    /// - [`MctsError::TerminalRoot`] if `state` is already terminal
    /// - [`MctsError::ZeroBudget`] if the iteration budget is zero
    /// - [`MctsError::NoExploredChildren`] if the clock ran out before the first iteration
    /// - [`MctsError::OracleContract`] if the oracle breaks its contract during the search
    pub fn search(&self, state: &G::State) -> Result<SearchResult<G::Action>> {
        self.config.validate()?;
        if self.oracle.is_ended(state) {
            return Err(MctsError::TerminalRoot);
        }
        if self.config.iteration_budget == 0 {
            return Err(MctsError::ZeroBudget);
        }

        let identity = self.oracle.current_player(state);
        let root_actions = checked_legal_actions(self.oracle, state)?;
        let mut tree = SearchTree::new(root_actions.clone());

        let seed = self.config.random_seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let time_budget = self.config.time_budget()?;

        log::debug!(
            "Starting search for {}: {} legal actions, seed={}, {}",
            identity,
            root_actions.len(),
            seed,
            self.config.to_config_string()
        );

        let start = Instant::now();
        let mut termination = Termination::BudgetExhausted;
        let mut iterations = 0usize;

        while iterations < self.config.iteration_budget {
            if let Some(limit) = time_budget {
                if start.elapsed() >= limit {
                    termination = Termination::TimeExpired;
                    break;
                }
            }
            self.run_iteration(&mut tree, state, identity, &mut rng)?;
            iterations += 1;
        }

        let elapsed = start.elapsed();
        let action = self.final_action(&tree, &root_actions, identity)?;
        let children = root_child_stats(&tree, identity)?;

        log::debug!(
            "Search finished: chose {:?} after {} iterations ({:?}), {} nodes, {:.1} ms",
            action,
            iterations,
            termination,
            tree.len(),
            elapsed.as_secs_f64() * 1000.0
        );

        Ok(SearchResult {
            action,
            identity,
            iterations,
            nodes_created: tree.len(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            termination,
            children,
            tree,
        })
    }

    /// Selection, expansion, simulation and backpropagation for one playout.
    fn run_iteration(
        &self,
        tree: &mut SearchTree<G::Action>,
        root_state: &G::State,
        identity: Player,
        rng: &mut StdRng,
    ) -> Result<()> {
        let (frontier, frontier_state) = descend(
            self.oracle,
            tree,
            root_state,
            identity,
            self.config.exploration_constant,
        )?;

        let (leaf, outcome) = match self.expand(tree, frontier, &frontier_state)? {
            Some((child, child_state)) => {
                let outcome = rollout(
                    self.oracle,
                    &child_state,
                    rng,
                    self.config.max_rollout_plies,
                )?;
                (child, outcome)
            }
            None => {
                // Nothing left to expand and nothing below: a terminal position already in the tree
                if !self.oracle.is_ended(&frontier_state) {
                    return Err(MctsError::OracleContract(format!(
                        "frontier node {:?} has no actions but its state is not terminal",
                        frontier
                    )));
                }
                (frontier, terminal_outcome(self.oracle, &frontier_state)?)
            }
        };

        log::trace!(
            "Iteration: frontier depth {}, leaf {:?}, outcome {}",
            tree.depth(frontier),
            leaf,
            outcome
        );

        tree.backpropagate(leaf, outcome);
        Ok(())
    }

    /// Creates the child for the first untried action of `node`.
    ///
    /// Returns `None` when every action has already been expanded.
    fn expand(
        &self,
        tree: &mut SearchTree<G::Action>,
        node: NodeId,
        state: &G::State,
    ) -> Result<Option<(NodeId, G::State)>> {
        let Some(action) = tree.get_mut(node).untried_actions.pop_front() else {
            return Ok(None);
        };

        let child_state = self.oracle.next_state(state, &action);
        let child_actions = checked_legal_actions(self.oracle, &child_state)?;
        let child = tree.add_child(node, action, child_actions)?;
        Ok(Some((child, child_state)))
    }

    /// Best root child under the configured policy, first maximizer on ties.
    ///
    /// Only actions legal at the root are eligible.
    fn final_action(
        &self,
        tree: &SearchTree<G::Action>,
        root_actions: &[G::Action],
        identity: Player,
    ) -> Result<G::Action> {
        let root = tree.get(tree.root());
        let mut best: Option<(f64, &G::Action)> = None;

        for (action, child_id) in &root.children {
            if !root_actions.contains(action) {
                continue;
            }
            let child = tree.get(*child_id);
            let value = match self.config.final_action {
                FinalActionPolicy::BestWinrate => signed_winrate(child, identity)?,
                FinalActionPolicy::MostVisited => child.visit_count as f64,
            };
            match best {
                Some((best_value, _)) if value <= best_value => {}
                _ => best = Some((value, action)),
            }
        }

        best.map(|(_, action)| action.clone())
            .ok_or(MctsError::NoExploredChildren)
    }
}

/// Legal actions, checked against the terminal test.
fn checked_legal_actions<G: GameOracle>(oracle: &G, state: &G::State) -> Result<Vec<G::Action>> {
    let actions = oracle.legal_actions(state);
    let ended = oracle.is_ended(state);
    if actions.is_empty() && !ended {
        return Err(MctsError::OracleContract(
            "legal_actions returned nothing for a non-terminal state".to_string(),
        ));
    }
    if !actions.is_empty() && ended {
        return Err(MctsError::OracleContract(
            "legal_actions returned actions for a terminal state".to_string(),
        ));
    }
    Ok(actions)
}

fn root_child_stats<A: Clone>(tree: &SearchTree<A>, identity: Player) -> Result<Vec<ChildStats<A>>> {
    tree.get(tree.root())
        .children
        .iter()
        .map(|(action, child_id)| {
            let child = tree.get(*child_id);
            Ok(ChildStats {
                action: action.clone(),
                visits: child.visit_count,
                score_total: child.score_total,
                signed_winrate: signed_winrate(child, identity)?,
            })
        })
        .collect()
}
