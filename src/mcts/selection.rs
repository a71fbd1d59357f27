//! UCT selection
//!
//! Statistics are stored from the scoring player's perspective. The deciding player's sign is
//! applied here, at comparison time, and the same sign convention is used by the final action
//! choice in [`algorithm`](crate::mcts::algorithm).
//!
//! Formula: signed_mean(child) + C × sqrt(ln(N_parent) / N_child)

use crate::game::oracle::{GameOracle, Player};
use crate::mcts::node::{NodeId, SearchNode};
use crate::mcts::tree::SearchTree;
use crate::{MctsError, Result};

/// Mean outcome of `node` seen from `identity`.
///
/// A node with no visits has no win rate; asking for one is an internal error.
pub fn signed_winrate<A>(node: &SearchNode<A>, identity: Player) -> Result<f64> {
    node.mean_score()
        .map(|mean| mean * identity.sign())
        .ok_or_else(|| {
            MctsError::InconsistentTree("win rate requested for an unvisited node".to_string())
        })
}

/// UCT value of `child` under a parent with `parent_visits` visits.
pub fn uct_score<A>(
    child: &SearchNode<A>,
    parent_visits: u64,
    identity: Player,
    exploration_constant: f64,
) -> Result<f64> {
    if child.visit_count == 0 {
        return Err(MctsError::InconsistentTree(
            "unvisited child reached UCT comparison".to_string(),
        ));
    }
    if parent_visits == 0 {
        return Err(MctsError::InconsistentTree(
            "UCT comparison under an unvisited parent".to_string(),
        ));
    }

    let exploitation = signed_winrate(child, identity)?;
    let exploration =
        exploration_constant * ((parent_visits as f64).ln() / child.visit_count as f64).sqrt();
    Ok(exploitation + exploration)
}

/// Child of `node_id` with the highest UCT value, first maximizer on ties.
///
/// Returns `None` when the node has no children.
pub fn select_best_child<A>(
    tree: &SearchTree<A>,
    node_id: NodeId,
    identity: Player,
    exploration_constant: f64,
) -> Result<Option<NodeId>> {
    let node = tree.get(node_id);
    let mut best: Option<(f64, NodeId)> = None;

    for (_, child_id) in &node.children {
        let score = uct_score(
            tree.get(*child_id),
            node.visit_count,
            identity,
            exploration_constant,
        )?;
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, *child_id)),
        }
    }

    Ok(best.map(|(_, id)| id))
}

/// Walks from the root to a frontier node, applying each edge's action to the state.
///
/// Stops at the first node that still has untried actions or has no children at all, and
/// returns it together with its game state.
pub fn descend<G: GameOracle>(
    oracle: &G,
    tree: &SearchTree<G::Action>,
    root_state: &G::State,
    identity: Player,
    exploration_constant: f64,
) -> Result<(NodeId, G::State)> {
    let mut node_id = tree.root();
    let mut state = root_state.clone();

    while !tree.get(node_id).is_frontier() {
        let child_id = select_best_child(tree, node_id, identity, exploration_constant)?
            .ok_or_else(|| {
                MctsError::InconsistentTree(format!("interior node {:?} has no children", node_id))
            })?;
        let action = tree.get(child_id).parent_action.as_ref().ok_or_else(|| {
            MctsError::InconsistentTree(format!("non-root node {:?} has no action", child_id))
        })?;
        if oracle.is_ended(&state) {
            return Err(MctsError::OracleContract(
                "tree edge leaves a terminal state".to_string(),
            ));
        }
        state = oracle.next_state(&state, action);
        node_id = child_id;
    }

    Ok((node_id, state))
}
