use crate::game::oracle::Player;
use crate::mcts::tree::SearchTree;
use serde::{Deserialize, Serialize};

/// Why the iteration loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    BudgetExhausted,
    TimeExpired,
}

/// Statistics of one root child, as seen by the deciding player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u64,
    /// Raw accumulator, scoring player's perspective
    pub score_total: f64,
    /// Mean outcome with the deciding player's sign applied
    pub signed_winrate: f64,
}

/// Outcome of one decision.
///
/// The finished tree travels with the result for inspection; dropping the result releases it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<A> {
    pub action: A,
    pub identity: Player,
    /// Completed iterations; equals the root's visit count
    pub iterations: usize,
    /// Nodes in the tree, root included
    pub nodes_created: usize,
    pub elapsed_ms: f64,
    pub termination: Termination,
    /// Root children in expansion order
    pub children: Vec<ChildStats<A>>,
    #[serde(skip)]
    pub tree: SearchTree<A>,
}

impl<A: PartialEq> SearchResult<A> {
    pub fn child_stats(&self, action: &A) -> Option<&ChildStats<A>> {
        self.children.iter().find(|c| &c.action == action)
    }

    /// Stats of the chosen action
    pub fn chosen(&self) -> Option<&ChildStats<A>> {
        self.child_stats(&self.action)
    }
}
