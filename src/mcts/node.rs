//! Search tree vertex.
//!
//! A node stores statistics and topology only. Its game state is implicit: replaying the
//! `parent_action` edges from the root reproduces it, so the engine threads states through the
//! search as local values instead of storing them here.

use std::collections::VecDeque;

/// Index of a node inside its [`SearchTree`](crate::mcts::tree::SearchTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A single vertex of the game tree
#[derive(Debug, Clone)]
pub struct SearchNode<A> {
    /// Action leading from the parent's state to this node's state; `None` only at the root
    pub parent_action: Option<A>,

    /// Non-owning back link, `None` for the root
    pub parent: Option<NodeId>,

    /// Explored children in expansion order. Keys are unique.
    pub children: Vec<(A, NodeId)>,

    /// Legal actions that have not produced a child yet, consumed front first
    pub untried_actions: VecDeque<A>,

    /// Completed playouts that passed through or ended at this node
    pub visit_count: u64,

    /// Sum of backpropagated outcomes, from the scoring player's perspective
    pub score_total: f64,
}

impl<A> SearchNode<A> {
    pub fn new_root(legal_actions: Vec<A>) -> Self {
        SearchNode {
            parent_action: None,
            parent: None,
            children: Vec::new(),
            untried_actions: legal_actions.into(),
            visit_count: 0,
            score_total: 0.0,
        }
    }

    pub fn new_child(parent: NodeId, action: A, legal_actions: Vec<A>) -> Self {
        SearchNode {
            parent_action: Some(action),
            parent: Some(parent),
            children: Vec::new(),
            untried_actions: legal_actions.into(),
            visit_count: 0,
            score_total: 0.0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True once every legal action from this node has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Selection stops here: either an action is left to expand or there is nothing below.
    pub fn is_frontier(&self) -> bool {
        !self.is_fully_expanded() || self.is_leaf()
    }

    /// Mean outcome for the scoring player, or `None` before the first visit
    pub fn mean_score(&self) -> Option<f64> {
        if self.visit_count == 0 {
            None
        } else {
            Some(self.score_total / self.visit_count as f64)
        }
    }

    /// Records one completed playout.
    pub fn record(&mut self, outcome: f64) {
        self.visit_count += 1;
        self.score_total += outcome;
    }
}

impl<A: PartialEq> SearchNode<A> {
    pub fn child(&self, action: &A) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_root() {
        let node = SearchNode::new_root(vec![1, 2, 3]);
        assert!(node.is_root());
        assert!(node.parent_action.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.score_total, 0.0);
        assert_eq!(node.untried_actions.len(), 3);
        assert!(!node.is_fully_expanded());
        assert!(node.is_leaf());
        assert!(node.is_frontier());
    }

    #[test]
    fn test_new_child_links_parent() {
        let node = SearchNode::new_child(NodeId(0), 'a', vec![]);
        assert!(!node.is_root());
        assert_eq!(node.parent, Some(NodeId(0)));
        assert_eq!(node.parent_action, Some('a'));
        assert!(node.is_fully_expanded());
        assert!(node.is_frontier());
    }

    #[test]
    fn test_mean_score() {
        let mut node = SearchNode::new_root(vec![0u8]);
        assert_eq!(node.mean_score(), None);

        node.record(1.0);
        node.record(-1.0);
        node.record(1.0);
        node.record(1.0);

        assert_eq!(node.visit_count, 4);
        assert_eq!(node.score_total, 2.0);
        assert!((node.mean_score().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_visit_count_passes_u32_range() {
        let mut node = SearchNode::new_root(vec![0u8]);
        node.visit_count = u32::MAX as u64;
        node.score_total = 0.0;
        node.record(1.0);
        assert_eq!(node.visit_count, u32::MAX as u64 + 1);
        assert_eq!(node.score_total, 1.0);
    }

    #[test]
    fn test_fully_expanded_interior_node_is_not_frontier() {
        let mut node = SearchNode::new_root(Vec::<u8>::new());
        node.children.push((7, NodeId(1)));
        assert!(node.is_fully_expanded());
        assert!(!node.is_frontier());
        assert_eq!(node.child(&7), Some(NodeId(1)));
        assert_eq!(node.child(&8), None);
    }
}
