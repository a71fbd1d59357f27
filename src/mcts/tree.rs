//! Arena-backed search tree.
//!
//! Nodes live in one contiguous `Vec` and refer to each other by [`NodeId`]. Ownership runs
//! parent to children through the arena; the `parent` field is only an index, so the structure
//! cannot form cycles. Nodes are never removed or re-parented; the whole arena is dropped at once.

use crate::mcts::node::{NodeId, SearchNode};
use crate::{MctsError, Result};

#[derive(Debug, Clone)]
pub struct SearchTree<A> {
    nodes: Vec<SearchNode<A>>,
    root: NodeId,
}

impl<A> SearchTree<A> {
    /// Creates a tree holding only a root whose untried actions are `root_actions`.
    pub fn new(root_actions: Vec<A>) -> Self {
        SearchTree {
            nodes: vec![SearchNode::new_root(root_actions)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<A> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<A> {
        &mut self.nodes[id.0]
    }

    /// Total number of nodes, root included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a constructed tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode<A>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Adds one visit and `outcome` to `id` and every ancestor up to the root.
    pub fn backpropagate(&mut self, id: NodeId, outcome: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.record(outcome);
            current = node.parent;
        }
    }

    /// Number of edges between the root and `id`
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Checks the statistical invariants of every node.
    ///
    /// - `|score_total| <= visit_count` (outcomes are bounded by 1 in magnitude)
    /// - a child never has more visits than its parent
    /// - a node's visits are at least the sum of its children's visits
    /// - every child points back at the node that lists it
    pub fn validate(&self) -> Result<()> {
        for (id, node) in self.iter() {
            let visits = node.visit_count as f64;
            if node.score_total.abs() > visits + 1e-9 {
                return Err(MctsError::InconsistentTree(format!(
                    "node {:?} has score {} outside [-{}, {}]",
                    id, node.score_total, visits, visits
                )));
            }

            let mut child_visits: u64 = 0;
            for (_, child_id) in &node.children {
                let child = self.get(*child_id);
                if child.parent != Some(id) {
                    return Err(MctsError::InconsistentTree(format!(
                        "node {:?} lists {:?} as a child but its parent is {:?}",
                        id, child_id, child.parent
                    )));
                }
                if child.visit_count > node.visit_count {
                    return Err(MctsError::InconsistentTree(format!(
                        "child {:?} has {} visits, more than parent {:?} with {}",
                        child_id, child.visit_count, id, node.visit_count
                    )));
                }
                child_visits += child.visit_count;
            }
            if child_visits > node.visit_count {
                return Err(MctsError::InconsistentTree(format!(
                    "children of {:?} hold {} visits, parent only {}",
                    id, child_visits, node.visit_count
                )));
            }
        }
        Ok(())
    }
}

impl<A: Clone + PartialEq> SearchTree<A> {
    /// Allocates a child of `parent` reached by `action`.
    ///
    /// The caller has already removed `action` from the parent's untried list.
    pub fn add_child(&mut self, parent: NodeId, action: A, legal_actions: Vec<A>) -> Result<NodeId> {
        if self.get(parent).child(&action).is_some() {
            return Err(MctsError::InconsistentTree(format!(
                "node {:?} already has a child for this action",
                parent
            )));
        }
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(SearchNode::new_child(parent, action.clone(), legal_actions));
        self.get_mut(parent).children.push((action, id));
        Ok(id)
    }

    /// Actions from the root down to `id`, in playing order.
    pub fn path_actions(&self, id: NodeId) -> Vec<A> {
        let mut actions = Vec::new();
        let mut current = self.get(id);
        while let (Some(action), Some(parent)) = (&current.parent_action, current.parent) {
            actions.push(action.clone());
            current = self.get(parent);
        }
        actions.reverse();
        actions
    }
}
