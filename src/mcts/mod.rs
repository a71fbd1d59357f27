pub mod algorithm;
pub mod config;
pub mod mcts_result;
pub mod node;
pub mod rollout;
pub mod selection;
pub mod tree;
