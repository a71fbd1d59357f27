//! # UCT Bot Library
//!
//! A generic Monte Carlo Tree Search engine that picks one action for the player to move in a
//! two-player, perfect-information, zero-sum game.
//!
//! ## Features
//!
//! - **Game Oracle**: the [`GameOracle`] trait a game implements to be searchable
//! - **Search Engine**: UCT selection, FIFO expansion, random rollouts and backpropagation
//! - **Configuration**: serde-loadable [`SearchConfig`] with iteration and wall-clock budgets
//! - **Demo Game**: a complete tic-tac-toe oracle and a match runner
//!
//! ## Usage
//!
//! ```rust
//! use uct_bot::{decide, SearchConfig, TicTacToe, GameOracle};
//!
//! let game = TicTacToe::new();
//! let state = game.initial_state();
//! let config = SearchConfig {
//!     iteration_budget: 200,
//!     random_seed: Some(7),
//!     ..SearchConfig::default()
//! };
//! let action = decide(&game, &state, &config).unwrap();
//! assert!(game.legal_actions(&state).contains(&action));
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Game oracle trait and the bundled demo game
pub mod game;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Logger setup shared by the binary and tests
pub mod logging;

/// Full games between search and random agents
pub mod match_runner;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::oracle::{GameOracle, Player, Scores};
pub use game::tic_tac_toe::TicTacToe;

pub use mcts::algorithm::{decide, TreeSearchEngine};
pub use mcts::config::{FinalActionPolicy, SearchConfig};
pub use mcts::mcts_result::{ChildStats, SearchResult, Termination};
pub use mcts::node::{NodeId, SearchNode};
pub use mcts::tree::SearchTree;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the UCT bot library
#[derive(Debug, thiserror::Error)]
pub enum MctsError {
    #[error("No legal decision to make: the root state is terminal")]
    TerminalRoot,

    #[error("No legal decision to make: the iteration budget is zero")]
    ZeroBudget,

    #[error("No legal decision to make: the search ended before any root child was explored")]
    NoExploredChildren,

    #[error("Game oracle contract violated: {0}")]
    OracleContract(String),

    #[error("Search tree is inconsistent: {0}")]
    InconsistentTree(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MctsError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
