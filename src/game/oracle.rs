//! Game-rules oracle consumed by the search engine.
//!
//! The engine never looks inside a game state. Everything it knows about a game comes from the
//! five queries of [`GameOracle`], which must behave as pure functions of their arguments.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The player whose outcomes are accumulated in every node's score total.
    pub const SCORING: Player = Player::One;

    /// Numeric id (1 or 2)
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// +1.0 for the scoring player, -1.0 for the other one.
    ///
    /// Multiplying a score total by this converts it into this player's perspective.
    pub fn sign(self) -> f64 {
        if self == Player::SCORING {
            1.0
        } else {
            -1.0
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.id())
    }
}

/// Terminal outcome per player. Zero-sum: the two entries add up to zero.
pub type Scores = HashMap<Player, f64>;

/// Builds the canonical score map for a finished game.
///
/// `winner == None` is a draw.
pub fn outcome_scores(winner: Option<Player>) -> Scores {
    let mut scores = Scores::with_capacity(2);
    match winner {
        Some(player) => {
            scores.insert(player, 1.0);
            scores.insert(player.opponent(), -1.0);
        }
        None => {
            scores.insert(Player::One, 0.0);
            scores.insert(Player::Two, 0.0);
        }
    }
    scores
}

/// Rules of a two-player, turn-based, perfect-information game.
///
/// Implementations must guarantee that every line of play is finite and that
/// `legal_actions` is empty exactly when `is_ended` is true.
pub trait GameOracle {
    /// Immutable game position. Threaded through the search by value, never stored on nodes.
    type State: Clone;

    /// A move. Compared by equality to key the children of a search node.
    type Action: Clone + PartialEq + Debug;

    /// All actions available to the player to move; empty iff the state is terminal.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor position. Must not mutate `state`.
    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    fn is_ended(&self, state: &Self::State) -> bool;

    /// Outcome per player. Only meaningful at terminal states.
    fn points_values(&self, state: &Self::State) -> Scores;

    /// Whose turn it is at `state`.
    fn current_player(&self, state: &Self::State) -> Player;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids_and_opponents() {
        assert_eq!(Player::One.id(), 1);
        assert_eq!(Player::Two.id(), 2);
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_sign_follows_scoring_player() {
        assert_eq!(Player::SCORING, Player::One);
        assert_eq!(Player::One.sign(), 1.0);
        assert_eq!(Player::Two.sign(), -1.0);
    }

    #[test]
    fn test_outcome_scores_are_zero_sum() {
        for winner in [Some(Player::One), Some(Player::Two), None] {
            let scores = outcome_scores(winner);
            assert_eq!(scores.len(), 2);
            assert_eq!(scores[&Player::One] + scores[&Player::Two], 0.0);
        }
        assert_eq!(outcome_scores(Some(Player::Two))[&Player::Two], 1.0);
        assert_eq!(outcome_scores(None)[&Player::One], 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Player::Two.to_string(), "player 2");
    }
}
