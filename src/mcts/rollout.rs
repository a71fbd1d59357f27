//! Random playouts and terminal scoring.

use crate::game::oracle::{GameOracle, Player};
use crate::{MctsError, Result};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Reads the scoring player's outcome at a terminal state.
///
/// Fails fast when the oracle breaks its scoring contract: a missing entry, a non-zero-sum
/// pair, or a value outside [-1, 1].
pub fn terminal_outcome<G: GameOracle>(oracle: &G, state: &G::State) -> Result<f64> {
    let scores = oracle.points_values(state);
    let scoring = scores.get(&Player::SCORING).copied().ok_or_else(|| {
        MctsError::OracleContract(format!("no score reported for {}", Player::SCORING))
    })?;
    let other = scores
        .get(&Player::SCORING.opponent())
        .copied()
        .ok_or_else(|| {
            MctsError::OracleContract(format!(
                "no score reported for {}",
                Player::SCORING.opponent()
            ))
        })?;

    if !scoring.is_finite() || scoring.abs() > 1.0 {
        return Err(MctsError::OracleContract(format!(
            "score {} for {} is outside [-1, 1]",
            scoring,
            Player::SCORING
        )));
    }
    if (scoring + other).abs() > 1e-9 {
        return Err(MctsError::OracleContract(format!(
            "scores {} and {} are not zero-sum",
            scoring, other
        )));
    }
    Ok(scoring)
}

/// Plays uniformly random legal actions from `state` until the game ends, then scores it.
///
/// `max_plies` bounds the playout length; exceeding it means the oracle produced a game line
/// that does not terminate.
pub fn rollout<G: GameOracle>(
    oracle: &G,
    state: &G::State,
    rng: &mut StdRng,
    max_plies: Option<usize>,
) -> Result<f64> {
    let mut current = state.clone();
    let mut plies = 0usize;

    while !oracle.is_ended(&current) {
        if let Some(limit) = max_plies {
            if plies >= limit {
                return Err(MctsError::OracleContract(format!(
                    "rollout did not reach a terminal state within {} plies",
                    limit
                )));
            }
        }

        let actions = oracle.legal_actions(&current);
        let action = actions.choose(rng).ok_or_else(|| {
            MctsError::OracleContract(
                "legal_actions returned nothing for a non-terminal state".to_string(),
            )
        })?;
        current = oracle.next_state(&current, action);
        plies += 1;
    }

    terminal_outcome(oracle, &current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::oracle::{outcome_scores, Scores};
    use crate::game::tic_tac_toe::{Board, TicTacToe};
    use assert_matches::assert_matches;

    /// Counts down to zero; whoever moves at zero has lost. Scores can be tampered with.
    struct Countdown {
        broken_scores: Option<Scores>,
        stuck: bool,
    }

    impl Countdown {
        fn fair() -> Self {
            Countdown {
                broken_scores: None,
                stuck: false,
            }
        }
    }

    impl GameOracle for Countdown {
        type State = u32;
        type Action = u32;

        fn legal_actions(&self, state: &u32) -> Vec<u32> {
            if self.stuck {
                return Vec::new();
            }
            (1..=(*state).min(2)).collect()
        }

        fn next_state(&self, state: &u32, action: &u32) -> u32 {
            if self.stuck {
                *state
            } else {
                state - action
            }
        }

        fn is_ended(&self, state: &u32) -> bool {
            *state == 0
        }

        fn points_values(&self, _state: &u32) -> Scores {
            self.broken_scores
                .clone()
                .unwrap_or_else(|| outcome_scores(Some(Player::One)))
        }

        fn current_player(&self, state: &u32) -> Player {
            if state % 2 == 0 {
                Player::One
            } else {
                Player::Two
            }
        }
    }

    #[test]
    fn test_rollout_from_terminal_state_scores_directly() {
        let game = TicTacToe::new();
        let board = Board::parse("OOO/XX./X..").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rollout(&game, &board, &mut rng, None).unwrap(), -1.0);
    }

    #[test]
    fn test_rollout_outcome_is_a_canonical_score() {
        let game = TicTacToe::new();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let value = rollout(&game, &game.initial_state(), &mut rng, None).unwrap();
            assert!(value == 1.0 || value == -1.0 || value == 0.0);
        }
    }

    #[test]
    fn test_rollout_is_reproducible_under_seed() {
        let game = TicTacToe::new();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| rollout(&game, &game.initial_state(), &mut rng, None).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_empty_legal_actions_on_live_state_fails_fast() {
        let game = Countdown {
            broken_scores: None,
            stuck: true,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert_matches!(
            rollout(&game, &5, &mut rng, None),
            Err(MctsError::OracleContract(_))
        );
    }

    #[test]
    fn test_ply_guard() {
        let game = Countdown::fair();
        let mut rng = StdRng::seed_from_u64(0);
        assert_matches!(
            rollout(&game, &50, &mut rng, Some(3)),
            Err(MctsError::OracleContract(_))
        );
        assert_eq!(rollout(&game, &50, &mut rng, Some(50)).unwrap(), 1.0);
    }

    #[test]
    fn test_scoring_contract_violations() {
        let mut lopsided = Scores::new();
        lopsided.insert(Player::One, 1.0);
        lopsided.insert(Player::Two, 1.0);
        let game = Countdown {
            broken_scores: Some(lopsided),
            stuck: false,
        };
        assert_matches!(terminal_outcome(&game, &0), Err(MctsError::OracleContract(_)));

        let mut missing = Scores::new();
        missing.insert(Player::Two, 0.0);
        let game = Countdown {
            broken_scores: Some(missing),
            stuck: false,
        };
        assert_matches!(terminal_outcome(&game, &0), Err(MctsError::OracleContract(_)));

        let mut scaled = Scores::new();
        scaled.insert(Player::One, 10.0);
        scaled.insert(Player::Two, -10.0);
        let game = Countdown {
            broken_scores: Some(scaled),
            stuck: false,
        };
        assert_matches!(terminal_outcome(&game, &0), Err(MctsError::OracleContract(_)));
    }
}
