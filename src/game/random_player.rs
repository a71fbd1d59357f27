use crate::game::oracle::GameOracle;
use crate::{MctsError, Result};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Picks a legal action uniformly at random.
///
/// Fails with [`MctsError::OracleContract`] when the state has no legal actions.
pub fn random_action<G: GameOracle>(
    oracle: &G,
    state: &G::State,
    rng: &mut StdRng,
) -> Result<G::Action> {
    oracle
        .legal_actions(state)
        .choose(rng)
        .cloned()
        .ok_or_else(|| {
            MctsError::OracleContract("no legal actions for the random player".to_string())
        })
}
