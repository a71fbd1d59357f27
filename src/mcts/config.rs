//! Search configuration
//!
//! Every tunable of a decision lives here and is passed explicitly into the engine; there is no
//! process-wide default besides [`SearchConfig::default`].
//!
//! Two reference setups exist and must not be mixed with each other's accumulator scaling:
//! - vanilla: C = 2.0, iteration budget only
//! - modified: C = 10.0, iteration budget plus a one-second clock

use crate::{MctsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the final action is read off the root's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalActionPolicy {
    /// Highest mean outcome from the deciding player's perspective
    #[default]
    BestWinrate,
    /// Largest visit count
    MostVisited,
}

/// MCTS configuration for one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of playouts per decision
    /// Default: 1000
    pub iteration_budget: usize,

    /// C in the UCT exploration term
    /// Higher values = more exploration
    /// Default: 2.0
    pub exploration_constant: f64,

    /// Optional wall-clock limit, checked between iterations
    pub time_budget_seconds: Option<f64>,

    /// Seed for the per-decision RNG; fresh entropy when absent
    pub random_seed: Option<u64>,

    /// Default: best win rate
    pub final_action: FinalActionPolicy,

    /// Rollouts longer than this fail as an oracle contract violation
    pub max_rollout_plies: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iteration_budget: 1000,
            exploration_constant: 2.0,
            time_budget_seconds: None,
            random_seed: None,
            final_action: FinalActionPolicy::BestWinrate,
            max_rollout_plies: None,
        }
    }
}

impl SearchConfig {
    /// C = 2.0, iteration budget only
    pub fn vanilla() -> Self {
        Self::default()
    }

    /// C = 10.0 with a one-second clock on top of the iteration budget
    pub fn modified() -> Self {
        Self {
            exploration_constant: 10.0,
            time_budget_seconds: Some(1.0),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iteration_budget = iterations;
        self
    }

    /// Wall-clock budget as a [`Duration`], if one is set.
    ///
    /// Fails with [`MctsError::Config`] when the seconds do not fit in a `Duration`.
    pub fn time_budget(&self) -> Result<Option<Duration>> {
        self.time_budget_seconds
            .map(|seconds| {
                Duration::try_from_secs_f64(seconds).map_err(|e| {
                    MctsError::Config(format!("time budget of {} seconds: {}", seconds, e))
                })
            })
            .transpose()
    }

    /// Rejects values the engine cannot work with.
    ///
    /// A zero iteration budget passes here; the engine reports it as
    /// [`MctsError::ZeroBudget`] when asked to decide.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MctsError::Config(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if let Some(seconds) = self.time_budget_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(MctsError::Config(format!(
                    "time budget must be a positive number of seconds, got {}",
                    seconds
                )));
            }
        }
        self.time_budget()?;
        if self.max_rollout_plies == Some(0) {
            return Err(MctsError::Config(
                "max rollout plies must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// One-line summary for logging
    pub fn to_config_string(&self) -> String {
        let clock = self
            .time_budget_seconds
            .map(|s| format!("{:.2}s", s))
            .unwrap_or_else(|| "none".to_string());
        let seed = self
            .random_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "entropy".to_string());
        format!(
            "iters[{}]_c[{:.2}]_clock[{}]_seed[{}]_final[{:?}]",
            self.iteration_budget, self.exploration_constant, clock, seed, self.final_action
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_matches_reference_values() {
        let config = SearchConfig::default();
        assert_eq!(config.iteration_budget, 1000);
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.time_budget().unwrap(), None);
        assert_eq!(config.final_action, FinalActionPolicy::BestWinrate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(SearchConfig::vanilla(), SearchConfig::default());

        let modified = SearchConfig::modified();
        assert_eq!(modified.exploration_constant, 10.0);
        assert_eq!(
            modified.time_budget().unwrap(),
            Some(Duration::from_secs(1))
        );
        assert!(modified.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = SearchConfig::default();
        config.exploration_constant = f64::NAN;
        assert_matches!(config.validate(), Err(MctsError::Config(_)));

        let mut config = SearchConfig::default();
        config.exploration_constant = -1.0;
        assert_matches!(config.validate(), Err(MctsError::Config(_)));

        let mut config = SearchConfig::default();
        config.time_budget_seconds = Some(0.0);
        assert_matches!(config.validate(), Err(MctsError::Config(_)));

        let mut config = SearchConfig::default();
        config.max_rollout_plies = Some(0);
        assert_matches!(config.validate(), Err(MctsError::Config(_)));
    }

    #[test]
    fn test_time_budget_beyond_duration_range() {
        let config = SearchConfig {
            time_budget_seconds: Some(1e20),
            ..SearchConfig::default()
        };
        assert_matches!(config.time_budget(), Err(MctsError::Config(_)));
        assert_matches!(config.validate(), Err(MctsError::Config(_)));

        assert_matches!(
            SearchConfig::from_json_str(r#"{"time_budget_seconds": 1e20}"#),
            Err(MctsError::Config(_))
        );
    }

    #[test]
    fn test_zero_budget_passes_validation() {
        let config = SearchConfig::default().with_iterations(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SearchConfig::from_json_str(r#"{"iteration_budget": 50, "final_action": "most_visited"}"#)
                .unwrap();
        assert_eq!(config.iteration_budget, 50);
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.final_action, FinalActionPolicy::MostVisited);
    }

    #[test]
    fn test_json_with_invalid_values() {
        assert_matches!(
            SearchConfig::from_json_str(r#"{"time_budget_seconds": -3.0}"#),
            Err(MctsError::Config(_))
        );
        assert_matches!(
            SearchConfig::from_json_str("not json"),
            Err(MctsError::Json(_))
        );
    }

    #[test]
    fn test_config_string() {
        let config = SearchConfig::default().with_seed(42);
        let summary = config.to_config_string();
        assert!(summary.contains("iters[1000]"));
        assert!(summary.contains("c[2.00]"));
        assert!(summary.contains("clock[none]"));
        assert!(summary.contains("seed[42]"));
        assert!(summary.contains("final[BestWinrate]"));
    }
}
