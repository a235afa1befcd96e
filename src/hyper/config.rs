//! Hyper-heuristic configuration.

use crate::models::SchedulerConfig;
use std::path::PathBuf;

/// Low-level operators the controller may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HyperAction {
    /// LNS with an aggressive destroy fraction, biased toward repair.
    RepairLns,
    /// Standard large neighborhood search.
    Lns,
    /// Tabu search.
    Tabu,
    /// Variable neighborhood search.
    Vns,
}

impl HyperAction {
    /// Stable key used in the persisted Q-table.
    pub fn key(self) -> &'static str {
        match self {
            HyperAction::RepairLns => "repair_lns",
            HyperAction::Lns => "lns",
            HyperAction::Tabu => "tabu",
            HyperAction::Vns => "vns",
        }
    }
}

/// Configuration parameters for the Q-learning controller.
#[derive(Debug, Clone)]
pub struct HyperConfig {
    /// Episodes: one operator invocation each.
    pub episodes: usize,
    /// Operators available to the controller.
    pub actions: Vec<HyperAction>,
    /// Iteration budget handed to each operator invocation.
    pub operator_iterations: usize,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Geometric decay applied to epsilon per episode.
    pub epsilon_decay: f64,
    /// Exploration floor.
    pub epsilon_min: f64,
    /// Epsilon is reset to this after a stagnation window.
    pub epsilon_boost: f64,
    /// Stagnation window in milliseconds without a new best.
    pub stagnation_window_ms: u64,
    /// Q-learning step size.
    pub learning_rate: f64,
    /// Q-learning discount factor.
    pub discount: f64,
    /// Q-table persistence path; `None` keeps learning in memory.
    pub qtable_path: Option<PathBuf>,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for HyperConfig {
    fn default() -> Self {
        Self {
            episodes: 50,
            actions: vec![
                HyperAction::RepairLns,
                HyperAction::Lns,
                HyperAction::Tabu,
                HyperAction::Vns,
            ],
            operator_iterations: 20,
            epsilon: 0.9,
            epsilon_decay: 0.95,
            epsilon_min: 0.05,
            epsilon_boost: 0.5,
            stagnation_window_ms: 10_000,
            learning_rate: 0.1,
            discount: 0.9,
            qtable_path: None,
            seed: None,
        }
    }
}

impl HyperConfig {
    /// Builds a controller configuration from the scheduler's knobs.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            episodes: config.hyper_episodes,
            qtable_path: config.qtable_path.clone(),
            seed: config.seed,
            ..Default::default()
        }
    }

    pub fn with_episodes(mut self, n: usize) -> Self {
        self.episodes = n;
        self
    }

    pub fn with_actions(mut self, actions: Vec<HyperAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_operator_iterations(mut self, n: usize) -> Self {
        self.operator_iterations = n;
        self
    }

    pub fn with_qtable_path(mut self, path: Option<PathBuf>) -> Self {
        self.qtable_path = path;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.actions.is_empty() {
            return Err("at least one action is required".into());
        }
        if !(0.0..=1.0).contains(&self.epsilon)
            || !(0.0..=1.0).contains(&self.epsilon_min)
            || !(0.0..=1.0).contains(&self.epsilon_boost)
        {
            return Err("epsilon values must be in [0, 1]".into());
        }
        if !(0.0..1.0).contains(&self.epsilon_decay) {
            return Err(format!(
                "epsilon_decay must be in (0, 1), got {}",
                self.epsilon_decay
            ));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) || !(0.0..=1.0).contains(&self.discount) {
            return Err("learning_rate and discount must be in [0, 1]".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = HyperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.actions.len(), 4);
    }

    #[test]
    fn test_action_keys_distinct() {
        let keys = [
            HyperAction::RepairLns.key(),
            HyperAction::Lns.key(),
            HyperAction::Tabu.key(),
            HyperAction::Vns.key(),
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_validate_rejects_empty_actions() {
        let config = HyperConfig::default().with_actions(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_scheduler() {
        let sched = SchedulerConfig {
            hyper_episodes: 12,
            seed: Some(5),
            ..Default::default()
        };
        let config = HyperConfig::from_scheduler(&sched);
        assert_eq!(config.episodes, 12);
        assert_eq!(config.seed, Some(5));
    }
}
