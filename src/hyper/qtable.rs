//! Persistent tabular Q-values.

use super::config::HyperAction;
use std::collections::HashMap;
use std::path::Path;

/// A `state → action → value` table, serialized as JSON so it survives
/// across runs.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<String, HashMap<String, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from disk. A missing file yields an empty table;
    /// a corrupt one is an error.
    pub fn load(path: &Path) -> Result<Self, crate::error::InvigilError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = std::fs::read_to_string(path)?;
        let values: HashMap<String, HashMap<String, f64>> = serde_json::from_str(&raw)?;
        Ok(Self { values })
    }

    /// Saves the table to disk.
    pub fn save(&self, path: &Path) -> Result<(), crate::error::InvigilError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }

    /// Q-value of a (state, action) pair; unseen pairs are 0.
    pub fn value(&self, state: &str, action: HyperAction) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action.key()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Highest Q-value over the given actions in a state.
    pub fn max_value(&self, state: &str, actions: &[HyperAction]) -> f64 {
        actions
            .iter()
            .map(|&a| self.value(state, a))
            .fold(0.0, f64::max)
    }

    /// The greedy action for a state, if any action has been tried.
    pub fn best_action(&self, state: &str, actions: &[HyperAction]) -> Option<HyperAction> {
        let row = self.values.get(state)?;
        actions
            .iter()
            .copied()
            .filter(|a| row.contains_key(a.key()))
            .max_by(|a, b| self.value(state, *a).total_cmp(&self.value(state, *b)))
    }

    /// Bellman update with a fixed learning rate and discount.
    pub fn update(
        &mut self,
        state: &str,
        action: HyperAction,
        reward: f64,
        next_state: &str,
        actions: &[HyperAction],
        learning_rate: f64,
        discount: f64,
    ) {
        let next_best = self.max_value(next_state, actions);
        let current = self.value(state, action);
        let updated = current + learning_rate * (reward + discount * next_best - current);
        self.values
            .entry(state.to_string())
            .or_default()
            .insert(action.key().to_string(), updated);
    }

    /// Number of states seen.
    pub fn state_count(&self) -> usize {
        self.values.len()
    }
}
