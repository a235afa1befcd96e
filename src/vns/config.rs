//! VNS configuration.

use crate::models::SchedulerConfig;

/// Configuration parameters for Variable Neighborhood Search.
///
/// # Examples
///
/// ```
/// use u_invigil::vns::VnsConfig;
///
/// let config = VnsConfig::default().with_iterations(50).with_max_k(5);
/// assert_eq!(config.iterations, 50);
/// assert_eq!(config.max_k, 5);
/// ```
#[derive(Debug, Clone)]
pub struct VnsConfig {
    /// Number of outer iterations.
    pub iterations: usize,
    /// Largest neighborhood: duties ruined in the strongest shake.
    pub max_k: usize,
    /// Swap hill-climb attempts in the local-search step.
    pub local_search_swaps: usize,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for VnsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_k: 10,
            local_search_swaps: 50,
            seed: None,
        }
    }
}

impl VnsConfig {
    /// Builds a VNS configuration from the scheduler's knob fields.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            iterations: config.vns_iterations,
            max_k: config.vns_max_k,
            local_search_swaps: 50,
            seed: config.seed,
        }
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_max_k(mut self, k: usize) -> Self {
        self.max_k = k;
        self
    }

    pub fn with_local_search_swaps(mut self, n: usize) -> Self {
        self.local_search_swaps = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_k == 0 {
            return Err("max_k must be at least 1".into());
        }
        Ok(())
    }
}
