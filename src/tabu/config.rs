//! Tabu Search configuration.

use crate::models::SchedulerConfig;

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_invigil::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(200)
///     .with_tenure(10);
/// assert_eq!(config.max_iterations, 200);
/// assert_eq!(config.tenure, 10);
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// How many iterations a move's reversal stays forbidden.
    pub tenure: usize,
    /// Candidate moves sampled per iteration.
    pub neighborhood_size: usize,
    /// Whether a tabu move producing a new global best is admitted.
    pub aspiration: bool,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tenure: 15,
            neighborhood_size: 50,
            aspiration: true,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Builds a tabu configuration from the scheduler's knob fields.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            max_iterations: config.tabu_iterations,
            tenure: config.tabu_tenure,
            neighborhood_size: config.tabu_neighborhood_size,
            aspiration: true,
            seed: config.seed,
        }
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = tenure;
        self
    }

    pub fn with_neighborhood_size(mut self, n: usize) -> Self {
        self.neighborhood_size = n;
        self
    }

    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tenure == 0 {
            return Err("tenure must be at least 1".into());
        }
        if self.neighborhood_size == 0 {
            return Err("neighborhood_size must be at least 1".into());
        }
        Ok(())
    }
}
