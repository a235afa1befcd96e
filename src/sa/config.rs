//! SA configuration.

use crate::models::SchedulerConfig;

/// Configuration parameters for Simulated Annealing.
///
/// # Examples
///
/// ```
/// use u_invigil::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_iterations(2000)
///     .with_initial_temperature(500.0);
/// assert_eq!(config.iterations, 2000);
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Maximum number of move attempts.
    pub iterations: usize,
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,
    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,
    /// Temperature floor; the search stops below it.
    pub min_temperature: f64,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            initial_temperature: 1000.0,
            cooling_rate: 0.995,
            min_temperature: 0.01,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Builds an SA configuration from the scheduler's knob fields.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            iterations: config.annealing_iterations,
            initial_temperature: config.annealing_temp,
            cooling_rate: config.annealing_cooling,
            min_temperature: 0.01,
            seed: config.seed,
        }
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if !(0.0..1.0).contains(&self.cooling_rate) {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = SaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.iterations, 1000);
        assert!((config.min_temperature - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let config = SaConfig::default()
            .with_iterations(50)
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.9)
            .with_seed(7);
        assert_eq!(config.iterations, 50);
        assert!((config.initial_temperature - 10.0).abs() < 1e-12);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_from_scheduler() {
        let sched = SchedulerConfig {
            annealing_iterations: 123,
            annealing_temp: 42.0,
            seed: Some(9),
            ..Default::default()
        };
        let config = SaConfig::from_scheduler(&sched);
        assert_eq!(config.iterations, 123);
        assert!((config.initial_temperature - 42.0).abs() < 1e-12);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validate_bad_cooling() {
        let config = SaConfig::default().with_cooling_rate(1.5);
        assert!(config.validate().is_err());
    }
}
