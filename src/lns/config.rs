//! LNS configuration.

use crate::models::SchedulerConfig;

/// Configuration parameters for Large Neighborhood Search.
///
/// # Examples
///
/// ```
/// use u_invigil::lns::LnsConfig;
///
/// let config = LnsConfig::default()
///     .with_iterations(200)
///     .with_destroy_fraction(0.3);
/// assert_eq!(config.iterations, 200);
/// ```
#[derive(Debug, Clone)]
pub struct LnsConfig {
    /// Number of ruin-and-recreate iterations.
    pub iterations: usize,
    /// Initial fraction of filled slots destroyed per iteration.
    pub destroy_fraction: f64,
    /// Floor of the decaying destroy fraction.
    pub min_destroy_fraction: f64,
    /// Geometric decay applied to the destroy fraction each iteration.
    pub destroy_decay: f64,
    /// Initial temperature of the acceptance criterion.
    pub initial_temperature: f64,
    /// Geometric cooling factor of the acceptance temperature.
    pub cooling_rate: f64,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for LnsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            destroy_fraction: 0.2,
            min_destroy_fraction: 0.05,
            destroy_decay: 0.995,
            initial_temperature: 10.0,
            cooling_rate: 0.99,
            seed: None,
        }
    }
}

impl LnsConfig {
    /// Builds an LNS configuration from the scheduler's knob fields.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            iterations: config.lns_iterations,
            destroy_fraction: config.lns_destroy_fraction,
            seed: config.seed,
            ..Default::default()
        }
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_destroy_fraction(mut self, fraction: f64) -> Self {
        self.destroy_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.destroy_fraction) {
            return Err(format!(
                "destroy_fraction must be in [0, 1], got {}",
                self.destroy_fraction
            ));
        }
        if !(0.0..=1.0).contains(&self.min_destroy_fraction)
            || self.min_destroy_fraction > self.destroy_fraction
        {
            return Err("min_destroy_fraction must be in [0, destroy_fraction]".into());
        }
        if !(0.0..1.0).contains(&self.destroy_decay) {
            return Err(format!(
                "destroy_decay must be in (0, 1), got {}",
                self.destroy_decay
            ));
        }
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if !(0.0..1.0).contains(&self.cooling_rate) {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = LnsConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.destroy_fraction - 0.2).abs() < 1e-12);
        assert!((config.min_destroy_fraction - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_from_scheduler() {
        let sched = SchedulerConfig {
            lns_iterations: 7,
            lns_destroy_fraction: 0.4,
            seed: Some(3),
            ..Default::default()
        };
        let config = LnsConfig::from_scheduler(&sched);
        assert_eq!(config.iterations, 7);
        assert!((config.destroy_fraction - 0.4).abs() < 1e-12);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        assert!(LnsConfig::default()
            .with_destroy_fraction(1.5)
            .validate()
            .is_err());
        assert!(LnsConfig::default()
            .with_destroy_fraction(0.01)
            .validate()
            .is_err()); // below the min fraction
    }
}
