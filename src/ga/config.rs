//! GA configuration.

use crate::models::SchedulerConfig;

/// Configuration parameters for the Genetic Algorithm.
///
/// # Examples
///
/// ```
/// use u_invigil::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_max_generations(100);
/// assert_eq!(config.population_size, 60);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of chromosomes in the population.
    pub population_size: usize,
    /// Maximum number of generations.
    pub max_generations: usize,
    /// Probability of recombining two parents.
    pub crossover_rate: f64,
    /// Probability of mutating an offspring.
    pub mutation_rate: f64,
    /// Top chromosomes copied unchanged into the next generation.
    pub elitism: usize,
    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            crossover_rate: 0.8,
            mutation_rate: 0.15,
            elitism: 4,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Builds a GA configuration from the scheduler's knob fields.
    pub fn from_scheduler(config: &SchedulerConfig) -> Self {
        Self {
            population_size: config.genetic_population,
            max_generations: config.genetic_generations,
            crossover_rate: 0.8,
            mutation_rate: config.genetic_mutation,
            elitism: config.genetic_elitism,
            seed: config.seed,
        }
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elitism(mut self, n: usize) -> Self {
        self.elitism = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.elitism >= self.population_size {
            return Err("elitism must be smaller than population_size".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert!((config.crossover_rate - 0.8).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_scheduler() {
        let sched = SchedulerConfig {
            genetic_population: 20,
            genetic_generations: 30,
            genetic_mutation: 0.5,
            genetic_elitism: 2,
            seed: Some(4),
            ..Default::default()
        };
        let config = GaConfig::from_scheduler(&sched);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.max_generations, 30);
        assert!((config.mutation_rate - 0.5).abs() < 1e-12);
        assert_eq!(config.elitism, 2);
    }

    #[test]
    fn test_validate_rejects_oversized_elitism() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_elitism(4);
        assert!(config.validate().is_err());
    }
}
