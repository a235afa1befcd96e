//! Scheduling configuration bag.
//!
//! All limits are typed: an absent cap means unlimited (`Option<u32>`),
//! never a `"0"` sentinel.

use super::roster::{HallTier, ProfessorId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-professor rule bounding distinct duty days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DutyPattern {
    /// At most one duty day.
    OneDay,
    /// Exactly two duty days (when the professor guards at all).
    #[default]
    FlexibleTwo,
    /// Two or three duty days (when the professor guards at all).
    FlexibleThree,
    /// Exactly two adjacent duty days.
    ConsecutiveStrict,
}

impl DutyPattern {
    /// Maximum distinct duty days this pattern permits.
    pub fn max_days(self) -> usize {
        match self {
            DutyPattern::OneDay => 1,
            DutyPattern::FlexibleTwo | DutyPattern::ConsecutiveStrict => 2,
            DutyPattern::FlexibleThree => 3,
        }
    }
}

/// One row of a custom target distribution: `count` professors should
/// each end up with `large` large-hall duties and `other` other duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPattern {
    pub large: u32,
    pub other: u32,
    pub count: u32,
}

/// Which balancing strategy drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Construction only, random slot order.
    Simple,
    /// Construction only, large-hall slots first.
    Phased,
    /// Construction with quadratic duty-count balancing, then swap
    /// hill-climbing.
    #[default]
    Balanced,
    /// Phased construction followed by a short polishing swap pass.
    PhasedPolished,
    /// Simulated annealing over a constructed schedule.
    Annealing,
    /// Tabu search over a validated constructed schedule.
    TabuSearch,
    /// Large neighborhood search (ruin & recreate).
    Lns,
    /// Variable neighborhood search.
    Vns,
    /// Genetic algorithm over the duty-slot chromosome.
    Genetic,
    /// Exact branch-and-bound constraint solver.
    ConstraintSolver,
    /// Q-learning hyper-heuristic choosing among Tabu/LNS/VNS.
    Hyper,
}

/// The full configuration bag consumed by the engine and the operators.
///
/// Deserializes leniently: absent keys fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Workload weight of one large-hall duty.
    pub large_hall_weight: f64,
    /// Workload weight of one duty in any other hall.
    pub other_hall_weight: f64,

    /// Guards required per large hall.
    pub guards_large_hall: u32,
    /// Guards required per medium hall.
    pub guards_medium_hall: u32,
    /// Guards required per small hall.
    pub guards_small_hall: u32,

    /// Cap on total duties per professor. `None` = unlimited.
    pub max_shifts: Option<u32>,
    /// Cap on large-hall duties per professor. `None` = unlimited.
    pub max_large_hall_shifts: Option<u32>,

    /// Dates each professor is unavailable.
    pub unavailable_days: HashMap<ProfessorId, Vec<NaiveDate>>,
    /// Per-professor duty pattern; absent professors default to
    /// [`DutyPattern::FlexibleTwo`].
    pub duty_patterns: HashMap<ProfessorId, DutyPattern>,
    /// Pairs whose duty-day sets must be identical.
    pub partnerships: Vec<(ProfessorId, ProfessorId)>,

    /// Whether the custom target distribution drives the deviation term.
    pub enable_custom_targets: bool,
    /// Custom target distribution rows.
    pub custom_target_patterns: Vec<TargetPattern>,

    /// Selected balancing strategy.
    pub strategy: Strategy,

    /// Lock each owner onto their chronologically last owned exam.
    pub assign_owner_as_guard: bool,
    /// Exclude the final N slots of the last day from scheduling/guarding.
    pub last_day_restriction: Option<usize>,
    /// Run the subject-day clustering pass before guard assignment.
    pub group_subjects: bool,
    /// Repeat the whole pipeline and keep the best result.
    pub intensive_search: bool,
    /// Pipeline repetitions when `intensive_search` is on.
    pub iterations: usize,

    // Per-strategy knobs. Each operator builds its own config from these.
    pub swap_attempts: usize,
    pub polishing_swaps: usize,
    pub annealing_iterations: usize,
    pub annealing_temp: f64,
    pub annealing_cooling: f64,
    pub tabu_iterations: usize,
    pub tabu_tenure: usize,
    pub tabu_neighborhood_size: usize,
    pub lns_iterations: usize,
    pub lns_destroy_fraction: f64,
    pub vns_iterations: usize,
    pub vns_max_k: usize,
    pub genetic_population: usize,
    pub genetic_generations: usize,
    pub genetic_mutation: f64,
    pub genetic_elitism: usize,
    pub solver_time_limit_ms: u64,
    pub hyper_episodes: usize,
    /// Q-table persistence path; `None` keeps learning in-memory only.
    pub qtable_path: Option<std::path::PathBuf>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            large_hall_weight: 3.0,
            other_hall_weight: 1.0,
            guards_large_hall: 4,
            guards_medium_hall: 2,
            guards_small_hall: 1,
            max_shifts: None,
            max_large_hall_shifts: Some(2),
            unavailable_days: HashMap::new(),
            duty_patterns: HashMap::new(),
            partnerships: Vec::new(),
            enable_custom_targets: false,
            custom_target_patterns: Vec::new(),
            strategy: Strategy::default(),
            assign_owner_as_guard: false,
            last_day_restriction: None,
            group_subjects: false,
            intensive_search: false,
            iterations: 1,
            swap_attempts: 50,
            polishing_swaps: 15,
            annealing_iterations: 1000,
            annealing_temp: 1000.0,
            annealing_cooling: 0.995,
            tabu_iterations: 100,
            tabu_tenure: 15,
            tabu_neighborhood_size: 50,
            lns_iterations: 100,
            lns_destroy_fraction: 0.2,
            vns_iterations: 100,
            vns_max_k: 10,
            genetic_population: 100,
            genetic_generations: 500,
            genetic_mutation: 0.15,
            genetic_elitism: 4,
            solver_time_limit_ms: 30_000,
            hyper_episodes: 50,
            qtable_path: None,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Guards required for one hall of the given tier.
    pub fn guards_for_tier(&self, tier: HallTier) -> u32 {
        match tier {
            HallTier::Large => self.guards_large_hall,
            HallTier::Medium => self.guards_medium_hall,
            HallTier::Small => self.guards_small_hall,
        }
    }

    /// The duty pattern of a professor (defaulting to flexible-two).
    pub fn pattern_of(&self, prof: &str) -> DutyPattern {
        self.duty_patterns.get(prof).copied().unwrap_or_default()
    }

    /// Whether a professor is unavailable on a date.
    pub fn is_unavailable(&self, prof: &str, date: NaiveDate) -> bool {
        self.unavailable_days
            .get(prof)
            .is_some_and(|days| days.contains(&date))
    }

    /// Expands the custom target rows into one `(large, other)` entry per
    /// targeted professor.
    pub fn expanded_targets(&self) -> Vec<(u32, u32)> {
        self.custom_target_patterns
            .iter()
            .flat_map(|p| std::iter::repeat((p.large, p.other)).take(p.count as usize))
            .collect()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_shifts(mut self, cap: Option<u32>) -> Self {
        self.max_shifts = cap;
        self
    }

    pub fn with_max_large_hall_shifts(mut self, cap: Option<u32>) -> Self {
        self.max_large_hall_shifts = cap;
        self
    }

    /// Validates cross-field consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.large_hall_weight <= 0.0 || self.other_hall_weight <= 0.0 {
            return Err("hall weights must be positive".into());
        }
        if !(0.0..1.0).contains(&self.annealing_cooling) {
            return Err(format!(
                "annealing_cooling must be in (0, 1), got {}",
                self.annealing_cooling
            ));
        }
        if !(0.0..=1.0).contains(&self.lns_destroy_fraction) {
            return Err(format!(
                "lns_destroy_fraction must be in [0, 1], got {}",
                self.lns_destroy_fraction
            ));
        }
        if !(0.0..=1.0).contains(&self.genetic_mutation) {
            return Err(format!(
                "genetic_mutation must be in [0, 1], got {}",
                self.genetic_mutation
            ));
        }
        for (a, b) in &self.partnerships {
            if a == b {
                return Err(format!("professor {a} cannot partner with themselves"));
            }
        }
        Ok(())
    }
}
