//! VNS execution engine.
//!
//! # Algorithm (Basic VNS)
//!
//! 1. Start from a constructed schedule
//! 2. For k = 1..=k_max:
//!    a. **Shaking**: ruin k random duties, repair with a random-order
//!    first-eligible fill
//!    b. **Local search**: swap hill-climbing
//!    c. **Move or not**: on improvement accept and reset k = 1,
//!    otherwise k += 1
//! 3. Repeat until the outer-iteration budget is spent

use super::config::VnsConfig;
use crate::context::{DomainContext, RunContext};
use crate::cost::CostTuple;
use crate::models::{Guard, Schedule};
use crate::swap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Result of a VNS run.
#[derive(Debug, Clone)]
pub struct VnsResult {
    /// Best schedule found.
    pub best: Schedule,
    /// Cost of the best schedule.
    pub best_cost: CostTuple,
    /// Total shake/local-search cycles executed.
    pub iterations: usize,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Scalar cost projection of the best schedule per outer iteration.
    pub cost_history: Vec<f64>,
}

/// Variable Neighborhood Search runner.
pub struct VnsRunner;

impl VnsRunner {
    /// Executes Basic VNS from the given schedule.
    pub fn run(
        initial: Schedule,
        domain: &DomainContext<'_>,
        config: &VnsConfig,
        ctx: &RunContext,
    ) -> VnsResult {
        config.validate().expect("invalid VnsConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = initial;
        let mut current_cost = domain.evaluate(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        ctx.log(format!(
            "[vns] initial cost {:.2} (shortage={}, violations={})",
            current_cost.scalar(),
            current_cost.shortage,
            current_cost.hard_violation
        ));

        let mut cycles = 0usize;
        let mut cancelled = false;
        let mut cost_history = Vec::with_capacity(config.iterations);

        'outer: for outer in 0..config.iterations {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }
            ctx.progress(((outer + 1) * 100 / config.iterations) as u32);

            let mut k = 1usize;
            while k <= config.max_k {
                if ctx.is_cancelled() {
                    cancelled = true;
                    break 'outer;
                }

                // Shaking: ruin k duties and repair.
                let mut shaken = current.clone();
                let mut targets = shaken.occupied_duties(&domain.locked);
                if targets.is_empty() && shaken.shortage_count() == 0 {
                    break;
                }
                targets.shuffle(&mut rng);
                for &duty in targets.iter().take(k) {
                    shaken.assign(duty, Guard::Shortage);
                }
                random_repair(&mut shaken, domain, &mut rng);

                // Local search.
                let candidate =
                    swap::hill_climb(shaken, domain, config.local_search_swaps, &mut rng);
                let candidate_cost = domain.evaluate(&candidate);
                cycles += 1;

                if candidate_cost < current_cost {
                    current = candidate;
                    current_cost = candidate_cost;
                    ctx.log(format!(
                        "[vns] iteration {}, k={}: improved to {:.2} (shortage={}, violations={})",
                        outer + 1,
                        k,
                        current_cost.scalar(),
                        current_cost.shortage,
                        current_cost.hard_violation
                    ));

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                    }
                    k = 1;
                } else {
                    k += 1;
                }
            }

            cost_history.push(best_cost.scalar());
        }

        ctx.log(format!("[vns] finished, best cost {:.2}", best_cost.scalar()));

        VnsResult {
            best,
            best_cost,
            iterations: cycles,
            cancelled,
            cost_history,
        }
    }
}

/// Fills every open slot with the first eligible professor in a
/// shuffled roster order.
fn random_repair<R: Rng>(schedule: &mut Schedule, domain: &DomainContext<'_>, rng: &mut R) {
    let mut ledger = domain.ledger(schedule);

    for duty in schedule.shortage_duties() {
        let exam = schedule.exams[duty.exam].clone();
        let mut professors: Vec<&String> = domain.roster.professors.iter().collect();
        professors.shuffle(rng);

        let pick = professors
            .into_iter()
            .find(|p| !exam.has_guard(p) && domain.assignment_valid(p, &exam, &ledger))
            .cloned();

        if let Some(prof) = pick {
            ledger.record(&prof, &exam, domain.config);
            schedule.assign(duty, Guard::Assigned(prof));
        }
    }
}
