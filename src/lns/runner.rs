//! LNS execution loop.

use super::config::LnsConfig;
use crate::context::{DomainContext, RunContext};
use crate::cost::CostTuple;
use crate::models::{DutyRef, Guard, Schedule};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Result of an LNS run.
#[derive(Debug, Clone)]
pub struct LnsResult {
    /// Best schedule found.
    pub best: Schedule,
    /// Cost of the best schedule.
    pub best_cost: CostTuple,
    /// Iterations executed.
    pub iterations: usize,
    /// Number of new global bests found.
    pub improvements: usize,
    /// Final acceptance temperature.
    pub final_temperature: f64,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Scalar cost projection of the best schedule per iteration.
    pub cost_history: Vec<f64>,
}

/// Large Neighborhood Search runner.
pub struct LnsRunner;

impl LnsRunner {
    /// Runs ruin-and-recreate from the given schedule.
    pub fn run(
        initial: Schedule,
        domain: &DomainContext<'_>,
        config: &LnsConfig,
        ctx: &RunContext,
    ) -> LnsResult {
        config.validate().expect("invalid LnsConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = initial;
        let mut current_cost = domain.evaluate(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        ctx.log(format!(
            "[lns] initial cost {:.2} (shortage={}, violations={})",
            current_cost.scalar(),
            current_cost.shortage,
            current_cost.hard_violation
        ));

        let mut temperature = config.initial_temperature;
        let mut destroy_fraction = config.destroy_fraction;
        let mut improvements = 0usize;
        let mut cancelled = false;
        let mut cost_history = Vec::with_capacity(config.iterations);

        let mut iterations = 0usize;
        for i in 0..config.iterations {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }
            iterations = i + 1;
            ctx.progress((iterations * 100 / config.iterations) as u32);

            // Ruin: free a fraction of the filled, unlocked slots.
            let mut candidate = current.clone();
            let mut targets = candidate.occupied_duties(&domain.locked);
            targets.shuffle(&mut rng);
            let destroy_count = (targets.len() as f64 * destroy_fraction) as usize;
            for &duty in targets.iter().take(destroy_count) {
                candidate.assign(duty, Guard::Shortage);
            }

            // Recreate: fill every open slot (freed or pre-existing)
            // with the least-loaded eligible professor.
            let open = candidate.shortage_duties();
            greedy_repair(&mut candidate, &open, domain);

            let candidate_cost = domain.evaluate(&candidate);
            let accept = if candidate_cost < current_cost {
                true
            } else {
                let delta = candidate_cost.scalar() - current_cost.scalar();
                rng.random::<f64>() < (-delta / temperature).exp()
            };

            if accept {
                current = candidate;
                current_cost = candidate_cost;
            }

            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
                improvements += 1;
                ctx.log(format!(
                    "[lns] iteration {}: new best cost {:.2} (shortage={}, violations={})",
                    iterations,
                    best_cost.scalar(),
                    best_cost.shortage,
                    best_cost.hard_violation
                ));
            }

            cost_history.push(best_cost.scalar());

            temperature *= config.cooling_rate;
            destroy_fraction =
                (destroy_fraction * config.destroy_decay).max(config.min_destroy_fraction);
        }

        ctx.log(format!("[lns] finished, best cost {:.2}", best_cost.scalar()));

        LnsResult {
            best,
            best_cost,
            iterations,
            improvements,
            final_temperature: temperature,
            cancelled,
            cost_history,
        }
    }
}

/// Fills the given `Shortage` slots with the lowest-weighted-workload
/// eligible professor each, leaving a slot empty when nobody qualifies.
pub(crate) fn greedy_repair(schedule: &mut Schedule, duties: &[DutyRef], domain: &DomainContext<'_>) {
    let mut ledger = domain.ledger(schedule);

    for &duty in duties {
        if !schedule.guard(duty).is_shortage() {
            continue;
        }
        let exam = schedule.exams[duty.exam].clone();

        let pick = domain
            .roster
            .professors
            .iter()
            .filter(|p| !exam.has_guard(p) && domain.assignment_valid(p, &exam, &ledger))
            .min_by(|a, b| ledger.workload(a).total_cmp(&ledger.workload(b)))
            .cloned();

        if let Some(prof) = pick {
            ledger.record(&prof, &exam, domain.config);
            schedule.assign(duty, Guard::Assigned(prof));
        }
    }
}
