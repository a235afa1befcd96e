//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from a constructed schedule
//! 2. Each iteration: sample a neighborhood of reassignment moves
//!    (repair moves while shortages remain, balance moves otherwise),
//!    keep the best admissible one — non-tabu, or tabu but beating the
//!    global best (aspiration)
//! 3. Apply the move, remember its key for `tenure` iterations
//! 4. Stop at the iteration budget or when no admissible move exists

use super::config::TabuConfig;
use crate::context::{DomainContext, RunContext};
use crate::cost::CostTuple;
use crate::models::{DutyRef, Guard, Schedule};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best schedule found.
    pub best: Schedule,
    /// Cost of the best schedule.
    pub best_cost: CostTuple,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best schedule was found.
    pub best_iteration: usize,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Scalar cost projection of the best schedule per iteration.
    pub cost_history: Vec<f64>,
}

/// One sampled candidate move.
struct CandidateMove {
    schedule: Schedule,
    cost: CostTuple,
    key: String,
    reverse_key: String,
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes tabu search from the given schedule.
    pub fn run(
        initial: Schedule,
        domain: &DomainContext<'_>,
        config: &TabuConfig,
        ctx: &RunContext,
    ) -> TabuResult {
        config.validate().expect("invalid TabuConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = initial;
        let mut best = current.clone();
        let mut best_cost = domain.evaluate(&best);
        let mut best_iteration = 0usize;
        let mut cancelled = false;

        // FIFO of move keys with a set for O(1) membership.
        let mut tabu_queue: VecDeque<String> = VecDeque::new();
        let mut tabu_set: HashSet<String> = HashSet::new();

        let mut cost_history = Vec::with_capacity(config.max_iterations);

        for iteration in 0..config.max_iterations {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }
            ctx.progress(((iteration + 1) * 100 / config.max_iterations) as u32);

            let mut best_move: Option<CandidateMove> = None;

            for _ in 0..config.neighborhood_size {
                let Some(candidate) = sample_move(&current, domain, &mut rng) else {
                    continue;
                };

                if tabu_set.contains(&candidate.reverse_key) {
                    // Aspiration: a tabu move is still admitted when it
                    // produces a new global best.
                    if config.aspiration && candidate.cost < best_cost {
                        best_move = Some(candidate);
                        break;
                    }
                    continue;
                }

                if best_move.as_ref().is_none_or(|m| candidate.cost < m.cost) {
                    best_move = Some(candidate);
                }
            }

            let Some(mv) = best_move else {
                ctx.log(format!(
                    "[tabu] no admissible move in iteration {}, stopping",
                    iteration + 1
                ));
                cost_history.push(best_cost.scalar());
                break;
            };

            if tabu_queue.len() >= config.tenure {
                if let Some(old) = tabu_queue.pop_front() {
                    tabu_set.remove(&old);
                }
            }
            tabu_queue.push_back(mv.key.clone());
            tabu_set.insert(mv.key);

            current = mv.schedule;

            if mv.cost < best_cost {
                best = current.clone();
                best_cost = mv.cost;
                best_iteration = iteration;
                ctx.log(format!(
                    "[tabu] iteration {}: new best cost {:.2}",
                    iteration + 1,
                    best_cost.scalar()
                ));
            }

            cost_history.push(best_cost.scalar());
        }

        TabuResult {
            best,
            best_cost,
            iterations: cost_history.len(),
            best_iteration,
            cancelled,
            cost_history,
        }
    }
}

/// Samples one candidate move.
///
/// While the schedule has shortages the sampler prefers repair moves
/// (fill a `Shortage` slot with an oracle-eligible professor); otherwise
/// it reassigns a random occupied, unlocked slot to a random different
/// professor. The per-move oracle rejects invalid candidates before they
/// are ever costed.
fn sample_move<R: Rng>(
    current: &Schedule,
    domain: &DomainContext<'_>,
    rng: &mut R,
) -> Option<CandidateMove> {
    let shortages = current.shortage_duties();
    let prefer_repair = !shortages.is_empty() && rng.random::<f64>() < 0.7;

    if prefer_repair {
        let &duty = shortages.choose(rng)?;
        return sample_repair(current, domain, duty, rng);
    }

    let occupied = current.occupied_duties(&domain.locked);
    match occupied.choose(rng) {
        Some(&duty) => sample_reassignment(current, domain, duty, rng),
        // nothing occupied yet: fall back to repair when possible
        None => {
            let &duty = shortages.choose(rng)?;
            sample_repair(current, domain, duty, rng)
        }
    }
}

fn sample_repair<R: Rng>(
    current: &Schedule,
    domain: &DomainContext<'_>,
    duty: DutyRef,
    rng: &mut R,
) -> Option<CandidateMove> {
    let exam = &current.exams[duty.exam];
    let ledger = domain.ledger(current);

    let eligible: Vec<&String> = domain
        .roster
        .professors
        .iter()
        .filter(|p| !exam.has_guard(p) && domain.assignment_valid(p, exam, &ledger))
        .collect();
    let &prof = eligible.choose(rng)?;

    let mut schedule = current.clone();
    schedule.assign(duty, Guard::Assigned(prof.clone()));
    let cost = domain.evaluate(&schedule);
    let key = format!("{}:shortage->{}", exam.id.0, prof);
    let reverse_key = format!("{}:{}->shortage", exam.id.0, prof);

    Some(CandidateMove {
        schedule,
        cost,
        key,
        reverse_key,
    })
}

fn sample_reassignment<R: Rng>(
    current: &Schedule,
    domain: &DomainContext<'_>,
    duty: DutyRef,
    rng: &mut R,
) -> Option<CandidateMove> {
    let exam = &current.exams[duty.exam];
    let holder = exam.guards[duty.slot].assigned()?.to_string();

    let candidates: Vec<&String> = domain
        .roster
        .professors
        .iter()
        .filter(|p| **p != holder)
        .collect();
    let &prof = candidates.choose(rng)?;

    // Validate against a ledger with the old holder vacated.
    let mut ledger = domain.ledger(current);
    ledger.remove(&holder, exam, domain.config);
    if exam.has_guard(prof) || !domain.assignment_valid(prof, exam, &ledger) {
        return None;
    }

    let mut schedule = current.clone();
    schedule.assign(duty, Guard::Assigned(prof.clone()));
    let cost = domain.evaluate(&schedule);
    let key = format!("{}:{}->{}", exam.id.0, holder, prof);
    let reverse_key = format!("{}:{}->{}", exam.id.0, prof, holder);

    Some(CandidateMove {
        schedule,
        cost,
        key,
        reverse_key,
    })
}
