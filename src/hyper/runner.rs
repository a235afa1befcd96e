//! The Q-learning control loop.
//!
//! Each episode: read the schedule's defect state from its cost tuple,
//! pick an operator epsilon-greedily, run it, reward the transition
//! hierarchically, and apply the Bellman update. The best schedule is
//! retained independently of the accepted exploration state.

use super::config::{HyperAction, HyperConfig};
use super::qtable::QTable;
use crate::context::{DomainContext, RunContext};
use crate::cost::CostTuple;
use crate::lns::{LnsConfig, LnsRunner};
use crate::models::Schedule;
use crate::tabu::{TabuConfig, TabuRunner};
use crate::vns::{VnsConfig, VnsRunner};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Reward for removing at least one shortage.
const REWARD_SHORTAGE: f64 = 100.0;
/// Reward for clearing a hard violation.
const REWARD_HARD: f64 = 50.0;
/// Reward for reducing the distribution deviation.
const REWARD_DEVIATION: f64 = 20.0;
/// Reward for reducing the soft penalty.
const REWARD_SOFT: f64 = 5.0;
/// Reward when the operator changed nothing.
const REWARD_STALL: f64 = -1.0;

/// Defect profile of a schedule, derived from its cost tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    /// Guard slots remain unfilled.
    UnplacedItems,
    /// Filled but violating a hard constraint.
    HardViolation,
    /// Feasible but with distribution/soft defects.
    SoftViolation,
    /// Nothing left worth fixing.
    NearOptimal,
}

impl SolveState {
    pub fn of(cost: &CostTuple) -> Self {
        if cost.shortage > 0 {
            SolveState::UnplacedItems
        } else if cost.hard_violation > 0 {
            SolveState::HardViolation
        } else if cost.deviation > 1e-9 || cost.soft_penalty > 1e-9 {
            SolveState::SoftViolation
        } else {
            SolveState::NearOptimal
        }
    }

    /// Stable key used in the persisted Q-table.
    pub fn key(self) -> &'static str {
        match self {
            SolveState::UnplacedItems => "UNPLACED_ITEMS",
            SolveState::HardViolation => "HARD_VIOLATION",
            SolveState::SoftViolation => "SOFT_VIOLATION",
            SolveState::NearOptimal => "NEAR_OPTIMAL",
        }
    }
}

/// Result of a hyper-heuristic run.
#[derive(Debug, Clone)]
pub struct HyperResult {
    /// Best schedule found across all episodes.
    pub best: Schedule,
    /// Cost of the best schedule.
    pub best_cost: CostTuple,
    /// Episodes executed.
    pub episodes: usize,
    /// Exploration rate when the run ended.
    pub final_epsilon: f64,
    /// Whether cancelled externally.
    pub cancelled: bool,
    /// Actions taken, per episode.
    pub actions_taken: Vec<HyperAction>,
}

/// The hyper-heuristic controller.
pub struct HyperRunner;

impl HyperRunner {
    /// Runs the control loop from the given schedule.
    pub fn run(
        initial: Schedule,
        domain: &DomainContext<'_>,
        config: &HyperConfig,
        ctx: &RunContext,
    ) -> HyperResult {
        config.validate().expect("invalid HyperConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut qtable = match &config.qtable_path {
            Some(path) => match QTable::load(path) {
                Ok(table) => {
                    ctx.log(format!(
                        "[hyper] loaded Q-table with {} states",
                        table.state_count()
                    ));
                    table
                }
                Err(err) => {
                    log::warn!("failed to load Q-table, starting fresh: {err}");
                    QTable::new()
                }
            },
            None => QTable::new(),
        };

        let mut current = initial;
        let mut current_cost = domain.evaluate(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut epsilon = config.epsilon;
        let mut last_improvement = Instant::now();
        let mut actions_taken = Vec::with_capacity(config.episodes);
        let mut cancelled = false;
        let mut episodes = 0usize;

        for episode in 0..config.episodes {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }
            episodes = episode + 1;
            ctx.progress((episodes * 100 / config.episodes) as u32);

            let state = SolveState::of(&current_cost);

            // Epsilon-greedy selection.
            let action = if rng.random::<f64>() < epsilon {
                *config
                    .actions
                    .choose(&mut rng)
                    .expect("validated non-empty actions")
            } else {
                qtable
                    .best_action(state.key(), &config.actions)
                    .unwrap_or_else(|| {
                        *config
                            .actions
                            .choose(&mut rng)
                            .expect("validated non-empty actions")
                    })
            };
            actions_taken.push(action);

            let candidate = run_action(action, current.clone(), domain, config, &mut rng, ctx);
            let candidate_cost = domain.evaluate(&candidate);

            let reward = hierarchical_reward(&current_cost, &candidate_cost);
            let next_state = SolveState::of(&candidate_cost);
            qtable.update(
                state.key(),
                action,
                reward,
                next_state.key(),
                &config.actions,
                config.learning_rate,
                config.discount,
            );
            ctx.log(format!(
                "[hyper] episode {}: {} in {} -> reward {:+.0}",
                episodes,
                action.key(),
                state.key(),
                reward
            ));

            // The exploration trajectory always moves on; the best-ever
            // schedule is kept separately.
            current = candidate;
            current_cost = candidate_cost;

            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
                last_improvement = Instant::now();
            }

            if last_improvement.elapsed().as_millis() >= config.stagnation_window_ms as u128 {
                epsilon = config.epsilon_boost;
                last_improvement = Instant::now();
                ctx.log(format!(
                    "[hyper] stagnation: epsilon boosted to {epsilon:.2}"
                ));
            } else {
                epsilon = (epsilon * config.epsilon_decay).max(config.epsilon_min);
            }
        }

        if let Some(path) = &config.qtable_path {
            if let Err(err) = qtable.save(path) {
                log::warn!("failed to save Q-table: {err}");
            }
        }

        HyperResult {
            best,
            best_cost,
            episodes,
            final_epsilon: epsilon,
            cancelled,
            actions_taken,
        }
    }
}

/// Runs one operator with a small per-episode budget.
fn run_action<R: Rng>(
    action: HyperAction,
    schedule: Schedule,
    domain: &DomainContext<'_>,
    config: &HyperConfig,
    rng: &mut R,
    ctx: &RunContext,
) -> Schedule {
    let seed = rng.random::<u64>();
    // Operators run on a muted context: the controller owns progress
    // reporting, cancellation still propagates.
    let inner_ctx = ctx.clone();

    match action {
        HyperAction::Tabu => {
            let cfg = TabuConfig::default()
                .with_max_iterations(config.operator_iterations)
                .with_seed(seed);
            TabuRunner::run(schedule, domain, &cfg, &inner_ctx).best
        }
        HyperAction::Lns => {
            let cfg = LnsConfig::default()
                .with_iterations(config.operator_iterations)
                .with_seed(seed);
            LnsRunner::run(schedule, domain, &cfg, &inner_ctx).best
        }
        HyperAction::RepairLns => {
            let cfg = LnsConfig {
                destroy_fraction: 0.4,
                min_destroy_fraction: 0.1,
                ..LnsConfig::default()
            }
            .with_iterations(config.operator_iterations)
            .with_seed(seed);
            LnsRunner::run(schedule, domain, &cfg, &inner_ctx).best
        }
        HyperAction::Vns => {
            let cfg = VnsConfig::default()
                .with_iterations(config.operator_iterations.max(1) / 2 + 1)
                .with_max_k(5)
                .with_seed(seed);
            VnsRunner::run(schedule, domain, &cfg, &inner_ctx).best
        }
    }
}

/// Hierarchical reward over the cost-tuple priority order.
fn hierarchical_reward(old: &CostTuple, new: &CostTuple) -> f64 {
    if new.shortage != old.shortage {
        return if new.shortage < old.shortage {
            REWARD_SHORTAGE
        } else {
            -REWARD_SHORTAGE
        };
    }
    if new.hard_violation != old.hard_violation {
        return if new.hard_violation < old.hard_violation {
            REWARD_HARD
        } else {
            -REWARD_HARD
        };
    }
    if (new.deviation - old.deviation).abs() > 1e-9 {
        return if new.deviation < old.deviation {
            REWARD_DEVIATION
        } else {
            -REWARD_DEVIATION
        };
    }
    if (new.soft_penalty - old.soft_penalty).abs() > 1e-9 {
        return if new.soft_penalty < old.soft_penalty {
            REWARD_SOFT
        } else {
            -REWARD_SOFT
        };
    }
    REWARD_STALL
}
