//! The 4-component lexicographic cost function.
//!
//! Every component is recomputed from a full schedule scan on every
//! call; no incremental bookkeeping is trusted.

use crate::models::{ExamCalendar, ProfessorId, Schedule, SchedulerConfig};
use crate::validity::schedule_valid;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Penalty per day on which a professor's owned subject is examined
/// without the professor also guarding. Empirical constant.
pub const MISSED_OWNER_DAY_PENALTY: f64 = 2.0;

/// Penalty per day beyond two that a professor's owned subjects span.
/// Empirical constant.
pub const EXTRA_SPREAD_DAY_PENALTY: f64 = 3.0;

/// Cost of a schedule, compared strictly lexicographically:
/// shortage dominates, then hard violations, then deviation, then the
/// soft penalty.
#[derive(Debug, Clone, Copy)]
pub struct CostTuple {
    /// Number of `Shortage` guard slots.
    pub shortage: u32,
    /// 1 when [`schedule_valid`] rejects the schedule, else 0.
    pub hard_violation: u32,
    /// Distribution deviation: custom-target L1 distance, or max−min
    /// weighted workload.
    pub deviation: f64,
    /// Subject-owner soft penalty.
    pub soft_penalty: f64,
}

impl CostTuple {
    /// Scalar projection used only for Metropolis acceptance inside LNS.
    pub fn scalar(&self) -> f64 {
        1000.0 * self.shortage as f64
            + 100.0 * self.hard_violation as f64
            + self.deviation
            + self.soft_penalty
    }
}

impl PartialEq for CostTuple {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CostTuple {}

impl PartialOrd for CostTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.shortage
            .cmp(&other.shortage)
            .then(self.hard_violation.cmp(&other.hard_violation))
            .then(self.deviation.total_cmp(&other.deviation))
            .then(self.soft_penalty.total_cmp(&other.soft_penalty))
    }
}

/// Per-professor (large, other) duty counts.
///
/// Guard slots are ordered large-hall first within an exam, so the split
/// point is the exam's large-guard requirement. Every professor in the
/// roster appears, including those with zero duties.
pub fn professor_stats(
    schedule: &Schedule,
    professors: &[ProfessorId],
    config: &SchedulerConfig,
) -> HashMap<ProfessorId, (u32, u32)> {
    let mut stats: HashMap<ProfessorId, (u32, u32)> =
        professors.iter().map(|p| (p.clone(), (0, 0))).collect();

    for exam in &schedule.exams {
        let split = exam.large_guards_needed(config);
        let assigned: Vec<&str> = exam.guards.iter().filter_map(|g| g.assigned()).collect();
        for (i, prof) in assigned.iter().enumerate() {
            if let Some(entry) = stats.get_mut(*prof) {
                if i < split {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }
    }

    stats
}

/// Deviation of the actual (large, other) histogram from the custom
/// target histogram: L1 distance over the union of patterns.
pub fn target_pattern_deviation(
    stats: &HashMap<ProfessorId, (u32, u32)>,
    targets: &[(u32, u32)],
) -> f64 {
    let mut actual: HashMap<(u32, u32), i64> = HashMap::new();
    for counts in stats.values() {
        *actual.entry(*counts).or_default() += 1;
    }
    let mut wanted: HashMap<(u32, u32), i64> = HashMap::new();
    for t in targets {
        *wanted.entry(*t).or_default() += 1;
    }

    let keys: BTreeSet<(u32, u32)> = actual.keys().chain(wanted.keys()).copied().collect();
    keys.iter()
        .map(|k| {
            (actual.get(k).copied().unwrap_or(0) - wanted.get(k).copied().unwrap_or(0)).abs() as f64
        })
        .sum()
}

/// Default deviation: max − min weighted workload over all professors.
pub fn workload_spread(
    stats: &HashMap<ProfessorId, (u32, u32)>,
    config: &SchedulerConfig,
) -> f64 {
    let workloads: Vec<f64> = stats
        .values()
        .map(|(large, other)| {
            *large as f64 * config.large_hall_weight + *other as f64 * config.other_hall_weight
        })
        .collect();
    match (
        workloads.iter().copied().reduce(f64::max),
        workloads.iter().copied().reduce(f64::min),
    ) {
        (Some(max), Some(min)) => max - min,
        _ => 0.0,
    }
}

/// The deviation component alone: custom-target L1 distance when custom
/// targets are enabled, otherwise max − min weighted workload.
///
/// Also serves as the energy function of the annealing and tabu moves.
pub fn distribution_deviation(
    schedule: &Schedule,
    professors: &[ProfessorId],
    config: &SchedulerConfig,
) -> f64 {
    let stats = professor_stats(schedule, professors, config);
    if config.enable_custom_targets && !config.custom_target_patterns.is_empty() {
        target_pattern_deviation(&stats, &config.expanded_targets())
    } else {
        workload_spread(&stats, config)
    }
}

/// Evaluates the full 4-component cost of a schedule.
pub fn evaluate(
    schedule: &Schedule,
    professors: &[ProfessorId],
    config: &SchedulerConfig,
    calendar: &ExamCalendar,
) -> CostTuple {
    let shortage = schedule.shortage_count() as u32;
    let hard_violation = if schedule_valid(schedule, config, calendar) {
        0
    } else {
        1
    };

    CostTuple {
        shortage,
        hard_violation,
        deviation: distribution_deviation(schedule, professors, config),
        soft_penalty: owner_soft_penalty(schedule),
    }
}

/// Soft penalty over subject owners: a fixed penalty per owned-subject
/// day the owner does not guard, plus a fixed penalty per owned-subject
/// day beyond two.
fn owner_soft_penalty(schedule: &Schedule) -> f64 {
    let mut owned_days: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    let mut guard_days: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();

    for exam in &schedule.exams {
        if let Some(owner) = exam.owner.assigned() {
            owned_days.entry(owner).or_default().insert(exam.date);
        }
        for guard in &exam.guards {
            if let Some(prof) = guard.assigned() {
                guard_days.entry(prof).or_default().insert(exam.date);
            }
        }
    }

    let mut penalty = 0.0;
    for (owner, days) in &owned_days {
        let guarded = guard_days.get(owner);
        let missed = days
            .iter()
            .filter(|d| !guarded.is_some_and(|g| g.contains(d)))
            .count();
        penalty += missed as f64 * MISSED_OWNER_DAY_PENALTY;
        penalty += days.len().saturating_sub(2) as f64 * EXTRA_SPREAD_DAY_PENALTY;
    }
    penalty
}
