//! Depth-first branch-and-bound solver for [`GuardModel`].
//!
//! Variables are ordered most-constrained first; values are tried
//! least-loaded first. Caps, slot uniqueness, and duty-pattern upper
//! bounds are forward-checked during descent; pattern lower bounds and
//! partnership equality are verified on complete assignments. Every
//! complete assignment is an improving-solution event: the incumbent
//! and the cancellation flag are both consulted there.

use super::model::{GuardModel, ObjectiveSpec};
use crate::models::DutyPattern;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Search space exhausted; the incumbent is optimal.
    Optimal,
    /// Stopped early (time box or cancellation) with an incumbent.
    Feasible,
    /// Search space exhausted without any solution.
    Infeasible,
    /// Time box expired before any solution was found.
    Timeout,
    /// Cancelled before any solution was found.
    Cancelled,
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock time box in milliseconds.
    pub time_limit_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 30_000,
        }
    }
}

/// Solution of a solve run.
#[derive(Debug, Clone)]
pub struct CpSolution {
    pub status: SolverStatus,
    /// Objective of the incumbent, if one exists.
    pub objective: Option<f64>,
    /// Professor index per variable; empty when no solution was found.
    pub assignment: Vec<usize>,
    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: u128,
    /// Search nodes explored.
    pub nodes: u64,
}

impl CpSolution {
    /// Whether a usable assignment exists.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Exact depth-first branch-and-bound solver.
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    /// Solves the model within the time box; the cancellation flag is
    /// honored at improving-solution events and periodic node checks.
    pub fn solve(
        model: &GuardModel,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> CpSolution {
        let started = Instant::now();

        // Most-constrained variables first.
        let mut order: Vec<usize> = (0..model.variables.len()).collect();
        order.sort_by_key(|&v| model.variables[v].candidates.len());

        let mut search = Search {
            model,
            order,
            deadline_ms: config.time_limit_ms as u128,
            started,
            cancel,
            assignment: vec![usize::MAX; model.variables.len()],
            slot_used: vec![HashMap::new(); model.professors.len()],
            shift_counts: vec![0; model.professors.len()],
            large_counts: vec![0; model.professors.len()],
            day_duties: vec![vec![0u32; model.day_count]; model.professors.len()],
            distinct_days: vec![0; model.professors.len()],
            best: None,
            best_objective: f64::INFINITY,
            nodes: 0,
            stopped: Stop::No,
        };

        search.descend(0);

        let (status, objective, assignment) = match (&search.best, search.stopped) {
            (Some(best), Stop::No) => (SolverStatus::Optimal, search.best_objective, best.clone()),
            (Some(best), _) => (SolverStatus::Feasible, search.best_objective, best.clone()),
            (None, Stop::No) => (SolverStatus::Infeasible, f64::INFINITY, Vec::new()),
            (None, Stop::Time) => (SolverStatus::Timeout, f64::INFINITY, Vec::new()),
            (None, Stop::Cancel) => (SolverStatus::Cancelled, f64::INFINITY, Vec::new()),
        };

        CpSolution {
            status,
            objective: if assignment.is_empty() {
                None
            } else {
                Some(objective)
            },
            assignment,
            solve_time_ms: started.elapsed().as_millis(),
            nodes: search.nodes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    No,
    Time,
    Cancel,
}

struct Search<'m> {
    model: &'m GuardModel,
    order: Vec<usize>,
    deadline_ms: u128,
    started: Instant,
    cancel: Option<Arc<AtomicBool>>,
    assignment: Vec<usize>,
    /// Per professor: slot group → duties held there (must stay ≤ 1).
    slot_used: Vec<HashMap<usize, u32>>,
    shift_counts: Vec<u32>,
    large_counts: Vec<u32>,
    day_duties: Vec<Vec<u32>>,
    distinct_days: Vec<usize>,
    best: Option<Vec<usize>>,
    best_objective: f64,
    nodes: u64,
    stopped: Stop,
}

impl Search<'_> {
    fn out_of_budget(&mut self) -> bool {
        if self.stopped != Stop::No {
            return true;
        }
        if self.started.elapsed().as_millis() >= self.deadline_ms {
            self.stopped = Stop::Time;
            return true;
        }
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            self.stopped = Stop::Cancel;
            return true;
        }
        false
    }

    fn descend(&mut self, depth: usize) {
        if self.stopped != Stop::No {
            return;
        }
        self.nodes += 1;
        if self.nodes % 1024 == 0 && self.out_of_budget() {
            return;
        }

        if depth == self.order.len() {
            self.record_leaf();
            return;
        }

        let var_idx = self.order[depth];
        let var = &self.model.variables[var_idx];

        // Least-loaded professors first: balanced incumbents show up
        // early, which tightens the bound.
        let mut values: Vec<usize> = var
            .candidates
            .iter()
            .copied()
            .filter(|&p| self.admissible(var_idx, p))
            .collect();
        values.sort_by_key(|&p| self.shift_counts[p]);

        for prof in values {
            if self.stopped != Stop::No {
                return;
            }
            self.assign(var_idx, prof);
            self.descend(depth + 1);
            self.unassign(var_idx, prof);
        }
    }

    fn admissible(&self, var_idx: usize, prof: usize) -> bool {
        let var = &self.model.variables[var_idx];

        if self.slot_used[prof].contains_key(&var.slot_group) {
            return false;
        }
        if self
            .model
            .max_shifts
            .is_some_and(|cap| self.shift_counts[prof] >= cap)
        {
            return false;
        }
        if var.is_large
            && self
                .model
                .max_large_shifts
                .is_some_and(|cap| self.large_counts[prof] >= cap)
        {
            return false;
        }

        if let Some(pattern) = self.model.patterns[prof] {
            if self.day_duties[prof][var.day] == 0 {
                // taking a new day
                if self.distinct_days[prof] >= pattern.max_days() {
                    return false;
                }
                if pattern == DutyPattern::ConsecutiveStrict && self.distinct_days[prof] == 1 {
                    let committed = self.day_duties[prof]
                        .iter()
                        .position(|&c| c > 0)
                        .expect("one committed day exists");
                    if committed.abs_diff(var.day) != 1 {
                        return false;
                    }
                }
            }
        }

        true
    }

    fn assign(&mut self, var_idx: usize, prof: usize) {
        let var = &self.model.variables[var_idx];
        self.assignment[var_idx] = prof;
        *self.slot_used[prof].entry(var.slot_group).or_insert(0) += 1;
        self.shift_counts[prof] += 1;
        if var.is_large {
            self.large_counts[prof] += 1;
        }
        if self.day_duties[prof][var.day] == 0 {
            self.distinct_days[prof] += 1;
        }
        self.day_duties[prof][var.day] += 1;
    }

    fn unassign(&mut self, var_idx: usize, prof: usize) {
        let var = &self.model.variables[var_idx];
        self.assignment[var_idx] = usize::MAX;
        if let Some(count) = self.slot_used[prof].get_mut(&var.slot_group) {
            *count -= 1;
            if *count == 0 {
                self.slot_used[prof].remove(&var.slot_group);
            }
        }
        self.shift_counts[prof] -= 1;
        if var.is_large {
            self.large_counts[prof] -= 1;
        }
        self.day_duties[prof][var.day] -= 1;
        if self.day_duties[prof][var.day] == 0 {
            self.distinct_days[prof] -= 1;
        }
    }

    /// Complete assignment: verify the leaf-only constraints, then treat
    /// it as an improving-solution event.
    fn record_leaf(&mut self) {
        if !self.patterns_complete() || !self.partners_matched() {
            return;
        }

        let objective = self.objective();
        if objective < self.best_objective {
            self.best_objective = objective;
            self.best = Some(self.assignment.clone());
            // the improving-solution callback is where cancellation
            // takes effect
            self.out_of_budget();
        }
    }

    fn patterns_complete(&self) -> bool {
        for (prof, pattern) in self.model.patterns.iter().enumerate() {
            let Some(pattern) = pattern else { continue };
            if self.distinct_days[prof] == 0 {
                continue;
            }
            let ok = match pattern {
                DutyPattern::OneDay => self.distinct_days[prof] <= 1,
                DutyPattern::FlexibleTwo => self.distinct_days[prof] == 2,
                DutyPattern::FlexibleThree => (2..=3).contains(&self.distinct_days[prof]),
                DutyPattern::ConsecutiveStrict => {
                    let days: Vec<usize> = self.day_duties[prof]
                        .iter()
                        .enumerate()
                        .filter(|(_, &c)| c > 0)
                        .map(|(d, _)| d)
                        .collect();
                    days.len() == 2 && days[1] - days[0] == 1
                }
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn partners_matched(&self) -> bool {
        self.model.partnerships.iter().all(|&(a, b)| {
            (0..self.model.day_count)
                .all(|d| (self.day_duties[a][d] > 0) == (self.day_duties[b][d] > 0))
        })
    }

    fn objective(&self) -> f64 {
        match &self.model.objective {
            ObjectiveSpec::MinimizeSpread {
                large_weight,
                other_weight,
            } => {
                let workloads = (0..self.model.professors.len()).map(|p| {
                    let large = self.large_counts[p] as f64;
                    let other = (self.shift_counts[p] - self.large_counts[p]) as f64;
                    large * large_weight + other * other_weight
                });
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for w in workloads {
                    min = min.min(w);
                    max = max.max(w);
                }
                if min.is_finite() {
                    max - min
                } else {
                    0.0
                }
            }
            ObjectiveSpec::CustomTargets {
                targets,
                untracked_penalty,
            } => {
                let mut wanted: HashMap<(u32, u32), i64> = HashMap::new();
                for t in targets {
                    *wanted.entry(*t).or_default() += 1;
                }

                let mut actual: HashMap<(u32, u32), i64> = HashMap::new();
                let mut tracked = 0i64;
                for p in 0..self.model.professors.len() {
                    let counts = (
                        self.large_counts[p],
                        self.shift_counts[p] - self.large_counts[p],
                    );
                    if wanted.contains_key(&counts) {
                        *actual.entry(counts).or_default() += 1;
                        tracked += 1;
                    }
                }

                let deviation: i64 = wanted
                    .iter()
                    .map(|(k, want)| (actual.get(k).copied().unwrap_or(0) - want).abs())
                    .sum();
                let untracked = self.model.professors.len() as i64 - tracked;
                deviation as f64 + untracked as f64 * untracked_penalty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DomainContext;
    use crate::models::{
        Exam, ExamCalendar, ExamId, Guard, Hall, HallTier, Owner, Roster, Schedule,
        SchedulerConfig, SlotKind, SlotSpec,
    };
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn calendar(days: u32) -> ExamCalendar {
        ExamCalendar::new(
            (1..=days)
                .map(|d| {
                    (
                        date(d),
                        vec![
                            SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                            SlotSpec::new("10:00", SlotKind::Primary, vec!["L1".into()]),
                        ],
                    )
                })
                .collect(),
        )
    }

    fn roster(profs: &[&str]) -> Roster {
        Roster {
            professors: profs.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn exam(id: u64, d: u32, time: &str, tier: HallTier, slots: usize) -> Exam {
        Exam {
            id: ExamId(id),
            date: date(d),
            time: time.into(),
            subject: format!("S{id}"),
            level: "L1".into(),
            owner: Owner::Unowned,
            halls: vec![Hall::new("H", tier)],
            guards: vec![Guard::Shortage; slots],
        }
    }

    #[test]
    fn test_solver_balances_two_duties() {
        let config = SchedulerConfig::default();
        let cal = calendar(1);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let schedule = Schedule::new(vec![
            exam(1, 1, "08:00", HallTier::Small, 1),
            exam(2, 1, "10:00", HallTier::Small, 1),
        ]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective.unwrap() - 0.0).abs() < 1e-12);
        // one duty each
        let solved = model.apply(&schedule, &solution.assignment);
        let ledger = domain.ledger(&solved);
        assert_eq!(ledger.shift_count("A"), 1);
        assert_eq!(ledger.shift_count("B"), 1);
    }

    #[test]
    fn test_solver_infeasible_when_everyone_unavailable() {
        let mut config = SchedulerConfig::default();
        config.unavailable_days.insert("A".into(), vec![date(1)]);
        config.unavailable_days.insert("B".into(), vec![date(1)]);
        let cal = calendar(1);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let schedule = Schedule::new(vec![exam(1, 1, "08:00", HallTier::Small, 1)]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);

        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.assignment.is_empty());
    }

    #[test]
    fn test_solver_slot_uniqueness() {
        // two slots on the same exam at the same time: needs two profs
        let config = SchedulerConfig::default();
        let cal = calendar(1);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let schedule = Schedule::new(vec![exam(1, 1, "08:00", HallTier::Small, 2)]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);

        assert!(solution.is_solution_found());
        let profs: Vec<usize> = solution.assignment.clone();
        assert_ne!(profs[0], profs[1]);
    }

    #[test]
    fn test_solver_respects_consecutive_pattern() {
        let mut config = SchedulerConfig::default();
        config
            .duty_patterns
            .insert("A".into(), DutyPattern::ConsecutiveStrict);
        let cal = calendar(3);
        let roster = roster(&["A"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        // duties on days 1 and 3 only: A cannot take both
        let schedule = Schedule::new(vec![
            exam(1, 1, "08:00", HallTier::Small, 1),
            exam(2, 3, "08:00", HallTier::Small, 1),
        ]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);
        assert_eq!(solution.status, SolverStatus::Infeasible);

        // adjacent days are fine
        let schedule = Schedule::new(vec![
            exam(1, 1, "08:00", HallTier::Small, 1),
            exam(2, 2, "08:00", HallTier::Small, 1),
        ]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);
        assert_eq!(solution.status, SolverStatus::Optimal);
    }

    #[test]
    fn test_solver_enforces_partnership() {
        let mut config = SchedulerConfig::default();
        config.partnerships.push(("A".into(), "B".into()));
        config.max_shifts = Some(1);
        let cal = calendar(2);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        // two duties in distinct slots of the same day: partners can
        // both work day 1
        let schedule = Schedule::new(vec![
            exam(1, 1, "08:00", HallTier::Small, 1),
            exam(2, 1, "10:00", HallTier::Small, 1),
        ]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);

        assert!(solution.is_solution_found());
        let solved = model.apply(&schedule, &solution.assignment);
        let ledger = domain.ledger(&solved);
        assert_eq!(ledger.duty_days("A"), ledger.duty_days("B"));
    }

    #[test]
    fn test_solver_cancelled_before_start() {
        let config = SchedulerConfig::default();
        let cal = calendar(1);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let schedule = Schedule::new(vec![exam(1, 1, "08:00", HallTier::Small, 1)]);
        let model = GuardModel::build(&schedule, &domain).unwrap();

        let cancel = Arc::new(AtomicBool::new(true));
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), Some(cancel));
        // an improving solution may be recorded before the first
        // cancellation check; either way the run stops immediately
        assert!(matches!(
            solution.status,
            SolverStatus::Feasible | SolverStatus::Cancelled
        ));
    }

    #[test]
    fn test_solver_custom_target_objective() {
        let mut config = SchedulerConfig::default();
        config.enable_custom_targets = true;
        config.custom_target_patterns = vec![crate::models::TargetPattern {
            large: 0,
            other: 2,
            count: 1,
        }];
        let cal = calendar(1);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let schedule = Schedule::new(vec![
            exam(1, 1, "08:00", HallTier::Small, 1),
            exam(2, 1, "10:00", HallTier::Small, 1),
        ]);
        let model = GuardModel::build(&schedule, &domain).unwrap();
        let solution = BranchAndBoundSolver::solve(&model, &SolverConfig::default(), None);

        assert_eq!(solution.status, SolverStatus::Optimal);
        // optimum: one professor takes both duties → matches (0, 2),
        // the other is untracked; objective = 0 + 10
        let solved = model.apply(&schedule, &solution.assignment);
        let ledger = domain.ledger(&solved);
        let counts = [ledger.shift_count("A"), ledger.shift_count("B")];
        assert!(counts.contains(&2) && counts.contains(&0));
    }
}
