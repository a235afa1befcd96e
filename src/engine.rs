//! Strategy dispatch and the full scheduling pipeline.
//!
//! The pipeline runs on whatever single worker the caller provides; it
//! never spawns threads of its own. One iteration is: place subjects,
//! optionally cluster them, lock owners, construct a guard assignment,
//! and improve it with the configured strategy. Intensive search
//! repeats the whole pipeline and keeps the best iteration by
//! (unfilled slots, pattern failures, unscheduled subjects).

use crate::cluster;
use crate::construct::{self, ScoringMode, ShortageDiagnosis};
use crate::context::{DomainContext, RunContext};
use crate::cost::professor_stats;
use crate::cp::{BranchAndBoundSolver, GuardModel, SolverConfig};
use crate::error::InvigilError;
use crate::ga::{GaConfig, GaRunner};
use crate::hyper::{HyperConfig, HyperRunner};
use crate::lns::{LnsConfig, LnsRunner};
use crate::models::{
    DutyRef, ExamCalendar, Guard, LockedSet, ProfessorLedger, Roster, Schedule, SchedulerConfig,
    Strategy,
};
use crate::placement;
use crate::report::{self, RunOutcome};
use crate::sa::{SaConfig, SaRunner};
use crate::swap;
use crate::tabu::{TabuConfig, TabuRunner};
use crate::vns::{VnsConfig, VnsRunner};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Construction attempts before tabu search gives up on a valid start.
const TABU_INITIAL_ATTEMPTS: usize = 20;
/// Swap budget of the tabu warm-up pass.
const TABU_WARMUP_SWAPS: usize = 100;
/// Construct-and-polish attempts warming up LNS/VNS/hyper runs.
const WARMUP_ATTEMPTS: usize = 10;
/// Swap attempt budget of the clustering pre-pass.
const CLUSTER_ATTEMPTS: usize = 5000;

/// One pipeline iteration's artifacts, ranked against other iterations.
struct IterationResult {
    schedule: Schedule,
    shortage_report: Vec<ShortageDiagnosis>,
    unscheduled: Vec<String>,
    unfilled: usize,
    failure_count: usize,
}

impl IterationResult {
    fn rank(&self) -> (usize, usize, usize) {
        (self.unfilled, self.failure_count, self.unscheduled.len())
    }
}

/// Runs the complete scheduling pipeline.
///
/// Emits progress lines and the terminal `DONE<json>` line on the
/// context's channel, and also returns the outcome. A panic inside the
/// pipeline is caught, logged, and surfaced as a failed run.
pub fn run(
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
) -> Result<RunOutcome, InvigilError> {
    config.validate().map_err(InvigilError::InvalidConfig)?;
    if calendar.day_count() == 0 {
        let outcome = RunOutcome::failure("no exam days configured");
        ctx.done(&outcome);
        return Err(InvigilError::EmptyCalendar);
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_pipeline(roster, calendar, config, ctx)
    }));

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(panic) => {
            let detail = panic_message(&panic);
            log::error!("scheduling run panicked: {detail}");
            ctx.log(format!("fatal error during scheduling: {detail}"));
            RunOutcome::failure(format!("fatal error: {detail}"))
        }
    };

    ctx.done(&outcome);
    Ok(outcome)
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_pipeline(
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
) -> RunOutcome {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };

    let iterations = if config.intensive_search {
        config.iterations.max(1)
    } else {
        1
    };
    let simple_strategy = !matches!(
        config.strategy,
        Strategy::TabuSearch
            | Strategy::Genetic
            | Strategy::Annealing
            | Strategy::ConstraintSolver
            | Strategy::Lns
            | Strategy::Vns
            | Strategy::Hyper
    );

    let mut best: Option<IterationResult> = None;

    for iteration in 0..iterations {
        if ctx.is_cancelled() {
            ctx.log("run cancelled".to_string());
            break;
        }
        if simple_strategy {
            ctx.progress(((iteration + 1) * 100 / iterations) as u32);
        }
        ctx.log(format!(
            "iteration {}/{}: building schedule",
            iteration + 1,
            iterations
        ));

        match run_iteration(roster, calendar, config, ctx, &mut rng) {
            Some(result) => {
                if best.as_ref().is_none_or(|b| result.rank() < b.rank()) {
                    ctx.log(format!(
                        "iteration {}: better solution (shortage={}, failures={})",
                        iteration + 1,
                        result.unfilled,
                        result.failure_count
                    ));
                    best = Some(result);
                }
            }
            None => {
                ctx.log(format!(
                    "iteration {}: strategy produced no schedule",
                    iteration + 1
                ));
            }
        }
    }

    let Some(best) = best else {
        return RunOutcome::failure(
            "no schedule could be produced; relax the constraints or increase iterations",
        );
    };

    let stats = professor_stats(&best.schedule, &roster.professors, config);
    let targets = report::compute_targets(&stats, config, roster.professors.len());
    let balance = report::balance_report(&stats, &targets);
    let failures = report::pattern_failures(&best.schedule, config, calendar);

    RunOutcome {
        success: true,
        schedule: Some(report::export_schedule(&best.schedule)),
        failures,
        shortage_report: best.shortage_report,
        unscheduled_subjects: best.unscheduled,
        prof_report: report::workload_report(&stats, config),
        balance_report: Some(balance),
        message: None,
    }
}

/// One pipeline iteration: placement, clustering, strategy. Returns
/// `None` when the strategy failed outright (e.g. CP infeasibility).
fn run_iteration(
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
    rng: &mut StdRng,
) -> Option<IterationResult> {
    let (mut schedule, unplaced) = placement::place_subjects(roster, calendar, config, rng);
    let unscheduled: Vec<String> = unplaced
        .iter()
        .map(|s| format!("{} ({})", s.name, s.level))
        .collect();

    if config.group_subjects {
        let base = DomainContext::new(roster, calendar, config);
        let outcome =
            cluster::cluster_subject_days(schedule, &base, None, CLUSTER_ATTEMPTS, rng);
        ctx.log(format!(
            "subject clustering: day spread {} -> {} in {} moves",
            outcome.initial_spread, outcome.final_spread, outcome.moves
        ));
        schedule = outcome.schedule;
    }

    let seed = rng.random::<u64>();
    let (schedule, diagnoses) = match config.strategy {
        Strategy::Genetic => run_genetic(schedule, roster, calendar, config, ctx, seed)?,
        Strategy::ConstraintSolver => {
            run_constraint_solver(schedule, roster, calendar, config, ctx)?
        }
        Strategy::TabuSearch => run_tabu(schedule, roster, calendar, config, ctx, rng, seed),
        Strategy::Lns | Strategy::Vns | Strategy::Hyper => {
            run_neighborhood_family(schedule, roster, calendar, config, ctx, rng, seed)
        }
        _ => run_constructive(schedule, roster, calendar, config, ctx, rng, seed),
    };

    let shortage_report = merge_shortage_report(&schedule, config, diagnoses);
    let failure_count = report::pattern_failures(&schedule, config, calendar).len();

    Some(IterationResult {
        unfilled: schedule.shortage_count(),
        shortage_report,
        unscheduled,
        failure_count,
        schedule,
    })
}

/// Locks each owner onto their chronologically last owned exam when a
/// slot is free and the assignment is individually feasible.
fn lock_owners(
    schedule: &mut Schedule,
    domain: &DomainContext<'_>,
    ledger: &mut ProfessorLedger,
) -> LockedSet {
    let mut locked = LockedSet::new();
    if !domain.config.assign_owner_as_guard {
        return locked;
    }

    for prof in &domain.roster.professors {
        let mut owned: Vec<usize> = schedule
            .exams
            .iter()
            .enumerate()
            .filter(|(_, e)| e.owner.assigned() == Some(prof.as_str()))
            .map(|(i, _)| i)
            .collect();
        owned.sort_by(|&a, &b| {
            let (ea, eb) = (&schedule.exams[a], &schedule.exams[b]);
            (ea.date, &ea.time).cmp(&(eb.date, &eb.time))
        });

        for &idx in owned.iter().rev() {
            let exam = schedule.exams[idx].clone();
            let Some(slot) = exam.guards.iter().position(|g| g.is_shortage()) else {
                continue;
            };
            if !domain.assignment_valid(prof, &exam, ledger) {
                continue;
            }
            schedule.assign(
                DutyRef { exam: idx, slot },
                Guard::Assigned(prof.clone()),
            );
            ledger.record(prof, &exam, domain.config);
            locked.lock(exam.id, prof.clone());
            break;
        }
    }

    locked
}

/// The construction-based strategies: Simple, Phased, Balanced,
/// PhasedPolished, and Annealing.
fn run_constructive(
    mut schedule: Schedule,
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
    rng: &mut StdRng,
    seed: u64,
) -> (Schedule, Vec<ShortageDiagnosis>) {
    let base = DomainContext::new(roster, calendar, config);
    let mut ledger = base.ledger(&schedule);
    let locked = lock_owners(&mut schedule, &base, &mut ledger);
    let domain = base.with_locked(locked);

    let mode = if config.strategy == Strategy::Balanced {
        ScoringMode::QuadraticDutyCount
    } else {
        ScoringMode::WeightedWorkload
    };

    let phased = matches!(
        config.strategy,
        Strategy::Phased | Strategy::PhasedPolished
    );
    let mut duties = schedule.shortage_duties();
    if phased {
        let (mut large, mut other): (Vec<DutyRef>, Vec<DutyRef>) = duties
            .into_iter()
            .partition(|d| schedule.exams[d.exam].uses_large_hall());
        large.shuffle(rng);
        other.shuffle(rng);
        large.extend(other);
        duties = large;
    } else {
        duties.shuffle(rng);
    }

    let diagnoses = construct::fill_slots(&mut schedule, &duties, &mut ledger, &domain, mode, rng);

    let schedule = match config.strategy {
        Strategy::Balanced => swap::hill_climb(schedule, &domain, config.swap_attempts, rng),
        Strategy::PhasedPolished => {
            swap::hill_climb(schedule, &domain, config.polishing_swaps, rng)
        }
        Strategy::Annealing => {
            let sa = SaConfig::from_scheduler(config).with_seed(seed);
            SaRunner::run(schedule, &domain, &sa, ctx).best
        }
        _ => schedule,
    };

    (schedule, diagnoses)
}

/// Tabu search: retry construction until a valid start exists, warm up
/// with swaps, then search.
fn run_tabu(
    template: Schedule,
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
    rng: &mut StdRng,
    seed: u64,
) -> (Schedule, Vec<ShortageDiagnosis>) {
    let base = DomainContext::new(roster, calendar, config);

    let mut start: Option<(Schedule, LockedSet, Vec<ShortageDiagnosis>)> = None;
    let mut fallback: Option<(Schedule, LockedSet, Vec<ShortageDiagnosis>)> = None;

    for attempt in 0..TABU_INITIAL_ATTEMPTS {
        let mut candidate = template.clone();
        let mut ledger = base.ledger(&candidate);
        let locked = lock_owners(&mut candidate, &base, &mut ledger);
        let domain = base.clone().with_locked(locked.clone());

        let mut duties = candidate.shortage_duties();
        duties.shuffle(rng);
        let diagnoses = construct::fill_slots(
            &mut candidate,
            &duties,
            &mut ledger,
            &domain,
            ScoringMode::WeightedWorkload,
            rng,
        );

        if base.schedule_valid(&candidate) {
            ctx.log(format!(
                "[tabu] valid initial schedule on attempt {}",
                attempt + 1
            ));
            start = Some((candidate, locked, diagnoses));
            break;
        }
        fallback = Some((candidate, locked, diagnoses));
    }

    let Some((schedule, locked, diagnoses)) = start else {
        ctx.log(format!(
            "[tabu] no valid initial schedule after {TABU_INITIAL_ATTEMPTS} attempts"
        ));
        let (schedule, _, diagnoses) = fallback.expect("at least one attempt ran");
        return (schedule, diagnoses);
    };

    let domain = base.with_locked(locked);
    let warmed = swap::hill_climb(schedule, &domain, TABU_WARMUP_SWAPS, rng);
    let tabu = TabuConfig::from_scheduler(config).with_seed(seed);
    (TabuRunner::run(warmed, &domain, &tabu, ctx).best, diagnoses)
}

/// LNS, VNS, and the hyper-heuristic share the warm-up phase: several
/// construct-and-polish attempts, keeping the cheapest result.
fn run_neighborhood_family(
    template: Schedule,
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
    rng: &mut StdRng,
    seed: u64,
) -> (Schedule, Vec<ShortageDiagnosis>) {
    let base = DomainContext::new(roster, calendar, config);

    let mut best: Option<(Schedule, LockedSet, Vec<ShortageDiagnosis>)> = None;
    let mut best_cost = None;

    for _ in 0..WARMUP_ATTEMPTS {
        let mut candidate = template.clone();
        let mut ledger = base.ledger(&candidate);
        let locked = lock_owners(&mut candidate, &base, &mut ledger);
        let domain = base.clone().with_locked(locked.clone());

        let (mut large, mut other): (Vec<DutyRef>, Vec<DutyRef>) = candidate
            .shortage_duties()
            .into_iter()
            .partition(|d| candidate.exams[d.exam].uses_large_hall());
        large.shuffle(rng);
        other.shuffle(rng);
        large.extend(other);

        let diagnoses = construct::fill_slots(
            &mut candidate,
            &large,
            &mut ledger,
            &domain,
            ScoringMode::WeightedWorkload,
            rng,
        );
        let polished = swap::hill_climb(candidate, &domain, config.polishing_swaps, rng);

        let cost = base.evaluate(&polished);
        if best_cost.is_none_or(|c| cost < c) {
            best_cost = Some(cost);
            best = Some((polished, locked, diagnoses));
        }
    }

    let (schedule, locked, diagnoses) = best.expect("warm-up always produces a schedule");
    ctx.log(format!(
        "warm-up finished, initial cost {:.2}",
        best_cost.expect("cost recorded with schedule").scalar()
    ));
    let domain = base.with_locked(locked);

    let improved = match config.strategy {
        Strategy::Lns => {
            let lns = LnsConfig::from_scheduler(config).with_seed(seed);
            LnsRunner::run(schedule, &domain, &lns, ctx).best
        }
        Strategy::Vns => {
            let vns = VnsConfig::from_scheduler(config).with_seed(seed);
            VnsRunner::run(schedule, &domain, &vns, ctx).best
        }
        _ => {
            let hyper = HyperConfig::from_scheduler(config).with_seed(seed);
            HyperRunner::run(schedule, &domain, &hyper, ctx).best
        }
    };

    (improved, diagnoses)
}

/// Genetic algorithm over the template's guard slots.
fn run_genetic(
    mut template: Schedule,
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
    seed: u64,
) -> Option<(Schedule, Vec<ShortageDiagnosis>)> {
    let base = DomainContext::new(roster, calendar, config);
    let mut ledger = base.ledger(&template);
    let locked = lock_owners(&mut template, &base, &mut ledger);
    let domain = base.with_locked(locked);

    let ga = GaConfig::from_scheduler(config).with_seed(seed);
    let result = GaRunner::run(template, &domain, &ga, ctx);
    ctx.log(format!(
        "[ga] finished after {} generations, best fitness {:.1}",
        result.generations, result.best_fitness
    ));
    Some((result.best, Vec::new()))
}

/// Exact solver; infeasibility or an empty time box is an iteration
/// failure, never a degraded schedule.
fn run_constraint_solver(
    schedule: Schedule,
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    ctx: &RunContext,
) -> Option<(Schedule, Vec<ShortageDiagnosis>)> {
    let domain = DomainContext::new(roster, calendar, config);

    let model = match GuardModel::build(&schedule, &domain) {
        Ok(model) => model,
        Err(err) => {
            ctx.log(format!("[cp] model rejected: {err}"));
            return None;
        }
    };

    let solver_config = SolverConfig {
        time_limit_ms: config.solver_time_limit_ms,
    };
    let solution =
        BranchAndBoundSolver::solve(&model, &solver_config, Some(ctx.cancel_flag()));

    if !solution.is_solution_found() {
        ctx.log(format!(
            "[cp] no solution ({:?} after {} ms, {} nodes)",
            solution.status, solution.solve_time_ms, solution.nodes
        ));
        return None;
    }

    ctx.log(format!(
        "[cp] {:?} solution, objective {:.2}, {} nodes",
        solution.status,
        solution.objective.unwrap_or(0.0),
        solution.nodes
    ));
    Some((model.apply(&schedule, &solution.assignment), Vec::new()))
}

/// Combines construction diagnoses with post-hoc counts for every exam
/// still short of guards.
fn merge_shortage_report(
    schedule: &Schedule,
    config: &SchedulerConfig,
    diagnoses: Vec<ShortageDiagnosis>,
) -> Vec<ShortageDiagnosis> {
    let mut report = diagnoses;
    for exam in &schedule.exams {
        let missing = exam.shortage_count();
        if missing == 0 {
            continue;
        }
        let covered = report
            .iter()
            .any(|d| d.subject == exam.subject && d.date == exam.date && d.time == exam.time);
        if covered {
            continue;
        }
        let required = exam.required_guards(config);
        report.push(ShortageDiagnosis {
            subject: exam.subject.clone(),
            level: exam.level.clone(),
            date: exam.date,
            time: exam.time.clone(),
            detail: format!(
                "guard shortage: {}/{} slots filled",
                required - missing,
                required
            ),
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hall, HallTier, SlotKind, SlotSpec, Subject};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn small_problem() -> (Roster, ExamCalendar) {
        let mut roster = Roster {
            professors: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            subjects: vec![Subject::new("Math", "L1"), Subject::new("Physics", "L1")],
            halls: vec![Hall::new("H1", HallTier::Small)],
            ..Default::default()
        };
        roster.level_halls.insert("L1".into(), vec!["H1".into()]);
        roster
            .owners
            .insert(("Math".into(), "L1".into()), "A".into());

        let calendar = ExamCalendar::new(vec![
            (
                date(1),
                vec![
                    SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                    SlotSpec::new("10:00", SlotKind::Primary, vec!["L1".into()]),
                ],
            ),
            (
                date(2),
                vec![SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()])],
            ),
        ]);
        (roster, calendar)
    }

    fn base_config(strategy: Strategy) -> SchedulerConfig {
        SchedulerConfig {
            strategy,
            seed: Some(42),
            // tighten the expensive strategy budgets for tests
            annealing_iterations: 100,
            tabu_iterations: 20,
            lns_iterations: 20,
            vns_iterations: 10,
            genetic_population: 16,
            genetic_generations: 15,
            genetic_elitism: 2,
            hyper_episodes: 5,
            solver_time_limit_ms: 5_000,
            ..Default::default()
        }
    }

    fn assert_complete(outcome: &RunOutcome) {
        assert!(outcome.success);
        let schedule = outcome.schedule.as_ref().expect("schedule present");
        let slot_count: usize = schedule
            .values()
            .flat_map(|times| times.values())
            .flatten()
            .map(|e| e.guards.len())
            .sum();
        assert!(slot_count > 0);
        let shortages: usize = schedule
            .values()
            .flat_map(|times| times.values())
            .flatten()
            .map(|e| e.shortage_count())
            .sum();
        assert_eq!(shortages, 0, "expected a fully staffed schedule");
    }

    #[test]
    fn test_every_strategy_produces_a_schedule() {
        let (roster, calendar) = small_problem();
        for strategy in [
            Strategy::Simple,
            Strategy::Phased,
            Strategy::Balanced,
            Strategy::PhasedPolished,
            Strategy::Annealing,
            Strategy::TabuSearch,
            Strategy::Lns,
            Strategy::Vns,
            Strategy::Genetic,
            Strategy::ConstraintSolver,
            Strategy::Hyper,
        ] {
            let config = base_config(strategy);
            let outcome = run(&roster, &calendar, &config, &RunContext::detached())
                .unwrap_or_else(|e| panic!("{strategy:?} failed: {e}"));
            assert_complete(&outcome);
        }
    }

    #[test]
    fn test_all_unavailable_yields_shortage_report() {
        let (mut roster, calendar) = small_problem();
        roster.professors.truncate(2);
        let mut config = base_config(Strategy::Balanced);
        for prof in &roster.professors {
            config
                .unavailable_days
                .insert(prof.clone(), vec![date(1), date(2)]);
        }

        let outcome = run(&roster, &calendar, &config, &RunContext::detached()).unwrap();
        assert!(outcome.success);
        assert!(!outcome.shortage_report.is_empty());
        // nobody may be assigned anywhere
        for (_, times) in outcome.schedule.unwrap() {
            for (_, exams) in times {
                for exam in exams {
                    assert_eq!(exam.shortage_count(), exam.guards.len());
                }
            }
        }
    }

    #[test]
    fn test_done_line_emitted() {
        let (roster, calendar) = small_problem();
        let config = base_config(Strategy::Simple);
        let (ctx, rx) = RunContext::channel();

        run(&roster, &calendar, &config, &ctx).unwrap();

        let lines: Vec<String> = rx.try_iter().collect();
        let done = lines.iter().find(|l| l.starts_with("DONE"));
        assert!(done.is_some(), "expected a DONE line, got {lines:?}");
        let payload: serde_json::Value =
            serde_json::from_str(done.unwrap().trim_start_matches("DONE")).unwrap();
        assert_eq!(payload["success"], true);
    }

    #[test]
    fn test_empty_calendar_fails() {
        let (roster, _) = small_problem();
        let calendar = ExamCalendar::default();
        let config = base_config(Strategy::Simple);
        let err = run(&roster, &calendar, &config, &RunContext::detached());
        assert!(matches!(err, Err(InvigilError::EmptyCalendar)));
    }

    #[test]
    fn test_owner_lock_applies() {
        let (roster, calendar) = small_problem();
        let mut config = base_config(Strategy::Balanced);
        config.assign_owner_as_guard = true;

        let outcome = run(&roster, &calendar, &config, &RunContext::detached()).unwrap();
        assert!(outcome.success);
        // A owns Math; A must guard some exam (the lock guarantees one
        // duty on their last owned exam)
        let guards_a = outcome
            .schedule
            .unwrap()
            .values()
            .flat_map(|times| times.values())
            .flatten()
            .filter(|e| e.has_guard("A"))
            .count();
        assert!(guards_a >= 1);
    }

    #[test]
    fn test_intensive_search_runs() {
        let (roster, calendar) = small_problem();
        let mut config = base_config(Strategy::Balanced);
        config.intensive_search = true;
        config.iterations = 3;

        let outcome = run(&roster, &calendar, &config, &RunContext::detached()).unwrap();
        assert_complete(&outcome);
    }

    #[test]
    fn test_cancelled_run_reports_failure_without_best() {
        let (roster, calendar) = small_problem();
        let config = base_config(Strategy::Balanced);
        let ctx = RunContext::detached();
        ctx.request_cancel();

        let outcome = run(&roster, &calendar, &config, &ctx).unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.is_some());
    }
}
