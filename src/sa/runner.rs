//! SA execution loop.

use super::config::SaConfig;
use crate::context::{DomainContext, RunContext};
use crate::cost::distribution_deviation;
use crate::models::{Guard, Schedule};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best schedule found.
    pub best: Schedule,

    /// Energy (distribution deviation) of the best schedule.
    pub best_energy: f64,

    /// Total number of move attempts.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Final temperature when the search stopped.
    pub final_temperature: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best energy sampled at regular intervals.
    pub energy_history: Vec<f64>,
}

/// Executes Simulated Annealing over a populated schedule.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from the given schedule.
    ///
    /// Each move reassigns one random occupied, unlocked guard slot to a
    /// random different professor; the move is kept only when the whole
    /// schedule stays valid and Metropolis accepts the energy delta. The
    /// best schedule is tracked separately from the accepted trajectory.
    pub fn run(
        initial: Schedule,
        domain: &DomainContext<'_>,
        config: &SaConfig,
        ctx: &RunContext,
    ) -> SaResult {
        config.validate().expect("invalid SaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let professors = &domain.roster.professors;
        let mut current = initial;
        let mut current_energy = distribution_deviation(&current, professors, domain.config);
        let mut best = current.clone();
        let mut best_energy = current_energy;

        let mut temperature = config.initial_temperature;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        let history_interval = 100usize;
        let mut energy_history = vec![best_energy];

        let mut iteration = 0usize;
        while iteration < config.iterations {
            if temperature < config.min_temperature {
                break;
            }
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }

            iteration += 1;

            let duties = current.occupied_duties(&domain.locked);
            let Some(&duty) = duties.choose(&mut rng) else {
                break;
            };
            let holder = current
                .guard(duty)
                .assigned()
                .expect("occupied duty has a holder")
                .to_string();
            let others: Vec<&String> = professors.iter().filter(|p| **p != holder).collect();
            let Some(&replacement) = others.choose(&mut rng) else {
                break;
            };

            // Snapshot before the tentative move; a rejected move is
            // discarded with the snapshot.
            let mut candidate = current.clone();
            candidate.assign(duty, Guard::Assigned(replacement.clone()));

            if !domain.schedule_valid(&candidate) {
                continue;
            }

            let candidate_energy = distribution_deviation(&candidate, professors, domain.config);
            let delta = candidate_energy - current_energy;

            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                rng.random::<f64>() < (-delta / temperature).exp()
            };

            if accept {
                current = candidate;
                current_energy = candidate_energy;
                accepted_moves += 1;

                if current_energy < best_energy {
                    best = current.clone();
                    best_energy = current_energy;
                }
            }

            if iteration % history_interval == 0 {
                energy_history.push(best_energy);
            }

            temperature *= config.cooling_rate;
        }

        if energy_history
            .last()
            .is_none_or(|&last| (last - best_energy).abs() > 1e-15)
        {
            energy_history.push(best_energy);
        }

        SaResult {
            best,
            best_energy,
            iterations: iteration,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            cancelled,
            energy_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Exam, ExamCalendar, ExamId, Hall, HallTier, Owner, Roster, SchedulerConfig, SlotKind,
        SlotSpec,
    };
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn calendar() -> ExamCalendar {
        ExamCalendar::new(vec![(
            date(1),
            vec![
                SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                SlotSpec::new("10:00", SlotKind::Primary, vec!["L1".into()]),
            ],
        )])
    }

    fn roster(profs: &[&str]) -> Roster {
        Roster {
            professors: profs.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn exam(id: u64, time: &str, guard: &str) -> Exam {
        Exam {
            id: ExamId(id),
            date: date(1),
            time: time.into(),
            subject: format!("S{id}"),
            level: "L1".into(),
            owner: Owner::Unowned,
            halls: vec![Hall::new("H", HallTier::Small)],
            guards: vec![Guard::Assigned(guard.into())],
        }
    }

    #[test]
    fn test_sa_reduces_workload_spread() {
        // both duties on A; moving one to B zeroes the spread
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let initial = Schedule::new(vec![exam(1, "08:00", "A"), exam(2, "10:00", "A")]);
        let sa = SaConfig::default()
            .with_iterations(500)
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.99)
            .with_seed(42);

        let result = SaRunner::run(initial, &domain, &sa, &RunContext::detached());

        assert!(
            result.best_energy < 2.0,
            "expected spread below 2.0, got {}",
            result.best_energy
        );
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_sa_never_breaks_validity() {
        let mut config = SchedulerConfig::default();
        config.unavailable_days.insert("B".into(), vec![date(1)]);
        let cal = calendar();
        let roster = roster(&["A", "B", "C"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let initial = Schedule::new(vec![exam(1, "08:00", "A"), exam(2, "10:00", "C")]);
        let sa = SaConfig::default().with_iterations(300).with_seed(7);

        let result = SaRunner::run(initial, &domain, &sa, &RunContext::detached());

        // B is unavailable: no accepted schedule may ever use them
        for e in &result.best.exams {
            assert!(!e.has_guard("B"));
        }
    }

    #[test]
    fn test_sa_cancellation() {
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let ctx = RunContext::detached();
        ctx.request_cancel();

        let initial = Schedule::new(vec![exam(1, "08:00", "A")]);
        let result = SaRunner::run(initial, &domain, &SaConfig::default().with_seed(1), &ctx);
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_sa_history_non_increasing() {
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let initial = Schedule::new(vec![exam(1, "08:00", "A"), exam(2, "10:00", "A")]);
        let sa = SaConfig::default().with_iterations(400).with_seed(11);
        let result = SaRunner::run(initial, &domain, &sa, &RunContext::detached());

        for window in result.energy_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best energy history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_sa_preserves_exam_identity() {
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let initial = Schedule::new(vec![exam(1, "08:00", "A"), exam(2, "10:00", "A")]);
        let ids = initial.exam_ids();
        let sa = SaConfig::default().with_iterations(200).with_seed(5);
        let result = SaRunner::run(initial, &domain, &sa, &RunContext::detached());
        assert_eq!(result.best.exam_ids(), ids);
    }
}
