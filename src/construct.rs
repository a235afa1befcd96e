//! Greedy construction heuristic.
//!
//! Fills `Shortage` guard slots one at a time: every oracle-eligible
//! professor is scored for the slot and the best candidate committed.
//! When no professor is eligible the slot stays `Shortage` and the most
//! frequent blocking cause across the roster is recorded.

use crate::context::DomainContext;
use crate::models::{DutyRef, Exam, ProfessorId, ProfessorLedger, Schedule};
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

const BASE_SCORE: f64 = 1000.0;
const QUADRATIC_DUTY_PENALTY: f64 = 20.0;
const WORKLOAD_PENALTY: f64 = 25.0;
const FIRST_LARGE_BONUS: f64 = 15.0;
const REPEAT_LARGE_PENALTY: f64 = 30.0;
const OWNER_BONUS: f64 = 50.0;

/// Why a professor could not take a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockReason {
    Busy,
    Unavailable,
    AtShiftCap,
    AtLargeHallCap,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BlockReason::Busy => "busy in the same slot",
            BlockReason::Unavailable => "unavailable that day",
            BlockReason::AtShiftCap => "at the total-shift cap",
            BlockReason::AtLargeHallCap => "at the large-hall cap",
        };
        f.write_str(text)
    }
}

/// Diagnosis of one unfilled guard slot.
#[derive(Debug, Clone, Serialize)]
pub struct ShortageDiagnosis {
    pub subject: String,
    pub level: String,
    pub date: NaiveDate,
    pub time: String,
    pub detail: String,
}

/// Candidate scoring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Penalty quadratic in the current duty count ("balanced" mode).
    QuadraticDutyCount,
    /// Penalty linear in the weighted workload.
    WeightedWorkload,
}

/// Fills the given duties in order; returns a diagnosis for every slot
/// left `Shortage`.
pub fn fill_slots<R: Rng>(
    schedule: &mut Schedule,
    duties: &[DutyRef],
    ledger: &mut ProfessorLedger,
    domain: &DomainContext<'_>,
    mode: ScoringMode,
    rng: &mut R,
) -> Vec<ShortageDiagnosis> {
    let restricted: HashSet<(NaiveDate, String)> = domain
        .calendar
        .restricted_times(domain.config.last_day_restriction)
        .into_iter()
        .collect();

    let mut diagnoses = Vec::new();
    for &duty in duties {
        if !schedule.guard(duty).is_shortage() {
            continue;
        }

        let exam = schedule.exams[duty.exam].clone();
        let candidate = if restricted.contains(&(exam.date, exam.time.clone())) {
            None
        } else {
            best_candidate(&exam, ledger, domain, mode, rng)
        };

        match candidate {
            Some(prof) => {
                ledger.record(&prof, &exam, domain.config);
                schedule.assign(duty, crate::models::Guard::Assigned(prof));
            }
            None => {
                diagnoses.push(diagnose_shortage(&exam, ledger, domain));
            }
        }
    }
    diagnoses
}

/// Scores every eligible professor for one slot and returns the best.
pub fn best_candidate<R: Rng>(
    exam: &Exam,
    ledger: &ProfessorLedger,
    domain: &DomainContext<'_>,
    mode: ScoringMode,
    rng: &mut R,
) -> Option<ProfessorId> {
    let mut best: Option<(f64, &ProfessorId)> = None;

    for prof in &domain.roster.professors {
        if exam.has_guard(prof) {
            continue;
        }
        if !domain.assignment_valid(prof, exam, ledger) {
            continue;
        }

        let mut score = BASE_SCORE;
        match mode {
            ScoringMode::QuadraticDutyCount => {
                let duties = ledger.shift_count(prof) as f64;
                score -= duties * duties * QUADRATIC_DUTY_PENALTY;
            }
            ScoringMode::WeightedWorkload => {
                score -= ledger.workload(prof) * WORKLOAD_PENALTY;
            }
        }

        if exam.uses_large_hall() {
            if ledger.large_count(prof) == 0 {
                score += FIRST_LARGE_BONUS;
            } else {
                score -= REPEAT_LARGE_PENALTY;
            }
        }

        if !domain.config.assign_owner_as_guard && exam.owner.assigned() == Some(prof.as_str()) {
            score += OWNER_BONUS;
        }

        score += rng.random::<f64>(); // tie-break jitter

        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, prof));
        }
    }

    best.map(|(_, p)| p.clone())
}

/// Counts, per professor, the first reason blocking them from the slot
/// and renders the most frequent one.
fn diagnose_shortage(
    exam: &Exam,
    ledger: &ProfessorLedger,
    domain: &DomainContext<'_>,
) -> ShortageDiagnosis {
    let config = domain.config;
    let mut reasons: HashMap<BlockReason, usize> = HashMap::new();

    for prof in &domain.roster.professors {
        let reason = if ledger.is_busy(prof, exam.date, &exam.time) {
            Some(BlockReason::Busy)
        } else if config.is_unavailable(prof, exam.date) {
            Some(BlockReason::Unavailable)
        } else if config
            .max_shifts
            .is_some_and(|cap| ledger.shift_count(prof) >= cap)
        {
            Some(BlockReason::AtShiftCap)
        } else if exam.uses_large_hall()
            && config
                .max_large_hall_shifts
                .is_some_and(|cap| ledger.large_count(prof) >= cap)
        {
            Some(BlockReason::AtLargeHallCap)
        } else {
            None
        };
        if let Some(r) = reason {
            *reasons.entry(r).or_default() += 1;
        }
    }

    let detail = match reasons.iter().max_by_key(|(_, count)| **count) {
        Some((reason, count)) => format!(
            "no guard found for '{}' on {} {}; most frequent cause: {} professor(s) {}",
            exam.subject, exam.date, exam.time, count, reason
        ),
        None => format!(
            "no guard found for '{}' on {} {}; likely blocked by duty-pattern constraints",
            exam.subject, exam.date, exam.time
        ),
    };

    ShortageDiagnosis {
        subject: exam.subject.clone(),
        level: exam.level.clone(),
        date: exam.date,
        time: exam.time.clone(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExamCalendar, ExamId, Guard, Hall, HallTier, Owner, Roster, SchedulerConfig, SlotKind,
        SlotSpec,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn calendar() -> ExamCalendar {
        ExamCalendar::new(vec![(
            date(1),
            vec![SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()])],
        )])
    }

    fn roster(profs: &[&str]) -> Roster {
        Roster {
            professors: profs.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    fn small_exam(id: u64) -> Exam {
        Exam {
            id: ExamId(id),
            date: date(1),
            time: "08:00".into(),
            subject: format!("S{id}"),
            level: "L1".into(),
            owner: Owner::Unowned,
            halls: vec![Hall::new("H", HallTier::Small)],
            guards: vec![Guard::Shortage],
        }
    }

    #[test]
    fn test_trivial_fill_assigns_exactly_one() {
        // 1 exam, 1 slot, 2 eligible professors, no constraints
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let mut schedule = Schedule::new(vec![small_exam(1)]);
        let duties = schedule.duties();
        let mut ledger = ProfessorLedger::new();
        let mut rng = StdRng::seed_from_u64(42);

        let diagnoses = fill_slots(
            &mut schedule,
            &duties,
            &mut ledger,
            &domain,
            ScoringMode::QuadraticDutyCount,
            &mut rng,
        );

        assert!(diagnoses.is_empty());
        assert_eq!(schedule.shortage_count(), 0);
        let assigned: Vec<&str> = schedule.exams[0]
            .guards
            .iter()
            .filter_map(|g| g.assigned())
            .collect();
        assert_eq!(assigned.len(), 1);
        assert!(assigned[0] == "A" || assigned[0] == "B");
    }

    #[test]
    fn test_all_unavailable_leaves_shortage() {
        let mut config = SchedulerConfig::default();
        config.unavailable_days.insert("A".into(), vec![date(1)]);
        config.unavailable_days.insert("B".into(), vec![date(1)]);
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let mut schedule = Schedule::new(vec![small_exam(1)]);
        let duties = schedule.duties();
        let mut ledger = ProfessorLedger::new();
        let mut rng = StdRng::seed_from_u64(42);

        let diagnoses = fill_slots(
            &mut schedule,
            &duties,
            &mut ledger,
            &domain,
            ScoringMode::QuadraticDutyCount,
            &mut rng,
        );

        assert_eq!(schedule.shortage_count(), 1);
        assert_eq!(diagnoses.len(), 1);
        assert!(diagnoses[0].detail.contains("unavailable"));
    }

    #[test]
    fn test_owner_bonus_prefers_owner() {
        let config = SchedulerConfig::default();
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let mut exam = small_exam(1);
        exam.owner = Owner::Assigned("B".into());
        let ledger = ProfessorLedger::new();
        let mut rng = StdRng::seed_from_u64(42);

        let chosen = best_candidate(
            &exam,
            &ledger,
            &domain,
            ScoringMode::QuadraticDutyCount,
            &mut rng,
        );
        assert_eq!(chosen.as_deref(), Some("B"));
    }

    #[test]
    fn test_quadratic_mode_spreads_duties() {
        // A already has two duties; a fresh slot should go to B
        let config = SchedulerConfig::default();
        let cal = ExamCalendar::new(vec![
            (
                date(1),
                vec![
                    SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                    SlotSpec::new("10:00", SlotKind::Primary, vec!["L1".into()]),
                    SlotSpec::new("13:00", SlotKind::Primary, vec!["L1".into()]),
                ],
            ),
        ]);
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let mut busy_a = small_exam(1);
        busy_a.guards = vec![Guard::Assigned("A".into())];
        let mut busy_a2 = small_exam(2);
        busy_a2.time = "10:00".into();
        busy_a2.guards = vec![Guard::Assigned("A".into())];
        let preload = Schedule::new(vec![busy_a, busy_a2]);
        let ledger = ProfessorLedger::from_schedule(&preload, &config);

        let mut target = small_exam(3);
        target.time = "13:00".into();
        let mut rng = StdRng::seed_from_u64(42);
        let chosen = best_candidate(
            &target,
            &ledger,
            &domain,
            ScoringMode::QuadraticDutyCount,
            &mut rng,
        );
        assert_eq!(chosen.as_deref(), Some("B"));
    }

    #[test]
    fn test_restricted_slot_is_skipped() {
        let mut config = SchedulerConfig::default();
        config.last_day_restriction = Some(1);
        let cal = calendar();
        let roster = roster(&["A", "B"]);
        let domain = DomainContext::new(&roster, &cal, &config);

        let mut schedule = Schedule::new(vec![small_exam(1)]);
        let duties = schedule.duties();
        let mut ledger = ProfessorLedger::new();
        let mut rng = StdRng::seed_from_u64(42);

        fill_slots(
            &mut schedule,
            &duties,
            &mut ledger,
            &domain,
            ScoringMode::QuadraticDutyCount,
            &mut rng,
        );
        assert_eq!(schedule.shortage_count(), 1);
    }
}
