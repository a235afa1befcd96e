//! Validity oracle.
//!
//! Two entry points with distinct roles:
//!
//! - [`assignment_valid`] answers "may this professor take this slot?"
//!   against a derived ledger — the fast per-move check every operator
//!   calls before committing a move.
//! - [`schedule_valid`] recomputes every property from scratch over the
//!   whole schedule. It is the single source of truth; ledgers are an
//!   optimization, never authoritative.

use crate::models::{DutyPattern, Exam, ExamCalendar, ProfessorLedger, Schedule, SchedulerConfig};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Per-move oracle: whether assigning `prof` to one of `exam`'s guard
/// slots keeps the schedule feasible.
///
/// Checks short-circuit in order: same-slot conflict, unavailability,
/// total-shift cap, large-hall cap, duty-pattern feasibility.
pub fn assignment_valid(
    prof: &str,
    exam: &Exam,
    ledger: &ProfessorLedger,
    config: &SchedulerConfig,
    calendar: &ExamCalendar,
) -> bool {
    if ledger.is_busy(prof, exam.date, &exam.time) {
        return false;
    }

    if config.is_unavailable(prof, exam.date) {
        return false;
    }

    if let Some(cap) = config.max_shifts {
        if ledger.shift_count(prof) >= cap {
            return false;
        }
    }

    if exam.uses_large_hall() {
        if let Some(cap) = config.max_large_hall_shifts {
            if ledger.large_count(prof) >= cap {
                return false;
            }
        }
    }

    let duty_days = ledger.duty_days(prof);
    if !duty_days.contains(&exam.date) {
        let pattern = config.pattern_of(prof);
        if duty_days.len() >= pattern.max_days() {
            return false;
        }
        if pattern == DutyPattern::ConsecutiveStrict && duty_days.len() == 1 {
            let committed = duty_days.iter().next().copied();
            let adjacent = match (
                committed.and_then(|d| calendar.day_index(d)),
                calendar.day_index(exam.date),
            ) {
                (Some(a), Some(b)) => a.abs_diff(b) == 1,
                _ => false,
            };
            if !adjacent {
                return false;
            }
        }
    }

    true
}

/// Whole-schedule ground truth.
///
/// Recomputes from scratch: no `Shortage` anywhere, no double booking,
/// no unavailable-day duty, caps respected, every configured duty
/// pattern satisfied globally, and every partnership pair's duty-day
/// sets equal.
pub fn schedule_valid(
    schedule: &Schedule,
    config: &SchedulerConfig,
    calendar: &ExamCalendar,
) -> bool {
    let mut occupied: HashSet<(String, chrono::NaiveDate, String)> = HashSet::new();
    let mut shift_counts: HashMap<String, u32> = HashMap::new();
    let mut large_counts: HashMap<String, u32> = HashMap::new();
    let mut duty_days: HashMap<String, BTreeSet<chrono::NaiveDate>> = HashMap::new();

    for exam in &schedule.exams {
        for guard in &exam.guards {
            let prof = match guard.assigned() {
                Some(p) => p,
                None => return false,
            };

            if !occupied.insert((prof.to_string(), exam.date, exam.time.clone())) {
                return false;
            }

            if config.is_unavailable(prof, exam.date) {
                return false;
            }

            *shift_counts.entry(prof.to_string()).or_default() += 1;
            if exam.uses_large_hall() {
                *large_counts.entry(prof.to_string()).or_default() += 1;
            }
            duty_days.entry(prof.to_string()).or_default().insert(exam.date);
        }
    }

    if let Some(cap) = config.max_shifts {
        if shift_counts.values().any(|&c| c > cap) {
            return false;
        }
    }
    if let Some(cap) = config.max_large_hall_shifts {
        if large_counts.values().any(|&c| c > cap) {
            return false;
        }
    }

    for (prof, pattern) in &config.duty_patterns {
        let indices: Vec<usize> = duty_days
            .get(prof)
            .map(|days| days.iter().filter_map(|d| calendar.day_index(*d)).collect())
            .unwrap_or_default();
        if indices.is_empty() {
            continue;
        }
        // BTreeSet iteration keeps indices sorted for the adjacency check.
        match pattern {
            DutyPattern::ConsecutiveStrict => {
                if indices.len() != 2 || indices[1] - indices[0] != 1 {
                    return false;
                }
            }
            DutyPattern::OneDay => {
                if indices.len() > 1 {
                    return false;
                }
            }
            DutyPattern::FlexibleTwo => {
                if indices.len() != 2 {
                    return false;
                }
            }
            DutyPattern::FlexibleThree => {
                if indices.len() < 2 || indices.len() > 3 {
                    return false;
                }
            }
        }
    }

    for (a, b) in &config.partnerships {
        let days_a = duty_days.get(a).cloned().unwrap_or_default();
        let days_b = duty_days.get(b).cloned().unwrap_or_default();
        if days_a != days_b {
            return false;
        }
    }

    true
}
