//! Per-professor duty bookkeeping derived from a schedule.
//!
//! The ledger is an optimization for per-move oracle checks. It is
//! always recomputed from the schedule it describes; [`crate::validity::schedule_valid`]
//! remains the ground truth.

use super::config::SchedulerConfig;
use super::exam::Exam;
use super::roster::ProfessorId;
use super::schedule::Schedule;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Derived per-professor counters: occupied (date, time) pairs,
/// large-hall duty count, and weighted workload.
#[derive(Debug, Clone, Default)]
pub struct ProfessorLedger {
    slots: HashMap<ProfessorId, Vec<(NaiveDate, String)>>,
    large_counts: HashMap<ProfessorId, u32>,
    workload: HashMap<ProfessorId, f64>,
}

impl ProfessorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the ledger from scratch over every assigned guard slot.
    pub fn from_schedule(schedule: &Schedule, config: &SchedulerConfig) -> Self {
        let mut ledger = Self::new();
        for exam in &schedule.exams {
            for guard in &exam.guards {
                if let Some(prof) = guard.assigned() {
                    ledger.record(prof, exam, config);
                }
            }
        }
        ledger
    }

    /// Records one duty.
    pub fn record(&mut self, prof: &str, exam: &Exam, config: &SchedulerConfig) {
        self.slots
            .entry(prof.to_string())
            .or_default()
            .push((exam.date, exam.time.clone()));
        *self.workload.entry(prof.to_string()).or_default() += exam.duty_weight(config);
        if exam.uses_large_hall() {
            *self.large_counts.entry(prof.to_string()).or_default() += 1;
        }
    }

    /// Removes one duty previously recorded for `prof` on `exam`.
    pub fn remove(&mut self, prof: &str, exam: &Exam, config: &SchedulerConfig) {
        if let Some(slots) = self.slots.get_mut(prof) {
            if let Some(pos) = slots
                .iter()
                .position(|(d, t)| *d == exam.date && *t == exam.time)
            {
                slots.remove(pos);
            }
        }
        if let Some(w) = self.workload.get_mut(prof) {
            *w -= exam.duty_weight(config);
        }
        if exam.uses_large_hall() {
            if let Some(c) = self.large_counts.get_mut(prof) {
                *c = c.saturating_sub(1);
            }
        }
    }

    /// Whether the professor already guards in the given (date, time).
    pub fn is_busy(&self, prof: &str, date: NaiveDate, time: &str) -> bool {
        self.slots
            .get(prof)
            .is_some_and(|s| s.iter().any(|(d, t)| *d == date && t == time))
    }

    /// Total duties of a professor.
    pub fn shift_count(&self, prof: &str) -> u32 {
        self.slots.get(prof).map(|s| s.len() as u32).unwrap_or(0)
    }

    /// Large-hall duties of a professor.
    pub fn large_count(&self, prof: &str) -> u32 {
        self.large_counts.get(prof).copied().unwrap_or(0)
    }

    /// Weighted workload of a professor.
    pub fn workload(&self, prof: &str) -> f64 {
        self.workload.get(prof).copied().unwrap_or(0.0)
    }

    /// Distinct duty days of a professor.
    pub fn duty_days(&self, prof: &str) -> BTreeSet<NaiveDate> {
        self.slots
            .get(prof)
            .map(|s| s.iter().map(|(d, _)| *d).collect())
            .unwrap_or_default()
    }

    /// Professors with at least one duty.
    pub fn active_professors(&self) -> Vec<&ProfessorId> {
        self.slots.keys().collect()
    }
}
