//! The schedule: the single mutable solution value all operators share.
//!
//! Operators receive the schedule by value, mutate it, and hand it on —
//! never by shared mutable reference. A tentative move clones the
//! schedule first so a rejected move is discarded without side effects.

use super::config::SchedulerConfig;
use super::exam::{Exam, ExamId, Guard};
use super::roster::ProfessorId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Index of one guard slot: `exam` indexes into [`Schedule::exams`],
/// `slot` into that exam's guard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DutyRef {
    pub exam: usize,
    pub slot: usize,
}

/// Guard duties excluded from every ruin/reassignment move, e.g. a
/// subject owner locked onto their own exam.
#[derive(Debug, Clone, Default)]
pub struct LockedSet {
    entries: HashSet<(ExamId, ProfessorId)>,
}

impl LockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&mut self, exam: ExamId, prof: impl Into<ProfessorId>) {
        self.entries.insert((exam, prof.into()));
    }

    pub fn contains(&self, exam: ExamId, prof: &str) -> bool {
        self.entries.contains(&(exam, prof.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A populated (or partially populated) exam schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub exams: Vec<Exam>,
}

impl Schedule {
    pub fn new(exams: Vec<Exam>) -> Self {
        Self { exams }
    }

    /// Pads every exam's guard list with `Shortage` up to its required
    /// count (and truncates any excess). Establishes the slot-count
    /// invariant after placement.
    pub fn open_guard_slots(&mut self, config: &SchedulerConfig) {
        for exam in &mut self.exams {
            let required = exam.required_guards(config);
            exam.guards.truncate(required);
            while exam.guards.len() < required {
                exam.guards.push(Guard::Shortage);
            }
        }
    }

    /// All guard slots.
    pub fn duties(&self) -> Vec<DutyRef> {
        let mut out = Vec::new();
        for (e, exam) in self.exams.iter().enumerate() {
            for s in 0..exam.guards.len() {
                out.push(DutyRef { exam: e, slot: s });
            }
        }
        out
    }

    /// Unfilled guard slots.
    pub fn shortage_duties(&self) -> Vec<DutyRef> {
        self.duties()
            .into_iter()
            .filter(|d| self.guard(*d).is_shortage())
            .collect()
    }

    /// Occupied guard slots, excluding locked ones.
    pub fn occupied_duties(&self, locked: &LockedSet) -> Vec<DutyRef> {
        self.duties()
            .into_iter()
            .filter(|d| {
                let exam = &self.exams[d.exam];
                match exam.guards[d.slot].assigned() {
                    Some(prof) => !locked.contains(exam.id, prof),
                    None => false,
                }
            })
            .collect()
    }

    pub fn guard(&self, duty: DutyRef) -> &Guard {
        &self.exams[duty.exam].guards[duty.slot]
    }

    pub fn assign(&mut self, duty: DutyRef, guard: Guard) {
        self.exams[duty.exam].guards[duty.slot] = guard;
    }

    /// Total `Shortage` slots across all exams.
    pub fn shortage_count(&self) -> usize {
        self.exams.iter().map(|e| e.shortage_count()).sum()
    }

    /// Total guard slots across all exams.
    pub fn slot_count(&self) -> usize {
        self.exams.iter().map(|e| e.guards.len()).sum()
    }

    /// Groups exams as date → time → exams, for reports and export.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, BTreeMap<String, Vec<&Exam>>> {
        let mut out: BTreeMap<NaiveDate, BTreeMap<String, Vec<&Exam>>> = BTreeMap::new();
        for exam in &self.exams {
            out.entry(exam.date)
                .or_default()
                .entry(exam.time.clone())
                .or_default()
                .push(exam);
        }
        out
    }

    /// The multiset of exam ids — used to assert that ruin/repair cycles
    /// never create or drop exams.
    pub fn exam_ids(&self) -> Vec<ExamId> {
        let mut ids: Vec<ExamId> = self.exams.iter().map(|e| e.id).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::Owner;
    use crate::models::roster::{Hall, HallTier};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn exam(id: u64, tier: HallTier) -> Exam {
        Exam {
            id: ExamId(id),
            date: date(),
            time: "08:00-09:30".into(),
            subject: format!("S{id}"),
            level: "L1".into(),
            owner: Owner::Unowned,
            halls: vec![Hall::new("H", tier)],
            guards: Vec::new(),
        }
    }

    #[test]
    fn test_open_guard_slots() {
        let config = SchedulerConfig::default();
        let mut schedule = Schedule::new(vec![exam(1, HallTier::Large), exam(2, HallTier::Small)]);
        schedule.open_guard_slots(&config);
        assert_eq!(schedule.exams[0].guards.len(), 4);
        assert_eq!(schedule.exams[1].guards.len(), 1);
        assert_eq!(schedule.shortage_count(), 5);
        assert_eq!(schedule.slot_count(), 5);
    }

    #[test]
    fn test_duty_enumeration() {
        let config = SchedulerConfig::default();
        let mut schedule = Schedule::new(vec![exam(1, HallTier::Small)]);
        schedule.open_guard_slots(&config);
        assert_eq!(schedule.duties().len(), 1);
        assert_eq!(schedule.shortage_duties().len(), 1);

        let duty = DutyRef { exam: 0, slot: 0 };
        schedule.assign(duty, Guard::Assigned("Adel".into()));
        assert!(schedule.shortage_duties().is_empty());
        assert_eq!(schedule.occupied_duties(&LockedSet::new()), vec![duty]);
    }

    #[test]
    fn test_locked_duties_excluded() {
        let config = SchedulerConfig::default();
        let mut schedule = Schedule::new(vec![exam(7, HallTier::Small)]);
        schedule.open_guard_slots(&config);
        schedule.assign(DutyRef { exam: 0, slot: 0 }, Guard::Assigned("Adel".into()));

        let mut locked = LockedSet::new();
        locked.lock(ExamId(7), "Adel");
        assert!(schedule.occupied_duties(&locked).is_empty());
        assert!(locked.contains(ExamId(7), "Adel"));
        assert!(!locked.contains(ExamId(7), "Basma"));
    }

    #[test]
    fn test_exam_ids_sorted() {
        let schedule = Schedule::new(vec![exam(3, HallTier::Small), exam(1, HallTier::Small)]);
        assert_eq!(schedule.exam_ids(), vec![ExamId(1), ExamId(3)]);
    }

    #[test]
    fn test_by_day_grouping() {
        let config = SchedulerConfig::default();
        let mut schedule = Schedule::new(vec![exam(1, HallTier::Small), exam(2, HallTier::Small)]);
        schedule.open_guard_slots(&config);
        let grouped = schedule.by_day();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&date()]["08:00-09:30"].len(), 2);
    }
}
