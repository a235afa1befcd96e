//! Subject-day clustering.
//!
//! Relocates whole exam records (subject, owner, halls — never guard
//! slots) between same-level slots on different days so each
//! professor's owned subjects cluster onto at most two days. When
//! feedback from a prior guard pass is available, days the owner
//! already guards on are preferred targets.

use crate::context::DomainContext;
use crate::models::{ProfessorLedger, Schedule};
use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Result of a clustering pass.
#[derive(Debug, Clone)]
pub struct ClusterOutcome {
    pub schedule: Schedule,
    /// Total owner day-spread before the pass.
    pub initial_spread: usize,
    /// Total owner day-spread after the pass.
    pub final_spread: usize,
    /// Exam swaps applied.
    pub moves: usize,
}

/// Runs a bounded number of swap attempts.
///
/// Each attempt re-derives the owner → day map, picks the most
/// day-scattered owner, and tries to move one of their exams onto a
/// preferred day by swapping it with a same-level exam already there.
/// A swap that would widen the counterpart owner's spread, or move an
/// exam into a last-day restricted slot, is rejected.
pub fn cluster_subject_days<R: Rng>(
    mut schedule: Schedule,
    domain: &DomainContext<'_>,
    guard_feedback: Option<&ProfessorLedger>,
    max_attempts: usize,
    rng: &mut R,
) -> ClusterOutcome {
    let restricted: HashSet<(NaiveDate, String)> = domain
        .calendar
        .restricted_times(domain.config.last_day_restriction)
        .into_iter()
        .collect();

    let initial_spread = total_spread(&schedule);
    let mut moves = 0usize;

    for _ in 0..max_attempts {
        let owner_days = owner_day_map(&schedule);
        let Some((owner, _)) = owner_days
            .iter()
            .filter(|(_, days)| days.len() > 1)
            .max_by_key(|(_, days)| days.len())
        else {
            break; // everyone already clustered
        };
        let owner = owner.clone();

        let owned: Vec<usize> = schedule
            .exams
            .iter()
            .enumerate()
            .filter(|(_, e)| e.owner.assigned() == Some(owner.as_str()))
            .map(|(i, _)| i)
            .collect();
        if owned.len() < 2 {
            continue;
        }

        // Anchor on a day the owner guards when feedback exists.
        let preferred: BTreeSet<NaiveDate> = guard_feedback
            .map(|ledger| ledger.duty_days(&owner))
            .unwrap_or_default();
        let anchored: Vec<usize> = owned
            .iter()
            .copied()
            .filter(|&i| preferred.contains(&schedule.exams[i].date))
            .collect();
        let &anchor = match anchored.choose(rng) {
            Some(i) => i,
            None => owned.choose(rng).expect("owner has exams"),
        };
        let target_date = schedule.exams[anchor].date;

        let movable: Vec<usize> = owned
            .iter()
            .copied()
            .filter(|&i| schedule.exams[i].date != target_date)
            .collect();
        let Some(&mover) = movable.choose(rng) else {
            continue;
        };
        let source_date = schedule.exams[mover].date;
        let time = schedule.exams[mover].time.clone();
        let level = schedule.exams[mover].level.clone();
        let subject = schedule.exams[mover].subject.clone();

        if restricted.contains(&(target_date, time.clone()))
            || restricted.contains(&(source_date, time.clone()))
        {
            continue;
        }

        // A same-level exam of another owner already sitting in the
        // target slot to trade places with.
        let Some(counterpart) = schedule.exams.iter().position(|e| {
            e.date == target_date
                && e.time == time
                && e.level == level
                && e.subject != subject
                && e.owner.assigned() != Some(owner.as_str())
        }) else {
            continue;
        };

        // The counterpart's owner must not end up more scattered.
        if let Some(other_owner) = schedule.exams[counterpart].owner.assigned() {
            let days = owner_days.get(other_owner).cloned().unwrap_or_default();
            let mut after: BTreeSet<NaiveDate> = days.clone();
            after.remove(&target_date);
            after.insert(source_date);
            if after.len() > days.len() {
                continue;
            }
        }

        schedule.exams[mover].date = target_date;
        schedule.exams[counterpart].date = source_date;
        moves += 1;
    }

    ClusterOutcome {
        final_spread: total_spread(&schedule),
        initial_spread,
        moves,
        schedule,
    }
}

/// Owner → distinct days their owned subjects are examined on.
fn owner_day_map(schedule: &Schedule) -> HashMap<String, BTreeSet<NaiveDate>> {
    let mut map: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
    for exam in &schedule.exams {
        if let Some(owner) = exam.owner.assigned() {
            map.entry(owner.to_string()).or_default().insert(exam.date);
        }
    }
    map
}

/// Sum of day counts over owners whose subjects span more than one day.
fn total_spread(schedule: &Schedule) -> usize {
    owner_day_map(schedule)
        .values()
        .filter(|days| days.len() > 1)
        .map(|days| days.len())
        .sum()
}
