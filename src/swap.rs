//! Swap hill-climbing.
//!
//! Repeatedly moves one duty from the most-loaded professor to the
//! least-loaded one, committing the first oracle-valid move found.
//! Terminates when the loads meet, no valid move exists, or the attempt
//! budget runs out. Also serves as the local-search step inside VNS.

use crate::context::DomainContext;
use crate::models::{DutyRef, Guard, Schedule};
use rand::seq::SliceRandom;
use rand::Rng;

/// Runs the hill-climb and returns the improved schedule.
///
/// Only slot occupants change: the exam set and guard-slot counts are
/// untouched.
pub fn hill_climb<R: Rng>(
    mut schedule: Schedule,
    domain: &DomainContext<'_>,
    max_attempts: usize,
    rng: &mut R,
) -> Schedule {
    let mut ledger = domain.ledger(&schedule);

    for _ in 0..max_attempts {
        let most = match domain
            .roster
            .professors
            .iter()
            .max_by(|a, b| ledger.workload(a).total_cmp(&ledger.workload(b)))
        {
            Some(p) => (p.clone(), ledger.workload(p)),
            None => break,
        };
        let least = match domain
            .roster
            .professors
            .iter()
            .min_by(|a, b| ledger.workload(a).total_cmp(&ledger.workload(b)))
        {
            Some(p) => (p.clone(), ledger.workload(p)),
            None => break,
        };
        if most.0 == least.0 || most.1 <= least.1 {
            break;
        }

        let mut candidates: Vec<DutyRef> = schedule
            .occupied_duties(&domain.locked)
            .into_iter()
            .filter(|d| schedule.guard(*d).assigned() == Some(most.0.as_str()))
            .collect();
        candidates.shuffle(rng);

        let mut swapped = false;
        for duty in candidates {
            let exam = schedule.exams[duty.exam].clone();
            if !domain.assignment_valid(&least.0, &exam, &ledger) {
                continue;
            }

            schedule.assign(duty, Guard::Assigned(least.0.clone()));
            ledger.remove(&most.0, &exam, domain.config);
            ledger.record(&least.0, &exam, domain.config);
            swapped = true;
            break;
        }

        if !swapped {
            break;
        }
    }

    schedule
}
