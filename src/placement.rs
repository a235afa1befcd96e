//! Subject → slot placement.
//!
//! Exams are created once per run from roster + calendar: every subject
//! is placed into a primary slot open to its level (all of the level's
//! halls must be free in that slot), leftovers go to reserve slots.
//! Guard slots are opened afterwards; guard assignment is a separate
//! phase.

use crate::models::{
    Exam, ExamCalendar, ExamId, Owner, Roster, Schedule, SchedulerConfig, SlotKind, Subject,
};
use chrono::NaiveDate;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Places all roster subjects into calendar slots.
///
/// Returns the schedule (guard slots already opened) and the subjects
/// that found no slot.
pub fn place_subjects<R: Rng>(
    roster: &Roster,
    calendar: &ExamCalendar,
    config: &SchedulerConfig,
    rng: &mut R,
) -> (Schedule, Vec<Subject>) {
    let restricted: HashSet<(NaiveDate, String)> = calendar
        .restricted_times(config.last_day_restriction)
        .into_iter()
        .collect();

    let mut remaining: Vec<Subject> = roster.subjects.clone();
    let mut exams: Vec<Exam> = Vec::new();
    let mut next_id = 0u64;
    // First primary time a level appears in; reserve slots only mix
    // levels from the same time group.
    let mut level_time_group: HashMap<String, String> = HashMap::new();

    // Primary pass.
    let mut dates = calendar.dates();
    dates.shuffle(rng);
    for date in dates {
        let mut slots: Vec<_> = calendar.slots(date).to_vec();
        slots.shuffle(rng);
        for slot in slots.iter().filter(|s| s.kind == SlotKind::Primary) {
            if restricted.contains(&(date, slot.time.clone())) {
                continue;
            }
            let mut free_halls: HashSet<String> =
                roster.halls.iter().map(|h| h.name.clone()).collect();
            let mut levels = slot.levels.clone();
            levels.shuffle(rng);
            for level in levels {
                level_time_group
                    .entry(level.clone())
                    .or_insert_with(|| slot.time.clone());
                try_place(
                    roster,
                    &mut remaining,
                    &mut exams,
                    &mut next_id,
                    &level,
                    date,
                    &slot.time,
                    &mut free_halls,
                    rng,
                );
            }
        }
    }

    // Reserve pass for leftovers.
    if !remaining.is_empty() {
        let mut dates = calendar.dates();
        dates.shuffle(rng);
        for date in dates {
            for slot in calendar.slots(date).iter().filter(|s| s.kind == SlotKind::Reserve) {
                if restricted.contains(&(date, slot.time.clone())) {
                    continue;
                }
                let used: HashSet<String> = exams
                    .iter()
                    .filter(|e| e.date == date && e.time == slot.time)
                    .flat_map(|e| e.halls.iter().map(|h| h.name.clone()))
                    .collect();
                let mut free_halls: HashSet<String> = roster
                    .halls
                    .iter()
                    .map(|h| h.name.clone())
                    .filter(|n| !used.contains(n))
                    .collect();
                let mut groups_in_slot: HashSet<String> = exams
                    .iter()
                    .filter(|e| e.date == date && e.time == slot.time)
                    .filter_map(|e| level_time_group.get(&e.level).cloned())
                    .collect();

                let mut levels = slot.levels.clone();
                levels.shuffle(rng);
                for level in levels {
                    let group = level_time_group.get(&level).cloned();
                    let compatible = groups_in_slot.is_empty()
                        || group.as_ref().is_none_or(|g| groups_in_slot.contains(g));
                    if !compatible {
                        continue;
                    }
                    let placed = try_place(
                        roster,
                        &mut remaining,
                        &mut exams,
                        &mut next_id,
                        &level,
                        date,
                        &slot.time,
                        &mut free_halls,
                        rng,
                    );
                    if placed {
                        if let Some(g) = group {
                            groups_in_slot.insert(g);
                        }
                    }
                }
            }
        }
    }

    let mut schedule = Schedule::new(exams);
    schedule.open_guard_slots(config);
    (schedule, remaining)
}

/// Picks one random unplaced subject of the level and places it when all
/// of the level's halls are free in the slot.
#[allow(clippy::too_many_arguments)]
fn try_place<R: Rng>(
    roster: &Roster,
    remaining: &mut Vec<Subject>,
    exams: &mut Vec<Exam>,
    next_id: &mut u64,
    level: &str,
    date: NaiveDate,
    time: &str,
    free_halls: &mut HashSet<String>,
    rng: &mut R,
) -> bool {
    let candidates: Vec<usize> = remaining
        .iter()
        .enumerate()
        .filter(|(_, s)| s.level == level)
        .map(|(i, _)| i)
        .collect();
    let &pick = match candidates.choose(rng) {
        Some(i) => i,
        None => return false,
    };

    let halls = roster.halls_for_level(level);
    if halls.is_empty() || !halls.iter().all(|h| free_halls.contains(&h.name)) {
        return false;
    }

    let subject = remaining.remove(pick);
    for hall in &halls {
        free_halls.remove(&hall.name);
    }

    let owner = match roster.owner_of(&subject.name, &subject.level) {
        Some(p) => Owner::Assigned(p.clone()),
        None => Owner::Unowned,
    };

    exams.push(Exam {
        id: ExamId(*next_id),
        date,
        time: time.to_string(),
        subject: subject.name,
        level: level.to_string(),
        owner,
        halls,
        guards: Vec::new(),
    });
    *next_id += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Hall, HallTier, SlotSpec};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    fn sample_roster() -> Roster {
        let mut roster = Roster {
            professors: vec!["A".into(), "B".into()],
            subjects: vec![
                Subject::new("Math", "L1"),
                Subject::new("Physics", "L1"),
                Subject::new("Chemistry", "L1"),
            ],
            halls: vec![Hall::new("H1", HallTier::Small)],
            ..Default::default()
        };
        roster.level_halls.insert("L1".into(), vec!["H1".into()]);
        roster
            .owners
            .insert(("Math".into(), "L1".into()), "A".into());
        roster
    }

    fn sample_calendar() -> ExamCalendar {
        ExamCalendar::new(vec![
            (
                date(1),
                vec![
                    SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                    SlotSpec::new("10:00", SlotKind::Primary, vec!["L1".into()]),
                ],
            ),
            (
                date(2),
                vec![
                    SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()]),
                    SlotSpec::new("10:00", SlotKind::Reserve, vec!["L1".into()]),
                ],
            ),
        ])
    }

    #[test]
    fn test_all_subjects_placed() {
        let roster = sample_roster();
        let calendar = sample_calendar();
        let config = SchedulerConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let (schedule, unplaced) = place_subjects(&roster, &calendar, &config, &mut rng);

        assert!(unplaced.is_empty(), "unplaced: {unplaced:?}");
        assert_eq!(schedule.exams.len(), 3);
        // one hall, so at most one exam per (date, time)
        for (_, slots) in schedule.by_day() {
            for (_, exams) in slots {
                assert_eq!(exams.len(), 1);
            }
        }
    }

    #[test]
    fn test_guard_slots_opened() {
        let roster = sample_roster();
        let calendar = sample_calendar();
        let config = SchedulerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        let (schedule, _) = place_subjects(&roster, &calendar, &config, &mut rng);
        for exam in &schedule.exams {
            assert_eq!(exam.guards.len(), exam.required_guards(&config));
            assert_eq!(exam.shortage_count(), exam.guards.len());
        }
    }

    #[test]
    fn test_owner_carried_onto_exam() {
        let roster = sample_roster();
        let calendar = sample_calendar();
        let config = SchedulerConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        let (schedule, _) = place_subjects(&roster, &calendar, &config, &mut rng);
        let math = schedule
            .exams
            .iter()
            .find(|e| e.subject == "Math")
            .unwrap();
        assert_eq!(math.owner, Owner::Assigned("A".into()));
        let physics = schedule
            .exams
            .iter()
            .find(|e| e.subject == "Physics")
            .unwrap();
        assert_eq!(physics.owner, Owner::Unowned);
    }

    #[test]
    fn test_unassigned_level_is_unplaceable() {
        let mut roster = sample_roster();
        roster.level_halls.clear();
        let calendar = sample_calendar();
        let config = SchedulerConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let (schedule, unplaced) = place_subjects(&roster, &calendar, &config, &mut rng);
        assert!(schedule.exams.is_empty());
        assert_eq!(unplaced.len(), 3);
    }

    #[test]
    fn test_too_few_slots_reports_leftovers() {
        let roster = sample_roster();
        let calendar = ExamCalendar::new(vec![(
            date(1),
            vec![SlotSpec::new("08:00", SlotKind::Primary, vec!["L1".into()])],
        )]);
        let config = SchedulerConfig::default();
        let mut rng = StdRng::seed_from_u64(9);

        let (schedule, unplaced) = place_subjects(&roster, &calendar, &config, &mut rng);
        assert_eq!(schedule.exams.len(), 1);
        assert_eq!(unplaced.len(), 2);
    }
}
