//! Derived reports: workload, balance score, duty-pattern failures, and
//! the serialized run outcome.

use crate::construct::ShortageDiagnosis;
use crate::models::{
    DutyPattern, Exam, ExamCalendar, ProfessorId, Schedule, SchedulerConfig,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Splits `total_large`/`total_other` duties over `professors` targets
/// so every professor lands near the same weighted workload.
pub fn balanced_distribution(
    total_large: u32,
    total_other: u32,
    professors: usize,
    large_weight: f64,
    other_weight: f64,
) -> Vec<(u32, u32)> {
    if professors == 0 {
        return Vec::new();
    }
    let total_workload = total_large as f64 * large_weight + total_other as f64 * other_weight;
    let target_workload = total_workload / professors as f64;

    let base_large = total_large / professors as u32;
    let remainder_large = (total_large % professors as u32) as usize;

    (0..professors)
        .map(|i| {
            let large = if i < remainder_large {
                base_large + 1
            } else {
                base_large
            };
            let remaining = target_workload - large as f64 * large_weight;
            let other = (remaining / other_weight).round().max(0.0) as u32;
            (large, other)
        })
        .collect()
}

/// One row of the balance report: a (large, other) pattern with its
/// target and actual professor counts.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub large: u32,
    pub other: u32,
    pub target_count: i64,
    pub actual_count: i64,
    pub deviation: i64,
}

/// Target-vs-actual distribution comparison with a 0–100 score.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub details: Vec<BalanceRow>,
    pub balance_score: u32,
}

/// Builds the balance report from per-professor stats and the expanded
/// target list. Score is `max(0, 100 − 2 × Σ|deviation|)`.
pub fn balance_report(
    stats: &HashMap<ProfessorId, (u32, u32)>,
    targets: &[(u32, u32)],
) -> BalanceReport {
    let mut actual: BTreeMap<(u32, u32), i64> = BTreeMap::new();
    for counts in stats.values() {
        *actual.entry(*counts).or_default() += 1;
    }
    let mut wanted: BTreeMap<(u32, u32), i64> = BTreeMap::new();
    for t in targets {
        *wanted.entry(*t).or_default() += 1;
    }

    let keys: std::collections::BTreeSet<(u32, u32)> =
        actual.keys().chain(wanted.keys()).copied().collect();

    let mut details = Vec::new();
    let mut total_deviation = 0i64;
    for key in keys {
        let target_count = wanted.get(&key).copied().unwrap_or(0);
        let actual_count = actual.get(&key).copied().unwrap_or(0);
        let deviation = actual_count - target_count;
        total_deviation += deviation.abs();
        details.push(BalanceRow {
            large: key.0,
            other: key.1,
            target_count,
            actual_count,
            deviation,
        });
    }

    BalanceReport {
        details,
        balance_score: (100 - 2 * total_deviation).max(0) as u32,
    }
}

/// The per-professor target list: the configured custom targets (padded
/// with a balanced split of whatever they leave over), or a fully
/// balanced split of the actual totals.
pub fn compute_targets(
    stats: &HashMap<ProfessorId, (u32, u32)>,
    config: &SchedulerConfig,
    professors: usize,
) -> Vec<(u32, u32)> {
    let total_large: u32 = stats.values().map(|(l, _)| l).sum();
    let total_other: u32 = stats.values().map(|(_, o)| o).sum();

    if config.enable_custom_targets && !config.custom_target_patterns.is_empty() {
        let mut targets = config.expanded_targets();
        if targets.len() < professors {
            let assigned_large: u32 = targets.iter().map(|(l, _)| l).sum();
            let assigned_other: u32 = targets.iter().map(|(_, o)| o).sum();
            if total_large >= assigned_large && total_other >= assigned_other {
                targets.extend(balanced_distribution(
                    total_large - assigned_large,
                    total_other - assigned_other,
                    professors - targets.len(),
                    config.large_hall_weight,
                    config.other_hall_weight,
                ));
            }
        }
        targets.truncate(professors);
        targets
    } else {
        balanced_distribution(
            total_large,
            total_other,
            professors,
            config.large_hall_weight,
            config.other_hall_weight,
        )
    }
}

/// One professor's duty counts and weighted workload.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessorReport {
    pub name: ProfessorId,
    pub large: u32,
    pub other: u32,
    pub total: u32,
    pub workload: f64,
}

/// Per-professor workload rows, sorted by name.
pub fn workload_report(
    stats: &HashMap<ProfessorId, (u32, u32)>,
    config: &SchedulerConfig,
) -> Vec<ProfessorReport> {
    let mut rows: Vec<ProfessorReport> = stats
        .iter()
        .map(|(name, (large, other))| ProfessorReport {
            name: name.clone(),
            large: *large,
            other: *other,
            total: large + other,
            workload: *large as f64 * config.large_hall_weight
                + *other as f64 * config.other_hall_weight,
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// A professor whose final duty days break their configured pattern.
#[derive(Debug, Clone, Serialize)]
pub struct PatternFailure {
    pub name: ProfessorId,
    pub reason: String,
}

/// Checks every configured duty pattern against the final schedule.
pub fn pattern_failures(
    schedule: &Schedule,
    config: &SchedulerConfig,
    calendar: &ExamCalendar,
) -> Vec<PatternFailure> {
    let mut duty_days: HashMap<&str, std::collections::BTreeSet<usize>> = HashMap::new();
    for exam in &schedule.exams {
        for guard in &exam.guards {
            if let Some(prof) = guard.assigned() {
                if let Some(day) = calendar.day_index(exam.date) {
                    duty_days.entry(prof).or_default().insert(day);
                }
            }
        }
    }

    let mut failures = Vec::new();
    for (prof, pattern) in &config.duty_patterns {
        let days: Vec<usize> = duty_days
            .get(prof.as_str())
            .map(|d| d.iter().copied().collect())
            .unwrap_or_default();
        if days.is_empty() {
            continue;
        }
        let reason = match pattern {
            DutyPattern::ConsecutiveStrict if days.len() != 2 || days[1] - days[0] != 1 => {
                Some("did not receive two consecutive duty days".to_string())
            }
            DutyPattern::FlexibleTwo if days.len() != 2 => {
                Some("did not receive exactly two duty days".to_string())
            }
            DutyPattern::FlexibleThree if !(2..=3).contains(&days.len()) => {
                Some("did not receive two or three duty days".to_string())
            }
            DutyPattern::OneDay if days.len() > 1 => {
                Some("received more than one duty day".to_string())
            }
            _ => None,
        };
        if let Some(reason) = reason {
            failures.push(PatternFailure {
                name: prof.clone(),
                reason,
            });
        }
    }
    failures.sort_by(|a, b| a.name.cmp(&b.name));
    failures
}

/// Schedule grouped for export: date → time → exams.
pub fn export_schedule(schedule: &Schedule) -> BTreeMap<String, BTreeMap<String, Vec<Exam>>> {
    let mut out: BTreeMap<String, BTreeMap<String, Vec<Exam>>> = BTreeMap::new();
    for exam in &schedule.exams {
        out.entry(exam.date.to_string())
            .or_default()
            .entry(exam.time.clone())
            .or_default()
            .push(exam.clone());
    }
    out
}

/// The terminal payload carried on the `DONE<json>` line.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, BTreeMap<String, Vec<Exam>>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PatternFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortage_report: Vec<ShortageDiagnosis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unscheduled_subjects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prof_report: Vec<ProfessorReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_report: Option<BalanceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunOutcome {
    /// A failed run with a message and nothing else.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            schedule: None,
            failures: Vec::new(),
            shortage_report: Vec::new(),
            unscheduled_subjects: Vec::new(),
            prof_report: Vec::new(),
            balance_report: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamId, Guard, Hall, HallTier, Owner, SlotKind, SlotSpec};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[test]
    fn test_balanced_distribution_splits_evenly() {
        // 4 large + 4 other over 4 professors at weights 3/1:
        // everyone gets one of each
        let dist = balanced_distribution(4, 4, 4, 3.0, 1.0);
        assert_eq!(dist, vec![(1, 1); 4]);
    }

    #[test]
    fn test_balanced_distribution_remainder() {
        let dist = balanced_distribution(5, 0, 4, 3.0, 1.0);
        let total: u32 = dist.iter().map(|(l, _)| l).sum();
        assert_eq!(total, 5);
        assert!(dist.iter().all(|&(l, _)| l == 1 || l == 2));
    }

    #[test]
    fn test_balanced_distribution_empty() {
        assert!(balanced_distribution(3, 3, 0, 3.0, 1.0).is_empty());
    }

    #[test]
    fn test_balance_report_score() {
        let mut stats = HashMap::new();
        stats.insert("A".to_string(), (1u32, 1u32));
        stats.insert("B".to_string(), (1u32, 1u32));
        let targets = vec![(1, 1), (1, 1)];
        let report = balance_report(&stats, &targets);
        assert_eq!(report.balance_score, 100);

        // one professor off-pattern: |0-1| at (1,1)=1... actual (2,0)=1
        stats.insert("B".to_string(), (2u32, 0u32));
        let report = balance_report(&stats, &targets);
        assert_eq!(report.balance_score, 100 - 2 * 2);
        assert_eq!(report.details.len(), 2);
    }

    #[test]
    fn test_balance_score_floor() {
        let mut stats = HashMap::new();
        for i in 0..60 {
            stats.insert(format!("P{i}"), (i as u32, 0u32));
        }
        let targets = vec![(0, 1); 60];
        let report = balance_report(&stats, &targets);
        assert_eq!(report.balance_score, 0);
    }

    #[test]
    fn test_compute_targets_custom_padded() {
        let mut config = SchedulerConfig::default();
        config.enable_custom_targets = true;
        config.custom_target_patterns = vec![crate::models::TargetPattern {
            large: 2,
            other: 0,
            count: 1,
        }];
        let mut stats = HashMap::new();
        stats.insert("A".to_string(), (2u32, 0u32));
        stats.insert("B".to_string(), (0u32, 2u32));

        let targets = compute_targets(&stats, &config, 2);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], (2, 0));
    }

    #[test]
    fn test_workload_report_sorted() {
        let config = SchedulerConfig::default();
        let mut stats = HashMap::new();
        stats.insert("Zahra".to_string(), (1u32, 0u32));
        stats.insert("Adel".to_string(), (0u32, 2u32));
        let rows = workload_report(&stats, &config);
        assert_eq!(rows[0].name, "Adel");
        assert!((rows[0].workload - 2.0).abs() < 1e-12);
        assert_eq!(rows[1].name, "Zahra");
        assert!((rows[1].workload - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pattern_failures() {
        let mut config = SchedulerConfig::default();
        config
            .duty_patterns
            .insert("A".into(), DutyPattern::FlexibleTwo);
        config
            .duty_patterns
            .insert("B".into(), DutyPattern::OneDay);
        let cal = ExamCalendar::new(
            (1..=2)
                .map(|d| {
                    (
                        date(d),
                        vec![SlotSpec::new("08:00", SlotKind::Primary, vec![])],
                    )
                })
                .collect(),
        );

        let exam = |id: u64, d: u32, guard: &str| Exam {
            id: ExamId(id),
            date: date(d),
            time: "08:00".into(),
            subject: format!("S{id}"),
            level: "L1".into(),
            owner: Owner::Unowned,
            halls: vec![Hall::new("H", HallTier::Small)],
            guards: vec![Guard::Assigned(guard.into())],
        };

        // A has one day (needs two), B has one day (fine)
        let schedule = Schedule::new(vec![exam(1, 1, "A"), exam(2, 2, "B")]);
        let failures = pattern_failures(&schedule, &config, &cal);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "A");
    }

    #[test]
    fn test_run_outcome_serialization() {
        let outcome = RunOutcome::failure("no feasible schedule");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("no feasible schedule"));
        assert!(!json.contains("schedule\":"));
    }
}
