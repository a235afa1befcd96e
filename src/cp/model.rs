//! Finite-domain model of the guard-assignment problem.

use crate::context::DomainContext;
use crate::models::{DutyPattern, DutyRef, Guard, ProfessorId, Schedule};
use std::collections::HashMap;

/// One decision variable: a single guard slot of one exam.
#[derive(Debug, Clone)]
pub struct DutyVar {
    /// The guard slot this variable decides.
    pub duty: DutyRef,
    /// Slot group: duties sharing a (date, time) pair.
    pub slot_group: usize,
    /// Calendar day index of the exam.
    pub day: usize,
    /// Whether the exam occupies a large hall.
    pub is_large: bool,
    /// Professors allowed by availability (indices into `professors`).
    pub candidates: Vec<usize>,
}

/// Objective of the model.
#[derive(Debug, Clone)]
pub enum ObjectiveSpec {
    /// Minimize L1 deviation from the custom (large, other) histogram,
    /// plus a fixed penalty per professor matching no target pattern.
    CustomTargets {
        targets: Vec<(u32, u32)>,
        untracked_penalty: f64,
    },
    /// Minimize max − min weighted workload.
    MinimizeSpread { large_weight: f64, other_weight: f64 },
}

/// The complete model: variables, constraint data, and objective.
#[derive(Debug, Clone)]
pub struct GuardModel {
    pub professors: Vec<ProfessorId>,
    pub variables: Vec<DutyVar>,
    pub day_count: usize,
    pub max_shifts: Option<u32>,
    pub max_large_shifts: Option<u32>,
    /// Explicitly configured duty patterns, by professor index.
    pub patterns: Vec<Option<DutyPattern>>,
    /// Partner pairs, by professor index.
    pub partnerships: Vec<(usize, usize)>,
    pub objective: ObjectiveSpec,
}

impl GuardModel {
    /// Formulates the model for every guard slot of `schedule`.
    ///
    /// Fails when an exam's date is missing from the calendar — the
    /// model would have no day index for its pattern constraints.
    pub fn build(schedule: &Schedule, domain: &DomainContext<'_>) -> Result<Self, String> {
        let config = domain.config;
        let professors = domain.roster.professors.clone();
        let prof_index: HashMap<&str, usize> = professors
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let mut slot_groups: HashMap<(chrono::NaiveDate, String), usize> = HashMap::new();
        let mut variables = Vec::new();

        for duty in schedule.duties() {
            let exam = &schedule.exams[duty.exam];
            let day = domain
                .calendar
                .day_index(exam.date)
                .ok_or_else(|| format!("exam date {} is not in the calendar", exam.date))?;

            let next_group = slot_groups.len();
            let slot_group = *slot_groups
                .entry((exam.date, exam.time.clone()))
                .or_insert(next_group);

            let candidates: Vec<usize> = professors
                .iter()
                .enumerate()
                .filter(|(_, p)| !config.is_unavailable(p, exam.date))
                .map(|(i, _)| i)
                .collect();

            variables.push(DutyVar {
                duty,
                slot_group,
                day,
                is_large: exam.uses_large_hall(),
                candidates,
            });
        }

        let patterns: Vec<Option<DutyPattern>> = professors
            .iter()
            .map(|p| config.duty_patterns.get(p).copied())
            .collect();

        let partnerships: Vec<(usize, usize)> = config
            .partnerships
            .iter()
            .filter_map(|(a, b)| {
                match (prof_index.get(a.as_str()), prof_index.get(b.as_str())) {
                    (Some(&ia), Some(&ib)) => Some((ia, ib)),
                    _ => None,
                }
            })
            .collect();

        let objective = if config.enable_custom_targets && !config.custom_target_patterns.is_empty()
        {
            ObjectiveSpec::CustomTargets {
                targets: config.expanded_targets(),
                untracked_penalty: 10.0,
            }
        } else {
            ObjectiveSpec::MinimizeSpread {
                large_weight: config.large_hall_weight,
                other_weight: config.other_hall_weight,
            }
        };

        Ok(Self {
            professors,
            variables,
            day_count: domain.calendar.day_count(),
            max_shifts: config.max_shifts,
            max_large_shifts: config.max_large_hall_shifts,
            patterns,
            partnerships,
            objective,
        })
    }

    /// Number of decision variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Writes a complete assignment (professor index per variable) back
    /// onto a copy of the schedule.
    pub fn apply(&self, schedule: &Schedule, assignment: &[usize]) -> Schedule {
        let mut out = schedule.clone();
        for (var, &prof) in self.variables.iter().zip(assignment) {
            out.assign(var.duty, Guard::Assigned(self.professors[prof].clone()));
        }
        out
    }
}
