//! A scheduled exam and its guard slots.

use super::config::SchedulerConfig;
use super::roster::{Hall, HallTier, ProfessorId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique per-run exam identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExamId(pub u64);

/// Occupant of one guard slot.
///
/// `Shortage` marks an unfilled slot explicitly; it is excluded from all
/// constraint tallies but dominates the cost function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guard {
    Assigned(ProfessorId),
    Shortage,
}

impl Guard {
    /// The assigned professor, if any.
    pub fn assigned(&self) -> Option<&str> {
        match self {
            Guard::Assigned(p) => Some(p),
            Guard::Shortage => None,
        }
    }

    pub fn is_shortage(&self) -> bool {
        matches!(self, Guard::Shortage)
    }
}

/// The professor owning (teaching) an exam's subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Assigned(ProfessorId),
    Unowned,
}

impl Owner {
    pub fn assigned(&self) -> Option<&str> {
        match self {
            Owner::Assigned(p) => Some(p),
            Owner::Unowned => None,
        }
    }
}

/// One exam sitting: a subject examined in a set of halls during one
/// (date, time) slot, with one guard slot per required guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub date: NaiveDate,
    pub time: String,
    pub subject: String,
    pub level: String,
    pub owner: Owner,
    pub halls: Vec<Hall>,
    pub guards: Vec<Guard>,
}

impl Exam {
    /// Total guards this exam requires, from the per-tier counts.
    pub fn required_guards(&self, config: &SchedulerConfig) -> usize {
        self.halls
            .iter()
            .map(|h| config.guards_for_tier(h.tier) as usize)
            .sum()
    }

    /// Number of leading guard slots that belong to large halls.
    ///
    /// Guard slots are ordered large-hall first, so per-professor
    /// large/other statistics split the guard list at this index.
    pub fn large_guards_needed(&self, config: &SchedulerConfig) -> usize {
        self.halls
            .iter()
            .filter(|h| h.tier == HallTier::Large)
            .map(|_| config.guards_large_hall as usize)
            .sum()
    }

    /// Whether any of this exam's halls is large.
    pub fn uses_large_hall(&self) -> bool {
        self.halls.iter().any(|h| h.tier == HallTier::Large)
    }

    /// Workload weight of one duty on this exam.
    pub fn duty_weight(&self, config: &SchedulerConfig) -> f64 {
        if self.uses_large_hall() {
            config.large_hall_weight
        } else {
            config.other_hall_weight
        }
    }

    /// Number of `Shortage` slots.
    pub fn shortage_count(&self) -> usize {
        self.guards.iter().filter(|g| g.is_shortage()).count()
    }

    /// Whether a professor already occupies one of this exam's slots.
    pub fn has_guard(&self, prof: &str) -> bool {
        self.guards.iter().any(|g| g.assigned() == Some(prof))
    }
}
