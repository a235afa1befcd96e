//! Roster model: professors, subjects, halls, and subject ownership.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Professors are identified by their (unique) display name.
pub type ProfessorId = String;

/// Capacity tier of an examination hall.
///
/// Large halls require more guards per exam and are subject to their own
/// per-professor duty cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HallTier {
    Small,
    Medium,
    Large,
}

/// An examination hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    /// Hall name.
    pub name: String,
    /// Capacity tier.
    pub tier: HallTier,
}

impl Hall {
    pub fn new(name: impl Into<String>, tier: HallTier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }
}

/// A subject taught at a specific level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name.
    pub name: String,
    /// Level the subject belongs to.
    pub level: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
        }
    }
}

/// The roster assembled by the caller: who exists, what is taught where,
/// and which professor owns which subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// All professors available for guard duty.
    pub professors: Vec<ProfessorId>,
    /// All subjects to be examined.
    pub subjects: Vec<Subject>,
    /// All halls.
    pub halls: Vec<Hall>,
    /// (subject name, level) → owning professor.
    pub owners: HashMap<(String, String), ProfessorId>,
    /// Level → names of the halls that level's exams occupy.
    pub level_halls: HashMap<String, Vec<String>>,
}

impl Roster {
    /// Looks up the owner of a subject, if any.
    pub fn owner_of(&self, subject: &str, level: &str) -> Option<&ProfessorId> {
        self.owners.get(&(subject.to_string(), level.to_string()))
    }

    /// Resolves hall records for a level's assigned hall names.
    pub fn halls_for_level(&self, level: &str) -> Vec<Hall> {
        let names = match self.level_halls.get(level) {
            Some(n) => n,
            None => return Vec::new(),
        };
        self.halls
            .iter()
            .filter(|h| names.contains(&h.name))
            .cloned()
            .collect()
    }

    /// Subjects owned by a given professor.
    pub fn subjects_owned_by(&self, prof: &str) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| {
                self.owner_of(&s.name, &s.level)
                    .is_some_and(|owner| owner == prof)
            })
            .collect()
    }
}
