//! Exam calendar: ordered days, each carrying its time slots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a slot is a primary examination slot or a reserve slot used
/// for overflow subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Primary,
    Reserve,
}

/// A time slot within an exam day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Time label, e.g. `"08:00-09:30"`. Labels sort chronologically.
    pub time: String,
    /// Primary or reserve.
    pub kind: SlotKind,
    /// Levels that may sit an exam in this slot.
    pub levels: Vec<String>,
}

impl SlotSpec {
    pub fn new(time: impl Into<String>, kind: SlotKind, levels: Vec<String>) -> Self {
        Self {
            time: time.into(),
            kind,
            levels,
        }
    }
}

/// The exam calendar: dates in chronological order with their slots.
///
/// Day adjacency (for the strict-consecutive duty pattern) is defined by
/// position in this calendar, not by calendar-date arithmetic: two duty
/// days are adjacent when their indices differ by exactly one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamCalendar {
    days: Vec<(NaiveDate, Vec<SlotSpec>)>,
}

impl ExamCalendar {
    /// Creates a calendar; days are sorted chronologically.
    pub fn new(mut days: Vec<(NaiveDate, Vec<SlotSpec>)>) -> Self {
        days.sort_by_key(|(date, _)| *date);
        Self { days }
    }

    /// All exam dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|(d, _)| *d).collect()
    }

    /// Position of a date in the calendar, if present.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|(d, _)| *d == date)
    }

    /// Number of exam days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// The final exam day, if the calendar is non-empty.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().map(|(d, _)| *d)
    }

    /// Slots of a given day.
    pub fn slots(&self, date: NaiveDate) -> &[SlotSpec] {
        self.days
            .iter()
            .find(|(d, _)| *d == date)
            .map(|(_, s)| s.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over `(date, slots)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[SlotSpec])> {
        self.days.iter().map(|(d, s)| (*d, s.as_slice()))
    }

    /// The time labels excluded from guarding by a last-day restriction:
    /// the final `n` slots of the last day, by time order.
    pub fn restricted_times(&self, restriction: Option<usize>) -> Vec<(NaiveDate, String)> {
        let n = match restriction {
            Some(n) if n > 0 => n,
            _ => return Vec::new(),
        };
        let last = match self.days.last() {
            Some((d, _)) => *d,
            None => return Vec::new(),
        };
        let mut times: Vec<String> = self.slots(last).iter().map(|s| s.time.clone()).collect();
        times.sort();
        times
            .into_iter()
            .rev()
            .take(n)
            .map(|t| (last, t))
            .collect()
    }
}
