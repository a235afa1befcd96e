//! Domain model for exam invigilation scheduling.
//!
//! - **`roster`**: professors, subjects, halls, subject ownership
//! - **`calendar`**: exam days and their time slots
//! - **`exam`**: a scheduled exam with its guard slots
//! - **`schedule`**: the mutable solution value shared by all operators
//! - **`ledger`**: per-professor duty bookkeeping derived from a schedule
//! - **`config`**: the scheduling configuration bag

pub mod calendar;
pub mod config;
pub mod exam;
pub mod ledger;
pub mod roster;
pub mod schedule;

pub use calendar::{ExamCalendar, SlotKind, SlotSpec};
pub use config::{DutyPattern, SchedulerConfig, Strategy, TargetPattern};
pub use exam::{Exam, ExamId, Guard, Owner};
pub use ledger::ProfessorLedger;
pub use roster::{Hall, HallTier, ProfessorId, Roster, Subject};
pub use schedule::{DutyRef, LockedSet, Schedule};
