//! Run context: progress channel, cancellation token, and the bundle of
//! problem data every operator receives.
//!
//! No global singletons: the log channel and cancellation flag travel
//! explicitly through every operator call. The channel is observability
//! only — nothing reads it for control flow.

use crate::cost::{evaluate, CostTuple};
use crate::models::{
    ExamCalendar, LockedSet, ProfessorLedger, Roster, Schedule, SchedulerConfig,
};
use crate::validity::{assignment_valid, schedule_valid};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Handle carrying the progress channel and the cooperative
/// cancellation flag.
///
/// Cancellation is polled at iteration boundaries; an in-progress move
/// always completes before it takes effect.
#[derive(Clone)]
pub struct RunContext {
    log: Sender<String>,
    cancel: Arc<AtomicBool>,
}

impl RunContext {
    /// Creates a context plus the receiving end of its progress stream.
    pub fn channel() -> (Self, Receiver<String>) {
        let (tx, rx) = channel();
        (
            Self {
                log: tx,
                cancel: Arc::new(AtomicBool::new(false)),
            },
            rx,
        )
    }

    /// Creates a context whose progress stream is discarded.
    pub fn detached() -> Self {
        Self::channel().0
    }

    /// Emits one progress line. Send failures are ignored: a dropped
    /// reader must never stop the run.
    pub fn log(&self, line: impl Into<String>) {
        let _ = self.log.send(line.into());
    }

    /// Emits a `PROGRESS:<0-100>` percent line.
    pub fn progress(&self, percent: u32) {
        self.log(format!("PROGRESS:{}", percent.min(100)));
    }

    /// Emits the terminal `DONE<json>` line.
    pub fn done<T: Serialize>(&self, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => self.log(format!("DONE{json}")),
            Err(err) => self.log(format!(
                "DONE{{\"success\":false,\"message\":\"serialization failed: {err}\"}}"
            )),
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Requests cooperative cancellation.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// The shared flag, for handing to solver callbacks.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }
}

/// The problem data bundle: roster, calendar, configuration, and the
/// locked-duty set, shared read-only by every operator.
#[derive(Clone)]
pub struct DomainContext<'a> {
    pub roster: &'a Roster,
    pub calendar: &'a ExamCalendar,
    pub config: &'a SchedulerConfig,
    pub locked: LockedSet,
}

impl<'a> DomainContext<'a> {
    pub fn new(roster: &'a Roster, calendar: &'a ExamCalendar, config: &'a SchedulerConfig) -> Self {
        Self {
            roster,
            calendar,
            config,
            locked: LockedSet::new(),
        }
    }

    pub fn with_locked(mut self, locked: LockedSet) -> Self {
        self.locked = locked;
        self
    }

    /// Per-move oracle check against a derived ledger.
    pub fn assignment_valid(
        &self,
        prof: &str,
        exam: &crate::models::Exam,
        ledger: &ProfessorLedger,
    ) -> bool {
        assignment_valid(prof, exam, ledger, self.config, self.calendar)
    }

    /// Whole-schedule ground truth.
    pub fn schedule_valid(&self, schedule: &Schedule) -> bool {
        schedule_valid(schedule, self.config, self.calendar)
    }

    /// Full cost of a schedule.
    pub fn evaluate(&self, schedule: &Schedule) -> CostTuple {
        evaluate(schedule, &self.roster.professors, self.config, self.calendar)
    }

    /// Rebuilds a fresh ledger for a schedule.
    pub fn ledger(&self, schedule: &Schedule) -> ProfessorLedger {
        ProfessorLedger::from_schedule(schedule, self.config)
    }
}
