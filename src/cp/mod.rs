//! Exact constraint solver for guard assignment.
//!
//! `model` formulates the assignment as a finite-domain model — one
//! decision per guard slot with a professor domain, plus the cap,
//! availability, duty-pattern, and partnership constraints and the
//! distribution objective. `solver` solves it exactly with depth-first
//! branch and bound under a wall-clock time box.
//!
//! Infeasibility or a timeout without a solution is reported as a
//! failure status — never silently degraded into a partial schedule.

mod model;
mod solver;

pub use model::{DutyVar, GuardModel, ObjectiveSpec};
pub use solver::{BranchAndBoundSolver, CpSolution, SolverConfig, SolverStatus};
