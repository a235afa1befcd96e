//! Exam invigilation ("guard duty") scheduling.
//!
//! Assigns professors to exam-supervision slots across a multi-day
//! calendar, honoring hard constraints (availability, no double
//! booking, shift and large-hall caps, duty-day patterns, partner
//! pairing) and balancing workload fairly or against custom targets.
//!
//! The crate is organized around one mutable schedule value and one
//! validity/cost oracle, shared by a family of search strategies:
//!
//! - **Construction** (`construct`): greedy scored slot filling with
//!   shortage diagnosis.
//! - **Local search**: swap hill-climbing (`swap`), simulated annealing
//!   (`sa`), tabu search (`tabu`), large neighborhood search (`lns`),
//!   and variable neighborhood search (`vns`).
//! - **Genetic algorithm** (`ga`): population search over the duty-slot
//!   chromosome.
//! - **Exact solver** (`cp`): finite-domain model plus depth-first
//!   branch and bound under a time box.
//! - **Hyper-heuristic** (`hyper`): tabular Q-learning over the
//!   schedule's defect profile, choosing among the operators above.
//! - **Subject clustering** (`cluster`): relocates exam records so each
//!   professor's owned subjects span few days.
//!
//! The `engine` module wires everything into one pipeline behind the
//! [`models::Strategy`] switch, reporting progress over a line-oriented
//! channel (`PROGRESS:<percent>` lines, terminal `DONE<json>`).
//!
//! # Example
//!
//! ```no_run
//! use u_invigil::context::RunContext;
//! use u_invigil::models::{ExamCalendar, Roster, SchedulerConfig};
//!
//! let roster = Roster::default();
//! let calendar = ExamCalendar::default();
//! let config = SchedulerConfig::default();
//! let (ctx, progress) = RunContext::channel();
//!
//! let outcome = u_invigil::engine::run(&roster, &calendar, &config, &ctx)?;
//! for line in progress.try_iter() {
//!     println!("{line}");
//! }
//! println!("success: {}", outcome.success);
//! # Ok::<(), u_invigil::error::InvigilError>(())
//! ```

pub mod cluster;
pub mod construct;
pub mod context;
pub mod cost;
pub mod cp;
pub mod engine;
pub mod error;
pub mod ga;
pub mod hyper;
pub mod lns;
pub mod models;
pub mod placement;
pub mod report;
pub mod sa;
pub mod swap;
pub mod tabu;
pub mod validity;
pub mod vns;
