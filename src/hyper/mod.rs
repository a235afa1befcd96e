//! Q-learning hyper-heuristic.
//!
//! A tabular reinforcement-learning controller that decides, from the
//! schedule's current defect profile, which low-level search operator
//! (tabu, LNS, repair-biased LNS, VNS) to run next. Rewards follow the
//! cost tuple's priority order, and the learned Q-table can persist
//! across runs.
//!
//! # References
//!
//! - Watkins & Dayan (1992), "Q-learning"
//! - Burke et al. (2013), "Hyper-heuristics: a survey of the state of
//!   the art", *JORS* 64(12)

mod config;
mod qtable;
mod runner;

pub use config::{HyperAction, HyperConfig};
pub use qtable::QTable;
pub use runner::{HyperResult, HyperRunner, SolveState};
