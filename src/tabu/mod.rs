//! Tabu Search (TS) over guard assignments.
//!
//! Single-solution trajectory search with short-term memory: recently
//! reversed moves are forbidden for a tenure, forcing the search away
//! from local optima. The neighborhood is sampled, weighted toward
//! repair moves while the schedule still has shortages and toward
//! balance moves afterwards.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner};
