//! Simulated Annealing (SA) over guard assignments.
//!
//! A single-solution trajectory metaheuristic: a random occupied guard
//! slot is reassigned to a random other professor, and worsening moves
//! are accepted with a probability that decreases with temperature,
//! allowing the search to escape local optima.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
