//! Large Neighborhood Search (LNS) over guard assignments.
//!
//! Ruin-and-recreate: each iteration destroys a fraction of the filled
//! guard slots back to `Shortage`, repairs them greedily (least-loaded
//! eligible professor per slot), and accepts the result on improvement
//! or with a simulated-annealing probability. The destroy fraction
//! decays geometrically so the search intensifies over time.
//!
//! # References
//!
//! - Shaw, P. (1998). "Using Constraint Programming and Local Search
//!   Methods to Solve Vehicle Routing Problems"
//! - Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood
//!   Search Heuristic for the Pickup and Delivery Problem with Time Windows"

mod config;
mod runner;

pub use config::LnsConfig;
pub use runner::{LnsResult, LnsRunner};
