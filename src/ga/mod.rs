//! Genetic Algorithm (GA) over the duty-slot chromosome.
//!
//! A chromosome is one gene per guard slot, in the schedule's
//! deterministic duty enumeration; a gene is a professor or `Shortage`.
//! The population is seeded by the feasibility-seeking randomized
//! constructor rather than uniform randomness, and mutation reverts any
//! swap the whole-schedule oracle rejects.
//!
//! # References
//!
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"

mod config;
mod runner;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
