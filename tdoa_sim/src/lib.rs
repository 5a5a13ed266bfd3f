// tdoa_sim/src/lib.rs

//! Simulation host for `tdoa_core`.
//!
//! Plays the filter's two external collaborators, a fixed-cadence predict
//! scheduler and a ranging transport, against a simulated agent moving
//! through known anchors, and scores the estimate against ground truth.

// This prelude is for convenience for other files WITHIN the tdoa_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod logging;
pub mod simulation;

pub use simulation::core::config::load_scenario;
pub use simulation::core::runner::{run_scenario, RunReport};
