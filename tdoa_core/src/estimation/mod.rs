// tdoa_core/src/estimation/mod.rs

use crate::error::FilterError;
use crate::messages::FilterInput;
use crate::state::FilterState;
use crate::types::Position;

/// Diagnostics from one accepted measurement update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateReport {
    /// The measurement that was fused.
    pub measured: f64,
    /// `h(x)` at the prior estimate.
    pub predicted: f64,
    /// `measured − predicted`.
    pub innovation: f64,
    /// `H·P·Hᵗ + R`.
    pub innovation_variance: f64,
}

impl UpdateReport {
    /// Innovation divided by its standard deviation.
    pub fn normalized_innovation(&self) -> f64 {
        self.innovation / self.innovation_variance.sqrt()
    }
}

/// The contract for any algorithm that performs the "State Estimator" role.
/// Its sole responsibility is to estimate the state of an agent.
pub trait StateEstimator: Send {
    /// The single, unified method for processing all types of input data.
    ///
    /// Returns `Ok(Some(report))` for a fused measurement, `Ok(None)` for a time
    /// step, and `Err` when the input was refused. A refused input leaves the
    /// estimate unchanged.
    fn process(&mut self, input: &FilterInput) -> Result<Option<UpdateReport>, FilterError>;

    /// Returns a reference to the current best estimate of the state.
    fn get_state(&self) -> &FilterState;

    fn position(&self) -> Position {
        self.get_state().position()
    }
}

pub mod ekf;
pub mod filters;
