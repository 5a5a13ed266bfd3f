// tdoa_core/src/models/measurement/mod.rs

use crate::error::FilterError;
use crate::state::FilterState;
use crate::types::Jacobian;
use std::fmt::Debug;

// --- SCALAR MEASUREMENT MODEL TRAIT ---
// Represents the mathematical model of a one-dimensional sensor reading. `z = h(x) + v`
pub trait ScalarMeasurement: Debug + Send + Sync {
    /// Returns the measurement noise variance `R`.
    fn noise_variance(&self) -> f64;

    /// Predicts the ideal measurement `z_pred = h(x)` from the filter's state.
    ///
    /// Returns an error when `h` is undefined at the current estimate.
    fn predict_measurement(&self, filter_state: &FilterState) -> Result<f64, FilterError>;

    /// Calculates the 1xN measurement Jacobian `H = ∂h/∂x` at the current estimate.
    fn calculate_jacobian(&self, filter_state: &FilterState) -> Result<Jacobian, FilterError>;
}

pub mod tdoa;
