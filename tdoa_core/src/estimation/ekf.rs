// tdoa_core/src/estimation/ekf.rs

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::estimation::UpdateReport;
use crate::models::measurement::ScalarMeasurement;
use crate::state::FilterState;
use crate::types::{Covariance, Jacobian};

/// What the prediction step advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictMode {
    /// `P ← A·P·Aᵗ + Q` only. The mean moves exclusively through measurement updates.
    #[default]
    CovarianceOnly,
    /// Also dead-reckons the mean: `x ← A·x`.
    CovarianceAndMean,
}

/// A container for parameters needed by the EKF prediction step.
pub struct EkfPredictParams<'a> {
    pub transition: &'a DMatrix<f64>,
    pub process_noise_q: &'a Covariance,
    pub mode: PredictMode,
}

/// A container for parameters needed by the EKF update step.
pub struct EkfMeasurementParams<'a> {
    pub model: &'a dyn ScalarMeasurement,
    pub z: f64,
}

/// Result of a successful scalar correction.
#[derive(Debug, Clone)]
pub struct ScalarCorrection {
    pub state: FilterState,
    /// The Kalman gain `K` as a column vector.
    pub gain: DVector<f64>,
    /// `S = H·P·Hᵗ + R`.
    pub innovation_variance: f64,
}

/// PURE FUNCTION: Performs one EKF prediction step.
/// Takes a state and returns the new, predicted state. It has no side effects.
pub fn ekf_predict(current_state: &FilterState, params: &EkfPredictParams) -> FilterState {
    let a = params.transition;
    let p = &current_state.covariance;

    let new_p = a * p * a.transpose() + params.process_noise_q;

    let new_x = match params.mode {
        PredictMode::CovarianceOnly => current_state.vector.clone(),
        PredictMode::CovarianceAndMean => a * &current_state.vector,
    };

    FilterState {
        layout: current_state.layout.clone(),
        vector: new_x,
        covariance: symmetrize(new_p),
    }
}

/// PURE FUNCTION: Fuses one scalar innovation with Jacobian `h` and noise variance `r`.
///
/// The gain is a column vector and `S` is a scalar, so no matrix inversion is needed.
/// Nothing is returned unless the resulting state and covariance are finite.
pub fn ekf_scalar_update(
    predicted_state: &FilterState,
    h: &Jacobian,
    innovation: f64,
    r: f64,
) -> Result<ScalarCorrection, FilterError> {
    let n = predicted_state.dim();
    if h.ncols() != n {
        return Err(FilterError::DimensionMismatch {
            what: "measurement jacobian",
            expected: n,
            rows: h.nrows(),
            cols: h.ncols(),
        });
    }

    let p_priori = &predicted_state.covariance;

    // ====== INNOVATION COVARIANCE ======
    let pht: DVector<f64> = p_priori * h.transpose();
    let s = (h * &pht)[(0, 0)] + r;
    if !(s.is_finite() && s > 0.0) {
        return Err(FilterError::SingularInnovation { variance: s });
    }

    // ====== MEASUREMENT UPDATE ======
    let k_gain = pht / s;
    let new_x = &predicted_state.vector + &k_gain * innovation;

    // ====== COVARIANCE UPDATE ======
    let i_kh = DMatrix::<f64>::identity(n, n) - &k_gain * h;
    let new_p = symmetrize(i_kh * p_priori);

    let state = FilterState {
        layout: predicted_state.layout.clone(),
        vector: new_x,
        covariance: new_p,
    };
    if !state.is_finite() {
        return Err(FilterError::NonFiniteResult);
    }

    Ok(ScalarCorrection {
        state,
        gain: k_gain,
        innovation_variance: s,
    })
}

/// PURE FUNCTION: Linearizes `params.model` at the current estimate and fuses `params.z`.
pub fn ekf_update(
    predicted_state: &FilterState,
    params: &EkfMeasurementParams,
) -> Result<(FilterState, UpdateReport), FilterError> {
    if !params.z.is_finite() {
        return Err(FilterError::NonFiniteMeasurement { value: params.z });
    }

    let z_pred = params.model.predict_measurement(predicted_state)?;
    let h_jacobian = params.model.calculate_jacobian(predicted_state)?;
    let innovation = params.z - z_pred;

    let correction = ekf_scalar_update(
        predicted_state,
        &h_jacobian,
        innovation,
        params.model.noise_variance(),
    )?;

    let report = UpdateReport {
        measured: params.z,
        predicted: z_pred,
        innovation,
        innovation_variance: correction.innovation_variance,
    };
    Ok((correction.state, report))
}

/// Averages `P` with its transpose to remove rounding asymmetry.
fn symmetrize(p: DMatrix<f64>) -> DMatrix<f64> {
    (&p + p.transpose()) * 0.5
}
