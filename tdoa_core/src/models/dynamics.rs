// tdoa_core/src/models/dynamics.rs

//! The linear motion model used by the prediction step.

use nalgebra::DMatrix;

use crate::error::FilterError;
use crate::state::layout::{STATE_DIM, STATE_VX, STATE_VY, STATE_VZ, STATE_X, STATE_Y, STATE_Z};

/// The step baked into the default transition matrix (a 62.5 Hz predict cadence).
pub const DEFAULT_TIME_STEP: f64 = 0.016;

/// Builds the constant-velocity transition matrix `A`: identity, with each
/// velocity component coupled into its position component by `dt`.
pub fn constant_velocity_transition(dt: f64) -> DMatrix<f64> {
    let mut a = DMatrix::identity(STATE_DIM, STATE_DIM);
    a[(STATE_X, STATE_VX)] = dt;
    a[(STATE_Y, STATE_VY)] = dt;
    a[(STATE_Z, STATE_VZ)] = dt;
    a
}

/// Checks that `matrix` is `dim` x `dim`.
pub fn validate_square(
    matrix: &DMatrix<f64>,
    dim: usize,
    what: &'static str,
) -> Result<(), FilterError> {
    if matrix.nrows() != dim || matrix.ncols() != dim {
        return Err(FilterError::DimensionMismatch {
            what,
            expected: dim,
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    Ok(())
}

/// Relative asymmetry tolerated in a covariance handed to the filter.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Checks that `matrix` is `dim` x `dim` with only finite entries.
pub fn validate_transition(
    matrix: &DMatrix<f64>,
    dim: usize,
    what: &'static str,
) -> Result<(), FilterError> {
    validate_square(matrix, dim, what)?;
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(FilterError::InvalidConfig(format!(
            "{what} has non-finite entries"
        )));
    }
    Ok(())
}

/// Checks that `matrix` can serve as a covariance: `dim` x `dim`, finite,
/// symmetric up to [`SYMMETRY_TOLERANCE`] of its largest entry, and with a
/// non-negative diagonal.
pub fn validate_covariance(
    matrix: &DMatrix<f64>,
    dim: usize,
    what: &'static str,
) -> Result<(), FilterError> {
    validate_transition(matrix, dim, what)?;

    let tolerance = SYMMETRY_TOLERANCE * matrix.amax().max(1.0);
    if (matrix - matrix.transpose()).amax() > tolerance {
        return Err(FilterError::InvalidConfig(format!("{what} is not symmetric")));
    }
    if let Some(i) = (0..dim).find(|&i| matrix[(i, i)] < 0.0) {
        return Err(FilterError::InvalidConfig(format!(
            "{what} has a negative variance at ({i}, {i})"
        )));
    }
    Ok(())
}
