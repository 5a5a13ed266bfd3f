// tdoa_core/src/state.rs

use nalgebra::{DMatrix, DVector, Point3, Vector3};

use crate::types::{Covariance, Position, State};

pub mod layout;

use layout::{constant_velocity_layout, STATE_DIM, STATE_X, STATE_Y, STATE_Z};

/// Every variable that can exist in the filter's state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVariable {
    // --- Cartesian Position ---
    Px,
    Py,
    Pz,
    // --- Cartesian Velocity ---
    Vx,
    Vy,
    Vz,
}

/// Initial position guess, near the factory anchor layout.
pub const DEFAULT_INITIAL_POSITION: [f64; 3] = [2.0, 2.6, 0.0];

/// Initial standard deviations for (x, y, z, vx, vy, vz).
pub const DEFAULT_INITIAL_STD_DEV: [f64; 6] = [100.0, 100.0, 1.0, 0.01, 0.01, 0.01];

/// The state object used by the filter. It bundles the state vector with its
/// schema (the layout) and its covariance, so the two are never observed apart.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// The ordered "schema" of the state vector.
    pub layout: Vec<StateVariable>,
    /// The mean `x`.
    pub vector: State,
    /// The covariance matrix `P`.
    pub covariance: Covariance,
}

impl FilterState {
    /// Builds a constant-velocity state from a position, a velocity and the
    /// per-slot variances on the covariance diagonal.
    pub fn new(position: Position, velocity: Vector3<f64>, variances: &[f64; STATE_DIM]) -> Self {
        let mut vector = DVector::zeros(STATE_DIM);
        vector.fixed_rows_mut::<3>(STATE_X).copy_from(&position.coords);
        vector.fixed_rows_mut::<3>(3).copy_from(&velocity);

        Self {
            layout: constant_velocity_layout(),
            vector,
            covariance: DMatrix::from_diagonal(&DVector::from_row_slice(variances)),
        }
    }

    /// Returns the dimension (number of rows) of the state vector.
    pub fn dim(&self) -> usize {
        self.layout.len()
    }

    /// Finds the index of a specific `StateVariable` in the layout.
    pub fn find_idx(&self, var: &StateVariable) -> Option<usize> {
        self.layout.iter().position(|v| v == var)
    }

    pub fn position(&self) -> Position {
        Point3::new(
            self.vector[STATE_X],
            self.vector[STATE_Y],
            self.vector[STATE_Z],
        )
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.vector.fixed_rows::<3>(3).into_owned()
    }

    pub fn trace(&self) -> f64 {
        self.covariance.trace()
    }

    /// True when neither the mean nor the covariance holds NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.vector.iter().all(|v| v.is_finite()) && self.covariance.iter().all(|v| v.is_finite())
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let p = &self.covariance;
        if p.nrows() != p.ncols() {
            return false;
        }
        (0..p.nrows()).all(|i| (i + 1..p.ncols()).all(|j| (p[(i, j)] - p[(j, i)]).abs() <= tolerance))
    }

    pub fn has_nonnegative_diagonal(&self) -> bool {
        self.covariance.diagonal().iter().all(|v| *v >= 0.0)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_INITIAL_POSITION;
        Self::new(
            Point3::new(x, y, z),
            Vector3::zeros(),
            &DEFAULT_INITIAL_STD_DEV.map(|s| s * s),
        )
    }
}
