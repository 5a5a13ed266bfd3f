// tdoa_core/src/types.rs

use nalgebra::{DMatrix, DVector, Point3, RowDVector};

// --- Core Type Aliases ---
pub type State = DVector<f64>;
pub type Covariance = DMatrix<f64>;
/// A 1xN observation Jacobian for a scalar measurement.
pub type Jacobian = RowDVector<f64>;
/// A point in the (fixed) anchor frame.
pub type Position = Point3<f64>;

/// Index of an anchor inside an `AnchorRegistry`.
pub type AnchorIndex = usize;
