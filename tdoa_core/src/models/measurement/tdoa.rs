// tdoa_core/src/models/measurement/tdoa.rs

use crate::error::FilterError;
use crate::models::measurement::ScalarMeasurement;
use crate::state::layout::{STATE_X, STATE_Y, STATE_Z};
use crate::state::FilterState;
use crate::types::{AnchorIndex, Jacobian, Position};

/// Distances at or below this are treated as the agent sitting on an anchor.
pub const MIN_ANCHOR_DISTANCE: f64 = 1e-9;

/// Default standard deviation of a range-difference sample, in meters.
pub const DEFAULT_MEASUREMENT_STD_DEV: f64 = 0.15;

/// One end of a TDOA pair: the anchor's registry index and its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRef {
    pub index: AnchorIndex,
    pub position: Position,
}

/// Range-difference model between a reference anchor `Ar` and a neighbor `An`:
///
/// `z = ‖p − An‖ − ‖p − Ar‖ + v`,  `v ~ N(0, std_dev²)`
///
/// Only the position block of the state is observed; the velocity partials are zero.
#[derive(Debug, Clone)]
pub struct TdoaMeasurementModel {
    pub reference: AnchorRef,
    pub neighbor: AnchorRef,
    pub std_dev: f64,
}

impl TdoaMeasurementModel {
    /// Distances (d0 to the reference, d1 to the neighbor) from the estimated position.
    fn ranges(&self, filter_state: &FilterState) -> Result<(f64, f64), FilterError> {
        let p = filter_state.position();
        let d0 = (p - self.reference.position).norm();
        let d1 = (p - self.neighbor.position).norm();

        if !(d0 > MIN_ANCHOR_DISTANCE) {
            return Err(FilterError::DegenerateGeometry {
                anchor: self.reference.index,
            });
        }
        if !(d1 > MIN_ANCHOR_DISTANCE) {
            return Err(FilterError::DegenerateGeometry {
                anchor: self.neighbor.index,
            });
        }
        Ok((d0, d1))
    }
}

impl ScalarMeasurement for TdoaMeasurementModel {
    fn noise_variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    fn predict_measurement(&self, filter_state: &FilterState) -> Result<f64, FilterError> {
        let (d0, d1) = self.ranges(filter_state)?;
        Ok(d1 - d0)
    }

    fn calculate_jacobian(&self, filter_state: &FilterState) -> Result<Jacobian, FilterError> {
        let (d0, d1) = self.ranges(filter_state)?;
        let p = filter_state.position();

        // Difference of the unit vectors pointing from each anchor to the agent.
        let gradient = (p - self.neighbor.position) / d1 - (p - self.reference.position) / d0;

        let mut h = Jacobian::zeros(filter_state.dim());
        h[STATE_X] = gradient.x;
        h[STATE_Y] = gradient.y;
        h[STATE_Z] = gradient.z;
        Ok(h)
    }
}
