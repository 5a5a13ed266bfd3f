// tdoa_core/src/config.rs

//! Typed configuration for a `TdoaEkf`. Every field has a default, so an empty
//! document yields the factory filter.

use serde::{Deserialize, Serialize};

use crate::anchors::{DEFAULT_ANCHOR_LAYOUT, DEFAULT_MAX_ANCHORS};
use crate::error::FilterError;
use crate::estimation::ekf::PredictMode;
use crate::models::dynamics::DEFAULT_TIME_STEP;
use crate::models::measurement::tdoa::DEFAULT_MEASUREMENT_STD_DEV;
use crate::state::{DEFAULT_INITIAL_POSITION, DEFAULT_INITIAL_STD_DEV};
use crate::types::AnchorIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorConfig {
    pub index: AnchorIndex,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EkfConfig {
    pub initial_position: [f64; 3],
    pub initial_velocity: [f64; 3],
    /// Standard deviations on the initial covariance diagonal (x, y, z).
    pub initial_position_std_dev: [f64; 3],
    /// Standard deviations on the initial covariance diagonal (vx, vy, vz).
    pub initial_velocity_std_dev: [f64; 3],
    /// `dt` baked into the transition matrix, in seconds.
    pub time_step: f64,
    /// Standard deviation of one range-difference sample, in meters.
    pub measurement_std_dev: f64,
    /// Diagonal process noise added on every predict. Zero reproduces the
    /// noise-free covariance propagation.
    pub process_noise: f64,
    pub predict_mode: PredictMode,
    pub max_anchors: usize,
    pub anchors: Vec<AnchorConfig>,
}

impl Default for EkfConfig {
    fn default() -> Self {
        let [sx, sy, sz, svx, svy, svz] = DEFAULT_INITIAL_STD_DEV;
        Self {
            initial_position: DEFAULT_INITIAL_POSITION,
            initial_velocity: [0.0; 3],
            initial_position_std_dev: [sx, sy, sz],
            initial_velocity_std_dev: [svx, svy, svz],
            time_step: DEFAULT_TIME_STEP,
            measurement_std_dev: DEFAULT_MEASUREMENT_STD_DEV,
            process_noise: 0.0,
            predict_mode: PredictMode::CovarianceOnly,
            max_anchors: DEFAULT_MAX_ANCHORS,
            anchors: DEFAULT_ANCHOR_LAYOUT
                .iter()
                .map(|&(index, position)| AnchorConfig { index, position })
                .collect(),
        }
    }
}

impl EkfConfig {
    /// Reports the first field that cannot produce a working filter.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !all_finite(&self.initial_position) || !all_finite(&self.initial_velocity) {
            return Err(FilterError::InvalidConfig(
                "initial state must be finite".into(),
            ));
        }
        let std_devs = self
            .initial_position_std_dev
            .iter()
            .chain(&self.initial_velocity_std_dev);
        for s in std_devs {
            if !(s.is_finite() && *s >= 0.0) {
                return Err(FilterError::InvalidConfig(format!(
                    "initial standard deviation {s} must be finite and non-negative"
                )));
            }
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "time_step {} must be positive",
                self.time_step
            )));
        }
        if !(self.measurement_std_dev.is_finite() && self.measurement_std_dev > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "measurement_std_dev {} must be positive",
                self.measurement_std_dev
            )));
        }
        if !(self.process_noise.is_finite() && self.process_noise >= 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "process_noise {} must be non-negative",
                self.process_noise
            )));
        }
        if self.max_anchors < 2 {
            return Err(FilterError::InvalidConfig(
                "max_anchors must allow at least one anchor pair".into(),
            ));
        }
        for anchor in &self.anchors {
            if anchor.index >= self.max_anchors {
                return Err(FilterError::AnchorIndexOutOfRange {
                    index: anchor.index,
                    capacity: self.max_anchors,
                });
            }
            if !all_finite(&anchor.position) {
                return Err(FilterError::InvalidConfig(format!(
                    "anchor {} position must be finite",
                    anchor.index
                )));
            }
        }
        Ok(())
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
