// tdoa_core/src/estimation/filters/tdoa_ekf.rs

use nalgebra::{DMatrix, Point3, Vector3};
use tracing::{debug, warn};

use crate::anchors::AnchorRegistry;
use crate::config::EkfConfig;
use crate::error::FilterError;
use crate::estimation::ekf::{
    ekf_predict, ekf_update, EkfMeasurementParams, EkfPredictParams, PredictMode,
};
use crate::estimation::{StateEstimator, UpdateReport};
use crate::messages::FilterInput;
use crate::models::dynamics::{
    constant_velocity_transition, validate_covariance, validate_transition, DEFAULT_TIME_STEP,
};
use crate::models::measurement::tdoa::{AnchorRef, TdoaMeasurementModel, DEFAULT_MEASUREMENT_STD_DEV};
use crate::state::layout::STATE_DIM;
use crate::state::FilterState;
use crate::types::{AnchorIndex, Covariance, Position};

/// Running counters kept by the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub predictions: u64,
    pub updates: u64,
    pub rejected_updates: u64,
}

/// Extended Kalman Filter estimating 3D position and velocity from TDOA samples.
///
/// Mean and covariance live in one `FilterState` and every step computes a new
/// state before committing it, so a refused call never leaves the two out of step.
/// The filter is a plain owned value: hosts serialize access through `&mut self`.
#[derive(Debug, Clone)]
pub struct TdoaEkf {
    /// The current state of the filter (x, P).
    state: FilterState,
    /// The transition matrix (A) of the constant-velocity model.
    transition: DMatrix<f64>,
    /// The process noise covariance matrix (Q). Zero unless configured.
    process_noise_q: Covariance,
    predict_mode: PredictMode,
    anchors: AnchorRegistry,
    /// Standard deviation of every range-difference sample.
    std_dev: f64,
    stats: FilterStats,
}

impl TdoaEkf {
    /// Creates a filter with the factory defaults: initial guess near the anchor
    /// area, `dt = 0.016`, the four-anchor layout and a 0.15 m measurement noise.
    pub fn new() -> Self {
        Self {
            state: FilterState::default(),
            transition: constant_velocity_transition(DEFAULT_TIME_STEP),
            process_noise_q: DMatrix::zeros(STATE_DIM, STATE_DIM),
            predict_mode: PredictMode::CovarianceOnly,
            anchors: AnchorRegistry::with_default_layout(),
            std_dev: DEFAULT_MEASUREMENT_STD_DEV,
            stats: FilterStats::default(),
        }
    }

    /// Builds a filter from a validated configuration.
    pub fn from_config(config: &EkfConfig) -> Result<Self, FilterError> {
        config.validate()?;

        let [x, y, z] = config.initial_position;
        let [vx, vy, vz] = config.initial_velocity;
        let [sx, sy, sz] = config.initial_position_std_dev;
        let [svx, svy, svz] = config.initial_velocity_std_dev;
        let variances = [sx, sy, sz, svx, svy, svz].map(|s| s * s);

        let mut anchors = AnchorRegistry::new(config.max_anchors);
        for anchor in &config.anchors {
            let [ax, ay, az] = anchor.position;
            anchors.set_anchor_position(anchor.index, Point3::new(ax, ay, az))?;
        }

        Ok(Self {
            state: FilterState::new(Point3::new(x, y, z), Vector3::new(vx, vy, vz), &variances),
            transition: constant_velocity_transition(config.time_step),
            process_noise_q: DMatrix::identity(STATE_DIM, STATE_DIM) * config.process_noise,
            predict_mode: config.predict_mode,
            anchors,
            std_dev: config.measurement_std_dev,
            stats: FilterStats::default(),
        })
    }

    // --- Configuration ---

    /// Replaces `A`. Anything but a finite 6x6 matrix is refused and `A` is kept.
    pub fn set_transition_matrix(&mut self, transition: DMatrix<f64>) -> Result<(), FilterError> {
        validate_transition(&transition, STATE_DIM, "transition matrix")
            .inspect_err(|err| warn!(%err, "transition matrix rejected"))?;
        self.transition = transition;
        Ok(())
    }

    /// Rebuilds `A` for a new predict cadence.
    pub fn set_time_step(&mut self, dt: f64) -> Result<(), FilterError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "time step {dt} must be positive"
            )));
        }
        self.transition = constant_velocity_transition(dt);
        Ok(())
    }

    /// Replaces `P`. The matrix must be 6x6, finite, symmetric and carry no
    /// negative variance; otherwise it is refused and `P` is kept.
    pub fn set_covariance(&mut self, covariance: DMatrix<f64>) -> Result<(), FilterError> {
        validate_covariance(&covariance, STATE_DIM, "covariance matrix")
            .inspect_err(|err| warn!(%err, "covariance matrix rejected"))?;
        self.state.covariance = covariance;
        Ok(())
    }

    /// Replaces `Q`, under the same checks as [`TdoaEkf::set_covariance`].
    pub fn set_process_noise(&mut self, process_noise_q: DMatrix<f64>) -> Result<(), FilterError> {
        validate_covariance(&process_noise_q, STATE_DIM, "process noise matrix")
            .inspect_err(|err| warn!(%err, "process noise matrix rejected"))?;
        self.process_noise_q = process_noise_q;
        Ok(())
    }

    pub fn set_predict_mode(&mut self, mode: PredictMode) {
        self.predict_mode = mode;
    }

    /// Stores an anchor position. An index beyond the registry capacity is
    /// refused and every anchor is kept.
    pub fn set_anchor_position(
        &mut self,
        index: AnchorIndex,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), FilterError> {
        self.anchors
            .set_anchor_position(index, Point3::new(x, y, z))
            .inspect_err(|err| warn!(%err, "anchor position rejected"))
    }

    pub fn anchor_position(&self, index: AnchorIndex) -> Option<Position> {
        self.anchors.anchor_position(index)
    }

    pub fn set_measurement_std_dev(&mut self, std_dev: f64) -> Result<(), FilterError> {
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(FilterError::InvalidConfig(format!(
                "measurement standard deviation {std_dev} must be positive"
            )));
        }
        self.std_dev = std_dev;
        Ok(())
    }

    // --- Steps ---

    /// Time update: `P ← A·P·Aᵗ + Q`. The mean is only advanced when the
    /// predict mode asks for it.
    pub fn predict(&mut self) {
        let params = EkfPredictParams {
            transition: &self.transition,
            process_noise_q: &self.process_noise_q,
            mode: self.predict_mode,
        };
        self.state = ekf_predict(&self.state, &params);
        self.stats.predictions += 1;
    }

    /// Fuses one range difference `‖p − An‖ − ‖p − Ar‖` between the reference
    /// anchor `Ar` and the neighbor anchor `An`.
    ///
    /// Refused, leaving the estimate untouched, when the sample is not finite,
    /// when both indices name the same anchor, when either anchor is not
    /// configured, or when the estimate sits on one of the anchors.
    pub fn update(
        &mut self,
        reference: AnchorIndex,
        neighbor: AnchorIndex,
        range_difference: f64,
    ) -> Result<UpdateReport, FilterError> {
        match self.try_update(reference, neighbor, range_difference) {
            Ok((state, report)) => {
                self.state = state;
                self.stats.updates += 1;
                debug!(
                    reference,
                    neighbor,
                    innovation = report.innovation,
                    innovation_variance = report.innovation_variance,
                    "fused TDOA sample"
                );
                Ok(report)
            }
            Err(err) => {
                self.stats.rejected_updates += 1;
                warn!(reference, neighbor, range_difference, %err, "TDOA sample rejected");
                Err(err)
            }
        }
    }

    fn try_update(
        &self,
        reference: AnchorIndex,
        neighbor: AnchorIndex,
        range_difference: f64,
    ) -> Result<(FilterState, UpdateReport), FilterError> {
        if !range_difference.is_finite() {
            return Err(FilterError::NonFiniteMeasurement {
                value: range_difference,
            });
        }
        if reference == neighbor {
            return Err(FilterError::SameAnchor { index: reference });
        }

        let model = TdoaMeasurementModel {
            reference: AnchorRef {
                index: reference,
                position: self.anchors.require(reference)?,
            },
            neighbor: AnchorRef {
                index: neighbor,
                position: self.anchors.require(neighbor)?,
            },
            std_dev: self.std_dev,
        };

        ekf_update(
            &self.state,
            &EkfMeasurementParams {
                model: &model,
                z: range_difference,
            },
        )
    }

    // --- Queries ---

    /// The estimated position.
    pub fn position(&self) -> Position {
        self.state.position()
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.state.velocity()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn covariance(&self) -> &Covariance {
        &self.state.covariance
    }

    pub fn transition_matrix(&self) -> &DMatrix<f64> {
        &self.transition
    }

    pub fn process_noise(&self) -> &Covariance {
        &self.process_noise_q
    }

    pub fn predict_mode(&self) -> PredictMode {
        self.predict_mode
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn measurement_std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }
}

impl Default for TdoaEkf {
    fn default() -> Self {
        Self::new()
    }
}

// --- The Public Trait Implementation ---
impl StateEstimator for TdoaEkf {
    fn process(&mut self, input: &FilterInput) -> Result<Option<UpdateReport>, FilterError> {
        match input {
            FilterInput::TimeStep { .. } => {
                self.predict();
                Ok(None)
            }
            FilterInput::Measurement(sample) => self
                .update(sample.reference, sample.neighbor, sample.range_difference)
                .map(Some),
        }
    }

    fn get_state(&self) -> &FilterState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::DEFAULT_MAX_ANCHORS;
    use crate::messages::TdoaSample;
    use approx::assert_abs_diff_eq;

    const TRUE_POSITION: [f64; 3] = [2.0, 2.5, 1.3];

    fn truth() -> Position {
        let [x, y, z] = TRUE_POSITION;
        Point3::new(x, y, z)
    }

    /// `‖p − An‖ − ‖p − Ar‖` at the true position, using the filter's own anchors.
    fn true_difference(filter: &TdoaEkf, reference: AnchorIndex, neighbor: AnchorIndex) -> f64 {
        let p = truth();
        let ar = filter.anchor_position(reference).unwrap();
        let an = filter.anchor_position(neighbor).unwrap();
        (p - an).norm() - (p - ar).norm()
    }

    fn horizontal_error(p: &Position) -> f64 {
        let t = truth();
        ((p.x - t.x).powi(2) + (p.y - t.y).powi(2)).sqrt()
    }

    fn assert_covariance_healthy(filter: &TdoaEkf) {
        assert!(filter.state().is_finite());
        assert!(filter.state().is_symmetric(1e-9));
        assert!(filter.state().has_nonnegative_diagonal());
    }

    #[test]
    fn construction_uses_the_factory_defaults() {
        let filter = TdoaEkf::new();
        assert_eq!(filter.position(), Point3::new(2.0, 2.6, 0.0));
        assert_eq!(filter.velocity(), Vector3::zeros());
        assert_eq!(filter.transition_matrix(), &constant_velocity_transition(0.016));
        assert_eq!(filter.measurement_std_dev(), 0.15);
        assert_eq!(filter.anchors().len(), 4);
        assert_eq!(filter.predict_mode(), PredictMode::CovarianceOnly);
        assert_eq!(filter.stats(), FilterStats::default());
    }

    #[test]
    fn from_default_config_matches_new() {
        let from_config = TdoaEkf::from_config(&EkfConfig::default()).unwrap();
        let fresh = TdoaEkf::new();
        assert_eq!(from_config.state(), fresh.state());
        assert_eq!(from_config.anchors(), fresh.anchors());
        assert_eq!(from_config.transition_matrix(), fresh.transition_matrix());
        assert_eq!(from_config.process_noise(), fresh.process_noise());
    }

    #[test]
    fn repeated_single_pair_updates_converge_in_the_plane() {
        let mut filter = TdoaEkf::new();
        let z = true_difference(&filter, 0, 1);

        let first = filter.update(0, 1, z).unwrap();
        let mut last = first;
        for _ in 1..20 {
            last = filter.update(0, 1, z).unwrap();
        }

        assert!(last.innovation.abs() < first.innovation.abs());
        assert!(last.innovation.abs() < 1e-3);
        assert!(horizontal_error(&filter.position()) < 0.1);
        assert_eq!(filter.stats().updates, 20);
    }

    #[test]
    fn cycling_anchor_pairs_converges_round_by_round() {
        let mut filter = TdoaEkf::new();
        let pairs = [(0, 1), (0, 2), (0, 3)];
        let measurements: Vec<_> = pairs
            .iter()
            .map(|&(r, n)| (r, n, true_difference(&filter, r, n)))
            .collect();

        let mut previous = (filter.position() - truth()).norm();
        for _round in 0..16 {
            for &(r, n, z) in &measurements {
                filter.update(r, n, z).unwrap();
                assert_covariance_healthy(&filter);
            }
            let distance = (filter.position() - truth()).norm();
            assert!(
                distance < previous,
                "distance grew from {previous} to {distance}"
            );
            previous = distance;
        }

        assert!(horizontal_error(&filter.position()) < 0.05);
    }

    #[test]
    fn covariance_stays_symmetric_through_mixed_steps() {
        let mut filter = TdoaEkf::new();
        let pairs = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)];
        for step in 0..120 {
            filter.predict();
            assert_covariance_healthy(&filter);

            let (r, n) = pairs[step % pairs.len()];
            // Deterministic, bounded perturbation of the true difference.
            let noise = 0.03 * ((step as f64) * 1.7).sin();
            filter.update(r, n, true_difference(&filter, r, n) + noise).unwrap();
            assert_covariance_healthy(&filter);
        }
        assert!(horizontal_error(&filter.position()) < 0.1);
    }

    #[test]
    fn predict_alone_never_shrinks_the_trace() {
        let mut filter = TdoaEkf::new();
        let mut trace = filter.state().trace();
        for _ in 0..200 {
            filter.predict();
            let next = filter.state().trace();
            assert!(next >= trace);
            trace = next;
        }
        assert_eq!(filter.stats().predictions, 200);
    }

    #[test]
    fn predict_moves_only_the_covariance_by_default() {
        let moving = EkfConfig {
            initial_velocity: [2.0, 0.0, 0.0],
            ..EkfConfig::default()
        };

        let mut filter = TdoaEkf::from_config(&moving).unwrap();
        let mut p = filter.covariance().clone();
        p[(3, 3)] = 1.0;
        filter.set_covariance(p).unwrap();

        let before = filter.state().vector.clone();
        filter.predict();
        assert_eq!(filter.state().vector, before);
        assert_abs_diff_eq!(filter.covariance()[(0, 3)], 0.016, epsilon = 1e-12);

        let mut dead_reckoning = TdoaEkf::from_config(&EkfConfig {
            predict_mode: PredictMode::CovarianceAndMean,
            ..moving
        })
        .unwrap();
        dead_reckoning.predict();
        assert_abs_diff_eq!(dead_reckoning.position().x, 2.0 + 2.0 * 0.016, epsilon = 1e-12);
    }

    #[test]
    fn process_noise_is_added_on_predict() {
        let mut filter = TdoaEkf::new();
        filter
            .set_process_noise(DMatrix::identity(6, 6) * 0.5)
            .unwrap();
        let before = filter.covariance()[(5, 5)];
        filter.predict();
        assert_abs_diff_eq!(filter.covariance()[(5, 5)], before + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_matrices_are_rejected_without_side_effects() {
        let mut filter = TdoaEkf::new();
        filter.update(0, 1, -0.3).unwrap();
        let state_before = filter.state().clone();
        let transition_before = filter.transition_matrix().clone();
        let noise_before = filter.process_noise().clone();

        assert!(matches!(
            filter.set_transition_matrix(DMatrix::identity(5, 5)),
            Err(FilterError::DimensionMismatch { rows: 5, cols: 5, .. })
        ));
        assert!(filter.set_transition_matrix(DMatrix::identity(6, 7)).is_err());
        assert!(filter.set_covariance(DMatrix::identity(7, 7)).is_err());
        assert!(filter.set_covariance(DMatrix::zeros(0, 0)).is_err());
        assert!(filter.set_process_noise(DMatrix::zeros(3, 3)).is_err());

        assert_eq!(filter.state(), &state_before);
        assert_eq!(filter.transition_matrix(), &transition_before);
        assert_eq!(filter.process_noise(), &noise_before);
    }

    #[test]
    fn correctly_sized_matrices_are_accepted() {
        let mut filter = TdoaEkf::new();
        let a = constant_velocity_transition(0.1);
        filter.set_transition_matrix(a.clone()).unwrap();
        assert_eq!(filter.transition_matrix(), &a);

        let p = DMatrix::identity(6, 6) * 2.0;
        filter.set_covariance(p.clone()).unwrap();
        assert_eq!(filter.covariance(), &p);

        filter.set_time_step(0.02).unwrap();
        assert_abs_diff_eq!(filter.transition_matrix()[(1, 4)], 0.02);
        assert!(filter.set_time_step(0.0).is_err());
    }

    #[test]
    fn malformed_matrix_contents_are_rejected_without_side_effects() {
        let mut filter = TdoaEkf::new();
        filter.update(0, 1, -0.3).unwrap();
        let state_before = filter.state().clone();
        let transition_before = filter.transition_matrix().clone();
        let noise_before = filter.process_noise().clone();

        let mut nan_p = filter.covariance().clone();
        nan_p[(0, 1)] = f64::NAN;
        let mut skewed_p = filter.covariance().clone();
        skewed_p[(0, 1)] = 5.0;
        let mut negative_p = filter.covariance().clone();
        negative_p[(2, 2)] = -3.0;
        for p in [nan_p, skewed_p, negative_p] {
            assert!(matches!(
                filter.set_covariance(p),
                Err(FilterError::InvalidConfig(_))
            ));
        }

        let mut infinite_a = constant_velocity_transition(DEFAULT_TIME_STEP);
        infinite_a[(0, 3)] = f64::INFINITY;
        assert!(filter.set_transition_matrix(infinite_a).is_err());

        let mut negative_q = DMatrix::zeros(6, 6);
        negative_q[(4, 4)] = -1e-3;
        assert!(filter.set_process_noise(negative_q).is_err());

        assert_eq!(filter.state(), &state_before);
        assert_eq!(filter.transition_matrix(), &transition_before);
        assert_eq!(filter.process_noise(), &noise_before);

        // The filter keeps working after the refused calls.
        filter.predict();
        assert_covariance_healthy(&filter);
        filter.update(0, 1, -0.3).unwrap();
        assert_covariance_healthy(&filter);
    }

    #[test]
    fn measurement_std_dev_scales_the_innovation_variance() {
        let mut loose = TdoaEkf::new();
        let mut tight = TdoaEkf::new();
        tight.set_measurement_std_dev(0.01).unwrap();
        assert_abs_diff_eq!(tight.measurement_std_dev(), 0.01);

        let loose_report = loose.update(0, 1, -0.3).unwrap();
        let tight_report = tight.update(0, 1, -0.3).unwrap();
        assert_abs_diff_eq!(
            loose_report.innovation_variance - tight_report.innovation_variance,
            0.15 * 0.15 - 0.01 * 0.01,
            epsilon = 1e-9
        );

        let state_before = tight.state().clone();
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                tight.set_measurement_std_dev(bad),
                Err(FilterError::InvalidConfig(_))
            ));
        }
        assert_abs_diff_eq!(tight.measurement_std_dev(), 0.01);
        assert_eq!(tight.state(), &state_before);
    }

    #[test]
    fn predict_mode_can_be_switched_at_runtime() {
        let mut filter = TdoaEkf::from_config(&EkfConfig {
            initial_velocity: [0.0, -1.0, 0.0],
            ..EkfConfig::default()
        })
        .unwrap();
        assert_eq!(filter.predict_mode(), PredictMode::CovarianceOnly);
        filter.predict();
        assert_abs_diff_eq!(filter.position().y, 2.6, epsilon = 1e-12);

        filter.set_predict_mode(PredictMode::CovarianceAndMean);
        assert_eq!(filter.predict_mode(), PredictMode::CovarianceAndMean);
        filter.predict();
        assert_abs_diff_eq!(filter.position().y, 2.6 - 0.016, epsilon = 1e-12);
    }

    #[test]
    fn out_of_range_anchor_is_rejected_without_side_effects() {
        let mut filter = TdoaEkf::new();
        let anchors_before = filter.anchors().clone();

        let err = filter
            .set_anchor_position(DEFAULT_MAX_ANCHORS, 1.0, 2.0, 3.0)
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::AnchorIndexOutOfRange {
                index: DEFAULT_MAX_ANCHORS,
                capacity: DEFAULT_MAX_ANCHORS
            }
        );
        assert_eq!(filter.anchors(), &anchors_before);

        filter.set_anchor_position(5, 1.0, 2.0, 3.0).unwrap();
        assert_eq!(filter.anchor_position(5), Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn unconfigured_anchor_refuses_the_update() {
        let mut filter = TdoaEkf::new();
        let before = filter.state().clone();

        assert_eq!(
            filter.update(0, 6, 0.2).unwrap_err(),
            FilterError::UnconfiguredAnchor { index: 6 }
        );
        assert_eq!(
            filter.update(0, 42, 0.2).unwrap_err(),
            FilterError::AnchorIndexOutOfRange {
                index: 42,
                capacity: DEFAULT_MAX_ANCHORS
            }
        );
        assert_eq!(filter.state(), &before);
        assert_eq!(filter.stats().rejected_updates, 2);
    }

    #[test]
    fn same_anchor_and_non_finite_samples_are_refused() {
        let mut filter = TdoaEkf::new();
        let before = filter.state().clone();

        assert_eq!(
            filter.update(2, 2, 0.0).unwrap_err(),
            FilterError::SameAnchor { index: 2 }
        );
        assert!(matches!(
            filter.update(0, 1, f64::NAN),
            Err(FilterError::NonFiniteMeasurement { .. })
        ));
        assert!(filter.update(0, 1, f64::INFINITY).is_err());
        assert_eq!(filter.state(), &before);
    }

    #[test]
    fn estimate_on_an_anchor_is_rejected_and_stays_finite() {
        let mut filter = TdoaEkf::from_config(&EkfConfig {
            initial_position: [4.628, 0.600, 1.312],
            ..EkfConfig::default()
        })
        .unwrap();
        let before = filter.state().clone();

        assert_eq!(
            filter.update(0, 1, 1.0).unwrap_err(),
            FilterError::DegenerateGeometry { anchor: 0 }
        );
        assert_eq!(
            filter.update(2, 0, 1.0).unwrap_err(),
            FilterError::DegenerateGeometry { anchor: 0 }
        );
        assert_eq!(filter.state(), &before);
        assert!(filter.state().is_finite());

        // A pair that avoids the occupied anchor still fuses.
        assert!(filter.update(1, 2, 0.5).is_ok());
        assert!(filter.state().is_finite());
    }

    #[test]
    fn process_dispatches_inputs() {
        let mut filter = TdoaEkf::new();
        assert_eq!(
            filter.process(&FilterInput::TimeStep { current_time: 0.016 }),
            Ok(None)
        );
        let sample = TdoaSample {
            reference: 0,
            neighbor: 1,
            range_difference: true_difference(&filter, 0, 1),
            timestamp: 0.02,
        };
        let report = filter
            .process(&FilterInput::Measurement(sample))
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(report.measured, sample.range_difference);
        assert_abs_diff_eq!(
            report.innovation,
            report.measured - report.predicted,
            epsilon = 1e-12
        );
        assert_eq!(StateEstimator::position(&filter), filter.position());
        assert_eq!(filter.stats().predictions, 1);
        assert_eq!(filter.stats().updates, 1);
    }

    #[test]
    fn filters_are_independent_values() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TdoaEkf>();

        let mut a = TdoaEkf::new();
        let b = a.clone();
        a.update(0, 1, -0.3).unwrap();
        assert_ne!(a.state(), b.state());
        assert_eq!(b.state(), TdoaEkf::new().state());
    }
}
