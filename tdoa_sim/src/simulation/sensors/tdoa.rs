// tdoa_sim/src/simulation/sensors/tdoa.rs

use rand::Rng;
use rand_distr::{Distribution, Normal};

use tdoa_core::prelude::{AnchorRegistry, TdoaSample};
use tdoa_core::types::{AnchorIndex, Position};

use crate::error::SimError;
use crate::simulation::core::config::SensorConfig;
use crate::simulation::core::prng::SimulationRng;

/// Stand-in for the ranging transport: produces range-difference samples between
/// a fixed reference anchor and a rotating neighbor, at irregular intervals.
#[derive(Debug, Clone)]
pub struct TdoaSensor {
    reference: (AnchorIndex, Position),
    neighbors: Vec<(AnchorIndex, Position)>,
    next_neighbor: usize,
    nominal_period: f64,
    jitter: f64,
    // Store the noise distribution for efficiency
    noise_dist: Normal<f64>,
    next_sample_time: f64,
}

impl TdoaSensor {
    /// Resolves the configured anchors against the surveyed positions in `anchors`.
    pub fn new(config: &SensorConfig, anchors: &AnchorRegistry) -> Result<Self, SimError> {
        let reference = (
            config.reference_anchor,
            anchors.require(config.reference_anchor)?,
        );
        let neighbors = config
            .neighbor_anchors
            .iter()
            .map(|&index| anchors.require(index).map(|p| (index, p)))
            .collect::<Result<Vec<_>, _>>()?;
        if neighbors.is_empty() {
            return Err(SimError::InvalidScenario(
                "sensor needs at least one neighbor anchor".into(),
            ));
        }

        let nominal_period = 1.0 / config.rate_hz;
        Ok(Self {
            reference,
            neighbors,
            next_neighbor: 0,
            nominal_period,
            jitter: config.jitter,
            noise_dist: Normal::new(0.0, config.noise_std_dev)?,
            next_sample_time: nominal_period,
        })
    }

    /// When the next sample is due, in seconds since the run started.
    pub fn next_sample_time(&self) -> f64 {
        self.next_sample_time
    }

    /// Takes the sample that is due, measured from `true_position`, and schedules the next one.
    pub fn sample(&mut self, true_position: &Position, rng: &mut SimulationRng) -> TdoaSample {
        let (reference, reference_pos) = self.reference;
        let (neighbor, neighbor_pos) = self.neighbors[self.next_neighbor];
        self.next_neighbor = (self.next_neighbor + 1) % self.neighbors.len();

        let d0 = (true_position - reference_pos).norm();
        let d1 = (true_position - neighbor_pos).norm();
        let noise = self.noise_dist.sample(&mut rng.0);

        let sample = TdoaSample {
            reference,
            neighbor,
            range_difference: d1 - d0 + noise,
            timestamp: self.next_sample_time,
        };

        let stretch = if self.jitter > 0.0 {
            rng.0.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        self.next_sample_time += self.nominal_period * (1.0 + stretch);

        sample
    }
}
