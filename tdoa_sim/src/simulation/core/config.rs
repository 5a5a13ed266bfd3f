// tdoa_sim/src/simulation/core/config.rs

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use tdoa_core::config::EkfConfig;
use tdoa_core::prelude::AnchorRegistry;
use tdoa_core::types::AnchorIndex;

use crate::error::SimError;

/// Prefix of environment variables that override scenario values,
/// e.g. `TDOA_SIMULATION__SEED=7` or `TDOA_SENSOR__NOISE_STD_DEV=0.1`.
pub const ENV_PREFIX: &str = "TDOA_";

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// All configuration for a simulation run. This struct is the root of the
/// data parsed from a `scenario.toml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub sensor: SensorConfig,

    #[serde(default)]
    pub trajectory: TrajectoryConfig,

    #[serde(default = "default_filter")]
    pub filter: EkfConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: Simulation::default(),
            sensor: SensorConfig::default(),
            trajectory: TrajectoryConfig::default(),
            filter: default_filter(),
        }
    }
}

/// The factory filter, plus enough process noise to follow a moving agent.
fn default_filter() -> EkfConfig {
    EkfConfig {
        process_noise: 1e-3,
        ..EkfConfig::default()
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in a scenario.toml file.
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Duration of the simulation in seconds.
    pub duration_seconds: f64,
    /// Rate at which the scheduler calls `predict`.
    pub predict_rate_hz: f64,
    /// Capacity of the queue between the producers and the filter worker.
    pub queue_capacity: usize,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            duration_seconds: 30.0,
            predict_rate_hz: 62.5,
            queue_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    /// Nominal sample rate of the ranging transport.
    pub rate_hz: f64,
    /// Relative jitter of the sample period, in `[0, 1)`.
    pub jitter: f64,
    /// Standard deviation of the additive range-difference noise, in meters.
    pub noise_std_dev: f64,
    /// The anchor every difference is taken against.
    pub reference_anchor: AnchorIndex,
    /// Neighbor anchors, visited round-robin.
    pub neighbor_anchors: Vec<AnchorIndex>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            rate_hz: 50.0,
            jitter: 0.2,
            noise_std_dev: 0.05,
            reference_anchor: 0,
            neighbor_anchors: vec![1, 2, 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrajectoryConfig {
    /// Ground-truth waypoints, in the anchor frame.
    pub waypoints: Vec<[f64; 3]>,
    /// Constant ground speed along the path, in m/s.
    pub speed: f64,
    /// Return to the first waypoint after the last one.
    pub looped: bool,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            waypoints: vec![
                [1.5, 1.5, 1.3],
                [3.0, 1.5, 1.3],
                [3.0, 3.2, 1.3],
                [1.5, 3.2, 1.3],
            ],
            speed: 0.3,
            looped: true,
        }
    }
}

// =========================================================================
// == Loading ==
// =========================================================================

/// Layers the built-in defaults, an optional TOML file and `TDOA_` environment
/// overrides, in that order.
pub fn scenario_figment(path: Option<&Path>) -> Result<Figment, SimError> {
    let mut figment = Figment::from(Serialized::defaults(ScenarioConfig::default()));
    if let Some(path) = path {
        if !path.exists() {
            return Err(SimError::ScenarioNotFound(path.to_path_buf()));
        }
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Loads and validates a scenario.
pub fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig, SimError> {
    ScenarioConfig::from_figment(&scenario_figment(path)?)
}

impl ScenarioConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, SimError> {
        let config: ScenarioConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section, including that the sensor only references
    /// anchors the filter knows about.
    pub fn validate(&self) -> Result<(), SimError> {
        self.filter.validate()?;

        let sim = &self.simulation;
        if !(sim.duration_seconds.is_finite() && sim.duration_seconds > 0.0) {
            return Err(invalid("simulation.duration_seconds must be positive"));
        }
        if !(sim.predict_rate_hz.is_finite() && sim.predict_rate_hz > 0.0) {
            return Err(invalid("simulation.predict_rate_hz must be positive"));
        }
        if sim.queue_capacity == 0 {
            return Err(invalid("simulation.queue_capacity must be at least 1"));
        }

        let sensor = &self.sensor;
        if !(sensor.rate_hz.is_finite() && sensor.rate_hz > 0.0) {
            return Err(invalid("sensor.rate_hz must be positive"));
        }
        if !(0.0..1.0).contains(&sensor.jitter) {
            return Err(invalid("sensor.jitter must be in [0, 1)"));
        }
        if !(sensor.noise_std_dev.is_finite() && sensor.noise_std_dev >= 0.0) {
            return Err(invalid("sensor.noise_std_dev must be non-negative"));
        }
        if sensor.neighbor_anchors.is_empty() {
            return Err(invalid("sensor.neighbor_anchors must not be empty"));
        }
        if sensor.neighbor_anchors.contains(&sensor.reference_anchor) {
            return Err(invalid(
                "sensor.reference_anchor must not be one of its neighbors",
            ));
        }
        let configured = self.filter.anchors.iter().map(|a| a.index);
        let mut registry = AnchorRegistry::new(self.filter.max_anchors);
        for index in configured {
            registry.set_anchor_position(index, nalgebra::Point3::origin())?;
        }
        for &index in std::iter::once(&sensor.reference_anchor).chain(&sensor.neighbor_anchors) {
            registry.require(index)?;
        }

        let trajectory = &self.trajectory;
        if trajectory.waypoints.is_empty() {
            return Err(invalid("trajectory.waypoints must not be empty"));
        }
        if trajectory
            .waypoints
            .iter()
            .flatten()
            .any(|v| !v.is_finite())
        {
            return Err(invalid("trajectory.waypoints must be finite"));
        }
        if !(trajectory.speed.is_finite() && trajectory.speed >= 0.0) {
            return Err(invalid("trajectory.speed must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SimError {
    SimError::InvalidScenario(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdoa_core::error::FilterError;
    use tdoa_core::prelude::PredictMode;

    fn from_toml(toml: &str) -> Result<ScenarioConfig, SimError> {
        let figment =
            Figment::from(Serialized::defaults(ScenarioConfig::default())).merge(Toml::string(toml));
        ScenarioConfig::from_figment(&figment)
    }

    #[test]
    fn empty_document_yields_the_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config, ScenarioConfig::default());
        assert_eq!(config.filter.anchors.len(), 4);
        assert_eq!(config.filter.process_noise, 1e-3);
    }

    #[test]
    fn sections_override_defaults() {
        let config = from_toml(
            r#"
            [simulation]
            seed = 42
            duration_seconds = 5.0

            [sensor]
            noise_std_dev = 0.0
            neighbor_anchors = [1, 3]

            [trajectory]
            waypoints = [[2.0, 2.5, 1.3]]

            [filter]
            measurement_std_dev = 0.2
            predict_mode = "covariance_and_mean"
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.duration_seconds, 5.0);
        assert_eq!(config.simulation.predict_rate_hz, 62.5);
        assert_eq!(config.sensor.neighbor_anchors, vec![1, 3]);
        assert_eq!(config.trajectory.waypoints, vec![[2.0, 2.5, 1.3]]);
        assert_eq!(config.filter.measurement_std_dev, 0.2);
        assert_eq!(config.filter.predict_mode, PredictMode::CovarianceAndMean);
        // Untouched filter fields keep their defaults.
        assert_eq!(config.filter.time_step, 0.016);
    }

    #[test]
    fn custom_anchor_table_replaces_the_factory_one() {
        let config = from_toml(
            r#"
            [sensor]
            reference_anchor = 4
            neighbor_anchors = [5]

            [filter]
            anchors = [
                { index = 4, position = [0.0, 0.0, 1.0] },
                { index = 5, position = [5.0, 0.0, 1.0] },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.anchors.len(), 2);
        assert_eq!(config.filter.anchors[1].position, [5.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            from_toml("[simulation]\nwarp_factor = 9\n"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn sensor_must_reference_configured_anchors() {
        let err = from_toml("[sensor]\nneighbor_anchors = [1, 6]\n").unwrap_err();
        assert!(matches!(
            err,
            SimError::Filter(FilterError::UnconfiguredAnchor { index: 6 })
        ));

        let err = from_toml("[sensor]\nreference_anchor = 1\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidScenario(_)));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(from_toml("[simulation]\nduration_seconds = 0.0\n").is_err());
        assert!(from_toml("[sensor]\njitter = 1.5\n").is_err());
        assert!(from_toml("[trajectory]\nwaypoints = []\n").is_err());
        assert!(matches!(
            from_toml("[filter]\nmeasurement_std_dev = -1.0\n"),
            Err(SimError::Filter(FilterError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn missing_scenario_file_is_reported() {
        let err = load_scenario(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, SimError::ScenarioNotFound(_)));
    }

    #[test]
    fn environment_overrides_defaults_and_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TDOA_SIMULATION__SEED", 99);
            let config = load_scenario(None).map_err(|e| e.to_string())?;
            assert_eq!(config.simulation.seed, Some(99));

            jail.create_file(
                "scenario.toml",
                "[simulation]\nseed = 3\n\n[sensor]\nnoise_std_dev = 0.2\n",
            )?;
            jail.set_env("TDOA_SENSOR__NOISE_STD_DEV", 0.01);
            let config =
                load_scenario(Some(Path::new("scenario.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.simulation.seed, Some(99));
            assert_eq!(config.sensor.noise_std_dev, 0.01);

            jail.set_env("TDOA_SENSOR__JITTER", 4.0);
            assert!(matches!(
                load_scenario(None),
                Err(SimError::InvalidScenario(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn bundled_scenario_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/scenarios/lab_square.toml");
        let figment = Figment::from(Serialized::defaults(ScenarioConfig::default()))
            .merge(Toml::file(&path));
        let config = ScenarioConfig::from_figment(&figment).unwrap();
        assert_eq!(config.simulation.seed, Some(2017));
        assert_eq!(config.trajectory.waypoints.len(), 4);
    }
}
