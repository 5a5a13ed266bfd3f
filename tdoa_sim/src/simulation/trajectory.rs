// tdoa_sim/src/simulation/trajectory.rs

use nalgebra::Point3;

use tdoa_core::types::Position;

use crate::simulation::core::config::TrajectoryConfig;

/// Ground-truth motion of the simulated agent: piecewise-linear travel through
/// waypoints at a constant speed.
#[derive(Debug, Clone)]
pub struct WaypointTrajectory {
    waypoints: Vec<Position>,
    speed: f64,
    looped: bool,
    /// Length of segment `i` (from waypoint `i` to the next one).
    segment_lengths: Vec<f64>,
    total_length: f64,
}

impl WaypointTrajectory {
    /// # Panics
    /// If `waypoints` is empty. `ScenarioConfig::validate` rules that out.
    pub fn new(waypoints: Vec<Position>, speed: f64, looped: bool) -> Self {
        assert!(!waypoints.is_empty(), "trajectory needs at least one waypoint");

        let n = waypoints.len();
        let segment_count = if looped && n > 1 { n } else { n - 1 };
        let segment_lengths: Vec<f64> = (0..segment_count)
            .map(|i| (waypoints[(i + 1) % n] - waypoints[i]).norm())
            .collect();
        let total_length = segment_lengths.iter().sum();

        Self {
            waypoints,
            speed,
            looped,
            segment_lengths,
            total_length,
        }
    }

    pub fn from_config(config: &TrajectoryConfig) -> Self {
        let waypoints = config
            .waypoints
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        Self::new(waypoints, config.speed, config.looped)
    }

    /// True position at time `t` (seconds since the run started).
    pub fn position_at(&self, t: f64) -> Position {
        let n = self.waypoints.len();
        if self.total_length <= 0.0 || self.speed <= 0.0 || t <= 0.0 {
            return self.waypoints[0];
        }

        let travelled = self.speed * t;
        let mut s = if self.looped {
            travelled % self.total_length
        } else if travelled >= self.total_length {
            return self.waypoints[n - 1];
        } else {
            travelled
        };

        for (i, &length) in self.segment_lengths.iter().enumerate() {
            if s <= length {
                if length == 0.0 {
                    return self.waypoints[i];
                }
                let start = self.waypoints[i];
                let end = self.waypoints[(i + 1) % n];
                return start + (end - start) * (s / length);
            }
            s -= length;
        }
        // Only reachable through rounding at the very end of the path.
        self.waypoints[if self.looped { 0 } else { n - 1 }]
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }
}
