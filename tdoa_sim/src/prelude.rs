// tdoa_sim/src/prelude.rs

// Re-export the tdoa_core prelude so filter types are one import away.
pub use tdoa_core::prelude::*;

// Common simulation-specific types.
pub use crate::error::SimError;
pub use crate::logging::{init_logging, LogLevel};
pub use crate::simulation::core::config::{
    load_scenario, ScenarioConfig, SensorConfig, Simulation, TrajectoryConfig,
};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::core::runner::{run_scenario, RunReport};
pub use crate::simulation::sensors::tdoa::TdoaSensor;
pub use crate::simulation::trajectory::WaypointTrajectory;
