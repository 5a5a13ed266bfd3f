// tdoa_core/src/state/layout.rs
use crate::state::StateVariable;

/// The dimension of the constant-velocity state vector.
pub const STATE_DIM: usize = 6;

// Fixed slots of the constant-velocity layout.
pub const STATE_X: usize = 0;
pub const STATE_Y: usize = 1;
pub const STATE_Z: usize = 2;
pub const STATE_VX: usize = 3;
pub const STATE_VY: usize = 4;
pub const STATE_VZ: usize = 5;

/// Returns the 6-dimensional layout used by the TDOA filter.
///
/// The state is composed of:
/// - Position (3) in the anchor frame
/// - Velocity (3) in the anchor frame
pub fn constant_velocity_layout() -> Vec<StateVariable> {
    vec![
        // --- Position --- indices 0-2
        StateVariable::Px,
        StateVariable::Py,
        StateVariable::Pz,
        // --- Velocity --- indices 3-5
        StateVariable::Vx,
        StateVariable::Vy,
        StateVariable::Vz,
    ]
}
