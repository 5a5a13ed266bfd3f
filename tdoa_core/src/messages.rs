// tdoa_core/src/messages.rs

use serde::{Deserialize, Serialize};

use crate::types::AnchorIndex;

// =========================================================================
// == Core Message and Data Types ==
// =========================================================================

/// One range-difference sample as delivered by the ranging transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdoaSample {
    /// Index of the reference anchor `Ar`.
    pub reference: AnchorIndex,
    /// Index of the neighbor anchor `An`.
    pub neighbor: AnchorIndex,
    /// `‖p − An‖ − ‖p − Ar‖`, in meters.
    pub range_difference: f64,
    /// Time the sample was taken, in seconds.
    pub timestamp: f64,
}

/// The universal input packet for all `StateEstimator` implementations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterInput {
    /// The predict scheduler ticked.
    TimeStep { current_time: f64 },
    /// A ranging sample arrived.
    Measurement(TdoaSample),
}

impl FilterInput {
    pub fn timestamp(&self) -> f64 {
        match self {
            FilterInput::TimeStep { current_time } => *current_time,
            FilterInput::Measurement(sample) => sample.timestamp,
        }
    }
}
