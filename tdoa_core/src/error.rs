// tdoa_core/src/error.rs

use thiserror::Error;

/// Every way a filter call can be refused.
///
/// All variants are recoverable: a call that returns one of these has left the
/// filter exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("{what} must be {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("anchor index {index} is out of range (capacity {capacity})")]
    AnchorIndexOutOfRange { index: usize, capacity: usize },

    #[error("anchor {index} has no configured position")]
    UnconfiguredAnchor { index: usize },

    #[error("reference and neighbor anchor are both {index}")]
    SameAnchor { index: usize },

    #[error("estimated position coincides with anchor {anchor}")]
    DegenerateGeometry { anchor: usize },

    #[error("measurement {value} is not finite")]
    NonFiniteMeasurement { value: f64 },

    #[error("innovation variance {variance} is not positive and finite")]
    SingularInnovation { variance: f64 },

    #[error("update produced a non-finite state or covariance")]
    NonFiniteResult,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FilterError {
    /// A short, stable name for the failure kind. Used as a counter key by hosts.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::DimensionMismatch { .. } => "dimension_mismatch",
            FilterError::AnchorIndexOutOfRange { .. } => "anchor_index_out_of_range",
            FilterError::UnconfiguredAnchor { .. } => "unconfigured_anchor",
            FilterError::SameAnchor { .. } => "same_anchor",
            FilterError::DegenerateGeometry { .. } => "degenerate_geometry",
            FilterError::NonFiniteMeasurement { .. } => "non_finite_measurement",
            FilterError::SingularInnovation { .. } => "singular_innovation",
            FilterError::NonFiniteResult => "non_finite_result",
            FilterError::InvalidConfig(_) => "invalid_config",
        }
    }

    /// True for errors raised while fusing a measurement, as opposed to
    /// errors raised by a configuration setter.
    pub fn is_measurement_rejection(&self) -> bool {
        matches!(
            self,
            FilterError::UnconfiguredAnchor { .. }
                | FilterError::SameAnchor { .. }
                | FilterError::DegenerateGeometry { .. }
                | FilterError::NonFiniteMeasurement { .. }
                | FilterError::SingularInnovation { .. }
                | FilterError::NonFiniteResult
        )
    }
}
