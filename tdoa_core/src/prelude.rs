// tdoa_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::{StateEstimator, UpdateReport};
pub use crate::messages::{FilterInput, TdoaSample};
pub use crate::models::measurement::ScalarMeasurement;
pub use crate::types::{AnchorIndex, Position};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::anchors::AnchorRegistry;
pub use crate::config::{AnchorConfig, EkfConfig};
pub use crate::error::FilterError;
pub use crate::state::{FilterState, StateVariable};

// --- Estimation Algorithms ---
pub use crate::estimation::ekf::PredictMode;
pub use crate::estimation::filters::{FilterStats, TdoaEkf};
pub use crate::models::measurement::tdoa::TdoaMeasurementModel;
