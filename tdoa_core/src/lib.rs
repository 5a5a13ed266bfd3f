// tdoa_core/src/lib.rs

//! 3D position estimation of a mobile agent from Time-Difference-of-Arrival
//! range differences against fixed anchors, using an Extended Kalman Filter.
//!
//! The crate is pure computation: no I/O, no threads, no global state. A host
//! owns a [`TdoaEkf`](estimation::filters::TdoaEkf), calls `predict` on a fixed
//! cadence and `update` whenever a range-difference sample arrives.

pub mod anchors;
pub mod config;
pub mod error;
pub mod estimation;
pub mod messages;
pub mod models;
pub mod prelude;
pub mod state;
pub mod types;
