// tdoa_core/src/estimation/filters/mod.rs

mod tdoa_ekf;

pub use tdoa_ekf::{FilterStats, TdoaEkf};
