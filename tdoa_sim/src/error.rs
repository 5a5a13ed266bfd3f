use std::path::PathBuf;

use tdoa_core::error::FilterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file not found: {}", .0.display())]
    ScenarioNotFound(PathBuf),

    #[error("failed to load scenario: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid sensor noise: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("{0} thread failed")]
    Worker(&'static str),
}
