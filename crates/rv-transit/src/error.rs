use rv_core::RvError;
use rv_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("rover {0:?} is already active")]
    AlreadyActive(String),

    #[error("rover {0:?} has no planned route")]
    NoRoutePlanned(String),

    #[error("rover {0:?} has no usable speed")]
    NoSpeed(String),

    #[error("rover {0:?} is already at its target")]
    ZeroDistance(String),

    #[error(transparent)]
    Core(#[from] RvError),

    #[error("planning failed: {0}")]
    Planning(#[from] SpatialError),
}

pub type TransitResult<T> = Result<T, TransitError>;
