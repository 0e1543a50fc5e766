//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `RvError` as one variant
//! where they surface configuration problems.

use thiserror::Error;

use crate::{GeoPoint, RoverId};

/// The top-level error type for `rv-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RvError {
    #[error("rover {0} not found")]
    RoverNotFound(RoverId),

    #[error("invalid coordinate {0}")]
    InvalidCoordinate(GeoPoint),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `rv-*` crates.
pub type RvResult<T> = Result<T, RvError>;
