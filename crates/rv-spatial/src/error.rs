//! Spatial-subsystem error types.

use thiserror::Error;

use rv_core::GeoPoint;

/// Errors produced by route planning.
///
/// Both variants are ordinary outcomes on rough terrain; callers record them
/// as "not plannable" (`distance_to_target == 0`), never as arrival.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: GeoPoint, to: GeoPoint },

    #[error("search gave up after {expansions} expansions")]
    SearchBudgetExhausted { expansions: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors produced while decoding a route token.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decompression error: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    #[error("route token is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unrecognised route token format")]
    UnknownFormat,

    #[error("malformed waypoint {0:?}")]
    Waypoint(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
