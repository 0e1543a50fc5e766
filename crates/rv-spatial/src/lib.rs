//! `rv-spatial` — hex grid, route planning, and route persistence.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`hex`]    | `HexGraph` (lazy arena + coordinate map), `GridCell`, `HexNode` |
//! | [`router`] | `Router` trait, `Route`, `PathFinder` (A*), `AStarRouter`     |
//! | [`codec`]  | `encode` / `decode` of route tokens, legacy format detection  |
//! | [`error`]  | `SpatialError`, `CodecError`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod codec;
pub mod error;
pub mod hex;
pub mod router;

#[cfg(test)]
mod tests;

pub use codec::{decode, decode_or_empty, encode, format_of, upgrade, TokenFormat};
pub use error::{CodecError, CodecResult, SpatialError, SpatialResult};
pub use hex::{GridCell, HexGraph, HexNode, Passability};
pub use router::{AStarRouter, PathFinder, Route, Router, SearchState};
