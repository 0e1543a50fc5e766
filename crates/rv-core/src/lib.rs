//! `rv-core` — foundational types for the rover transit workspace.
//!
//! This crate is a dependency of every other `rv-*` crate.  It has no `rv-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, haversine distance, bearings, projection    |
//! | [`body`]        | `Body` terrain provider, `SphereBody`, `TerrainBody`    |
//! | [`ids`]         | `RoverId`, `HexId`                                      |
//! | [`time`]        | `UniversalTime`, `PassClock`, `SimConfig`               |
//! | [`error`]       | `RvError`, `RvResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod body;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use body::{terrain_height, Body, SphereBody, TerrainBody};
pub use error::{RvError, RvResult};
pub use geo::GeoPoint;
pub use ids::{HexId, RoverId};
pub use time::{PassClock, SimConfig, UniversalTime};
