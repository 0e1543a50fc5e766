//! `rv-transit` — per-rover transit state, speed model, and the time-stepped
//! transit engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `TransitState`, `RoverStatus`, `Capability`                     |
//! | [`rover`]   | `Rover`: persisted fields plus the decoded-route cache          |
//! | [`light`]   | Sun-angle multipliers and the effective speed for a tick        |
//! | [`engine`]  | `TransitEngine`: plan, activate, deactivate, tick               |
//! | [`error`]   | `TransitError`, `TransitResult<T>`                              |
//!
//! # Movement model (dead reckoning along the route)
//!
//! 1. `TransitEngine::plan` runs a [`Router`][rv_spatial::Router], stores the
//!    encoded route on the rover and sets `distance_to_target_m`.
//! 2. `TransitEngine::activate` stores speeds and stamps the clock.
//! 3. Each `TransitEngine::tick(now)` accrues `speed × (now − last_update)`
//!    and places the rover that far along its route.  Reaching the target
//!    snaps the rover onto it and deactivates it.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                         |
//! |---------|----------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Rover` and its state.    |

pub mod engine;
pub mod error;
pub mod light;
pub mod rover;
pub mod state;


pub use engine::{TickInput, TickOutcome, TransitEngine};
pub use error::{TransitError, TransitResult};
pub use light::{effective_speed, light_multiplier};
pub use rover::Rover;
pub use state::{Capability, RoverStatus, TransitState};
