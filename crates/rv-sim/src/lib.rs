//! `rv-sim` — fleet pass orchestrator for rover transit.
//!
//! # Fleet pass
//!
//! ```text
//! update(wall_secs, now):
//!   ① Gate    — PassClock fires at most once per `pass_interval_secs`.
//!   ② Sample  — observed position and controlled rover from the Environment.
//!   ③ Tick    — for each rover in ascending RoverId order:
//!                 sun angle from the Environment → TransitEngine::tick
//!   ④ Report  — arrivals collected into a PassReport; a time-warp stop is
//!                 requested if `stop_on_arrival` is set.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rv_core::{GeoPoint, SimConfig, SphereBody, UniversalTime};
//! use rv_sim::{AlwaysDay, NoopObserver, Sim};
//! use rv_spatial::AStarRouter;
//! use rv_transit::{Capability, Rover};
//!
//! let config = SimConfig::default();
//! let router = AStarRouter::from_config(&config);
//! let mut sim = Sim::new(config, SphereBody::new(600_000.0), router)?;
//! let id = sim.add_rover(Rover::new("Rover", GeoPoint::new(0.0, 0.0), true));
//! sim.plan(id, GeoPoint::new(0.1, 0.1))?;
//! let capability = Capability { day_speed: 5.0, night_speed: 0.0, solar_dependent: true };
//! sim.activate(id, capability, UniversalTime::ZERO)?;
//! sim.run_pass(UniversalTime(3_600.0), &AlwaysDay, &mut NoopObserver);
//! ```

pub mod environment;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use environment::{AlwaysDay, Environment};
pub use error::{SimError, SimResult};
pub use observer::{ArrivalLog, NoopObserver, SimObserver};
pub use sim::{PassReport, Sim};
