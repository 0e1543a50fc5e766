//! Host-environment queries made once per pass.

use rv_core::{GeoPoint, RoverId};

/// What the simulator needs to know about the world outside the fleet.
pub trait Environment {
    /// Angle between the local vertical at `position` and the sun, degrees.
    fn sun_angle_deg(&self, rover: RoverId, position: GeoPoint) -> f64;

    /// Position of the vehicle the player is watching, if it is on the same
    /// body as the fleet.
    fn observed_position(&self) -> Option<GeoPoint> {
        None
    }

    /// The rover under direct control, if any.
    fn controlled(&self) -> Option<RoverId> {
        None
    }
}

/// Sun overhead everywhere, nothing observed, nothing controlled.
pub struct AlwaysDay;

impl Environment for AlwaysDay {
    fn sun_angle_deg(&self, _rover: RoverId, _position: GeoPoint) -> f64 {
        0.0
    }
}
