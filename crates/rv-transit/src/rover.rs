//! The rover record the transit engine reads and writes.

use rv_core::{GeoPoint, UniversalTime};
use rv_spatial::codec;

use crate::{RoverStatus, TransitState};

/// One rover's persisted fields plus a decoded-route cache.
///
/// The route is stored as an opaque token (see [`rv_spatial::codec`]) and
/// decoded on first use.  Replace it only through [`Rover::set_route_token`]
/// or [`Rover::clear_route`] so the cache stays coherent.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rover {
    pub name:       String,
    pub position:   GeoPoint,
    pub altitude_m: f64,
    /// Where the current route starts.
    pub departure:  GeoPoint,
    pub target:     Option<GeoPoint>,
    pub crewed:     bool,
    pub active:     bool,
    pub transit:    TransitState,
    route_token:    String,
    #[cfg_attr(feature = "serde", serde(skip))]
    route_cache:    Option<Vec<GeoPoint>>,
}

impl Rover {
    /// An idle rover at `position` with no target.
    pub fn new(name: impl Into<String>, position: GeoPoint, crewed: bool) -> Self {
        Self {
            name: name.into(),
            position,
            altitude_m: 0.0,
            departure: position,
            target: None,
            crewed,
            active: false,
            transit: TransitState::default(),
            route_token: String::new(),
            route_cache: None,
        }
    }

    #[inline]
    pub fn status(&self) -> RoverStatus {
        self.transit.status
    }

    /// The persisted route token.
    #[inline]
    pub fn route_token(&self) -> &str {
        &self.route_token
    }

    pub fn set_route_token(&mut self, token: String) {
        self.route_token = token;
        self.route_cache = None;
    }

    pub fn clear_route(&mut self) {
        self.route_token.clear();
        self.route_cache = Some(Vec::new());
    }

    /// Decoded route waypoints, start first.  An undecodable token yields an
    /// empty route (the rover then drives the direct great circle).
    pub fn route(&mut self) -> &[GeoPoint] {
        let token = &self.route_token;
        self.route_cache.get_or_insert_with(|| codec::decode_or_empty(token))
    }

    /// Seconds since the rover's state was last stamped.
    #[inline]
    pub fn idle_for(&self, now: UniversalTime) -> f64 {
        now.since(self.transit.last_update)
    }
}
