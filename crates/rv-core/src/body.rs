//! Terrain provider for the body a rover drives on.
//!
//! The transit core treats terrain as an external, authoritative, synchronous
//! collaborator.  [`Body`] is the seam: applications wrap their own height
//! source in it; tests and demos use [`TerrainBody`] with a closure.

use crate::GeoPoint;

/// A spherical body with an optional terrain model.
///
/// Implementations must be `Send + Sync` so a single body can be shared by
/// the planner and the per-tick simulator.
pub trait Body: Send + Sync {
    /// Mean radius in metres.
    fn radius_m(&self) -> f64;

    /// `true` if surface below 0 m elevation is submerged.
    fn has_ocean(&self) -> bool {
        false
    }

    /// Surface elevation above the datum at `point`, in metres.
    ///
    /// `None` means the body has no terrain model at all (a gas giant or a
    /// star); callers go through [`terrain_height`], which maps that to 0.
    fn elevation_m(&self, _point: GeoPoint) -> Option<f64> {
        None
    }
}

/// Sample the body's terrain at `point`.  Returns `0.0` when the body has no
/// terrain model.
#[inline]
pub fn terrain_height(point: GeoPoint, body: &dyn Body) -> f64 {
    body.elevation_m(point).unwrap_or(0.0)
}

// ── SphereBody ────────────────────────────────────────────────────────────────

/// A featureless sphere: no terrain model, no ocean.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereBody {
    pub radius_m: f64,
}

impl SphereBody {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }
}

impl Body for SphereBody {
    fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

// ── TerrainBody ───────────────────────────────────────────────────────────────

/// A sphere whose elevation comes from a height function.
///
/// ```rust,ignore
/// // 600 km moon with a 300 m ridge along the equator.
/// let body = TerrainBody::new(600_000.0, |p| if p.lat.abs() < 0.01 { 300.0 } else { 0.0 });
/// ```
pub struct TerrainBody<F> {
    radius_m: f64,
    ocean:    bool,
    height:   F,
}

impl<F> TerrainBody<F>
where
    F: Fn(GeoPoint) -> f64 + Send + Sync,
{
    pub fn new(radius_m: f64, height: F) -> Self {
        Self { radius_m, ocean: false, height }
    }

    /// Treat elevations below 0 m as open water.
    pub fn with_ocean(mut self) -> Self {
        self.ocean = true;
        self
    }
}

impl<F> Body for TerrainBody<F>
where
    F: Fn(GeoPoint) -> f64 + Send + Sync,
{
    fn radius_m(&self) -> f64 {
        self.radius_m
    }

    fn has_ocean(&self) -> bool {
        self.ocean
    }

    fn elevation_m(&self, point: GeoPoint) -> Option<f64> {
        Some((self.height)(point))
    }
}
