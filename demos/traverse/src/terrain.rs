//! Procedural terrain and a rotating sun.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use rv_core::{Body, GeoPoint, RoverId, TerrainBody, UniversalTime};
use rv_sim::Environment;

/// Features per unit of the sphere's radius.
const FREQUENCY: f64 = 24.0;

/// Share of `relief_m` added to every sample so most of the surface is dry.
const LAND_BIAS: f64 = 0.25;

/// A body of `radius_m` with fractal terrain and an ocean below 0 m.
///
/// Noise is sampled on the unit sphere, so the surface is seamless across
/// the antimeridian and the poles.
pub fn fractal_body(seed: u32, radius_m: f64, relief_m: f64) -> impl Body {
    let fbm: Fbm<Perlin> = Fbm::new(seed).set_octaves(6);
    TerrainBody::new(radius_m, move |p: GeoPoint| {
        let (lat, lon) = (p.lat.to_radians(), p.lon.to_radians());
        let xyz = [
            lat.cos() * lon.cos() * FREQUENCY,
            lat.cos() * lon.sin() * FREQUENCY,
            lat.sin() * FREQUENCY,
        ];
        (fbm.get(xyz) + LAND_BIAS) * relief_m
    })
    .with_ocean()
}

/// Sun fixed over the equator, sweeping west once per `day_length_secs`.
pub struct Sun {
    pub day_length_secs: f64,
    pub now:             UniversalTime,
}

impl Sun {
    fn subsolar(&self) -> GeoPoint {
        let turns = (self.now.0 / self.day_length_secs).fract();
        GeoPoint::new(0.0, -360.0 * turns).normalized()
    }
}

impl Environment for Sun {
    fn sun_angle_deg(&self, _rover: RoverId, position: GeoPoint) -> f64 {
        // Central angle on the unit sphere.
        position.distance_m(self.subsolar(), 1.0).to_degrees()
    }
}
