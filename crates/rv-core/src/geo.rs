//! Geographic coordinate type and great-circle geodesy.
//!
//! `GeoPoint` uses `f64` latitude/longitude in degrees.  Distances are
//! always computed against an explicit body radius: the same code serves a
//! 200 km moon and a 6000 km planet.
//!
//! All functions are total.  Degenerate inputs (coincident or antipodal
//! points) return a defined value instead of NaN:
//!
//! | Input                      | Result                          |
//! |----------------------------|---------------------------------|
//! | `distance_m(a, a)`         | `0.0`                           |
//! | `initial_bearing(a, a)`    | `0.0` (bearing is undefined)    |
//! | `destination(a, θ, 0)`     | `a`                             |

use std::fmt;

/// Points closer than this (metres) are treated as coincident by the bearing
/// functions.
const COINCIDENT_M: f64 = 1e-9;

/// A latitude/longitude pair in degrees on a spherical body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both coordinates are finite and latitude is within ±90°.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.lat.abs() <= 90.0
    }

    /// Longitude wrapped into `[-180, 180)`; latitude untouched.
    pub fn normalized(self) -> Self {
        Self { lat: self.lat, lon: wrap_longitude(self.lon) }
    }

    /// Haversine great-circle distance in metres on a sphere of `radius_m`.
    pub fn distance_m(self, other: GeoPoint, radius_m: f64) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
        // Rounding can push `a` a hair outside [0, 1] near antipodes.
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        radius_m * c
    }

    /// Forward azimuth from `self` to `other`, degrees in `[0, 360)`.
    ///
    /// Coincident points have no defined bearing; `0.0` is returned.
    pub fn initial_bearing(self, other: GeoPoint) -> f64 {
        if self.distance_m(other, 1.0) < COINCIDENT_M {
            return 0.0;
        }
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        normalize_bearing(y.atan2(x).to_degrees())
    }

    /// Azimuth on arrival at `other` when travelling from `self` along the
    /// great circle: `(initial_bearing(other, self) + 180) mod 360`.
    pub fn final_bearing(self, other: GeoPoint) -> f64 {
        if self.distance_m(other, 1.0) < COINCIDENT_M {
            return 0.0;
        }
        normalize_bearing(other.initial_bearing(self) + 180.0)
    }

    /// Project the point reached after travelling `distance_m` along
    /// `bearing_deg` from `self` ("reverse haversine").
    pub fn destination(self, bearing_deg: f64, distance_m: f64, radius_m: f64) -> GeoPoint {
        if distance_m == 0.0 || radius_m <= 0.0 {
            return self;
        }
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let theta = bearing_deg.to_radians();
        let delta = distance_m / radius_m;

        let sin_lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos())
            .clamp(-1.0, 1.0);
        let lat2 = sin_lat2.asin();
        let lon2 = lon1
            + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

        GeoPoint::new(lat2.to_degrees(), wrap_longitude(lon2.to_degrees()))
    }

    /// The point `margin_m` short of `other` on the great circle from `self`.
    ///
    /// Used to keep a destination clear of another vehicle's footprint.  If
    /// `other` is within `margin_m` of `self`, `self` is returned.
    pub fn step_back(self, other: GeoPoint, radius_m: f64, margin_m: f64) -> GeoPoint {
        let span = self.distance_m(other, radius_m);
        if span <= margin_m {
            return self;
        }
        self.destination(self.initial_bearing(other), span - margin_m, radius_m)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Wrap any bearing into `[0, 360)`.
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if b >= 360.0 { 0.0 } else { b }
}

/// Wrap a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_longitude(deg: f64) -> f64 {
    let l = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if l >= 180.0 { -180.0 } else { l }
}
