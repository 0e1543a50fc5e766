//! Sun-angle speed model.
//!
//! The sun angle is the angle between the local vertical and the direction of
//! the sun: 0° is the sun overhead, above 90° the sun is below the horizon.

use crate::TransitState;

/// Above this angle the sun has set.
pub const HORIZON_DEG: f64 = 90.0;

/// Crewed-rover speed multiplier for a sun angle.
///
/// | Sun angle       | Multiplier |
/// |-----------------|------------|
/// | `<= 80°`        | 1.0        |
/// | `(80°, 85°]`    | 0.75       |
/// | `(85°, 90°]`    | 0.5        |
/// | `> 90°`         | 0.25       |
pub fn light_multiplier(sun_angle_deg: f64) -> f64 {
    match sun_angle_deg {
        a if a <= 80.0        => 1.0,
        a if a <= 85.0        => 0.75,
        a if a <= HORIZON_DEG => 0.5,
        _                     => 0.25,
    }
}

#[inline]
pub fn is_dark(sun_angle_deg: f64) -> bool {
    sun_angle_deg > HORIZON_DEG
}

/// Speed in m/s for this tick, or `None` if the rover cannot move until the
/// sun rises.
///
/// Solar-dependent rovers fall back to their night speed after sunset.  Only
/// crewed rovers are slowed by poor light; the uncrewed penalty is folded into
/// the stored speeds at activation.
pub fn effective_speed(transit: &TransitState, sun_angle_deg: f64, crewed: bool) -> Option<f64> {
    let base = if transit.solar_dependent && is_dark(sun_angle_deg) {
        transit.night_speed
    } else {
        transit.day_speed
    };
    if base <= 0.0 {
        return None;
    }
    let factor = if crewed { light_multiplier(sun_angle_deg) } else { 1.0 };
    Some(base * factor)
}
