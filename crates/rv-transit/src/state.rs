//! Per-rover transit state.

use std::fmt;

use rv_core::UniversalTime;

/// What a rover did on its most recent tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoverStatus {
    /// Under direct control; the simulator leaves it alone.
    Current,
    /// Not travelling, or held in place this tick.
    #[default]
    Idle,
    Roving,
    /// Solar-dependent rover at night with no night-time capability.
    AwaitingLight,
    Arrived,
}

impl fmt::Display for RoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoverStatus::Current       => "current",
            RoverStatus::Idle          => "idle",
            RoverStatus::Roving        => "roving",
            RoverStatus::AwaitingLight => "awaiting sunlight",
            RoverStatus::Arrived       => "arrived",
        })
    }
}

/// Speeds derived by the (external) capability assessment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capability {
    /// Average cruising speed in daylight, m/s.
    pub day_speed:       f64,
    /// Average speed without sunlight, m/s.  Zero if the rover has no power
    /// source other than solar panels.
    pub night_speed:     f64,
    /// `true` if the rover depends on sunlight for power.
    pub solar_dependent: bool,
}

/// Travel progress for one rover.
///
/// Invariant while active: `0 <= distance_travelled_m <= distance_to_target_m`.
/// `distance_to_target_m == 0` means no route is planned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitState {
    pub distance_travelled_m: f64,
    pub distance_to_target_m: f64,
    pub last_update:          UniversalTime,
    pub day_speed:            f64,
    pub night_speed:          f64,
    pub solar_dependent:      bool,
    pub status:               RoverStatus,
}

impl Default for TransitState {
    fn default() -> Self {
        Self {
            distance_travelled_m: 0.0,
            distance_to_target_m: 0.0,
            last_update:          UniversalTime::ZERO,
            day_speed:            0.0,
            night_speed:          0.0,
            solar_dependent:      true,
            status:               RoverStatus::Idle,
        }
    }
}

impl TransitState {
    /// Distance still to cover, never negative.
    #[inline]
    pub fn remaining_m(&self) -> f64 {
        (self.distance_to_target_m - self.distance_travelled_m).max(0.0)
    }

    /// Fraction of the route covered, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` when no route is planned.
    pub fn progress(&self) -> f64 {
        if self.distance_to_target_m <= 0.0 {
            return 0.0;
        }
        (self.distance_travelled_m / self.distance_to_target_m).clamp(0.0, 1.0)
    }
}
