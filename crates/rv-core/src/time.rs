//! Simulation time and configuration.
//!
//! # Design
//!
//! Two clocks are involved and they must not be confused:
//!
//! - **Universal time** ([`UniversalTime`]) is the game/world clock in
//!   seconds.  Under time warp it can advance by hours per real second.
//!   Rover distance accrues against it.
//! - **Wall time** drives the fleet pass cadence.  [`PassClock`] throttles
//!   passes to one per `pass_interval_secs` of wall time regardless of how
//!   fast universal time runs.

use std::fmt;

use crate::{RvError, RvResult};

// ── UniversalTime ─────────────────────────────────────────────────────────────

/// Absolute world time in seconds.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniversalTime(pub f64);

impl UniversalTime {
    pub const ZERO: UniversalTime = UniversalTime(0.0);

    /// Seconds elapsed from `earlier` to `self`.  Never negative: a clock
    /// that runs backwards (save reload) yields zero elapsed time.
    #[inline]
    pub fn since(self, earlier: UniversalTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl std::ops::Add<f64> for UniversalTime {
    type Output = UniversalTime;
    #[inline]
    fn add(self, rhs: f64) -> UniversalTime {
        UniversalTime(self.0 + rhs)
    }
}

impl fmt::Display for UniversalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.max(0.0) as u64;
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        write!(f, "UT {days}d {hours:02}:{minutes:02}:{seconds:02}")
    }
}

// ── PassClock ─────────────────────────────────────────────────────────────────

/// Wall-clock throttle for the fleet pass.
#[derive(Clone, Debug)]
pub struct PassClock {
    interval_secs: f64,
    last_pass:     Option<f64>,
}

impl PassClock {
    pub fn new(interval_secs: f64) -> Self {
        Self { interval_secs, last_pass: None }
    }

    /// Returns `true` (and records the pass) if at least one interval has
    /// elapsed since the last recorded pass.  The first call always fires.
    pub fn try_fire(&mut self, wall_secs: f64) -> bool {
        match self.last_pass {
            Some(last) if wall_secs - last < self.interval_secs => false,
            _ => {
                self.last_pass = Some(wall_secs);
                true
            }
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Every tunable of planning and transit.
///
/// Typically loaded from a TOML file by the application crate and passed to
/// the simulation runner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Hex grid edge length in metres.  Also the A* cost per edge and the
    /// spacing of route waypoints.  Default: 1000.
    pub step_m: f64,

    /// A move that would land within this distance of the observed position
    /// is rejected for the tick.  Default: 2400.
    pub safety_radius_m: f64,

    /// Distance kept short of another rover when targeting it.  Default: 200.
    pub standoff_m: f64,

    /// Speed factor applied once, at activation, to uncrewed rovers.
    /// Default: 0.8.
    pub unmanned_speed_factor: f64,

    /// Minimum wall-clock seconds between fleet passes.  Default: 1.0.
    pub pass_interval_secs: f64,

    /// A* gives up and reports no path after this many node expansions.
    pub max_expansions: usize,

    /// Ask the host to stop time warp when any rover arrives.
    pub stop_on_arrival: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_m:                1_000.0,
            safety_radius_m:       2_400.0,
            standoff_m:            200.0,
            unmanned_speed_factor: 0.8,
            pass_interval_secs:    1.0,
            max_expansions:        250_000,
            stop_on_arrival:       false,
        }
    }
}

impl SimConfig {
    /// Reject values that would make planning or transit meaningless.
    pub fn validate(&self) -> RvResult<()> {
        fn positive(name: &str, v: f64) -> RvResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(RvError::Config(format!("{name} must be positive and finite, got {v}")))
            }
        }

        positive("step_m", self.step_m)?;
        positive("pass_interval_secs", self.pass_interval_secs)?;

        if !(self.safety_radius_m.is_finite() && self.safety_radius_m >= 0.0) {
            return Err(RvError::Config(format!(
                "safety_radius_m must be non-negative, got {}",
                self.safety_radius_m
            )));
        }
        if !(self.standoff_m.is_finite() && self.standoff_m >= 0.0) {
            return Err(RvError::Config(format!(
                "standoff_m must be non-negative, got {}",
                self.standoff_m
            )));
        }
        if !(self.unmanned_speed_factor > 0.0 && self.unmanned_speed_factor <= 1.0) {
            return Err(RvError::Config(format!(
                "unmanned_speed_factor must be in (0, 1], got {}",
                self.unmanned_speed_factor
            )));
        }
        if self.max_expansions == 0 {
            return Err(RvError::Config("max_expansions must be at least 1".into()));
        }
        Ok(())
    }

    /// Construct a `PassClock` pre-configured for this run.
    pub fn make_clock(&self) -> PassClock {
        PassClock::new(self.pass_interval_secs)
    }
}
