//! Transit engine: plans routes, activates rovers, and advances them along
//! their routes in discrete, time-stepped ticks.

use tracing::{debug, info, trace, warn};

use rv_core::{terrain_height, Body, GeoPoint, RvError, SimConfig, UniversalTime};
use rv_spatial::{codec, Router};

use crate::light::effective_speed;
use crate::{Capability, Rover, RoverStatus, TransitError, TransitResult};

/// Per-tick inputs supplied by the host environment.
#[derive(Copy, Clone, Debug)]
pub struct TickInput {
    pub now:           UniversalTime,
    /// Sun angle at the rover, degrees from the local vertical.
    pub sun_angle_deg: f64,
    /// Position of the vehicle the player is watching, if it shares the
    /// rover's body.
    pub observed:      Option<GeoPoint>,
    /// `true` if this rover is the vehicle under direct control.
    pub controlled:    bool,
}

/// What a single [`TransitEngine::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do: inactive, under direct control, or no time elapsed.
    Skipped,
    /// Dark and no night capability; the clock was stamped, no distance accrued.
    AwaitingLight,
    /// The rover moved `delta_m` along its route.
    Moved { delta_m: f64 },
    /// The move would have come within the safety radius of the observed
    /// vehicle and was rejected.
    Held,
    /// The rover reached its target this tick.
    Arrived { at: GeoPoint },
}

/// Stateless driver for rover transit.  All per-rover state lives in
/// [`Rover`]; the engine only carries configuration.
#[derive(Clone, Debug, Default)]
pub struct TransitEngine {
    pub config: SimConfig,
}

impl TransitEngine {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    // ── Planning ──────────────────────────────────────────────────────────────

    /// Plan a route from the rover's position to `target` and store it on the
    /// rover.
    ///
    /// On success the route token and `distance_to_target_m` are set and the
    /// distance is returned.  On a planning failure the rover is left with no
    /// route (`distance_to_target_m == 0`, empty token) and the error is
    /// returned.
    pub fn plan<R: Router + ?Sized>(
        &self,
        rover:  &mut Rover,
        target: GeoPoint,
        body:   &dyn Body,
        router: &R,
    ) -> TransitResult<f64> {
        if rover.active {
            return Err(TransitError::AlreadyActive(rover.name.clone()));
        }
        if !target.is_valid() {
            return Err(RvError::InvalidCoordinate(target).into());
        }
        if rover.position.distance_m(target, body.radius_m()) <= 0.0 {
            return Err(TransitError::ZeroDistance(rover.name.clone()));
        }

        rover.target    = Some(target);
        rover.departure = rover.position;
        rover.transit.distance_travelled_m = 0.0;

        match router.route(body, rover.position, target) {
            Ok(route) => {
                rover.transit.distance_to_target_m = route.total_distance_m;
                rover.set_route_token(codec::encode(&route.waypoints));
                debug!(
                    rover     = %rover.name,
                    target    = %target,
                    waypoints = route.waypoints.len(),
                    distance  = route.total_distance_m,
                    "route planned"
                );
                Ok(route.total_distance_m)
            }
            Err(e) => {
                rover.transit.distance_to_target_m = 0.0;
                rover.clear_route();
                warn!(rover = %rover.name, target = %target, error = %e, "no route");
                Err(e.into())
            }
        }
    }

    /// Plan a route to a point `standoff_m` short of another vehicle at
    /// `other`, along the great circle from the rover.
    pub fn plan_to_vehicle<R: Router + ?Sized>(
        &self,
        rover:  &mut Rover,
        other:  GeoPoint,
        body:   &dyn Body,
        router: &R,
    ) -> TransitResult<f64> {
        let radius = body.radius_m();
        if rover.position.distance_m(other, radius) <= self.config.standoff_m {
            return Err(TransitError::ZeroDistance(rover.name.clone()));
        }
        let target = rover.position.step_back(other, radius, self.config.standoff_m);
        self.plan(rover, target, body, router)
    }

    // ── Activation ────────────────────────────────────────────────────────────

    /// Start a planned rover moving.
    ///
    /// Stores the capability speeds (scaled once by `unmanned_speed_factor`
    /// for uncrewed rovers), resets the distance travelled, and stamps the
    /// clock at `now`.
    pub fn activate(
        &self,
        rover:      &mut Rover,
        capability: Capability,
        now:        UniversalTime,
    ) -> TransitResult<()> {
        if rover.active {
            return Err(TransitError::AlreadyActive(rover.name.clone()));
        }
        if rover.target.is_none() || rover.transit.distance_to_target_m <= 0.0 {
            return Err(TransitError::NoRoutePlanned(rover.name.clone()));
        }
        if !(capability.day_speed > 0.0) {
            return Err(TransitError::NoSpeed(rover.name.clone()));
        }

        let factor = if rover.crewed { 1.0 } else { self.config.unmanned_speed_factor };
        let t = &mut rover.transit;
        t.day_speed            = capability.day_speed * factor;
        t.night_speed          = capability.night_speed.max(0.0) * factor;
        t.solar_dependent      = capability.solar_dependent;
        t.distance_travelled_m = 0.0;
        t.last_update          = now;
        t.status               = RoverStatus::Roving;
        rover.active = true;

        info!(
            rover    = %rover.name,
            speed    = rover.transit.day_speed,
            distance = rover.transit.distance_to_target_m,
            "rover activated"
        );
        Ok(())
    }

    /// Stop the rover and forget its target and route.
    pub fn deactivate(&self, rover: &mut Rover) {
        rover.active = false;
        rover.target = None;
        rover.clear_route();
        let t = &mut rover.transit;
        t.distance_travelled_m = 0.0;
        t.distance_to_target_m = 0.0;
        t.status               = RoverStatus::Idle;
        debug!(rover = %rover.name, "rover deactivated");
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance one rover to `input.now`.
    ///
    /// Distance accrues as `speed × elapsed`.  The new position is found by
    /// walking the stored route: the rover is on the segment starting at
    /// waypoint `floor(d / step)`, `d mod step` metres along it; past the
    /// last waypoint it heads straight for the exact target.  A rover with
    /// no decodable route drives the direct great circle from its departure
    /// point.
    ///
    /// A tick with no elapsed time changes nothing.
    pub fn tick(&self, rover: &mut Rover, body: &dyn Body, input: &TickInput) -> TickOutcome {
        if input.controlled {
            // Time under direct control never counts as transit.
            rover.transit.status      = RoverStatus::Current;
            rover.transit.last_update = input.now;
            return TickOutcome::Skipped;
        }
        let target = match (rover.active, rover.target) {
            (true, Some(target)) => target,
            _ => {
                rover.transit.status = RoverStatus::Idle;
                return TickOutcome::Skipped;
            }
        };

        let Some(speed) = effective_speed(&rover.transit, input.sun_angle_deg, rover.crewed) else {
            rover.transit.status      = RoverStatus::AwaitingLight;
            rover.transit.last_update = input.now;
            trace!(rover = %rover.name, sun = input.sun_angle_deg, "awaiting sunlight");
            return TickOutcome::AwaitingLight;
        };

        let elapsed = input.now.since(rover.transit.last_update);
        if elapsed <= 0.0 {
            return TickOutcome::Skipped;
        }

        let radius    = body.radius_m();
        let delta     = speed * elapsed;
        let travelled = rover.transit.distance_travelled_m + delta;
        let arriving  = travelled >= rover.transit.distance_to_target_m;

        let next = if arriving {
            target
        } else {
            let departure = rover.departure;
            let step      = self.config.step_m;
            position_along(rover.route(), departure, target, travelled, step, radius)
        };

        if self.too_close(next, input.observed, radius) {
            rover.transit.status      = RoverStatus::Idle;
            rover.transit.last_update = input.now;
            warn!(rover = %rover.name, "move rejected inside safety radius");
            return TickOutcome::Held;
        }

        rover.position   = next;
        rover.altitude_m = terrain_height(next, body);
        rover.transit.last_update = input.now;

        if arriving {
            rover.transit.distance_travelled_m = rover.transit.distance_to_target_m;
            rover.transit.status = RoverStatus::Arrived;
            rover.active = false;
            rover.clear_route();
            info!(rover = %rover.name, at = %target, "rover arrived");
            TickOutcome::Arrived { at: target }
        } else {
            rover.transit.distance_travelled_m = travelled;
            rover.transit.status = RoverStatus::Roving;
            trace!(rover = %rover.name, travelled, position = %next, "rover moved");
            TickOutcome::Moved { delta_m: delta }
        }
    }

    fn too_close(&self, next: GeoPoint, observed: Option<GeoPoint>, radius_m: f64) -> bool {
        observed.is_some_and(|o| next.distance_m(o, radius_m) < self.config.safety_radius_m)
    }
}

/// Point `travelled` metres along `waypoints` (spaced `step` apart), heading
/// for `target` past the last one.  An empty route starts at `departure`.
fn position_along(
    waypoints: &[GeoPoint],
    departure: GeoPoint,
    target:    GeoPoint,
    travelled: f64,
    step:      f64,
    radius_m:  f64,
) -> GeoPoint {
    let fallback = [departure];
    let waypoints = if waypoints.is_empty() { &fallback[..] } else { waypoints };
    let last = waypoints.len() - 1;

    let segment = (travelled / step).floor().max(0.0) as usize;
    let (from, to, base) = if segment < last {
        (waypoints[segment], waypoints[segment + 1], segment)
    } else {
        (waypoints[last], target, last)
    };
    let along = travelled - base as f64 * step;
    from.destination(from.initial_bearing(to), along, radius_m)
}
