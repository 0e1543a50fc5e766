//! The `Sim` struct and its fleet pass.

use tracing::{debug, info};

use rv_core::{Body, GeoPoint, PassClock, RoverId, RvError, SimConfig, UniversalTime};
use rv_spatial::Router;
use rv_transit::{Capability, Rover, TickInput, TickOutcome, TransitEngine};

use crate::{Environment, SimObserver, SimResult};

// ── PassReport ────────────────────────────────────────────────────────────────

/// Summary of one fleet pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub now:       UniversalTime,
    /// Rovers whose tick did something (moved, held, waited, or arrived).
    pub ticked:    usize,
    /// Rovers that reached their target this pass, in ascending id order.
    pub arrivals:  Vec<RoverId>,
    /// The host should drop out of time warp.
    pub stop_warp: bool,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The fleet runner.
///
/// `Sim<B, R>` owns every rover on one body plus the router used to plan
/// their routes.  Call [`Sim::update`] from the host's frame loop; it runs a
/// fleet pass at most once per `config.pass_interval_secs` of wall time.
pub struct Sim<B: Body, R: Router> {
    /// Global configuration (step size, safety radius, pass interval, …).
    pub config: SimConfig,

    /// Tick logic, carrying a copy of `config`.
    pub engine: TransitEngine,

    /// Terrain provider shared by planning and ticking.
    pub body: B,

    /// Planner used by [`Sim::plan`] and [`Sim::target_rover`].
    pub router: R,

    /// The fleet, indexed by `RoverId`.
    pub rovers: Vec<Rover>,

    clock: PassClock,
}

impl<B: Body, R: Router> Sim<B, R> {
    /// Validate `config` and build an empty fleet.
    pub fn new(config: SimConfig, body: B, router: R) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            engine: TransitEngine::new(config.clone()),
            clock:  config.make_clock(),
            config,
            body,
            router,
            rovers: Vec::new(),
        })
    }

    // ── Fleet ─────────────────────────────────────────────────────────────

    pub fn add_rover(&mut self, rover: Rover) -> RoverId {
        let id = RoverId(self.rovers.len() as u32);
        debug!(rover = %rover.name, %id, "rover added");
        self.rovers.push(rover);
        id
    }

    pub fn rover(&self, id: RoverId) -> SimResult<&Rover> {
        self.rovers.get(id.index()).ok_or_else(|| RvError::RoverNotFound(id).into())
    }

    pub fn rover_mut(&mut self, id: RoverId) -> SimResult<&mut Rover> {
        self.rovers.get_mut(id.index()).ok_or_else(|| RvError::RoverNotFound(id).into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rovers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rovers.is_empty()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Plan a route for `id` to `target`.  Returns the route distance.
    pub fn plan(&mut self, id: RoverId, target: GeoPoint) -> SimResult<f64> {
        let rover = self.rovers.get_mut(id.index()).ok_or(RvError::RoverNotFound(id))?;
        Ok(self.engine.plan(rover, target, &self.body, &self.router)?)
    }

    /// Plan a route for `id` to a point short of rover `other`.
    pub fn target_rover(&mut self, id: RoverId, other: RoverId) -> SimResult<f64> {
        let other_pos = self.rover(other)?.position;
        let rover = self.rovers.get_mut(id.index()).ok_or(RvError::RoverNotFound(id))?;
        Ok(self.engine.plan_to_vehicle(rover, other_pos, &self.body, &self.router)?)
    }

    pub fn activate(
        &mut self,
        id:         RoverId,
        capability: Capability,
        now:        UniversalTime,
    ) -> SimResult<()> {
        let rover = self.rovers.get_mut(id.index()).ok_or(RvError::RoverNotFound(id))?;
        Ok(self.engine.activate(rover, capability, now)?)
    }

    pub fn deactivate(&mut self, id: RoverId) -> SimResult<()> {
        let rover = self.rovers.get_mut(id.index()).ok_or(RvError::RoverNotFound(id))?;
        self.engine.deactivate(rover);
        Ok(())
    }

    // ── Passes ────────────────────────────────────────────────────────────

    /// Run a fleet pass if the pass clock allows it at wall time `wall_secs`.
    ///
    /// Returns `None` when the call was rate-limited.
    pub fn update<E, O>(
        &mut self,
        wall_secs: f64,
        now:       UniversalTime,
        env:       &E,
        observer:  &mut O,
    ) -> Option<PassReport>
    where
        E: Environment + ?Sized,
        O: SimObserver + ?Sized,
    {
        if !self.clock.try_fire(wall_secs) {
            return None;
        }
        Some(self.run_pass(now, env, observer))
    }

    /// Tick every rover to `now`, in ascending `RoverId` order.
    pub fn run_pass<E, O>(&mut self, now: UniversalTime, env: &E, observer: &mut O) -> PassReport
    where
        E: Environment + ?Sized,
        O: SimObserver + ?Sized,
    {
        observer.on_pass_start(now);

        let observed   = env.observed_position();
        let controlled = env.controlled();
        let mut report = PassReport { now, ticked: 0, arrivals: Vec::new(), stop_warp: false };

        // Explicit field borrows so the borrow checker sees disjoint access.
        let engine = &self.engine;
        let body   = &self.body;

        for (i, rover) in self.rovers.iter_mut().enumerate() {
            let id = RoverId(i as u32);
            let input = TickInput {
                now,
                sun_angle_deg: env.sun_angle_deg(id, rover.position),
                observed,
                controlled: controlled == Some(id),
            };
            let outcome = engine.tick(rover, body, &input);
            if outcome != TickOutcome::Skipped {
                report.ticked += 1;
            }
            observer.on_rover_ticked(id, rover, outcome);
            if let TickOutcome::Arrived { .. } = outcome {
                report.arrivals.push(id);
                observer.on_arrival(id, rover, now);
            }
        }

        report.stop_warp = self.config.stop_on_arrival && !report.arrivals.is_empty();
        if report.stop_warp {
            info!(arrivals = report.arrivals.len(), "rover arrived; stopping time warp");
        }
        debug!(%now, ticked = report.ticked, "fleet pass complete");

        observer.on_pass_end(&report);
        report
    }
}
