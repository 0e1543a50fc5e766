//! Integration tests for rv-sim.

use rv_core::{GeoPoint, RoverId, RvError, SimConfig, SphereBody, UniversalTime};
use rv_spatial::AStarRouter;
use rv_transit::{Capability, Rover, RoverStatus, TickOutcome};

use crate::{AlwaysDay, ArrivalLog, Environment, NoopObserver, PassReport, Sim, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

const R: f64 = 600_000.0;

fn origin() -> GeoPoint {
    GeoPoint::new(0.0, 0.0)
}

fn sim_with(config: SimConfig) -> Sim<SphereBody, AStarRouter> {
    let router = AStarRouter::from_config(&config);
    Sim::new(config, SphereBody::new(R), router).unwrap()
}

fn sim() -> Sim<SphereBody, AStarRouter> {
    sim_with(SimConfig::default())
}

fn fast() -> Capability {
    Capability { day_speed: 10.0, night_speed: 0.0, solar_dependent: true }
}

/// Add a crewed rover at `start` and send it `distance_m` east.
fn dispatch(sim: &mut Sim<SphereBody, AStarRouter>, start: GeoPoint, distance_m: f64) -> RoverId {
    let id = sim.add_rover(Rover::new(format!("Rover {}", sim.len()), start, true));
    sim.plan(id, start.destination(90.0, distance_m, R)).unwrap();
    sim.activate(id, fast(), UniversalTime::ZERO).unwrap();
    id
}

struct Night;

impl Environment for Night {
    fn sun_angle_deg(&self, _rover: RoverId, _position: GeoPoint) -> f64 {
        135.0
    }
}

struct Watching {
    observed:   GeoPoint,
    controlled: Option<RoverId>,
}

impl Environment for Watching {
    fn sun_angle_deg(&self, _rover: RoverId, _position: GeoPoint) -> f64 {
        0.0
    }
    fn observed_position(&self) -> Option<GeoPoint> {
        Some(self.observed)
    }
    fn controlled(&self) -> Option<RoverId> {
        self.controlled
    }
}

/// Records the order of every hook call.
#[derive(Default)]
struct HookTrace(Vec<String>);

impl SimObserver for HookTrace {
    fn on_pass_start(&mut self, _now: UniversalTime) {
        self.0.push("start".into());
    }
    fn on_rover_ticked(&mut self, id: RoverId, _rover: &Rover, _outcome: TickOutcome) {
        self.0.push(format!("tick {}", id.0));
    }
    fn on_arrival(&mut self, id: RoverId, _rover: &Rover, _now: UniversalTime) {
        self.0.push(format!("arrive {}", id.0));
    }
    fn on_pass_end(&mut self, report: &PassReport) {
        self.0.push(format!("end {}", report.ticked));
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig { step_m: 0.0, ..SimConfig::default() };
        let router = AStarRouter::from_config(&SimConfig::default());
        let err = Sim::new(config, SphereBody::new(R), router).err().unwrap();
        assert!(matches!(err, SimError::Core(RvError::Config(_))));
    }

    #[test]
    fn unknown_rover_is_an_error() {
        let mut sim = sim();
        let err = sim.plan(RoverId(3), origin()).unwrap_err();
        assert!(matches!(err, SimError::Core(RvError::RoverNotFound(RoverId(3)))));
        assert!(sim.rover(RoverId(0)).is_err());
    }

    #[test]
    fn ids_are_dense() {
        let mut sim = sim();
        let a = sim.add_rover(Rover::new("A", origin(), true));
        let b = sim.add_rover(Rover::new("B", origin(), false));
        assert_eq!((a, b), (RoverId(0), RoverId(1)));
        assert_eq!(sim.rover(b).unwrap().name, "B");
        assert_eq!(sim.len(), 2);
    }
}

// ── Fleet passes ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod passes {
    use super::*;

    #[test]
    fn pass_advances_every_active_rover() {
        let mut sim = sim();
        let a = dispatch(&mut sim, origin(), 5_000.0);
        let b = dispatch(&mut sim, GeoPoint::new(1.0, 1.0), 5_000.0);
        let parked = sim.add_rover(Rover::new("Parked", GeoPoint::new(-1.0, 0.0), true));

        let report = sim.run_pass(UniversalTime(100.0), &AlwaysDay, &mut NoopObserver);
        assert_eq!(report.ticked, 2);
        assert!(report.arrivals.is_empty());
        assert_eq!(sim.rover(a).unwrap().transit.distance_travelled_m, 1_000.0);
        assert_eq!(sim.rover(b).unwrap().transit.distance_travelled_m, 1_000.0);
        assert_eq!(sim.rover(parked).unwrap().status(), RoverStatus::Idle);
    }

    #[test]
    fn arrivals_are_reported_and_logged() {
        let mut sim = sim();
        let near = dispatch(&mut sim, origin(), 500.0);
        let far  = dispatch(&mut sim, GeoPoint::new(1.0, 1.0), 50_000.0);

        let mut log = ArrivalLog::default();
        let report = sim.run_pass(UniversalTime(60.0), &AlwaysDay, &mut log);
        assert_eq!(report.arrivals, vec![near]);
        assert!(!report.stop_warp);
        assert_eq!(log.arrivals.len(), 1);
        assert_eq!(log.arrivals[0].0, near);
        assert_eq!(log.arrivals[0].1, UniversalTime(60.0));
        assert_eq!(Some(log.arrivals[0].2), sim.rover(near).unwrap().target);
        assert_eq!(sim.rover(far).unwrap().status(), RoverStatus::Roving);
    }

    #[test]
    fn stop_on_arrival_requests_warp_stop() {
        let mut sim = sim_with(SimConfig { stop_on_arrival: true, ..SimConfig::default() });
        dispatch(&mut sim, origin(), 500.0);
        let report = sim.run_pass(UniversalTime(60.0), &AlwaysDay, &mut NoopObserver);
        assert!(report.stop_warp);

        let report = sim.run_pass(UniversalTime(120.0), &AlwaysDay, &mut NoopObserver);
        assert!(!report.stop_warp);
        assert_eq!(report.ticked, 0);
    }

    #[test]
    fn hooks_fire_in_order() {
        let mut sim = sim();
        dispatch(&mut sim, origin(), 500.0);
        dispatch(&mut sim, GeoPoint::new(1.0, 1.0), 5_000.0);

        let mut trace = HookTrace::default();
        sim.run_pass(UniversalTime(60.0), &AlwaysDay, &mut trace);
        assert_eq!(trace.0, vec!["start", "tick 0", "arrive 0", "tick 1", "end 2"]);
    }

    #[test]
    fn night_holds_solar_rovers() {
        let mut sim = sim();
        let id = dispatch(&mut sim, origin(), 5_000.0);
        sim.run_pass(UniversalTime(600.0), &Night, &mut NoopObserver);
        let rover = sim.rover(id).unwrap();
        assert_eq!(rover.status(), RoverStatus::AwaitingLight);
        assert_eq!(rover.transit.distance_travelled_m, 0.0);
    }

    #[test]
    fn controlled_and_observed_vehicles_are_respected() {
        let mut sim = sim();
        let a = dispatch(&mut sim, origin(), 5_000.0);
        let b = dispatch(&mut sim, GeoPoint::new(1.0, 1.0), 5_000.0);
        let env = Watching { observed: origin().destination(90.0, 500.0, R), controlled: Some(b) };

        sim.run_pass(UniversalTime(10.0), &env, &mut NoopObserver);
        assert_eq!(sim.rover(a).unwrap().status(), RoverStatus::Idle);
        assert_eq!(sim.rover(a).unwrap().transit.distance_travelled_m, 0.0);
        assert_eq!(sim.rover(b).unwrap().status(), RoverStatus::Current);
    }

    #[test]
    fn update_is_rate_limited_by_wall_clock() {
        let mut sim = sim();
        let id = dispatch(&mut sim, origin(), 50_000.0);

        assert!(sim.update(0.0, UniversalTime(10.0), &AlwaysDay, &mut NoopObserver).is_some());
        assert!(sim.update(0.5, UniversalTime(20.0), &AlwaysDay, &mut NoopObserver).is_none());
        assert_eq!(sim.rover(id).unwrap().transit.distance_travelled_m, 100.0);

        // The skipped call's game time is not lost: the next pass covers it.
        assert!(sim.update(1.0, UniversalTime(30.0), &AlwaysDay, &mut NoopObserver).is_some());
        assert_eq!(sim.rover(id).unwrap().transit.distance_travelled_m, 300.0);
    }

    #[test]
    fn target_rover_stops_short() {
        let mut sim = sim();
        let seeker = sim.add_rover(Rover::new("Seeker", origin(), true));
        let other  = sim.add_rover(Rover::new("Other", origin().destination(30.0, 8_000.0, R), true));

        sim.target_rover(seeker, other).unwrap();
        let target = sim.rover(seeker).unwrap().target.unwrap();
        let other_pos = sim.rover(other).unwrap().position;
        assert!((target.distance_m(other_pos, R) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn deactivate_stops_a_rover() {
        let mut sim = sim();
        let id = dispatch(&mut sim, origin(), 5_000.0);
        sim.deactivate(id).unwrap();
        let report = sim.run_pass(UniversalTime(100.0), &AlwaysDay, &mut NoopObserver);
        assert_eq!(report.ticked, 0);
        assert_eq!(sim.rover(id).unwrap().position, origin());
    }
}
