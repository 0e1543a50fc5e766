//! traverse — drives a small rover fleet across a procedurally generated body.
//!
//! Each rover starts on dry land, picks a random target a few tens of
//! kilometres away, plans a hex-grid route around steep ground and open water,
//! and drives it in hourly passes under a rotating sun.  Every tick is written
//! to a CSV track log.
//!
//! ```text
//! cargo run --release -p traverse -- [config.toml]
//! ```
//!
//! Set `RUST_LOG` to override the default log filter.

mod terrain;
mod track;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rv_core::{terrain_height, Body, GeoPoint, SimConfig, UniversalTime};
use rv_sim::Sim;
use rv_spatial::AStarRouter;
use rv_transit::{Capability, Rover};

use terrain::{fractal_body, Sun};
use track::TrackLog;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_LOG_FILTER: &str  = "traverse=info,rv_transit=info";
const PASS_SECS:          f64   = 3_600.0; // one pass per game hour
const PLACEMENT_TRIES:    usize = 200;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    seed:            u64,
    radius_m:        f64,
    relief_m:        f64,
    rovers:          usize,
    days:            u32,
    day_length_secs: f64,
    track_path:      PathBuf,
    sim:             SimConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed:            7,
            radius_m:        600_000.0,
            relief_m:        2_500.0,
            rovers:          4,
            days:            20,
            day_length_secs: 21_600.0,
            track_path:      PathBuf::from("traverse_track.csv"),
            sim:             SimConfig::default(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: DemoConfig = toml::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    if !(config.day_length_secs > 0.0) {
        bail!("day_length_secs must be positive");
    }
    Ok(config)
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// A random point on dry land between ±40° latitude.
fn random_land(rng: &mut SmallRng, body: &dyn Body) -> Option<GeoPoint> {
    (0..PLACEMENT_TRIES)
        .map(|_| GeoPoint::new(rng.gen_range(-40.0..40.0), rng.gen_range(-180.0..180.0)))
        .find(|&p| terrain_height(p, body) >= 0.0)
}

/// A dry point 5–40 km from `start` in a random direction.
fn random_target(rng: &mut SmallRng, body: &dyn Body, start: GeoPoint) -> Option<GeoPoint> {
    (0..PLACEMENT_TRIES)
        .map(|_| start.destination(rng.gen_range(0.0..360.0), rng.gen_range(5_000.0..40_000.0), body.radius_m()))
        .find(|&p| terrain_height(p, body) >= 0.0)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    info!(seed = config.seed, rovers = config.rovers, days = config.days, "traverse starting");

    // 1. Body, router, fleet.
    let body   = fractal_body(config.seed as u32, config.radius_m, config.relief_m);
    let router = AStarRouter::from_config(&config.sim);
    let mut sim = Sim::new(config.sim.clone(), body, router)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);

    for i in 0..config.rovers {
        let Some(start) = random_land(&mut rng, &sim.body) else {
            warn!(rover = i, "no dry land found; skipping rover");
            continue;
        };
        let crewed = i % 2 == 0;
        let mut rover = Rover::new(format!("Rover {i}"), start, crewed);
        rover.altitude_m = terrain_height(start, &sim.body);
        let id = sim.add_rover(rover);

        let Some(target) = random_target(&mut rng, &sim.body, start) else {
            warn!(%id, "no dry target found; rover stays parked");
            continue;
        };
        if let Err(e) = sim.plan(id, target) {
            warn!(%id, error = %e, "planning failed; rover stays parked");
            continue;
        }

        let capability = Capability {
            day_speed:       rng.gen_range(2.0..6.0),
            night_speed:     if rng.gen_bool(0.5) { 1.5 } else { 0.0 },
            solar_dependent: true,
        };
        sim.activate(id, capability, UniversalTime::ZERO)?;
    }

    // 2. Hourly passes until everyone has arrived or time runs out.
    let mut track = TrackLog::create(&config.track_path)
        .with_context(|| format!("creating {}", config.track_path.display()))?;
    let mut sun = Sun { day_length_secs: config.day_length_secs, now: UniversalTime::ZERO };
    let passes = u64::from(config.days) * 24;

    for pass in 1..=passes {
        let now = UniversalTime(pass as f64 * PASS_SECS);
        sun.now = now;
        let report = sim.run_pass(now, &sun, &mut track);
        for id in &report.arrivals {
            info!(%id, %now, "arrived");
        }
        if sim.rovers.iter().all(|r| !r.active) {
            break;
        }
    }

    let rows = track.finish()?;
    info!(rows, path = %config.track_path.display(), "track written");

    // 3. Summary.
    for rover in &sim.rovers {
        let arrived = rover.transit.distance_to_target_m > 0.0 && rover.transit.remaining_m() == 0.0;
        info!(
            rover     = %rover.name,
            status    = %rover.status(),
            travelled = rover.transit.distance_travelled_m.round(),
            remaining = rover.transit.remaining_m().round(),
            arrived,
            "final state"
        );
    }
    Ok(())
}
