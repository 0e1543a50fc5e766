//! Simulation observer trait for progress reporting and data collection.

use rv_core::{GeoPoint, RoverId, UniversalTime};
use rv_transit::{Rover, TickOutcome};

use crate::PassReport;

/// Callbacks invoked by [`Sim::run_pass`][crate::Sim::run_pass] at key points
/// in a fleet pass.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — track logger
///
/// ```rust,ignore
/// struct TrackLog(Vec<(RoverId, GeoPoint)>);
///
/// impl SimObserver for TrackLog {
///     fn on_rover_ticked(&mut self, id: RoverId, rover: &Rover, _outcome: TickOutcome) {
///         self.0.push((id, rover.position));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each pass, before any rover is ticked.
    fn on_pass_start(&mut self, _now: UniversalTime) {}

    /// Called after each rover's tick with its post-tick state.
    fn on_rover_ticked(&mut self, _id: RoverId, _rover: &Rover, _outcome: TickOutcome) {}

    /// Called when a rover reaches its target, after `on_rover_ticked`.
    fn on_arrival(&mut self, _id: RoverId, _rover: &Rover, _now: UniversalTime) {}

    /// Called once every rover has been ticked.
    fn on_pass_end(&mut self, _report: &PassReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every arrival with the time and place it happened.
#[derive(Debug, Default)]
pub struct ArrivalLog {
    pub arrivals: Vec<(RoverId, UniversalTime, GeoPoint)>,
}

impl SimObserver for ArrivalLog {
    fn on_arrival(&mut self, id: RoverId, rover: &Rover, now: UniversalTime) {
        self.arrivals.push((id, now, rover.position));
    }
}
