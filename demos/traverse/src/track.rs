//! CSV track log.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use rv_core::RoverId;
use rv_sim::SimObserver;
use rv_transit::{Rover, TickOutcome};

/// A [`SimObserver`] that writes one row per rover tick.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  Check [`finish`][Self::finish] after the run.
pub struct TrackLog {
    writer:     Writer<File>,
    now_secs:   f64,
    rows:       usize,
    last_error: Option<csv::Error>,
}

impl TrackLog {
    pub fn create(path: &Path) -> csv::Result<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record([
            "ut_secs", "rover_id", "name", "lat", "lon", "altitude_m", "status",
            "travelled_m", "remaining_m",
        ])?;
        Ok(Self { writer, now_secs: 0.0, rows: 0, last_error: None })
    }

    /// Flush the file and surface the first write error, if any.  Returns
    /// the number of rows written.
    pub fn finish(mut self) -> csv::Result<usize> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.rows)
    }
}

impl SimObserver for TrackLog {
    fn on_pass_start(&mut self, now: rv_core::UniversalTime) {
        self.now_secs = now.0;
    }

    fn on_rover_ticked(&mut self, id: RoverId, rover: &Rover, outcome: TickOutcome) {
        if outcome == TickOutcome::Skipped || self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_record(&[
            format!("{:.0}", self.now_secs),
            id.0.to_string(),
            rover.name.clone(),
            format!("{:.6}", rover.position.lat),
            format!("{:.6}", rover.position.lon),
            format!("{:.1}", rover.altitude_m),
            rover.status().to_string(),
            format!("{:.1}", rover.transit.distance_travelled_m),
            format!("{:.1}", rover.transit.remaining_m()),
        ]);
        match result {
            Ok(())  => self.rows += 1,
            Err(e)  => self.last_error = Some(e),
        }
    }
}
