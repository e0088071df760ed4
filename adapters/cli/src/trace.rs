use std::io::{self, Write};

use anyhow::{ensure, Result};
use pitch_sysid_core::{ControlCommand, ExcitationProfiles, ModeSelector};
use pitch_sysid_system_pitch_chirp::PitchChirp;

/// Longest plan the bench replays; 200 000 s at 50 Hz.
const MAX_TICKS: u64 = 10_000_000;

const CSV_HEADER: &str =
    "time,local_time,left_surface3,right_surface3,left_surface4,right_surface4,pitch_excite";

/// Fixed-rate tick schedule replayed by the bench.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TracePlan {
    start_time: f64,
    rate_hz: f64,
    ticks: u64,
}

impl TracePlan {
    /// Plans ticks at `rate_hz` from `start_time` through `start_time + duration`.
    pub(crate) fn new(start_time: f64, rate_hz: f64, duration: f64) -> Result<Self> {
        ensure!(start_time.is_finite(), "start time must be finite, got {start_time}");
        ensure!(
            rate_hz.is_finite() && rate_hz > 0.0,
            "control rate must be a positive number of Hz, got {rate_hz}"
        );
        ensure!(
            duration.is_finite() && duration > 0.0,
            "duration must be a positive number of seconds, got {duration}"
        );

        let span = (duration * rate_hz).floor();
        ensure!(
            span < MAX_TICKS as f64,
            "{duration} s at {rate_hz} Hz exceeds the {MAX_TICKS} tick limit"
        );

        let ticks = span as u64 + 1;
        Ok(Self {
            start_time,
            rate_hz,
            ticks,
        })
    }

    /// Number of control cycles in the plan.
    #[must_use]
    pub(crate) const fn ticks(&self) -> u64 {
        self.ticks
    }

    fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.ticks).map(move |tick| self.start_time + tick as f64 / self.rate_hz)
    }
}

/// Control command observed after one excited tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TraceRow {
    pub(crate) time: f64,
    pub(crate) local_time: f64,
    pub(crate) command: ControlCommand,
}

/// Replays the plan through a fresh generator.
///
/// The control law recomputes its surface baseline every cycle, so surfaces
/// start from zero on each tick. `pitch_excite` persists between ticks like
/// the rest of the command record.
pub(crate) fn run(
    plan: &TracePlan,
    selector: ModeSelector,
    profiles: ExcitationProfiles,
) -> Vec<TraceRow> {
    let mut chirp = PitchChirp::new(profiles);
    let mut rows = Vec::with_capacity(usize::try_from(plan.ticks()).unwrap_or(0));
    let mut pitch_excite = 0.0;

    for time in plan.times() {
        let mut command = ControlCommand {
            pitch_excite,
            ..ControlCommand::default()
        };
        let _ = chirp.excite(time, selector, &mut command);
        pitch_excite = command.pitch_excite;

        let entry_time = chirp.state().entry_time().unwrap_or(time);
        rows.push(TraceRow {
            time,
            local_time: time - entry_time,
            command,
        });
    }

    rows
}

/// Writes the rows as CSV with a header line.
pub(crate) fn write_csv<W: Write>(out: &mut W, rows: &[TraceRow]) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for row in rows {
        let command = &row.command;
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            row.time,
            row.local_time,
            command.left_surface3,
            command.right_surface3,
            command.left_surface4,
            command.right_surface4,
            command.pitch_excite,
        )?;
    }
    Ok(())
}
