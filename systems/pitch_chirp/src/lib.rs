#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pitch chirp excitation system for flight-test system identification.
//!
//! The flight executive calls [`PitchChirp::excite`] once per control cycle.
//! The first call latches the experiment clock; every later call derives a
//! local time from that latch, picks the chirp schedule selected by the
//! mission's [`ModeSelector`], and accumulates the excitation sample onto the
//! surface pair of whichever window is active.

use pitch_sysid_core::{
    ChirpSchedule, ControlCommand, ExcitationMode, ExcitationProfiles, ModeSelector, SurfacePair,
};
use tracing::{debug, info, warn};

/// One-shot latch that anchors the experiment's local clock.
///
/// The state starts unarmed. The first call to [`GeneratorState::local_time`]
/// captures the provided time as the entry time, which then never changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeneratorState {
    entry_time: Option<f64>,
}

impl GeneratorState {
    /// Creates an unarmed state.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry_time: None }
    }

    /// Reports whether the entry time has been captured.
    #[must_use]
    pub const fn is_latched(&self) -> bool {
        self.entry_time.is_some()
    }

    /// Absolute time captured on the first call, if any.
    #[must_use]
    pub const fn entry_time(&self) -> Option<f64> {
        self.entry_time
    }

    /// Latches `now` on first use and returns the time elapsed since the latch.
    pub fn local_time(&mut self, now: f64) -> f64 {
        let entry_time = *self.entry_time.get_or_insert(now);
        now - entry_time
    }
}

/// Excitation written onto the command during one call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Excitation {
    /// Mode whose schedule produced the sample.
    pub mode: ExcitationMode,
    /// Surfaces that received the sample.
    pub surfaces: SurfacePair,
    /// Time since the experiment clock latched, in seconds.
    pub local_time: f64,
    /// Time since the active window opened, in seconds.
    pub window_time: f64,
    /// Sample added to both surfaces, in radians.
    pub sample: f64,
}

/// Pitch chirp generator that owns its latched timing state.
///
/// Profiles are used as given; validate them with
/// [`ExcitationProfiles::validate`] before construction when they come from
/// an external source.
#[derive(Debug, Default)]
pub struct PitchChirp {
    profiles: ExcitationProfiles,
    state: GeneratorState,
    last_local_time: Option<f64>,
    active_surfaces: Option<SurfacePair>,
    unrecognized: Option<ModeSelector>,
}

impl PitchChirp {
    /// Creates an unarmed generator flying the provided profiles.
    #[must_use]
    pub fn new(profiles: ExcitationProfiles) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    /// Latched timing state of the generator.
    #[must_use]
    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Schedules flown by the generator.
    #[must_use]
    pub fn profiles(&self) -> &ExcitationProfiles {
        &self.profiles
    }

    /// Advances the generator to `time` and applies any active excitation.
    ///
    /// The first call latches `time` as the entry time whatever the selector.
    /// When a window of the selected schedule is active the sample overwrites
    /// `command.pitch_excite` and is added to the window's surface pair.
    /// Otherwise the command is left untouched, including a stale
    /// `pitch_excite`. `ExcitationMode::Doublet` and unrecognized selectors
    /// never excite.
    pub fn excite(
        &mut self,
        time: f64,
        selector: impl Into<ModeSelector>,
        command: &mut ControlCommand,
    ) -> Option<Excitation> {
        let selector = selector.into();
        let local_time = self.advance_clock(time);

        let excitation = self
            .decode(selector)
            .and_then(|mode| evaluate(&self.profiles, mode, local_time));

        if let Some(excitation) = excitation {
            command.pitch_excite = excitation.sample;
            command.add_to_pair(excitation.surfaces, excitation.sample);
        }

        self.track_window(excitation.map(|excitation| excitation.surfaces));
        excitation
    }

    fn advance_clock(&mut self, time: f64) -> f64 {
        if !self.state.is_latched() {
            info!(entry_time = time, "pitch chirp clock latched");
        }

        let local_time = self.state.local_time(time);
        if let Some(previous) = self.last_local_time {
            if local_time < previous {
                warn!(local_time, previous, "pitch chirp clock ran backwards");
            }
        }
        self.last_local_time = Some(local_time);
        local_time
    }

    fn decode(&mut self, selector: ModeSelector) -> Option<ExcitationMode> {
        let mode = selector.mode();
        if mode.is_some() {
            self.unrecognized = None;
        } else if self.unrecognized != Some(selector) {
            warn!(
                selector = selector.get(),
                "unrecognized excitation mode, pitch chirp inactive"
            );
            self.unrecognized = Some(selector);
        }
        mode
    }

    fn track_window(&mut self, surfaces: Option<SurfacePair>) {
        if self.active_surfaces == surfaces {
            return;
        }

        match surfaces {
            Some(surfaces) => debug!(?surfaces, "pitch chirp window opened"),
            None => debug!("pitch chirp window closed"),
        }
        self.active_surfaces = surfaces;
    }
}

fn evaluate(
    profiles: &ExcitationProfiles,
    mode: ExcitationMode,
    local_time: f64,
) -> Option<Excitation> {
    let schedule: &ChirpSchedule = profiles.schedule(mode)?;
    let window = schedule.active_window(local_time)?;
    let window_time = window.window_time(local_time);

    Some(Excitation {
        mode,
        surfaces: window.surfaces,
        local_time,
        window_time,
        sample: schedule.sample(window, window_time),
    })
}
