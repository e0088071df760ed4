//! Parameterized two-window linear-sweep chirp schedules.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ExcitationMode, SurfacePair};

const STOCK_FREQ_START: f64 = 0.5;
const STOCK_FREQ_END: f64 = 8.5;
const STOCK_SWEEP_DURATION: f64 = 18.0;
const STOCK_WINDOW_B_START: f64 = 20.0;
const STOCK_WINDOW_B_END: f64 = 38.0;

/// Local-time interval during which a chirp is injected onto one surface pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExcitationWindow {
    /// Local time, in seconds, at which the window opens.
    pub start: f64,
    /// Local time, in seconds, at which the window closes (exclusive).
    pub end: f64,
    /// Whether `start` itself belongs to the window.
    #[serde(default)]
    pub include_start: bool,
    /// Window time, in seconds, at which the amplitude drops to `amp_low_deg`.
    pub amp_break: f64,
    /// Amplitude before the break, in degrees.
    pub amp_high_deg: f64,
    /// Amplitude from the break onwards, in degrees.
    pub amp_low_deg: f64,
    /// Surfaces that receive the excitation.
    pub surfaces: SurfacePair,
}

impl ExcitationWindow {
    /// Reports whether the window is active at the provided local time.
    #[must_use]
    pub fn contains(&self, local_time: f64) -> bool {
        let opened = if self.include_start {
            local_time >= self.start
        } else {
            local_time > self.start
        };
        opened && local_time < self.end
    }

    /// Converts a local time into time elapsed since the window opened.
    #[must_use]
    pub fn window_time(&self, local_time: f64) -> f64 {
        local_time - self.start
    }

    /// Amplitude, in degrees, applied at the provided window time.
    #[must_use]
    pub fn amplitude_deg(&self, window_time: f64) -> f64 {
        if window_time < self.amp_break {
            self.amp_high_deg
        } else {
            self.amp_low_deg
        }
    }

    /// Length of the window in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    fn validate(&self, name: &'static str) -> Result<(), ScheduleError> {
        for (field, value) in [
            ("start", self.start),
            ("end", self.end),
            ("amp_break", self.amp_break),
            ("amp_high_deg", self.amp_high_deg),
            ("amp_low_deg", self.amp_low_deg),
        ] {
            if !value.is_finite() {
                return Err(ScheduleError::NonFinite {
                    field: format!("{name}.{field}"),
                    value,
                });
            }
        }

        if self.end <= self.start {
            return Err(ScheduleError::EmptyWindow {
                window: name,
                start: self.start,
                end: self.end,
            });
        }

        if self.amp_break < 0.0 || self.amp_break > self.duration() {
            return Err(ScheduleError::BreakOutsideWindow {
                window: name,
                amp_break: self.amp_break,
                duration: self.duration(),
            });
        }

        Ok(())
    }
}

/// Linear-sweep chirp injected over two consecutive excitation windows.
///
/// The frequency coefficient grows as `freq_start + sweep_rate() * t`, where
/// `t` is the window time, and the sample is
/// `amplitude_deg.to_radians() * sin(2π * frequency(t) * t)`. With
/// `sweep_rate() = (freq_end - freq_start) / (2 * sweep_duration)` the
/// instantaneous frequency of the sinusoid reaches `freq_end` after
/// `sweep_duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChirpSchedule {
    /// Frequency coefficient at window time zero.
    pub freq_start: f64,
    /// Instantaneous frequency reached after `sweep_duration`.
    pub freq_end: f64,
    /// Seconds over which the sweep spans `freq_start` to `freq_end`.
    pub sweep_duration: f64,
    /// Leading window, checked first.
    pub window_a: ExcitationWindow,
    /// Trailing window.
    pub window_b: ExcitationWindow,
}

impl ChirpSchedule {
    /// Schedule flown for `ExcitationMode::ChirpSweep`.
    #[must_use]
    pub const fn chirp_sweep() -> Self {
        Self::stock(3.6, 0.75, 11.0)
    }

    /// Schedule flown for `ExcitationMode::ThreeTwoOneOne`.
    ///
    /// Window B keeps the high amplitude one second longer than window A.
    #[must_use]
    pub const fn three_two_one_one() -> Self {
        Self::stock(5.0, 1.0, 12.0)
    }

    const fn stock(amp_high_deg: f64, amp_low_deg: f64, window_b_break: f64) -> Self {
        Self {
            freq_start: STOCK_FREQ_START,
            freq_end: STOCK_FREQ_END,
            sweep_duration: STOCK_SWEEP_DURATION,
            window_a: ExcitationWindow {
                start: 0.0,
                end: STOCK_SWEEP_DURATION,
                include_start: true,
                amp_break: 11.0,
                amp_high_deg,
                amp_low_deg,
                surfaces: SurfacePair::Third,
            },
            window_b: ExcitationWindow {
                start: STOCK_WINDOW_B_START,
                end: STOCK_WINDOW_B_END,
                include_start: false,
                amp_break: window_b_break,
                amp_high_deg,
                amp_low_deg,
                surfaces: SurfacePair::Fourth,
            },
        }
    }

    /// Growth of the frequency coefficient per second of window time.
    #[must_use]
    pub fn sweep_rate(&self) -> f64 {
        (self.freq_end - self.freq_start) / (2.0 * self.sweep_duration)
    }

    /// Frequency coefficient at the provided window time.
    #[must_use]
    pub fn frequency(&self, window_time: f64) -> f64 {
        self.freq_start + self.sweep_rate() * window_time
    }

    /// Returns the window active at the provided local time, if any.
    #[must_use]
    pub fn active_window(&self, local_time: f64) -> Option<&ExcitationWindow> {
        [&self.window_a, &self.window_b]
            .into_iter()
            .find(|window| window.contains(local_time))
    }

    /// Excitation sample, in radians, for `window` at `window_time`.
    #[must_use]
    pub fn sample(&self, window: &ExcitationWindow, window_time: f64) -> f64 {
        let phase = TAU * self.frequency(window_time) * window_time;
        window.amplitude_deg(window_time).to_radians() * phase.sin()
    }

    /// Checks that the schedule describes two well-formed, ordered windows.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (field, value) in [
            ("freq_start", self.freq_start),
            ("freq_end", self.freq_end),
            ("sweep_duration", self.sweep_duration),
        ] {
            if !value.is_finite() {
                return Err(ScheduleError::NonFinite {
                    field: field.to_owned(),
                    value,
                });
            }
        }

        if self.sweep_duration <= 0.0 {
            return Err(ScheduleError::NonPositiveSweep {
                sweep_duration: self.sweep_duration,
            });
        }

        self.window_a.validate("window_a")?;
        self.window_b.validate("window_b")?;

        if self.window_a.end > self.window_b.start {
            return Err(ScheduleError::OverlappingWindows {
                window_a_end: self.window_a.end,
                window_b_start: self.window_b.start,
            });
        }

        Ok(())
    }
}

/// Chirp schedules keyed by the mode that flies them.
///
/// `ExcitationMode::Doublet` has no schedule and always yields a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExcitationProfiles {
    /// Schedule for `ExcitationMode::ThreeTwoOneOne`.
    #[serde(default = "ChirpSchedule::three_two_one_one")]
    pub three_two_one_one: ChirpSchedule,
    /// Schedule for `ExcitationMode::ChirpSweep`.
    #[serde(default = "ChirpSchedule::chirp_sweep")]
    pub chirp_sweep: ChirpSchedule,
}

impl Default for ExcitationProfiles {
    fn default() -> Self {
        Self {
            three_two_one_one: ChirpSchedule::three_two_one_one(),
            chirp_sweep: ChirpSchedule::chirp_sweep(),
        }
    }
}

impl ExcitationProfiles {
    /// Looks up the schedule flown for `mode`.
    #[must_use]
    pub fn schedule(&self, mode: ExcitationMode) -> Option<&ChirpSchedule> {
        match mode {
            ExcitationMode::ThreeTwoOneOne => Some(&self.three_two_one_one),
            ExcitationMode::ChirpSweep => Some(&self.chirp_sweep),
            ExcitationMode::Doublet => None,
        }
    }

    /// Validates every schedule in the table.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.three_two_one_one.validate()?;
        self.chirp_sweep.validate()
    }
}

/// Reasons a chirp schedule cannot be flown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// A numeric field held NaN or an infinity.
    #[error("schedule field `{field}` must be finite, got {value}")]
    NonFinite {
        /// Dotted path of the offending field.
        field: String,
        /// Value that was rejected.
        value: f64,
    },
    /// The sweep duration was zero or negative.
    #[error("sweep duration must be positive, got {sweep_duration}")]
    NonPositiveSweep {
        /// Value that was rejected.
        sweep_duration: f64,
    },
    /// A window closes at or before the time it opens.
    #[error("{window} closes at {end} s, not after it opens at {start} s")]
    EmptyWindow {
        /// Name of the offending window.
        window: &'static str,
        /// Configured opening time.
        start: f64,
        /// Configured closing time.
        end: f64,
    },
    /// The amplitude break lies outside the window.
    #[error("{window} amplitude break {amp_break} s lies outside its {duration} s span")]
    BreakOutsideWindow {
        /// Name of the offending window.
        window: &'static str,
        /// Configured break, in window time.
        amp_break: f64,
        /// Length of the window.
        duration: f64,
    },
    /// Window A is still open when window B starts.
    #[error("window_a closes at {window_a_end} s, after window_b opens at {window_b_start} s")]
    OverlappingWindows {
        /// Closing time of window A.
        window_a_end: f64,
        /// Opening time of window B.
        window_b_start: f64,
    },
}
