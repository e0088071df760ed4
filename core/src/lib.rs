#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the pitch system-identification workspace.
//!
//! The flight executive owns a [`ControlCommand`] and a raw [`ModeSelector`]
//! taken from the mission record. Once per control cycle it hands both to an
//! excitation system together with the current clock value. The system reads
//! the selector, looks up the matching [`ChirpSchedule`] in its
//! [`ExcitationProfiles`], and accumulates the excitation sample onto one
//! [`SurfacePair`] of the command.

use serde::{Deserialize, Serialize};

mod schedule;

pub use schedule::{ChirpSchedule, ExcitationProfiles, ExcitationWindow, ScheduleError};

/// Waveform families selectable by the mission sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcitationMode {
    /// Chirp scaled to the energy content of a 3-2-1-1 input.
    ThreeTwoOneOne,
    /// Chirp scaled for the higher-airspeed test point.
    ChirpSweep,
    /// Reserved for a pitch doublet; currently produces nothing.
    Doublet,
}

impl ExcitationMode {
    /// Every recognized mode in selector order.
    pub const ALL: [ExcitationMode; 3] = [
        ExcitationMode::ThreeTwoOneOne,
        ExcitationMode::ChirpSweep,
        ExcitationMode::Doublet,
    ];

    /// Raw selector value that identifies the mode on the mission record.
    #[must_use]
    pub const fn selector(self) -> ModeSelector {
        match self {
            Self::ThreeTwoOneOne => ModeSelector::new(0),
            Self::ChirpSweep => ModeSelector::new(1),
            Self::Doublet => ModeSelector::new(2),
        }
    }
}

/// Raw system-identification selector as carried by the mission record.
///
/// The value is not validated on construction; unrecognized values decode to
/// `None` and excitation systems treat them as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeSelector(u16);

impl ModeSelector {
    /// Wraps the provided raw selector value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the raw selector value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Decodes the selector into a recognized mode, if any.
    #[must_use]
    pub const fn mode(&self) -> Option<ExcitationMode> {
        match self.0 {
            0 => Some(ExcitationMode::ThreeTwoOneOne),
            1 => Some(ExcitationMode::ChirpSweep),
            2 => Some(ExcitationMode::Doublet),
            _ => None,
        }
    }
}

impl From<u16> for ModeSelector {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<ExcitationMode> for ModeSelector {
    fn from(mode: ExcitationMode) -> Self {
        mode.selector()
    }
}

/// Pair of symmetric control surfaces that receives an excitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfacePair {
    /// Left and right surfaces in slot 3.
    Third,
    /// Left and right surfaces in slot 4.
    Fourth,
}

/// Actuator command record produced by the control law for one cycle.
///
/// Deflections are expressed in radians. Excitation systems add onto the
/// surface fields and overwrite `pitch_excite` with the latest sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    /// Left surface in slot 3.
    pub left_surface3: f64,
    /// Right surface in slot 3.
    pub right_surface3: f64,
    /// Left surface in slot 4.
    pub left_surface4: f64,
    /// Right surface in slot 4.
    pub right_surface4: f64,
    /// Most recently computed pitch excitation sample.
    ///
    /// Not cleared when no excitation window is active.
    pub pitch_excite: f64,
}

impl ControlCommand {
    /// Adds `value` to both surfaces of the requested pair.
    pub fn add_to_pair(&mut self, pair: SurfacePair, value: f64) {
        match pair {
            SurfacePair::Third => {
                self.left_surface3 += value;
                self.right_surface3 += value;
            }
            SurfacePair::Fourth => {
                self.left_surface4 += value;
                self.right_surface4 += value;
            }
        }
    }

    /// Returns the current `(left, right)` deflections of the requested pair.
    #[must_use]
    pub const fn pair(&self, pair: SurfacePair) -> (f64, f64) {
        match pair {
            SurfacePair::Third => (self.left_surface3, self.right_surface3),
            SurfacePair::Fourth => (self.left_surface4, self.right_surface4),
        }
    }
}
