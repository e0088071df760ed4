use std::f64::consts::PI;

use pitch_sysid_core::{ControlCommand, ExcitationMode, ModeSelector, SurfacePair};
use pitch_sysid_system_pitch_chirp::PitchChirp;

const ENTRY_TIME: f64 = 1_000.0;
const TOLERANCE: f64 = 1e-9;

fn closed_form(amplitude_deg: f64, t: f64) -> f64 {
    amplitude_deg * (PI / 180.0) * (2.0 * PI * (0.5 + 8.0 * t / 36.0) * t).sin()
}

fn baseline() -> ControlCommand {
    ControlCommand {
        left_surface3: 0.02,
        right_surface3: -0.03,
        left_surface4: 0.04,
        right_surface4: -0.05,
        pitch_excite: 0.0,
    }
}

fn armed(mode: ExcitationMode) -> PitchChirp {
    let mut chirp = PitchChirp::default();
    let mut scratch = ControlCommand::default();
    let _ = chirp.excite(ENTRY_TIME, mode, &mut scratch);
    chirp
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}",
    );
}

#[test]
fn entry_time_survives_later_calls_and_mode_changes() {
    let mut chirp = PitchChirp::default();
    let mut command = ControlCommand::default();

    let _ = chirp.excite(ENTRY_TIME, ExcitationMode::ThreeTwoOneOne, &mut command);
    for (offset, selector) in [(1.0, 1), (5.0, 2), (25.0, 7), (60.0, 0)] {
        let _ = chirp.excite(ENTRY_TIME + offset, ModeSelector::new(selector), &mut command);
        assert_eq!(chirp.state().entry_time(), Some(ENTRY_TIME));
    }
}

#[test]
fn local_time_is_non_decreasing_for_a_monotonic_clock() {
    let mut chirp = PitchChirp::default();
    let mut command = ControlCommand::default();
    let mut previous = f64::NEG_INFINITY;

    for tick in 0..2_000_u32 {
        let time = 37.25 + f64::from(tick) * 0.02;
        let local_time = match chirp.excite(time, ExcitationMode::ChirpSweep, &mut command) {
            Some(excitation) => excitation.local_time,
            None => time - 37.25,
        };
        assert!(local_time >= previous, "local time regressed at tick {tick}");
        previous = local_time;
    }
}

#[test]
fn chirp_sweep_excites_third_pair_in_window_a() {
    let mut chirp = armed(ExcitationMode::ChirpSweep);
    let mut command = baseline();

    let excitation = chirp
        .excite(ENTRY_TIME + 5.0, ExcitationMode::ChirpSweep, &mut command)
        .expect("window A active at local time 5");

    let expected = closed_form(3.6, 5.0);
    assert_eq!(excitation.mode, ExcitationMode::ChirpSweep);
    assert_eq!(excitation.surfaces, SurfacePair::Third);
    assert_close(excitation.sample, expected);
    assert_close(command.pitch_excite, expected);
    assert_close(command.left_surface3, 0.02 + expected);
    assert_close(command.right_surface3, -0.03 + expected);
    assert_eq!(command.left_surface4, 0.04);
    assert_eq!(command.right_surface4, -0.05);
}

#[test]
fn chirp_sweep_excites_fourth_pair_in_window_b() {
    let mut chirp = armed(ExcitationMode::ChirpSweep);
    let mut command = baseline();

    let excitation = chirp
        .excite(ENTRY_TIME + 25.0, ExcitationMode::ChirpSweep, &mut command)
        .expect("window B active at local time 25");

    let expected = closed_form(3.6, 5.0);
    assert_eq!(excitation.mode, ExcitationMode::ChirpSweep);
    assert_eq!(excitation.surfaces, SurfacePair::Fourth);
    assert_close(excitation.window_time, 5.0);
    assert_close(command.pitch_excite, expected);
    assert_close(command.left_surface4, 0.04 + expected);
    assert_close(command.right_surface4, -0.05 + expected);
    assert_eq!(command.left_surface3, 0.02);
    assert_eq!(command.right_surface3, -0.03);
}

#[test]
fn low_amplitude_applies_after_window_a_break() {
    let mut chirp = armed(ExcitationMode::ThreeTwoOneOne);
    let mut command = ControlCommand::default();

    let excitation = chirp
        .excite(ENTRY_TIME + 13.3, ExcitationMode::ThreeTwoOneOne, &mut command)
        .expect("window A active at local time 13.3");

    assert_close(excitation.sample, closed_form(1.0, 13.3));
}

#[test]
fn window_b_break_differs_between_modes() {
    let mut legacy = armed(ExcitationMode::ThreeTwoOneOne);
    let mut sweep = armed(ExcitationMode::ChirpSweep);
    let mut command = ControlCommand::default();

    let legacy_sample = legacy
        .excite(ENTRY_TIME + 31.5, ExcitationMode::ThreeTwoOneOne, &mut command)
        .map(|excitation| excitation.sample)
        .expect("window B active for 3-2-1-1");
    let sweep_sample = sweep
        .excite(ENTRY_TIME + 31.5, ExcitationMode::ChirpSweep, &mut command)
        .map(|excitation| excitation.sample)
        .expect("window B active for chirp sweep");

    assert_close(legacy_sample, closed_form(5.0, 11.5));
    assert_close(sweep_sample, closed_form(0.75, 11.5));
}

#[test]
fn gap_between_windows_leaves_command_untouched() {
    let mut chirp = armed(ExcitationMode::ThreeTwoOneOne);
    let mut command = baseline();

    let excitation = chirp.excite(ENTRY_TIME + 19.0, ExcitationMode::ThreeTwoOneOne, &mut command);

    assert!(excitation.is_none());
    assert_eq!(command, baseline());
}

#[test]
fn scratch_sample_goes_stale_outside_windows() {
    let mut chirp = armed(ExcitationMode::ChirpSweep);
    let mut command = ControlCommand::default();

    let _ = chirp.excite(ENTRY_TIME + 17.9, ExcitationMode::ChirpSweep, &mut command);
    let last_sample = command.pitch_excite;
    assert_ne!(last_sample, 0.0);

    for offset in [18.0, 19.5, 20.0, 38.0, 120.0] {
        let mut fresh = ControlCommand {
            pitch_excite: last_sample,
            ..ControlCommand::default()
        };
        assert!(chirp
            .excite(ENTRY_TIME + offset, ExcitationMode::ChirpSweep, &mut fresh)
            .is_none());
        assert_eq!(fresh.pitch_excite, last_sample);
        assert_eq!(fresh.pair(SurfacePair::Third), (0.0, 0.0));
        assert_eq!(fresh.pair(SurfacePair::Fourth), (0.0, 0.0));
    }
}

#[test]
fn doublet_and_unrecognized_modes_are_no_ops() {
    for selector in [ModeSelector::from(ExcitationMode::Doublet), ModeSelector::new(7)] {
        let mut chirp = PitchChirp::default();
        let mut command = baseline();

        for offset in [0.0, 5.0, 25.0] {
            assert!(chirp.excite(ENTRY_TIME + offset, selector, &mut command).is_none());
        }

        assert_eq!(command, baseline());
    }
}

#[test]
fn repeated_calls_repeat_the_sample_but_accumulate() {
    let mut chirp = armed(ExcitationMode::ChirpSweep);
    let mut command = ControlCommand::default();

    let first = chirp
        .excite(ENTRY_TIME + 7.0, ExcitationMode::ChirpSweep, &mut command)
        .expect("window A active");
    let second = chirp
        .excite(ENTRY_TIME + 7.0, ExcitationMode::ChirpSweep, &mut command)
        .expect("window A active");

    assert_eq!(first, second);
    assert_eq!(command.pitch_excite, first.sample);
    assert_close(command.left_surface3, 2.0 * first.sample);
    assert_close(command.right_surface3, 2.0 * first.sample);
}

#[test]
fn switching_modes_mid_run_keeps_the_first_latch() {
    let mut chirp = armed(ExcitationMode::Doublet);
    let mut command = ControlCommand::default();

    let excitation = chirp
        .excite(ENTRY_TIME + 25.0, ExcitationMode::ThreeTwoOneOne, &mut command)
        .expect("window B active relative to the first call");

    assert_eq!(excitation.mode, ExcitationMode::ThreeTwoOneOne);
    assert_close(excitation.local_time, 25.0);
    assert_close(excitation.sample, closed_form(5.0, 5.0));
}

#[test]
fn clock_before_the_latch_excites_nothing() {
    let mut chirp = armed(ExcitationMode::ChirpSweep);
    let mut command = baseline();

    for offset in [-0.02, -1.0, -30.0] {
        assert!(chirp
            .excite(ENTRY_TIME + offset, ExcitationMode::ChirpSweep, &mut command)
            .is_none());
    }

    assert_eq!(command, baseline());
    assert_eq!(chirp.state().entry_time(), Some(ENTRY_TIME));
}
