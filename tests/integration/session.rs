//! Session integration tests
//!
//! Cross-thread commands, the playback monitor, measure markers, region
//! saving and reset.

use std::sync::Mutex;
use std::thread;

use approx::assert_relative_eq;
use memovision::core::{Error, RegionPayload, Result};
use memovision::{MeasureSpan, MotionState, RegionStore, TransportCommand};

use crate::helpers::tolerances::*;
use crate::helpers::*;

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_session_commands_from_another_thread() {
    let mut f = Fixture::ready();
    let sender = f.session.command_sender();

    let handle = thread::spawn(move || {
        assert!(sender.send(TransportCommand::PlayPause));
        assert!(sender.send(TransportCommand::SelectTrack(2)));
    });
    handle.join().unwrap();

    // Nothing happens until the session's own thread ticks
    assert_eq!(f.session.motion(), MotionState::Stopped);
    assert!(f.log.records().is_empty());

    f.advance(1.0 / TICK_HZ);
    assert_eq!(f.log.for_track(0).first(), Some(&PlayerOp::Play));
    f.settle();

    assert_eq!(f.session.active(), 2);
    assert!(f.is_audible(2));
    assert!(f.session.is_playing());
}

#[test]
fn test_session_key_bindings() {
    let mut f = Fixture::ready();
    f.session.seek(40.0);
    let sender = f.session.command_sender();

    assert!(sender.send_key("ArrowDown"));
    assert!(sender.send_key("Home"));
    assert!(!sender.send_key("q"));
    f.advance(1.0 / TICK_HZ);

    assert_eq!(f.session.active(), 1);
    assert_eq!(f.position(1), 0.0);
}

#[test]
fn test_session_volume_command_clamps() {
    let mut f = Fixture::ready();
    f.session.apply(TransportCommand::SetVolume(2.0));
    assert_relative_eq!(f.session.transport().volume(), 1.0);
    f.session.apply(TransportCommand::SetVolume(-1.0));
    assert_relative_eq!(f.session.transport().volume(), 0.0);
}

#[test]
fn test_session_track_stepping_stops_at_ends() {
    let mut f = Fixture::ready();
    f.session.select_previous();
    assert_eq!(f.session.active(), 0);

    f.session.select_next();
    f.session.select_next();
    f.session.select_next();
    assert_eq!(f.session.active(), 2);

    f.session.select_previous();
    assert_eq!(f.session.active(), 1);
}

#[test]
fn test_session_waveform_press_switches_track() {
    let mut f = Fixture::ready();
    f.session.on_waveform_pressed(0);
    assert!(f.log.records().is_empty(), "pressing the active track is a no-op");

    f.session.on_waveform_pressed(2);
    assert_eq!(f.session.active(), 2);
}

#[test]
fn test_session_measure_steps_from_before_first_measure() {
    let mut f = Fixture::ready();
    f.session.step_measure(-1);
    assert!(f.log.records().is_empty());

    f.session.step_measure(1);
    assert_eq!(f.position(0), REFERENCE_MEASURES[1]);

    // Past the last measure is ignored
    f.session.go_to_measure(5);
    f.session.step_measure(1);
    assert_eq!(f.position(0), REFERENCE_MEASURES[6]);
}

// =============================================================================
// Monitor
// =============================================================================

#[test]
fn test_session_monitor_load_progress() {
    let mut f = Fixture::three_tracks();
    let monitor = f.session.monitor();
    assert_eq!(monitor.load_progress(), 0);

    f.session.mark_view_ready(1);
    assert_eq!(monitor.load_progress(), 33);
    assert!(!f.session.is_ready());

    f.session.mark_view_ready(0);
    f.session.mark_view_ready(2);
    assert_eq!(monitor.load_progress(), 100);
    assert!(f.session.is_ready());
}

#[test]
fn test_session_monitor_follows_ticks() {
    let mut f = Fixture::ready();
    let monitor = f.session.monitor();

    f.session.go_to_measure(3);
    f.advance(1.0 / TICK_HZ);
    assert_eq!(monitor.current_measure(), Some(3));
    assert_eq!(monitor.motion(), MotionState::Stopped);

    f.session.play_pause();
    f.advance(0.5);
    assert!(monitor.is_playing());
    assert_eq!(monitor.motion(), MotionState::Rolling);
    assert_eq!(monitor.time(0), f.session.registry().time(0));
    assert_eq!(monitor.times().len(), DURATIONS.len());

    f.session.select_track(1);
    f.settle();
    assert_eq!(monitor.active(), 1);

    // Readable from another thread
    let reader = monitor.clone();
    let active = thread::spawn(move || reader.active()).join().unwrap();
    assert_eq!(active, 1);
}

// =============================================================================
// Measures and regions
// =============================================================================

#[test]
fn test_session_toggle_measures() {
    let mut f = Fixture::ready();
    let markers = REFERENCE_MEASURES.len() - 2;
    assert!(f.session.measures_visible());
    assert_eq!(f.view(0).points.len(), markers);

    f.session.toggle_measures();
    assert!(!f.session.measures_visible());
    for track in 0..DURATIONS.len() {
        assert!(f.view(track).points.is_empty());
    }

    f.session.toggle_measures();
    let view = f.view(2);
    assert_eq!(view.points.len(), markers);
    assert_eq!(view.points[0].label_text, "1");
    assert_relative_eq!(view.points[0].time, measure_table(DURATIONS[2])[1]);
}

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<RegionPayload>>,
}

impl RegionStore for MemoryStore {
    fn save_region(&self, region: &RegionPayload) -> Result<()> {
        self.saved.lock().unwrap().push(region.clone());
        Ok(())
    }
}

struct FailingStore;

impl RegionStore for FailingStore {
    fn save_region(&self, _region: &RegionPayload) -> Result<()> {
        Err(Error::Persistence("backend returned 500".into()))
    }
}

#[test]
fn test_session_region_payload_requires_name_and_region() {
    let mut f = Fixture::ready();
    assert!(matches!(
        f.session.region_payload("theme"),
        Err(Error::NoRegionSelected)
    ));

    f.session.zoom_on_measure_selection(Some(MeasureSpan::new(2, 5)));
    assert!(matches!(f.session.region_payload("   "), Err(Error::UnnamedRegion)));

    let payload = f.session.region_payload("  main theme ").unwrap();
    assert_eq!(payload.region_name, "main theme");
    assert_eq!((payload.start_time, payload.end_time), (5.0, 13.0));
    assert_eq!(payload.length_sec, 8.0);
    assert_eq!((payload.start_measure_idx, payload.end_measure_idx), (2, 5));

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["regionName"], "main theme");
    assert_eq!(json["startMeasureIdx"], 2);
}

#[test]
fn test_session_save_region() {
    let mut f = Fixture::ready();
    f.session.zoom_on_measure_selection(Some(MeasureSpan::new(2, 5)));

    let store = MemoryStore::default();
    let payload = f.session.save_region("theme", &store).unwrap();
    assert_eq!(store.saved.lock().unwrap().as_slice(), &[payload]);
}

#[test]
fn test_session_failed_save_keeps_selection() {
    let mut f = Fixture::ready();
    f.session.zoom_on_measure_selection(Some(MeasureSpan::new(2, 5)));

    let result = f.session.save_region("theme", &FailingStore);
    assert!(matches!(result, Err(Error::Persistence(_))));
    assert!(f.session.registry().has_selection());
    assert_eq!(f.session.zoom().selection(), Some(MeasureSpan::new(2, 5)));
}

// =============================================================================
// Reset
// =============================================================================

#[test]
fn test_session_reset() {
    let mut f = Fixture::ready();
    f.session.zoom_on_measure_selection(Some(MeasureSpan::new(1, 3)));
    f.session.play_pause();
    f.advance(1.0);
    f.session
        .command_sender()
        .send(TransportCommand::SelectTrack(2));

    f.session.reset();

    assert_eq!(f.session.motion(), MotionState::Stopped);
    assert_eq!(f.session.active(), 0);
    assert!(!f.session.is_ready());
    assert!(!f.session.measures_visible());
    assert_eq!(f.session.zoom().selection(), None);
    assert!(!f.session.registry().has_selection());
    assert_eq!(f.session.transport().relay_source(), None);
    for track in 0..DURATIONS.len() {
        assert!(!f.is_audible(track));
        assert_relative_eq!(f.position(track), 0.0, epsilon = TIME_EPSILON);
        let view = f.view(track);
        assert!(view.segments.is_empty());
        assert!(view.points.is_empty());
    }
    assert_eq!(f.session.monitor().load_progress(), 0);

    // The queued switch was dropped and the player is gated again
    f.log.clear();
    f.advance(0.1);
    assert!(f.log.records().is_empty());

    f.mark_all_ready();
    f.session.play_pause();
    f.settle();
    assert!(f.is_audible(0));
}
