//! Transport integration tests
//!
//! Motion, declicked track switching and locating, follower cursors.

use approx::assert_relative_eq;
use memovision::MotionState;

use crate::helpers::tolerances::*;
use crate::helpers::*;

/// Operations are ignored until every view has loaded.
#[test]
fn test_transport_gated_until_ready() {
    let mut f = Fixture::three_tracks();
    f.session.play_pause();
    f.session.select_track(2);
    f.advance(0.1);

    assert_eq!(f.session.motion(), MotionState::Stopped);
    assert_eq!(f.session.active(), 0);
    assert!(f.log.records().is_empty());
    assert_eq!(f.session.transport().relay_source(), None);

    f.mark_all_ready();
    assert_eq!(f.session.transport().relay_source(), Some(0));
    assert_eq!(f.session.registry().playing_flags(), &[true, false, false]);
}

/// Play starts the active track at silence and fades in.
#[test]
fn test_transport_play_fades_in() {
    let mut f = Fixture::ready();
    assert_eq!(f.gain.get(), 0.0);

    f.session.play_pause();
    assert_eq!(f.log.for_track(0), vec![PlayerOp::Play]);

    let gains = f.advance(0.02);
    assert!(gains[0] > 0.0 && gains[0] < 1.0, "first tick gain {}", gains[0]);
    assert_relative_eq!(*gains.last().unwrap(), 1.0, epsilon = GAIN_EPSILON);
    assert!(f.session.is_playing());
    assert!(f.is_audible(0));
}

/// Pausing fades out before the player stops.
#[test]
fn test_transport_pause_after_fade_out() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.play_pause();
    assert_eq!(f.session.motion(), MotionState::DeclickToStop);
    assert!(f.is_audible(0), "player must keep running during the fade");

    f.settle();
    assert_eq!(f.session.motion(), MotionState::Stopped);
    assert_eq!(f.log.for_track(0), vec![PlayerOp::Pause]);
    assert!(!f.is_audible(0));
    assert_eq!(f.gain.get(), 0.0);
}

/// Play during the stop fade cancels the pause.
#[test]
fn test_transport_resume_during_stop() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.play_pause();
    f.advance(1.0 / TICK_HZ);
    f.session.play_pause();
    f.settle();

    assert_eq!(f.session.motion(), MotionState::Rolling);
    assert!(f.log.for_track(0).is_empty());
    assert!(f.is_audible(0));
    assert_relative_eq!(f.gain.get(), 1.0, epsilon = GAIN_EPSILON);
}

/// Switching while playing pauses the old track and continues
/// the new one from the mapped position.
#[test]
fn test_transport_switch_while_playing() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(2.0);
    f.log.clear();

    f.session.select_track(1);
    assert_eq!(f.session.active(), 0, "swap waits for silence");
    f.settle();

    assert_eq!(f.session.active(), 1);
    assert!(!f.is_audible(0));
    assert!(f.is_audible(1));
    assert_eq!(f.log.for_track(0), vec![PlayerOp::Pause]);

    let mapped = f.session.mapper().to_other_track(0, 1, f.position(0));
    assert_eq!(
        f.log.for_track(1),
        vec![PlayerOp::Seek(mapped), PlayerOp::Play]
    );
    assert_eq!(f.session.registry().playing_flags(), &[false, true, false]);
    assert_eq!(f.session.transport().relay_source(), Some(1));
}

/// A second switch before the first completes replaces its target;
/// the intermediate track is never touched.
#[test]
fn test_transport_overlapping_switches() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.select_track(1);
    f.session.select_track(2);

    for _ in 0..12 {
        f.advance(1.0 / TICK_HZ);
        let audible = (0..3).filter(|&t| f.is_audible(t)).count();
        assert!(audible <= 1, "{audible} tracks audible at once");
    }

    assert_eq!(f.session.active(), 2);
    assert!(f.log.for_track(1).is_empty());
    assert!(f.is_audible(2));
    assert!(!f.is_audible(1));
    assert_eq!(f.session.registry().playing_flags(), &[false, false, true]);
}

/// Exactly one playing flag at every tick while playing, through switches.
#[test]
fn test_transport_single_active_flag() {
    let mut f = Fixture::ready();
    f.session.play_pause();

    for target in [1, 2, 0, 2] {
        f.session.select_track(target);
        for _ in 0..10 {
            f.advance(1.0 / TICK_HZ);
            let flags = f.session.registry().playing_flags();
            assert_eq!(flags.iter().filter(|&&p| p).count(), 1, "{flags:?}");
        }
    }
    assert_eq!(f.session.active(), 2);
}

/// Switching while stopped moves the active role without starting audio.
#[test]
fn test_transport_switch_while_stopped() {
    let mut f = Fixture::ready();
    f.session.seek(30.0);
    f.log.clear();

    f.session.select_track(2);
    assert_eq!(f.session.active(), 2);
    assert_eq!(f.session.motion(), MotionState::Stopped);

    let mapped = f.session.mapper().to_other_track(0, 2, 30.0);
    assert_eq!(f.log.for_track(0), vec![PlayerOp::Pause]);
    assert_eq!(f.log.for_track(2), vec![PlayerOp::Seek(mapped)]);
    assert!(!f.is_audible(2));
    assert_eq!(f.gain.get(), 0.0);
}

/// Every player call happens at silence, and the gain comes back after.
#[test]
fn test_transport_operations_run_at_silence() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.session.select_track(2);
    f.advance(0.5);
    f.session.go_to_measure(3);
    f.advance(0.5);
    f.session.rewind();
    f.advance(0.5);
    assert_relative_eq!(f.gain.get(), 1.0, epsilon = GAIN_EPSILON);
    f.session.play_pause();
    f.settle();

    let records = f.log.records();
    assert!(records.len() >= 7, "{records:?}");
    for record in records {
        assert_eq!(record.gain, 0.0, "{record:?} ran with audible output");
    }
}

/// The output dips below the volume before the swap and recovers within
/// the fade window after it.
#[test]
fn test_transport_switch_fade_shape() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);

    f.session.select_track(1);
    let gains = f.advance(0.05);

    let silent_at = gains.iter().position(|&g| g == 0.0).unwrap();
    assert!(silent_at > 0);
    assert!(gains[..silent_at].iter().all(|&g| g > 0.0 && g < 1.0), "{gains:?}");

    let fade_ticks = (f.session.config().fade_secs * TICK_HZ).ceil() as usize + 1;
    assert_relative_eq!(gains[silent_at + fade_ticks], 1.0, epsilon = GAIN_EPSILON);
}

/// Rewind without a selected region returns to 0.
#[test]
fn test_transport_rewind_to_start() {
    let mut f = Fixture::ready();
    f.session.seek(40.0);
    assert_relative_eq!(f.position(0), 40.0);

    f.session.rewind();
    assert_eq!(f.position(0), 0.0);
    assert_eq!(f.log.for_track(0).last(), Some(&PlayerOp::Seek(0.0)));
}

/// A second locate while one waits for silence is dropped.
#[test]
fn test_transport_locate_dropped_while_pending() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.go_to_measure(2);
    f.session.go_to_measure(4);
    f.settle();

    let seeks: Vec<_> = f
        .log
        .for_track(0)
        .into_iter()
        .filter(|op| matches!(op, PlayerOp::Seek(_)))
        .collect();
    assert_eq!(seeks, vec![PlayerOp::Seek(5.0)]);
    assert!(f.session.is_playing());
}

/// A measure requested while a switch waits for silence lands on the new
/// track's own measure map.
#[test]
fn test_transport_measure_after_pending_switch() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.select_track(1);
    f.session.go_to_measure(3);
    f.settle();

    let start = measure_table(DURATIONS[1])[4];
    let seeks: Vec<_> = f
        .log
        .for_track(1)
        .into_iter()
        .filter(|op| matches!(op, PlayerOp::Seek(_)))
        .collect();
    assert_eq!(seeks.last(), Some(&PlayerOp::Seek(start)));
    assert_eq!(f.log.for_track(0), vec![PlayerOp::Pause]);
    assert_eq!(f.session.active(), 1);
    assert!(f.session.is_playing());
}

/// A seek issued before a pending switch completes is carried over to the
/// new track through the sync mapping.
#[test]
fn test_transport_seek_after_pending_switch() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);
    f.log.clear();

    f.session.select_track(2);
    f.session.seek(30.0);
    f.settle();

    let mapped = f.session.mapper().to_other_track(0, 2, 30.0);
    let seeks: Vec<_> = f
        .log
        .for_track(2)
        .into_iter()
        .filter(|op| matches!(op, PlayerOp::Seek(_)))
        .collect();
    assert_eq!(seeks.last(), Some(&PlayerOp::Seek(mapped)));
    assert!(!f.log.for_track(0).contains(&PlayerOp::Seek(30.0)));
    assert!(f.is_audible(2));
}

#[test]
fn test_transport_measure_navigation() {
    let mut f = Fixture::ready();
    assert_eq!(f.session.current_measure(), None);

    f.session.go_to_measure(3);
    assert_eq!(f.position(0), 7.0);
    assert_eq!(f.session.current_measure(), Some(3));

    f.session.step_measure(1);
    assert_eq!(f.position(0), 9.0);
    f.session.step_measure(-2);
    assert_eq!(f.position(0), 5.0);

    // Past the last measure clamps to the final boundary
    f.session.go_to_measure(99);
    assert_eq!(f.position(0), 13.0);
}

/// Followers show the mapped position of the source.
#[test]
fn test_transport_followers_track_source() {
    let mut f = Fixture::ready();
    f.session.play_pause();
    f.advance(1.0);

    let registry = f.session.registry();
    let source = registry.time(0);
    assert!(source > 0.9 && source <= 1.0 + TICK_TOLERANCE, "source at {source}");
    for track in [1, 2] {
        let expected = f.session.mapper().follower_time(0, track, source);
        assert_eq!(registry.time(track), expected);
        assert_eq!(f.view(track).playhead, expected);
    }
    assert!(!f.is_audible(1) && !f.is_audible(2));
}

/// A track that plays to its end stops the transport through a fade.
#[test]
fn test_transport_stops_at_track_end() {
    let mut f = Fixture::ready();
    f.session.seek(119.9);
    f.session.play_pause();
    f.advance(0.5);

    assert_eq!(f.session.motion(), MotionState::Stopped);
    assert!(!f.session.is_playing());
    assert_relative_eq!(f.position(0), 120.0, epsilon = TIME_EPSILON);
    assert_eq!(f.gain.get(), 0.0);
}

#[test]
fn test_transport_volume() {
    let mut f = Fixture::ready();
    f.session.set_volume(0.5);
    assert_eq!(f.gain.get(), 0.0, "volume is not applied while stopped");

    f.session.play_pause();
    f.settle();
    assert_relative_eq!(f.gain.get(), 0.5, epsilon = GAIN_EPSILON);

    f.session.set_volume(0.8);
    assert_relative_eq!(f.gain.get(), 0.8, epsilon = GAIN_EPSILON);
    assert_relative_eq!(f.session.transport().volume(), 0.8);
}
