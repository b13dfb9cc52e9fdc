//! # Headless Playback
//!
//! Load three performances of the same piece, play the reference, switch
//! tracks mid-measure and watch the followers through the monitor.
//!
//! **Concepts:** Loading, declicked switching, command queue, playback monitor
//!
//! ```bash
//! RUST_LOG=memovision_core=debug cargo run --example headless_playback
//! ```

use memovision::prelude::*;
use tracing_subscriber::EnvFilter;

const TRACKS: &str = r#"[
    {"filename": "karajan-1963.wav", "length_sec": 24.0, "reference": true, "sync": true, "gt_measures": true},
    {"filename": "kleiber-1975.wav", "length_sec": 21.6, "sync": true, "tf_measures": true},
    {"filename": "harnoncourt-1990.wav", "length_sec": 26.4, "sync": true, "tf_measures": true},
    {"filename": "rehearsal.wav", "length_sec": 600.0}
]"#;

const SYNC: &str = r#"{"syncPoints": [
    [0, 4, 8, 12, 16, 20, 24],
    [0, 3.6, 7.2, 10.8, 14.4, 18.0, 21.6],
    [0, 4.4, 8.8, 13.2, 17.6, 22.0, 26.4]
]}"#;

const MEASURES: &str = r#"[
    {"filename": "karajan-1963.wav", "reference": true, "gt_measures": [0, 2, 6, 10, 14, 18, 22, 24]},
    {"filename": "kleiber-1975.wav", "tf_measures": [0, 1.8, 5.4, 9.0, 12.6, 16.2, 19.8, 21.6]},
    {"filename": "harnoncourt-1990.wav", "tf_measures": [0, 2.2, 6.6, 11.0, 15.4, 19.8, 24.2, 26.4]}
]"#;

const FRAME: f64 = 1.0 / 60.0;

fn run(session: &mut PlayerSession, clock: &ManualClock, secs: f64) {
    let frames = (secs / FRAME).round() as usize;
    for _ in 0..frames {
        clock.advance(FRAME);
        session.tick();
    }
}

fn report(monitor: &PlaybackMonitor) {
    let times: Vec<String> = monitor.times().iter().map(|t| format!("{t:6.2}")).collect();
    println!(
        "active {} | {:?} | measure {:?} | cursors [{}]",
        monitor.active(),
        monitor.motion(),
        monitor.current_measure(),
        times.join(", ")
    );
}

fn main() -> memovision::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = ManualClock::new(0.0);
    let mut session =
        SessionLoader::from_json(TRACKS, SYNC, MEASURES)?.headless(Arc::new(clock.clone()))?;
    let monitor = session.monitor();
    let commands = session.command_sender();

    for track in 0..session.track_count() {
        session.mark_view_ready(track);
    }
    println!("{} tracks ready", session.track_count());

    commands.send_key(" ");
    run(&mut session, &clock, 3.0);
    report(&monitor);

    // Switch to the second performance; it picks up at the same musical point
    commands.send_key("ArrowDown");
    run(&mut session, &clock, 2.0);
    report(&monitor);

    commands.send(TransportCommand::GoToMeasure(4));
    run(&mut session, &clock, 1.0);
    report(&monitor);

    // Loop measures 1-2 on every track
    commands.send(TransportCommand::ZoomOnMeasures(Some(MeasureSpan::new(1, 2))));
    run(&mut session, &clock, 0.1);
    commands.send_key(" ");
    run(&mut session, &clock, 12.0);
    report(&monitor);

    let region = session.region_payload("opening")?;
    println!(
        "region '{}': {:.2}s - {:.2}s ({:.2}s)",
        region.region_name, region.start_time, region.end_time, region.length_sec
    );

    commands.send_key(" ");
    run(&mut session, &clock, 0.1);
    report(&monitor);

    Ok(())
}
