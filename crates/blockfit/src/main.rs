//! Headless scripted puzzle run
//!
//! Drives a full session without a renderer: pieces get "grabbed", carried
//! toward the board with a little hand jitter, and released; the engine
//! snaps them, fires events, and the study timer records the completion
//! time. Useful for exercising the whole stack and for log inspection.

use blockfit::config::StudyConfig;
use blockfit::shapes;
use blockfit::study::{CompletionLog, SessionTimer};
use rand::Rng;
use snap_engine::events::{Event, EventHandler, EventType};
use snap_engine::foundation::logging;
use snap_engine::prelude::*;

/// Logs snap and completion events the way an audio/haptics layer would
/// consume them.
struct FeedbackLogger;

impl EventHandler for FeedbackLogger {
    fn on_event(&mut self, event: &Event) -> bool {
        match event.event_type {
            EventType::ShapeSnapped => {
                let cells = event.get_cell_count().unwrap_or(0);
                let delta = event.get_snap_delta().unwrap_or(0.0);
                log::info!(
                    "tick {}: snap ({cells} cells, delta {delta:.3})",
                    event.tick
                );
            }
            EventType::PuzzleCompleted => {
                log::info!("tick {}: puzzle completed", event.tick);
            }
            EventType::ShapeGrabbed => log::info!("tick {}: piece grabbed", event.tick),
            EventType::ShapeReleased => log::info!("tick {}: piece released", event.tick),
        }
        false
    }
}

/// Carry a piece to a target position over a few held ticks, then release
fn carry_and_release(
    session: &mut PuzzleSession,
    rng: &mut impl Rng,
    key: ShapeKey,
    target: Vec3,
    ticks: u32,
) {
    session.set_grab(key, true);
    let start = session
        .shape(key)
        .map(|shape| shape.pose().position)
        .unwrap_or_else(Vec3::zeros);

    for i in 1..=ticks {
        let t = i as f32 / ticks as f32;
        let jitter = Vec3::new(
            rng.gen_range(-0.02..0.02),
            rng.gen_range(-0.02..0.02),
            rng.gen_range(-0.02..0.02),
        );
        session.set_pose(key, Pose::from_position(start.lerp(&target, t) + jitter));
        session.tick();
    }

    session.set_grab(key, false);
    session.tick();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let study = StudyConfig::default();
    let condition = 2;
    let snap_distance = study
        .snap_distance_for(condition)
        .unwrap_or(study.default_snap_distance);

    let grid = GridSpace::lattice(Vec3::zeros(), 1.0, (2, 1, 2))?;
    let config = SnapConfig::default().with_snap_distance(snap_distance);
    let mut session = PuzzleSession::new(grid, config)?;

    for event_type in [
        EventType::ShapeGrabbed,
        EventType::ShapeReleased,
        EventType::ShapeSnapped,
        EventType::PuzzleCompleted,
    ] {
        session
            .events_mut()
            .register_handler(event_type, Box::new(FeedbackLogger));
    }

    let near = shapes::domino().spawn(&mut session, Pose::from_position(Vec3::new(3.0, 0.5, 0.0)))?;
    let far = shapes::domino().spawn(&mut session, Pose::from_position(Vec3::new(-3.0, 0.5, 1.0)))?;

    let mut rng = rand::thread_rng();
    let mut timer = SessionTimer::new();
    timer.start();

    carry_and_release(&mut session, &mut rng, near, Vec3::new(0.0, 0.0, 0.0), 8);
    carry_and_release(&mut session, &mut rng, far, Vec3::new(0.0, 0.0, 1.0), 8);

    // Let the board settle and the timer observe the final state
    for _ in 0..4 {
        session.tick();
        if let Some(time_seconds) = timer.observe(&session) {
            let recorder = CompletionLog::new(&study.results_file, study.participant_id.as_str());
            if let Err(err) = recorder.record(condition, snap_distance, time_seconds) {
                log::error!("could not record completion: {err}");
            }
        }
    }

    println!("{}", session.grid().occupancy_report("final board"));
    println!(
        "complete: {} ({}/{} cells) after {} ticks",
        session.is_complete(),
        session.grid().occupied_count(),
        session.grid().cell_count(),
        session.current_tick()
    );
    Ok(())
}
