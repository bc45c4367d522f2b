//! Offline replay entry point for the squat coaching core.
//!
//! Replays a recorded pose session through the analysis pipeline at the
//! recorded timestamps, printing what the app would have spoken and the
//! final session summary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;
use squat_coach::clock::ManualClock;
use squat_coach::config::Config;
use squat_coach::error::PoseError;
use squat_coach::replay::Recording;
use squat_coach::session::{Cue, FrameOutcome, SessionCoordinator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded pose frames to replay (YAML)
    recording: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Only print the final summary, not per-frame output
    #[arg(short, long)]
    summary: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Squat Coach - offline replay");

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.validate()?;

    let recording = Recording::from_file(&args.recording)?;
    info!("Replaying {} frames", recording.frames.len());

    let clock = Arc::new(ManualClock::new());
    let mut session = SessionCoordinator::new(config, clock.clone());

    let mut voice_prompts = 0usize;
    for frame in &recording.frames {
        clock.set_elapsed(Duration::from_millis(frame.timestamp_ms));

        // An empty detection list means the detector found no body
        let observation = if frame.joints.is_empty() {
            Err(PoseError::NoObservation)
        } else {
            Ok(frame.joint_set())
        };

        if let FrameOutcome::Processed(update) = session.process_frame(observation) {
            for cue in &update.cues {
                match cue {
                    Cue::RepCompleted(count) => {
                        if !args.summary {
                            println!("[{:>7} ms] * rep {count}", frame.timestamp_ms);
                        }
                    }
                    Cue::DistanceOptimal => info!("distance optimal"),
                }
            }
            for request in &update.voice {
                voice_prompts += 1;
                if !args.summary {
                    let marker = if request.priority { "!" } else { " " };
                    println!("[{:>7} ms] {marker} say: {}", frame.timestamp_ms, request.text);
                }
            }
        }
    }

    let summary = session.snapshot();
    println!(
        "Session complete: {} reps, average form score {:.0}, {} frames processed, {} voice prompts",
        summary.rep_count, summary.average_form_score, summary.frames_processed, voice_prompts
    );

    Ok(())
}
