//! Per-frame session orchestration.
//!
//! The coordinator owns every stateful analysis component for one session
//! and wires them together: throttled frame intake, distance guidance,
//! form analysis, knee-angle forwarding to the rep counter, and the final
//! say on what gets vocalized. All outputs are plain data; the caller
//! forwards them to the vocalization, haptic and UI collaborators.

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::distance::{DistanceClassification, DistanceClassifier};
use crate::error::PoseError;
use crate::form::{FeedbackCategory, FormAnalyzer, SquatAnalysis};
use crate::joints::JointSet;
use crate::rep_counter::{RepCounter, RepCounterSnapshot, SquatState};
use crate::speech::SpeechGate;

/// Fallback message when the pose source found no body
pub const MSG_POSITION_IN_VIEW: &str = "Position yourself in view";

/// Fallback message when too few confident joints were detected
pub const MSG_MOVE_CLOSER: &str = "Move closer to the camera";

/// Generic message for pose-source failures
pub const MSG_CAMERA_ERROR: &str = "Camera error";

/// One-shot prompt when the user has stayed too close for too long
pub const MSG_STEP_BACK: &str = "Step back a little";

/// A request for the external vocalization sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRequest {
    pub text: String,
    /// Interrupt current playback rather than queueing behind it
    pub priority: bool,
}

/// Fire-and-forget trigger for the external haptic/sound sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A repetition just completed, with the new total
    RepCompleted(u32),
    /// The user just reached the optimal camera distance
    DistanceOptimal,
}

/// Result of feeding one frame to the coordinator.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    /// Frame arrived inside the throttle window or while stopped
    Dropped,
    Processed(FrameUpdate),
}

/// Everything one accepted frame produced.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub analysis: SquatAnalysis,
    pub rep: RepCounterSnapshot,
    pub distance: DistanceClassification,
    /// Continuous rep progress for UI animation
    pub progress: f32,
    /// Whether the pose source itself is in a failed state
    pub camera_error: bool,
    pub voice: Vec<VoiceRequest>,
    pub cues: Vec<Cue>,
}

/// Pollable UI state, refreshed on every accepted frame.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub rep_count: u32,
    pub state: SquatState,
    pub progress: f32,
    pub form_score: u8,
    pub feedback: String,
    pub category: FeedbackCategory,
    pub distance: DistanceClassification,
    pub is_tracking: bool,
    pub camera_error: bool,
    pub frames_processed: u64,
    pub average_form_score: f32,
}

/// Orchestrates one coaching session. Owns all per-session mutable state;
/// nothing here is shared across sessions.
pub struct SessionCoordinator {
    config: Config,
    clock: Arc<dyn Clock>,
    form: FormAnalyzer,
    counter: RepCounter,
    distance: DistanceClassifier,
    gate: SpeechGate,
    running: bool,
    last_accepted: Option<Instant>,
    last_distance: DistanceClassification,
    too_close_since: Option<Instant>,
    step_back_armed: bool,
    camera_error: bool,
    last_feedback: String,
    last_category: FeedbackCategory,
    last_form_score: u8,
    frames_processed: u64,
    form_score_sum: u64,
}

impl SessionCoordinator {
    #[must_use]
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let form = FormAnalyzer::new(config.form.clone(), clock.clone());
        let counter = RepCounter::new(config.counter.clone(), clock.clone());
        let distance = DistanceClassifier::new(config.distance.clone());
        let gate = SpeechGate::new(config.session.voice_interval(), clock.clone());
        Self {
            config,
            clock,
            form,
            counter,
            distance,
            gate,
            running: true,
            last_accepted: None,
            last_distance: DistanceClassification::Unknown,
            too_close_since: None,
            step_back_armed: true,
            camera_error: false,
            last_feedback: MSG_POSITION_IN_VIEW.to_owned(),
            last_category: FeedbackCategory::Neutral,
            last_form_score: 0,
            frames_processed: 0,
            form_score_sum: 0,
        }
    }

    /// Feed one frame's observation from the pose source.
    ///
    /// Frames arriving faster than the configured interval are dropped,
    /// not queued. Source failures produce a degraded-but-valid update
    /// carrying the matching fallback message; nothing here is fatal.
    pub fn process_frame(&mut self, observation: Result<JointSet, PoseError>) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Dropped;
        }

        let now = self.clock.now();
        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.config.session.min_frame_interval() {
                return FrameOutcome::Dropped;
            }
        }
        self.last_accepted = Some(now);

        let update = match observation {
            Ok(joints) => self.process_joints(&joints, now),
            Err(err) => self.process_pose_error(&err),
        };

        self.last_feedback = update.analysis.feedback.clone();
        self.last_category = update.analysis.category;
        self.last_form_score = update.analysis.form_score;
        self.frames_processed += 1;
        self.form_score_sum += u64::from(update.analysis.form_score);

        FrameOutcome::Processed(update)
    }

    fn process_joints(&mut self, joints: &JointSet, now: Instant) -> FrameUpdate {
        self.camera_error = false;
        let mut voice = Vec::new();
        let mut cues = Vec::new();

        let distance = self.distance.classify(joints);
        self.distance_guidance(distance, now, &mut voice, &mut cues);

        let analysis = self.form.analyze(joints);

        let mut completed = false;
        if let Some(angle) = analysis.knee_angle {
            completed = self.counter.update(angle);
        }
        let rep = self.counter.snapshot();

        if completed {
            cues.push(Cue::RepCompleted(rep.rep_count));
            info!("rep {} completed", rep.rep_count);
            // Each count is a novel message; the gate only suppresses a
            // stuck repeat inside its interval
            let announcement = rep.rep_count.to_string();
            if self.gate.admit(&announcement, FeedbackCategory::Corrective) {
                voice.push(VoiceRequest {
                    text: announcement,
                    priority: true,
                });
            }
        }

        // The analyzer's gate proposes; this gate has the final veto
        if analysis.should_speak && self.gate.admit(&analysis.feedback, analysis.category) {
            voice.push(VoiceRequest {
                text: analysis.feedback.clone(),
                priority: false,
            });
        }

        FrameUpdate {
            progress: self.counter.progress(),
            analysis,
            rep,
            distance,
            camera_error: false,
            voice,
            cues,
        }
    }

    /// Map a pose-source failure onto its fallback message and a degraded
    /// update. The rep counter's timers still advance, so tracking can
    /// expire while the source is down.
    fn process_pose_error(&mut self, err: &PoseError) -> FrameUpdate {
        warn!("pose source reported: {err}");
        let (message, camera_error) = match err {
            PoseError::NoObservation => (MSG_POSITION_IN_VIEW, false),
            PoseError::InsufficientJoints => (MSG_MOVE_CLOSER, false),
            PoseError::SourceFailure(_) => (MSG_CAMERA_ERROR, true),
        };
        self.camera_error = camera_error;

        // No joints this frame: the distance streak resets
        let distance = self.distance.classify(&JointSet::default());

        FrameUpdate {
            analysis: SquatAnalysis::unavailable(message),
            rep: self.counter.snapshot(),
            distance,
            progress: self.counter.progress(),
            camera_error,
            voice: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// One-shot step-back prompt after a sustained too-close stretch,
    /// re-armed only once the user has been at the optimal distance.
    fn distance_guidance(
        &mut self,
        distance: DistanceClassification,
        now: Instant,
        voice: &mut Vec<VoiceRequest>,
        cues: &mut Vec<Cue>,
    ) {
        match distance {
            DistanceClassification::TooClose => {
                let since = *self.too_close_since.get_or_insert(now);
                if self.step_back_armed
                    && now.duration_since(since) >= self.config.session.step_back_after()
                {
                    voice.push(VoiceRequest {
                        text: MSG_STEP_BACK.to_owned(),
                        priority: true,
                    });
                    self.step_back_armed = false;
                }
            }
            DistanceClassification::Optimal => {
                self.too_close_since = None;
                self.step_back_armed = true;
                if self.last_distance != DistanceClassification::Optimal {
                    cues.push(Cue::DistanceOptimal);
                }
            }
            DistanceClassification::TooFar | DistanceClassification::Unknown => {
                self.too_close_since = None;
            }
        }
        self.last_distance = distance;
    }

    /// Stop accepting frames. Rep count and all analysis state stay
    /// intact; stop is not reset.
    pub fn stop(&mut self) {
        self.running = false;
        info!("session stopped at {} reps", self.counter.rep_count());
    }

    /// Resume accepting frames after a stop.
    pub fn resume(&mut self) {
        self.running = true;
        self.last_accepted = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the session over: counters, gates, smoothing and statistics.
    pub fn reset(&mut self) {
        self.counter.reset();
        self.form.reset();
        self.distance.reset();
        self.gate.reset();
        self.last_accepted = None;
        self.last_distance = DistanceClassification::Unknown;
        self.too_close_since = None;
        self.step_back_armed = true;
        self.camera_error = false;
        self.last_feedback = MSG_POSITION_IN_VIEW.to_owned();
        self.last_category = FeedbackCategory::Neutral;
        self.last_form_score = 0;
        self.frames_processed = 0;
        self.form_score_sum = 0;
    }

    /// Current pollable UI state.
    pub fn snapshot(&mut self) -> SessionSnapshot {
        let rep = self.counter.snapshot();
        SessionSnapshot {
            rep_count: rep.rep_count,
            state: rep.state,
            progress: self.counter.progress(),
            form_score: self.last_form_score,
            feedback: self.last_feedback.clone(),
            category: self.last_category,
            distance: self.distance.last(),
            is_tracking: rep.is_tracking,
            camera_error: self.camera_error,
            frames_processed: self.frames_processed,
            average_form_score: if self.frames_processed == 0 {
                0.0
            } else {
                self.form_score_sum as f32 / self.frames_processed as f32
            },
        }
    }
}
