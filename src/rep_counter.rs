//! Hysteretic squat repetition counter.
//!
//! A four-state machine driven purely by the knee angle. Hysteresis keeps
//! the state from flapping when the angle hovers near a threshold, a
//! post-rep cooldown blocks double counting, and a tracking timeout snaps
//! the machine back to standing when the signal goes stale.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::clock::Clock;
use crate::config::CounterConfig;
use crate::constants::FULLY_EXTENDED_ANGLE;

/// Phase of the squat movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquatState {
    /// Legs extended; the initial and only rep-completion state
    Standing,
    /// On the way down
    Descending,
    /// Below the bottom threshold
    Bottom,
    /// On the way back up
    Ascending,
}

/// Point-in-time view of the counter, published for the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepCounterSnapshot {
    pub rep_count: u32,
    pub state: SquatState,
    /// Last knee angle seen, or the fully-extended sentinel before any
    pub knee_angle: f32,
    pub is_tracking: bool,
    pub cooldown_remaining: Duration,
}

/// Session-scoped repetition counter.
pub struct RepCounter {
    config: CounterConfig,
    clock: Arc<dyn Clock>,
    rep_count: u32,
    state: SquatState,
    knee_angle: f32,
    last_update: Option<Instant>,
    last_rep_at: Option<Instant>,
}

impl RepCounter {
    #[must_use]
    pub fn new(config: CounterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            rep_count: 0,
            state: SquatState::Standing,
            knee_angle: FULLY_EXTENDED_ANGLE,
            last_update: None,
            last_rep_at: None,
        }
    }

    /// Feed a new knee angle; returns true when a repetition completed.
    ///
    /// A rep fires exactly on the Ascending-to-Standing transition and on
    /// no other. During the post-rep cooldown that transition is blocked,
    /// so the state holds at Ascending until the cooldown lapses or the
    /// angle drops back below the bottom threshold.
    pub fn update(&mut self, angle: f32) -> bool {
        let now = self.clock.now();
        self.expire_tracking(now);

        self.knee_angle = angle;
        self.last_update = Some(now);

        let standing = self.config.standing_angle_degrees;
        let bottom = self.config.bottom_angle_degrees;
        let descend_below = standing - self.config.hysteresis_degrees;
        let ascend_above = bottom + self.config.hysteresis_degrees;

        let mut completed = false;
        let next = match self.state {
            SquatState::Standing if angle < descend_below => SquatState::Descending,
            SquatState::Descending if angle < bottom => SquatState::Bottom,
            // Came back up without reaching depth: aborted rep
            SquatState::Descending if angle > standing => SquatState::Standing,
            SquatState::Bottom if angle > ascend_above => SquatState::Ascending,
            // Dropped back down mid-ascent
            SquatState::Ascending if angle < bottom => SquatState::Bottom,
            SquatState::Ascending if angle > standing => {
                if self.cooldown_remaining(now).is_zero() {
                    completed = true;
                    SquatState::Standing
                } else {
                    SquatState::Ascending
                }
            }
            state => state,
        };

        if next != self.state {
            debug!("squat state {:?} -> {:?} at {angle:.1} deg", self.state, next);
        }
        self.state = next;

        if completed {
            self.rep_count += 1;
            self.last_rep_at = Some(now);
            debug!("rep {} completed", self.rep_count);
        }
        completed
    }

    /// Current view of the counter, with the tracking timeout applied.
    pub fn snapshot(&mut self) -> RepCounterSnapshot {
        let now = self.clock.now();
        self.expire_tracking(now);
        RepCounterSnapshot {
            rep_count: self.rep_count,
            state: self.state,
            knee_angle: self.knee_angle,
            is_tracking: self
                .last_update
                .map_or(false, |at| now.duration_since(at) < self.config.tracking_timeout()),
            cooldown_remaining: self.cooldown_remaining(now),
        }
    }

    /// Reps counted so far this session.
    #[must_use]
    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Continuous 0.0-1.0 rep progress for UI animation.
    ///
    /// Piecewise linear: 0 while standing, 0 to 0.5 across the descent,
    /// pinned at 0.5 at the bottom, 0.5 to 1.0 across the ascent.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let standing = self.config.standing_angle_degrees;
        let bottom = self.config.bottom_angle_degrees;
        let band = standing - bottom;
        match self.state {
            SquatState::Standing => 0.0,
            SquatState::Descending => {
                let t = (standing - self.knee_angle) / band;
                0.5 * t.clamp(0.0, 1.0)
            }
            SquatState::Bottom => 0.5,
            SquatState::Ascending => {
                let t = (self.knee_angle - bottom) / band;
                0.5 + 0.5 * t.clamp(0.0, 1.0)
            }
        }
    }

    /// Restore the counter to its initial state. Idempotent.
    pub fn reset(&mut self) {
        self.rep_count = 0;
        self.state = SquatState::Standing;
        self.knee_angle = FULLY_EXTENDED_ANGLE;
        self.last_update = None;
        self.last_rep_at = None;
    }

    /// Testing affordance: bump the count and start the cooldown without
    /// driving the state machine. Not production logic.
    pub fn add_manual_rep(&mut self) {
        self.rep_count += 1;
        self.last_rep_at = Some(self.clock.now());
    }

    /// Snap back to standing when the angle signal has gone stale. Does
    /// not count as a transition for rep-completion purposes.
    fn expire_tracking(&mut self, now: Instant) {
        if let Some(at) = self.last_update {
            if now.duration_since(at) >= self.config.tracking_timeout()
                && self.state != SquatState::Standing
            {
                debug!("tracking lost, state {:?} -> Standing", self.state);
                self.state = SquatState::Standing;
            }
        }
    }

    fn cooldown_remaining(&self, now: Instant) -> Duration {
        self.last_rep_at.map_or(Duration::ZERO, |at| {
            self.config.rep_cooldown().saturating_sub(now.duration_since(at))
        })
    }
}
