//! Message novelty and interval gating for vocalization.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::form::FeedbackCategory;

/// Decides whether a feedback message should be forwarded to the
/// vocalization sink, based on message novelty and elapsed time since the
/// last vocalization.
///
/// Two instances exist per session: the form analyzer's (3 s) proposes,
/// the session coordinator's (4 s) has final veto. Each keeps its own
/// last-message and last-time state.
pub struct SpeechGate {
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    last_message: Option<String>,
    last_voice_at: Option<Instant>,
}

impl SpeechGate {
    #[must_use]
    pub fn new(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_interval,
            last_message: None,
            last_voice_at: None,
        }
    }

    /// Apply the gate to a candidate message.
    ///
    /// The last-seen message is always updated; the last-voice time only
    /// when the message is admitted. Rules by category: Corrective speaks
    /// when the message is new OR the interval expired, Positive when new
    /// AND expired, Neutral never.
    pub fn admit(&mut self, message: &str, category: FeedbackCategory) -> bool {
        let now = self.clock.now();
        let is_new = self.last_message.as_deref() != Some(message);
        let interval_expired = self
            .last_voice_at
            .map_or(true, |at| now.duration_since(at) >= self.min_interval);

        self.last_message = Some(message.to_owned());

        let speak = match category {
            FeedbackCategory::Corrective => is_new || interval_expired,
            FeedbackCategory::Positive => is_new && interval_expired,
            FeedbackCategory::Neutral => false,
        };

        if speak {
            self.last_voice_at = Some(now);
        }
        speak
    }

    /// Forget gate history, as if no message had ever been seen.
    pub fn reset(&mut self) {
        self.last_message = None;
        self.last_voice_at = None;
    }
}
