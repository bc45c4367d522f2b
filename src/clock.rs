//! Time injection for deterministic timers.
//!
//! Every stateful component takes a clock at construction; cooldowns,
//! tracking timeouts and speech intervals are all evaluated against it.
//! Tests and recorded replays drive a [`ManualClock`] instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Clock abstraction shared by all stateful components.
pub trait Clock: Send + Sync {
    /// Monotonic now, used for cooldowns, timeouts and frame throttling
    fn now(&self) -> Instant;

    /// Whole seconds since the Unix epoch, used for affirmation rotation
    fn unix_seconds(&self) -> u64;
}

/// Production clock backed by the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// Manually advanced clock for tests and recorded replays.
pub struct ManualClock {
    origin: Instant,
    epoch_base: u64,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at its origin, with Unix time 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_epoch(0)
    }

    /// Create a clock whose Unix time starts at `epoch_seconds`.
    #[must_use]
    pub fn with_epoch(epoch_seconds: u64) -> Self {
        Self {
            origin: Instant::now(),
            epoch_base: epoch_seconds,
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Advance the clock by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset_nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute elapsed time since its origin.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.offset_nanos.store(elapsed.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Elapsed time since the clock's origin.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn unix_seconds(&self) -> u64 {
        self.epoch_base + self.elapsed().as_secs()
    }
}
