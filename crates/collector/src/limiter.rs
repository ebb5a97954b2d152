//! Fixed-cadence cooperative throttle.

use std::sync::Arc;
use std::time::Duration;

use report::Delay;

/// Pauses the walk after every `every` repositories.
///
/// Purely time-based: no feedback from remaining-quota headers. The pause
/// runs through the injected [`Delay`], so tests tick through cadences
/// without real waiting.
pub struct RateLimiter {
    every: usize,
    pause: Duration,
    processed: usize,
    delay: Arc<dyn Delay>,
}

impl RateLimiter {
    /// The repository cadence used against the public API.
    pub const DEFAULT_EVERY: usize = 100;
    /// The pause applied at each cadence point.
    pub const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

    /// Creates a limiter with an explicit cadence and pause.
    pub fn new(every: usize, pause: Duration, delay: Arc<dyn Delay>) -> Self {
        Self {
            every: every.max(1),
            pause,
            processed: 0,
            delay,
        }
    }

    /// Creates a limiter with the default cadence.
    pub fn with_defaults(delay: Arc<dyn Delay>) -> Self {
        Self::new(Self::DEFAULT_EVERY, Self::DEFAULT_PAUSE, delay)
    }

    /// Counts one completed repository, pausing when the cadence is hit.
    ///
    /// Returns the pause that was applied, if any.
    pub async fn tick(&mut self) -> Option<Duration> {
        self.processed += 1;
        if self.processed % self.every == 0 {
            self.delay.sleep(self.pause).await;
            Some(self.pause)
        } else {
            None
        }
    }

    /// Repositories counted so far.
    pub fn processed(&self) -> usize {
        self.processed
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("every", &self.every)
            .field("pause", &self.pause)
            .field("processed", &self.processed)
            .finish()
    }
}
