//!  src/util/debounce.rs
//!  ===================================================================
//!  Debounce / Throttle utilities
//!
//!  • Trailing-edge debouncer: an event is emitted on a channel once the
//!    configured quiet period has elapsed without another trigger.
//!  • The pending timer is a plain `tokio` task; re-triggering aborts it,
//!    and so do `cancel()` and `Drop`, so nothing outlives the owner.

use std::time::{Duration, Instant};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant as TokioInstant, sleep_until},
};
use tracing::{debug, trace};

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay: Duration,
    /// Upper bound between the first trigger of a burst and the emission.
    pub max_delay: Option<Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_dispatch()
    }
}

impl DebounceConfig {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_delay: None,
        }
    }

    /// Gate for the actual search call
    #[must_use]
    pub const fn search_dispatch() -> Self {
        Self::new(Duration::from_millis(900))
    }

    /// Gate for the loading placeholders, shorter than the search gate so
    /// fast typers never see them flash
    #[must_use]
    pub const fn loading_indicator() -> Self {
        Self::new(Duration::from_millis(350))
    }

    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }
}

/* ============================ Debouncer ============================ */

/// Single-slot trailing debouncer. Owns its timer task.
#[derive(Debug)]
pub struct Debouncer<T> {
    cfg: DebounceConfig,
    name: &'static str,
    tx: mpsc::UnboundedSender<T>,
    sleeper: Option<JoinHandle<()>>,
    burst_start: TokioInstant,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer that emits on `tx`.
    #[must_use]
    pub fn new(name: &'static str, cfg: DebounceConfig, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            cfg,
            name,
            tx,
            sleeper: None,
            burst_start: TokioInstant::now(),
        }
    }

    /// (Re)schedule `ev`. Any emission still pending is dropped.
    pub fn trigger(&mut self, ev: T) {
        trace!("Debouncer '{}' triggered", self.name);

        let now = TokioInstant::now();
        let continuing = self.sleeper.take().is_some_and(|handle| {
            let running = !handle.is_finished();
            handle.abort();
            running
        });
        if !continuing {
            self.burst_start = now;
        }

        let delay_deadline = now + self.cfg.delay;
        let deadline = self
            .cfg
            .max_delay
            .map_or(delay_deadline, |d| delay_deadline.min(self.burst_start + d));

        let tx = self.tx.clone();
        let name = self.name;
        self.sleeper = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!("Debouncer '{}' firing", name);
            let _ = tx.send(ev);
        }));
    }

    /// Drop the pending emission, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            debug!("Debouncer '{}' cancelled", self.name);
            handle.abort();
        }
    }

    /// Whether an emission is still scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.sleeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.cfg.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

/* ============================ Throttler ============================ */

//  Simple rate-limiter for infrequent operations.
#[derive(Debug)]
pub struct Throttler {
    //  Moment when the previous trigger occurred.
    last: Option<Instant>,
    //  Minimum interval required between triggers.
    interval: Duration,
}

impl Throttler {
    /// Create a new throttler.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            last: None,
            interval,
        }
    }

    /// Returns true when an operation may run.
    pub fn should_trigger(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            None => {
                self.last = Some(now);
                true
            }
            Some(prev) if now.duration_since(prev) >= self.interval => {
                self.last = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Reset the internal timer to allow the next call immediately.
    pub const fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::{advance, sleep};

    async fn settle() {
        // let spawned sleepers observe the advanced clock
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_once_with_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut deb = Debouncer::new("test", DebounceConfig::new(Duration::from_millis(900)), tx);

        for q in ["c", "ca", "cat", "cats"] {
            deb.trigger(q);
            advance(Duration::from_millis(200)).await;
            settle().await;
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        sleep(Duration::from_millis(900)).await;
        settle().await;

        assert_eq!(rx.try_recv(), Ok("cats"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(!deb.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_emission() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut deb = Debouncer::new("test", DebounceConfig::loading_indicator(), tx);

        deb.trigger(1u8);
        assert!(deb.is_pending());
        deb.cancel();

        sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut deb = Debouncer::new("test", DebounceConfig::search_dispatch(), tx);
            deb.trigger(());
        }

        sleep(Duration::from_secs(2)).await;
        settle().await;
        // sender dropped with the debouncer, nothing was sent
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_delay_caps_a_long_burst() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cfg = DebounceConfig::new(Duration::from_millis(300))
            .with_max_delay(Duration::from_millis(1000));
        let mut deb = Debouncer::new("test", cfg, tx);

        let mut fired_at = None;
        for step in 0..8u32 {
            deb.trigger(step);
            advance(Duration::from_millis(200)).await;
            settle().await;
            if let Ok(v) = rx.try_recv() {
                fired_at = Some(v);
                break;
            }
        }

        // 200ms cadence never leaves a 300ms gap, the cap forces a flush
        assert!(matches!(fired_at, Some(v) if (3..=5).contains(&v)));
    }

    #[test]
    fn test_throttler_blocks_within_interval() {
        let mut throttle = Throttler::new(Duration::from_secs(60));
        assert!(throttle.should_trigger());
        assert!(!throttle.should_trigger());
        throttle.reset();
        assert!(throttle.should_trigger());
    }
}
