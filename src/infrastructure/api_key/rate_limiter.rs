//! Rate limiter implementation
//!
//! Provides sliding window rate limiting keyed by an opaque identity string
//! (an API key id, or a client address for anonymous routes).
//!
//! Each identity owns its own window behind its own lock, so the
//! evict/count/append sequence is atomic per identity while different
//! identities never wait on each other. The identity map itself is only
//! write-locked to create a window or to sweep idle ones.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::infrastructure::clock::{Clock, SystemClock};

/// Length of the sliding window
pub const WINDOW: Duration = Duration::from_secs(60);

/// Default interval between idle-window sweeps
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until a slot frees up (in seconds)
    pub reset_in_seconds: u64,
}

/// Admission instants for one identity, oldest first
#[derive(Debug)]
struct RateWindow {
    key_id: String,
    timestamps: VecDeque<Instant>,
}

impl RateWindow {
    fn new(key_id: &str) -> Self {
        Self {
            key_id: key_id.to_string(),
            timestamps: VecDeque::new(),
        }
    }

    /// Drop every timestamp that has aged out of the window
    fn evict(&mut self, now: Instant, window: Duration) {
        while let Some(oldest) = self.timestamps.front() {
            if now.duration_since(*oldest) < window {
                break;
            }
            self.timestamps.pop_front();
        }
    }

    fn len(&self) -> u32 {
        self.timestamps.len() as u32
    }

    fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Whole seconds until the oldest timestamp leaves the window
    fn reset_in_seconds(&self, now: Instant, window: Duration) -> u64 {
        let remaining = self
            .timestamps
            .front()
            .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(window);

        let secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
    }
}

/// Sliding window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Per-identity windows
    windows: RwLock<HashMap<String, Arc<Mutex<RateWindow>>>>,
    window: Duration,
    clock: Arc<dyn Clock>,
    /// Cleanup interval
    cleanup_interval: Duration,
    started: Instant,
    /// Millis since `started` of the last sweep
    last_cleanup_millis: AtomicU64,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a rate limiter reading time from the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let started = clock.now();

        Self {
            windows: RwLock::new(HashMap::new()),
            window: WINDOW,
            clock,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            started,
            last_cleanup_millis: AtomicU64::new(0),
        }
    }

    /// Set how often idle windows are swept
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Admit or deny one request for `key_id` under `limit` requests per window
    pub async fn admit(&self, key_id: &str, limit: u32) -> bool {
        self.check_and_record(key_id, limit).await.allowed
    }

    /// Check the limit and record the request if it is admitted
    ///
    /// Denied requests are not recorded.
    pub async fn check_and_record(&self, key_id: &str, limit: u32) -> RateLimitResult {
        self.maybe_cleanup().await;

        let window = self.window_for(key_id).await;
        let mut window = window.lock().await;

        // Read under the lock so timestamps stay ordered per identity
        let now = self.clock.now();
        window.evict(now, self.window);

        let count = window.len();

        if count >= limit {
            debug!(key_id = %window.key_id, limit, "Rate limit reached");

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit,
                reset_in_seconds: window.reset_in_seconds(now, self.window),
            };
        }

        window.timestamps.push_back(now);

        RateLimitResult {
            allowed: true,
            remaining: limit - count - 1,
            limit,
            reset_in_seconds: window.reset_in_seconds(now, self.window),
        }
    }

    /// Number of identities currently holding a window
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Remove windows that are empty once aged-out timestamps are evicted
    ///
    /// Windows another task currently holds are left alone. Returns the
    /// number of windows removed.
    pub async fn sweep_idle(&self) -> usize {
        let now = self.clock.now();
        let span = self.window;
        let mut windows = self.windows.write().await;
        let before = windows.len();

        windows.retain(|_, window| {
            if Arc::strong_count(window) > 1 {
                return true;
            }

            match window.try_lock() {
                Ok(mut w) => {
                    w.evict(now, span);
                    !w.is_empty()
                }
                Err(_) => true,
            }
        });

        before - windows.len()
    }

    async fn window_for(&self, key_id: &str) -> Arc<Mutex<RateWindow>> {
        {
            let windows = self.windows.read().await;
            if let Some(window) = windows.get(key_id) {
                return Arc::clone(window);
            }
        }

        let mut windows = self.windows.write().await;
        let window = windows
            .entry(key_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(RateWindow::new(key_id))));

        Arc::clone(window)
    }

    async fn maybe_cleanup(&self) {
        let elapsed = self.clock.now().duration_since(self.started).as_millis() as u64;
        let last = self.last_cleanup_millis.load(Ordering::Relaxed);

        if elapsed.saturating_sub(last) < self.cleanup_interval.as_millis() as u64 {
            return;
        }

        // Only one caller wins the right to sweep for this interval
        if self
            .last_cleanup_millis
            .compare_exchange(last, elapsed, Ordering::AcqRel, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        let removed = self.sweep_idle().await;

        if removed > 0 {
            debug!(removed, "Swept idle rate limit windows");
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
