use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current time in milliseconds. Injected so that debouncing and
/// grace delays can be tested without waiting.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn starting_at(ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A deferred action that fires once its deadline passes, unless cancelled first.
/// The owner polls it; nothing runs in the background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    due_ms: u64,
    cancelled: bool,
}

impl ScheduledTask {
    pub fn after(now_ms: u64, delay_ms: u64) -> Self {
        Self {
            due_ms: now_ms.saturating_add(delay_ms),
            cancelled: false,
        }
    }

    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        !self.cancelled && now_ms >= self.due_ms
    }
}
