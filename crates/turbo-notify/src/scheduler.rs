//! Timer scheduling.
//!
//! Notification timers are armed through a [`Scheduler`] so the same state
//! machine runs on tokio, in the browser, or under a manual test clock.
//! Every armed timer is owned by a [`TimerHandle`]; dropping the handle
//! cancels the timer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A deferred task.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Source of time and timers.
pub trait Scheduler: Send + Sync + 'static {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// Owner of one pending timer. Cancels it on drop.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    /// Create a handle that runs `cancel` when dropped or cancelled.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Scheduler backed by the tokio timer wheel.
///
/// Timers are spawned on the current runtime. Outside a runtime the timer is
/// not armed and a warning is logged.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    origin: tokio::time::Instant,
}

#[cfg(feature = "tokio")]
impl TokioScheduler {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "tokio")]
impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tokio")]
impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        tokio::time::Instant::now().saturating_duration_since(self.origin)
    }

    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let join = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task();
                });
                TimerHandle::new(move || join.abort())
            }
            Err(_) => {
                tracing::warn!(?delay, "no tokio runtime, timer not armed");
                TimerHandle::inert()
            }
        }
    }
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
///
/// Due tasks run on the caller's thread, in due order, outside any lock, so
/// a task may schedule further timers that fall inside the same advance.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, running every task that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;

        loop {
            let task = {
                let mut state = self.state.lock();
                let due = state
                    .pending
                    .keys()
                    .next()
                    .copied()
                    .filter(|(at, _)| *at <= target);
                match due {
                    Some(key) => {
                        state.now = key.0;
                        state.pending.remove(&key)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.state.lock().now
    }

    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let key = {
            let mut state = self.state.lock();
            let key = (state.now + delay, state.next_seq);
            state.next_seq += 1;
            state.pending.insert(key, task);
            key
        };

        let state = Arc::downgrade(&self.state);
        TimerHandle::new(move || {
            if let Some(state) = state.upgrade() {
                state.lock().pending.remove(&key);
            }
        })
    }
}
