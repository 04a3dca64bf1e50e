//! Clock selection per build target.

use std::sync::Arc;

use turbo_notify::Scheduler;

/// Timers on `window.setTimeout`.
#[cfg(any(feature = "hydrate", feature = "csr"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

#[cfg(any(feature = "hydrate", feature = "csr"))]
impl Scheduler for BrowserScheduler {
    /// `performance.now()`, which no clock adjustment can move backwards.
    /// Contexts without a window fall back to `Date.now()` throughout.
    fn now(&self) -> std::time::Duration {
        let millis = web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now);
        millis_to_duration(millis)
    }

    fn schedule(
        &self,
        delay: std::time::Duration,
        task: turbo_notify::scheduler::Task,
    ) -> turbo_notify::TimerHandle {
        match leptos::prelude::set_timeout_with_handle(task, delay) {
            Ok(handle) => turbo_notify::TimerHandle::new(move || handle.clear()),
            Err(err) => {
                tracing::warn!(?err, "failed to arm browser timer");
                turbo_notify::TimerHandle::inert()
            }
        }
    }
}

/// JS timestamps are fractional milliseconds.
#[cfg_attr(not(any(feature = "hydrate", feature = "csr")), allow(dead_code))]
fn millis_to_duration(millis: f64) -> std::time::Duration {
    if millis.is_finite() && millis > 0.0 {
        std::time::Duration::from_secs_f64(millis / 1000.0)
    } else {
        std::time::Duration::ZERO
    }
}

/// Browser timers in the client build.
#[cfg(any(feature = "hydrate", feature = "csr"))]
pub fn default_scheduler() -> Arc<dyn Scheduler> {
    Arc::new(BrowserScheduler)
}

/// Tokio timers during server rendering.
#[cfg(all(feature = "ssr", not(any(feature = "hydrate", feature = "csr"))))]
pub fn default_scheduler() -> Arc<dyn Scheduler> {
    Arc::new(turbo_notify::TokioScheduler::new())
}

/// Without a target runtime nothing advances time on its own.
#[cfg(not(any(feature = "ssr", feature = "hydrate", feature = "csr")))]
pub fn default_scheduler() -> Arc<dyn Scheduler> {
    Arc::new(turbo_notify::ManualScheduler::new())
}
