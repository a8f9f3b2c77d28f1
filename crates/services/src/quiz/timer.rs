use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Default countdown resolution.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the repeating tick task. Dropping the guard cancels the task.
#[derive(Debug)]
pub(crate) struct TimerGuard {
    handle: JoinHandle<()>,
}

impl TimerGuard {
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Call `on_tick` every `period`, first after one full period, until it breaks.
///
/// Must be called from within a tokio runtime.
pub(crate) fn spawn_ticker<F>(period: Duration, mut on_tick: F) -> TimerGuard
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if on_tick().is_break() {
                break;
            }
        }
    });
    TimerGuard { handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_break() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let guard = spawn_ticker(Duration::from_secs(1), move || {
            if seen.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(guard.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_guard_stops_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let guard = spawn_ticker(Duration::from_secs(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        drop(guard);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
