use std::future;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Deadline of the first tick plus the period, with the interval built on first wait
#[derive(Debug)]
struct Armed {
    start: Instant,
    period: Duration,
    interval: Option<Interval>,
}

/// Single-slot handle for the periodic tick that drives a session
///
/// Holds at most one armed timer. Scheduling always drops the previous one
/// first, so repeated start/resume calls never stack timers. Arming and
/// cancelling need no tokio runtime; only waiting in `tick()` does.
#[derive(Debug, Default)]
pub struct TickTimer {
    armed: Option<Armed>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Arm the timer; the first tick fires one full `period` from now
    pub fn schedule(&mut self, period: Duration) {
        self.cancel();

        self.armed = Some(Armed {
            start: Instant::now() + period,
            period,
            interval: None,
        });
    }

    /// Stop the timer; pending `tick()` calls never complete afterwards
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_active(&self) -> bool {
        self.armed.is_some()
    }

    /// Wait for the next tick
    ///
    /// Never resolves while the timer is cancelled. Cancel-safe, so it can be
    /// used as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        let Some(armed) = self.armed.as_mut() else {
            return future::pending::<()>().await;
        };

        let interval = armed.interval.get_or_insert_with(|| {
            let mut interval = interval_at(armed.start, armed.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}
