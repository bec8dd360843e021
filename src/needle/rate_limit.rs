use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Fixed-window limiter: at most `calls` Needle requests per `period`.
///
/// A caller over the budget sleeps until the window rolls over. The lock is
/// held while sleeping, so waiters are released in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    calls: u32,
    period: Duration,
    window: Mutex<Window>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    used: u32,
}

impl RateLimiter {
    pub fn new(calls: u32, period: Duration) -> Self {
        Self {
            calls,
            period,
            window: Mutex::new(Window {
                started: Instant::now(),
                used: 0,
            }),
        }
    }

    /// Wait for a slot in the current window
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;

        let now = Instant::now();
        if now.duration_since(window.started) >= self.period {
            window.started = now;
            window.used = 0;
        }

        if window.used >= self.calls {
            let resume = window.started + self.period;
            debug!(
                wait_ms = resume.saturating_duration_since(now).as_millis() as u64,
                "Needle rate limit reached, waiting for next window"
            );
            tokio::time::sleep_until(resume).await;
            window.started = Instant::now();
            window.used = 0;
        }

        window.used += 1;
    }
}
