use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum spacing between consecutive calls
///
/// Callers queue on the gate, so the spacing holds across concurrent tasks.
/// A zero interval disables the gate.
#[derive(Debug)]
pub struct MinIntervalGate {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl MinIntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a call is allowed, then record it
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let next_allowed = last + self.interval;
            if next_allowed > Instant::now() {
                tokio::time::sleep_until(next_allowed).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
