//! Call pacing and retry for provider calls

mod rate_gate;
mod retry;

pub use rate_gate::MinIntervalGate;
pub use retry::RetryPolicy;
