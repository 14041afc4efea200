use chrono::{DateTime, Utc};

/// Source of "now" for all freshness calculations.
///
/// Injected at construction so cache-expiration boundaries can be tested
/// deterministically without real time passing. Production code uses
/// [`SystemClock`]; tests supply their own implementation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
