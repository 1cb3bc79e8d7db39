//! Per-attempt observability hook.

use cascata_core::{DataKind, Symbol};

/// One adapter attempt inside a cascade.
///
/// The same fields are emitted as a `tracing` event (`info` on success,
/// `warn` otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    /// Requested symbol.
    pub symbol: Symbol,
    /// Data kind being cascaded.
    pub kind: DataKind,
    /// Connector name.
    pub adapter: &'static str,
    /// 1-based attempt number against this adapter.
    pub attempt: u32,
    /// `ok`, `timeout`, or the error's outcome label.
    pub outcome: &'static str,
    /// Wall time spent on the attempt.
    pub latency_ms: u64,
    /// Error message for failed attempts.
    pub error: Option<String>,
}

impl AttemptEvent {
    /// True for successful attempts.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome == "ok"
    }
}

/// Receives every [`AttemptEvent`]. Register with
/// [`CascataBuilder::observer`](crate::CascataBuilder::observer).
pub trait AttemptObserver: Send + Sync {
    /// Called synchronously after each attempt; keep it cheap.
    fn on_attempt(&self, event: &AttemptEvent);
}

impl<F> AttemptObserver for F
where
    F: Fn(&AttemptEvent) + Send + Sync,
{
    fn on_attempt(&self, event: &AttemptEvent) {
        self(event);
    }
}
