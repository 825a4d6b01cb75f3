//! Logging utilities for structured tracing

use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for host applications that have no subscriber of
/// their own. Safe to call once at startup; respects `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("emote_hub=info")),
        )
        .with_target(true)
        .init();
}

/// Track operation timing and log on drop
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Create a new timer for an operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_millis() as u64;
        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_timer_tracks_duration() {
        let _timer = Timer::new("test_operation");
        thread::sleep(Duration::from_millis(10));
        // Timer will log on drop
    }
}
