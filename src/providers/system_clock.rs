//! Wall-clock implementation of [`Clock`].

use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::traits::Clock;

/// Production clock reading the system time as the block timestamp.
///
/// For testing, use [`crate::testing::FakeClock`], which can be set and
/// advanced explicitly.
///
/// # Examples
///
/// ```rust
/// use bridge_ledger::providers::SystemClock;
/// use bridge_ledger::traits::Clock;
///
/// let clock = SystemClock::new();
/// assert!(clock.timestamp() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn timestamp(&self) -> u64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs(),
            Err(e) => {
                warn!(error = %e, event = "system_clock_before_epoch");
                0
            }
        }
    }
}
