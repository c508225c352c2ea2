//! Cooperative scheduling primitives
//!
//! Thin wrappers over the tokio runtime for the two collaborator interfaces
//! the connection layer suspends on: a tick-based delay and a bare yield.
//! Retry intervals throughout the crate are expressed in scheduler ticks.

use std::time::Duration;

/// Duration of one scheduler tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Suspend the current task for the given number of scheduler ticks.
///
/// A tick count of zero degenerates to a bare yield: other ready tasks run
/// before control returns, but no timer is armed.
pub async fn delay_ticks(ticks: u32) {
    if ticks == 0 {
        yield_now().await;
    } else {
        tokio::time::sleep(TICK_PERIOD * ticks).await;
    }
}

/// Voluntarily relinquish the CPU for the remainder of the current tick.
pub async fn yield_now() {
    tokio::task::yield_now().await;
}
