//! Retry-with-yield combinator
//!
//! The accept and send loops share the same shape: attempt a non-blocking
//! operation, suspend for a fixed number of scheduler ticks when it would
//! block, bail out on anything fatal. Expressing that shape once keeps the
//! yield discipline uniform and gives callers a single place to layer
//! deadlines on top (wrap the returned future in `tokio::time::timeout`).

use crate::sched;

/// Outcome of a single attempt of a non-blocking operation.
pub enum Attempt<T, E> {
    /// The operation completed.
    Ready(T),
    /// The operation would block; suspend and try again.
    Pending,
    /// The operation failed for good.
    Fatal(E),
}

/// Run `attempt` until it is [`Attempt::Ready`] or [`Attempt::Fatal`],
/// suspending for `ticks` scheduler ticks after every pending attempt.
///
/// Every retry interval includes a voluntary yield, so a pending operation
/// never starves other cooperative tasks. There is no retry bound; callers
/// needing a deadline must impose one around the returned future.
pub async fn retry_with_yield<T, E, F>(ticks: u32, mut attempt: F) -> Result<T, E>
where
    F: FnMut() -> Attempt<T, E>,
{
    loop {
        match attempt() {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Fatal(err) => return Err(err),
            Attempt::Pending => sched::delay_ticks(ticks).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_ready_value_after_pending_attempts() {
        let mut remaining = 3;
        let result: Result<&str, ()> = retry_with_yield(0, || {
            if remaining > 0 {
                remaining -= 1;
                Attempt::Pending
            } else {
                Attempt::Ready("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn fatal_short_circuits_without_retry() {
        let mut attempts = 0;
        let result: Result<(), &str> = retry_with_yield(0, || {
            attempts += 1;
            Attempt::Fatal("broken")
        })
        .await;

        assert_eq!(result.unwrap_err(), "broken");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn immediate_ready_never_suspends() {
        let result: Result<u32, ()> = retry_with_yield(10, || Attempt::Ready(7)).await;
        assert_eq!(result.unwrap(), 7);
    }
}
