// SPDX-License-Identifier: MPL-2.0
//! Cooperative cancellation for remote calls.
//!
//! Every photo request carries a [`CancellationToken`]. A newer query or
//! category change cancels the token of the request it supersedes; the
//! pending future is then dropped and the caller receives
//! [`Error::Cancelled`](crate::error::Error::Cancelled).

use crate::error::{Error, Result};
use std::future::Future;

pub use tokio_util::sync::CancellationToken;

/// Runs `future` until it completes or `cancel` fires, whichever is first.
///
/// A token that is already cancelled wins without polling the future.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = future => result,
    }
}

/// Returns [`Error::Cancelled`] if the token has fired.
pub fn check(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completed_future_returns_its_result() {
        let token = CancellationToken::new();
        let value = run_cancellable(&token, async { Ok(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_pending_future() {
        let token = CancellationToken::new();
        token.cancel();
        let value: Result<u32> = run_cancellable(&token, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        })
        .await;
        assert_eq!(value, Err(Error::Cancelled));
    }

    #[tokio::test]
    async fn cancelling_during_the_call_aborts_it() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            child.cancel();
        });
        let value: Result<u32> = run_cancellable(&token, std::future::pending()).await;
        assert!(value.unwrap_err().is_cancelled());
    }

    #[test]
    fn check_reports_cancellation() {
        let token = CancellationToken::new();
        assert!(check(&token).is_ok());
        token.cancel();
        assert_eq!(check(&token), Err(Error::Cancelled));
    }
}
