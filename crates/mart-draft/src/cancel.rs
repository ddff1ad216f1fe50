//! Cancellation of outstanding drafting requests.
//!
//! A [`DraftSession`] lives as long as the form that issued the requests.
//! Closing the session (explicitly or by dropping it) cancels every
//! [`CancelToken`] handed out by it; guarded requests are dropped, which
//! aborts the underlying HTTP exchange, and resolve to
//! [`DraftError::Cancelled`].

use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{DraftError, DraftResult};

pub struct DraftSession {
    cancelled: watch::Sender<bool>,
}

#[derive(Clone, Debug)]
pub struct CancelToken {
    cancelled: watch::Receiver<bool>,
}

impl DraftSession {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self { cancelled }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            cancelled: self.cancelled.subscribe(),
        }
    }

    /// Cancel every token of this session.
    pub fn cancel(&self) {
        if !self.cancelled.send_replace(true) {
            debug!("draft session cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

impl Default for DraftSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DraftSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Resolves once the session is cancelled or gone.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.clone();
        // An error means the session was dropped, which also cancels.
        let _ = rx.wait_for(|c| *c).await;
    }

    /// Run `request` unless the session is cancelled first.
    ///
    /// A result that arrives after cancellation is discarded.
    pub async fn guard<T, F>(&self, request: F) -> DraftResult<T>
    where
        F: Future<Output = DraftResult<T>>,
    {
        if self.is_cancelled() {
            return Err(DraftError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(DraftError::Cancelled),
            result = request => {
                if self.is_cancelled() {
                    debug!("discarding drafting result that arrived after cancellation");
                    Err(DraftError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn guard_passes_result_through() {
        let session = DraftSession::new();
        let token = session.token();
        let value = token.guard(async { Ok::<_, DraftError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn cancel_interrupts_pending_request() {
        let session = DraftSession::new();
        let token = session.token();

        let pending = tokio::spawn(async move {
            token
                .guard(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, DraftError>("late")
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        session.cancel();
        let result = pending.await.unwrap();
        assert!(matches!(result, Err(DraftError::Cancelled)));
    }

    #[tokio::test]
    async fn dropping_session_cancels_tokens() {
        let session = DraftSession::new();
        let token = session.token();
        drop(session);

        assert!(token.is_cancelled());
        let result = token.guard(async { Ok::<_, DraftError>(1) }).await;
        assert!(matches!(result, Err(DraftError::Cancelled)));
    }

    #[tokio::test]
    async fn errors_pass_through_uncancelled() {
        let session = DraftSession::new();
        let result = session
            .token()
            .guard(async { Err::<(), _>(DraftError::MissingCredential) })
            .await;
        assert!(matches!(result, Err(DraftError::MissingCredential)));
        assert!(!session.is_cancelled());
    }
}
