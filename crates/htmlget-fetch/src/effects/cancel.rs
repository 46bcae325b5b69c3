use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::core::CancelReason;

/// Shared cancellation flag for one in-flight request.
///
/// The first [`cancel`](CancelFlag::cancel) wins: its reason is kept and
/// later calls are ignored. Clones observe the same flag, so a request can
/// be cancelled from another task.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel with `reason`. Returns `false` if already cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        if self.reason.set(reason).is_err() {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<&CancelReason> {
        if self.is_cancelled() {
            self.reason.get()
        } else {
            None
        }
    }

    /// Resolves once the flag is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
