use std::time::Duration;

/// Bound applied to each phase: DNS lookup, connect, TLS handshake,
/// time to first response byte and every socket read.
pub const PHASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound applied to the whole request, all phases included.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Ceiling on received body bytes (10 MiB).
pub const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// Resource bounds for a single fetch.
///
/// The defaults are the fixed production bounds. Requests are never
/// retried, so there is no retry setting.
///
/// # Examples
///
/// ```
/// use htmlget_fetch::Limits;
/// use std::time::Duration;
///
/// let limits = Limits::default().max_response_size(1024);
/// assert_eq!(limits.phase_timeout, Duration::from_secs(30));
/// assert_eq!(limits.max_response_size, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub phase_timeout: Duration,
    pub operation_timeout: Duration,
    pub max_response_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            phase_timeout: PHASE_TIMEOUT,
            operation_timeout: OPERATION_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl Limits {
    #[must_use]
    pub fn phase_timeout(mut self, timeout: Duration) -> Self {
        self.phase_timeout = timeout;
        self
    }

    #[must_use]
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = bytes;
        self
    }
}
