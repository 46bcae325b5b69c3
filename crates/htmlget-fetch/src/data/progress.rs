/// Transfer state of a response body, evaluated after every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Body bytes received so far.
    pub transferred: u64,

    /// Expected body length, if the transport knows it.
    pub total: Option<u64>,
}

impl Progress {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            transferred: 0,
            total,
        }
    }

    pub fn advance(&mut self, bytes: usize) {
        self.transferred = self.transferred.saturating_add(bytes as u64);
    }

    /// Fraction of the expected length received, `0.0` when the length is unknown.
    #[must_use]
    pub fn percent(&self) -> f64 {
        match self.total {
            Some(0) => 1.0,
            Some(total) => self.transferred as f64 / total as f64,
            None => 0.0,
        }
    }

    /// Returns `true` once exactly the expected length has arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total == Some(self.transferred)
    }
}
