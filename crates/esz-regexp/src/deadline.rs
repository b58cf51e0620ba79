use crate::error::RegexError;
use std::time::{Duration, Instant};

/// Wall-clock budget shared by the parse and emit phases.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub(crate) fn new(budget: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            budget,
        }
    }

    #[inline]
    pub(crate) fn check(&self) -> Result<(), RegexError> {
        if self.started.elapsed() > self.budget {
            tracing::debug!(budget = ?self.budget, "regex translation deadline exceeded");
            return Err(RegexError::Timeout(self.budget));
        }
        Ok(())
    }
}
