use std::time::Duration;

/// Bounds for a loop that waits on the automation API.
///
/// The default polls forever without pausing, which is how the notifier has
/// always waited for approvals and price estimates. Operators bound it by
/// setting `max_attempts` and/or an `interval`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PollPolicy {
    /// Upper bound on follow-up requests; `None` is unbounded.
    pub max_attempts: Option<u32>,

    /// Pause before each follow-up request.
    pub interval: Duration,
}

impl PollPolicy {
    pub const UNBOUNDED: Self = Self { max_attempts: None, interval: Duration::ZERO };

    #[must_use]
    pub const fn new(max_attempts: Option<u32>, interval: Duration) -> Self {
        Self { max_attempts, interval }
    }

    /// Whether another request may follow `attempts_made` earlier ones.
    #[must_use]
    pub const fn allows(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts_made < max,
            None => true,
        }
    }
}
