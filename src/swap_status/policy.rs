use std::time::Duration;

/// Polling configuration for the reconciliation loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two rounds
    pub round_interval: Duration,
    /// Pause after a poll that returned an error
    pub error_cooldown: Duration,
    /// Stop after this many rounds (None polls until convergence)
    pub max_rounds: Option<u32>,
    /// Stop once this much time has elapsed since the first round
    pub deadline: Option<Duration>,
    /// Status queries in flight per round
    pub concurrency: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            round_interval: Duration::from_secs(20), // ~3 rounds per minute
            error_cooldown: Duration::from_secs(5),
            max_rounds: None,
            deadline: None,
            concurrency: 1,
        }
    }
}

impl PollPolicy {
    pub fn with_round_interval(mut self, interval: Duration) -> Self {
        self.round_interval = interval;
        self
    }

    pub fn with_error_cooldown(mut self, cooldown: Duration) -> Self {
        self.error_cooldown = cooldown;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn round_limit_reached(&self, rounds: u32) -> bool {
        self.max_rounds.map(|max| rounds >= max).unwrap_or(false)
    }

    pub fn deadline_passed(&self, elapsed: Duration) -> bool {
        self.deadline.map(|deadline| elapsed >= deadline).unwrap_or(false)
    }
}
