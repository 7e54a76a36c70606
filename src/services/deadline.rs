use std::time::{Duration, Instant};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("timed out after {}s", .0.as_secs())]
pub struct Elapsed(pub Duration);

/// Time budget for a whole invocation. Each network call gets whatever is left.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Result<Duration, Elapsed> {
        let left = self.budget.saturating_sub(self.started.elapsed());
        if left.is_zero() {
            return Err(Elapsed(self.budget));
        }
        Ok(left)
    }

    pub fn elapsed_error(&self) -> Elapsed {
        Elapsed(self.budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deadline_has_budget_left() {
        let d = Deadline::after(Duration::from_secs(120));
        let left = d.remaining().unwrap();
        assert!(left <= Duration::from_secs(120));
        assert!(left > Duration::from_secs(100));
    }

    #[test]
    fn zero_budget_is_already_spent() {
        let d = Deadline::after(Duration::ZERO);
        assert_eq!(d.remaining(), Err(Elapsed(Duration::ZERO)));
    }

    #[test]
    fn elapsed_message_reports_budget() {
        assert_eq!(
            Elapsed(Duration::from_secs(120)).to_string(),
            "timed out after 120s"
        );
    }
}
