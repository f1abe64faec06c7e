use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::error::{BlendError, Result};
use crate::optimizer::config::OptimizerConfig;

/// Iteration, deadline, and cancellation bookkeeping shared by every solver stage.
pub struct SolveBudget<'a> {
    max_iterations: usize,
    used: usize,
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> SolveBudget<'a> {
    pub fn new(config: &OptimizerConfig, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            max_iterations: config.max_iterations,
            used: 0,
            deadline: config.time_limit().map(|limit| Instant::now() + limit),
            cancel,
        }
    }

    /// Spend one iteration, failing once the cap, the deadline, or a cancel request is hit.
    pub fn tick(&mut self, stage: &str) -> Result<()> {
        if self.used >= self.max_iterations {
            return Err(BlendError::numerical(format!(
                "{} did not converge within {} iterations",
                stage, self.max_iterations
            )));
        }
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(BlendError::numerical(format!(
                "{} cancelled after {} iterations",
                stage, self.used
            )));
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(BlendError::numerical(format!(
                "{} exceeded its time limit after {} iterations",
                stage, self.used
            )));
        }
        self.used += 1;
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_cap() {
        let config = OptimizerConfig {
            max_iterations: 2,
            ..Default::default()
        };
        let mut budget = SolveBudget::new(&config, None);
        assert!(budget.tick("test").is_ok());
        assert!(budget.tick("test").is_ok());
        assert!(matches!(budget.tick("test"), Err(BlendError::Numerical(_))));
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn test_cancel_flag() {
        let flag = AtomicBool::new(false);
        let config = OptimizerConfig::default();
        let mut budget = SolveBudget::new(&config, Some(&flag));
        assert!(budget.tick("test").is_ok());

        flag.store(true, Ordering::Relaxed);
        assert!(matches!(budget.tick("test"), Err(BlendError::Numerical(_))));
    }

    #[test]
    fn test_expired_deadline() {
        let config = OptimizerConfig {
            time_limit_ms: Some(0),
            ..Default::default()
        };
        let mut budget = SolveBudget::new(&config, None);
        assert!(budget.tick("test").is_err());
    }
}
