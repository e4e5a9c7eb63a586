//! In-process timeout budgets for the long-running worklist algorithms.
//!
//! There is no file format, environment variable, or CLI flag for this (see
//! spec §6): every bounded operation is simply handed a [`TimeoutBudget`]
//! value by its caller.

use std::time::{Duration, Instant};

/// A wall-clock budget checked at coarse-grained safe points: per state
/// popped from a worklist, per minterm generated, per satisfiability query.
///
/// Cloning a budget does *not* reset its deadline; a budget is meant to be
/// threaded through a single operation (and the sub-operations it calls),
/// not restarted each time it crosses a function boundary.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBudget {
	deadline: Option<Instant>,
	budget_ms: u64,
}

impl TimeoutBudget {
	/// A budget that never expires.
	pub fn unbounded() -> Self {
		Self {
			deadline: None,
			budget_ms: 0,
		}
	}

	/// A budget of `millis` milliseconds starting now.
	pub fn from_millis(millis: u64) -> Self {
		Self {
			deadline: Some(Instant::now() + Duration::from_millis(millis)),
			budget_ms: millis,
		}
	}

	/// Checks the budget at a safe point, returning [`TimeoutExceeded`] if the
	/// deadline has passed.
	pub fn checkpoint(&self) -> Result<(), TimeoutExceeded> {
		match self.deadline {
			Some(deadline) if Instant::now() >= deadline => Err(TimeoutExceeded {
				budget_ms: self.budget_ms,
			}),
			_ => Ok(()),
		}
	}

	/// The budget's original length in milliseconds, or `0` for an unbounded
	/// budget.
	pub fn budget_ms(&self) -> u64 {
		self.budget_ms
	}
}

impl Default for TimeoutBudget {
	fn default() -> Self {
		Self::unbounded()
	}
}

/// A bounded operation exceeded its [`TimeoutBudget`].
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("operation exceeded its {budget_ms}ms timeout budget")]
pub struct TimeoutExceeded {
	pub budget_ms: u64,
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::thread::sleep;

	#[test]
	fn unbounded_never_expires() {
		let budget = TimeoutBudget::unbounded();
		sleep(Duration::from_millis(5));
		assert!(budget.checkpoint().is_ok());
	}

	#[test]
	fn bounded_expires() {
		let budget = TimeoutBudget::from_millis(1);
		sleep(Duration::from_millis(15));
		assert!(budget.checkpoint().is_err());
	}

	#[test]
	fn bounded_within_budget() {
		let budget = TimeoutBudget::from_millis(1000);
		assert!(budget.checkpoint().is_ok());
	}
}
