//! Error kinds surfaced by the SST engine (spec §7).

use satra_core::StateId;

/// Failure of an SST operation.
///
/// Unlike [`satra_sfa::error::SfaError`], an SST can be malformed in ways
/// `mk_sst` can actually detect rather than silently filter: inconsistent
/// update lengths, undeclared variable references, and epsilon-closure tree
/// violations are all signaled synchronously, on construction or on the
/// first epsilon-elimination that walks the closure (spec §7 item 2).
#[derive(Debug, thiserror::Error)]
pub enum SstError<E> {
	#[error("operation on state {state} exceeded its {budget_ms}ms timeout budget")]
	Timeout { state: StateId, budget_ms: u64 },
	#[error(transparent)]
	Ba(E),
	#[error("update on state {state} has {found} registers, expected {expected}")]
	InconsistentUpdateLength { state: StateId, expected: usize, found: usize },
	#[error("update references undeclared variable {name:?}")]
	UndeclaredVariable { name: String },
	#[error("state {state} is reached by two distinct epsilon paths")]
	EpsilonTreeViolation { state: StateId },
	#[error("epsilon closure reaches distinct final states {states:?}")]
	AmbiguousFinalClosure { states: Vec<StateId> },
}

impl<E> SstError<E> {
	pub fn timeout(state: StateId, budget_ms: u64) -> Self {
		Self::Timeout { state, budget_ms }
	}
}
