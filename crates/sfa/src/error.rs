//! Error kinds surfaced by the SFA engine (spec §7).

use satra_core::StateId;

/// Failure of an SFA operation.
///
/// There is no malformed-input variant here: [`crate::construct::mk_sfa`]
/// filters bad input (unsatisfiable guards, self-epsilons) rather than
/// rejecting it (spec §4.2), so the only ways an SFA operation can fail are
/// a blown timeout budget or a propagated BA failure.
#[derive(Debug, thiserror::Error)]
pub enum SfaError<E> {
	#[error("operation on state {state} exceeded its {budget_ms}ms timeout budget")]
	Timeout { state: StateId, budget_ms: u64 },
	#[error(transparent)]
	Ba(E),
}

impl<E> SfaError<E> {
	pub fn timeout(state: StateId, budget_ms: u64) -> Self {
		Self::Timeout { state, budget_ms }
	}
}
