//! Shared foundations for the `satra` symbolic automata and symbolic
//! streaming string transducer engines.
//!
//! This crate owns the three things both engines need and neither owns: the
//! Boolean algebra contract ([`ba`]), the tagged move representation
//! ([`moves`]), and a handful of small worklist utilities ([`union_find`],
//! [`partition`]) used by the equivalence and minimization algorithms.

pub mod ba;
pub mod budget;
pub mod moves;
pub mod partition;
pub mod union_find;

pub use ba::BooleanAlgebra;
pub use budget::TimeoutBudget;
pub use moves::{EpsilonMove, InputMove};

/// Identifier for a single automaton state.
///
/// Opaque and unique only within one automaton; states are not semantically
/// tied across automata and are expected to be renumbered after product
/// constructions.
pub type StateId = usize;

/// An unordered pair of states, used as a worklist/visited-set key by the
/// product-style constructions (intersection, Hopcroft-Karp, ambiguity
/// detection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair(pub StateId, pub StateId);

impl Pair {
	pub fn new(a: StateId, b: StateId) -> Self {
		Self(a, b)
	}
}
