//! The SFA container and its invariants (spec §3 Data Model, "SFA").

use std::collections::{BTreeMap, BTreeSet};

use satra_core::{EpsilonMove, InputMove, StateId};

/// A symbolic finite automaton.
///
/// Immutable after construction: every field below is only ever populated
/// by [`crate::construct::mk_sfa`] or by one of this crate's algorithms,
/// never mutated afterwards. `isDeterministic`/`isEpsilonFree`/`isTotal`/
/// `isEmpty` are memoized at build time (spec §9 "Global mutable state:
/// none"); nothing in this crate ever recomputes them lazily.
#[derive(Clone)]
pub struct Sfa<P> {
	pub(crate) states: BTreeSet<StateId>,
	pub(crate) initial: StateId,
	pub(crate) finals: BTreeSet<StateId>,
	pub(crate) input_moves: BTreeMap<StateId, Vec<InputMove<P>>>,
	pub(crate) epsilon_moves: BTreeMap<StateId, Vec<EpsilonMove>>,
	pub(crate) is_deterministic: bool,
	pub(crate) is_epsilon_free: bool,
	pub(crate) is_total: bool,
	pub(crate) is_empty: bool,
	pub(crate) max_state_id: StateId,
}

impl<P: std::fmt::Debug> std::fmt::Debug for Sfa<P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Sfa")
			.field("states", &self.states)
			.field("initial", &self.initial)
			.field("finals", &self.finals)
			.field("input_moves", &self.input_moves)
			.field("epsilon_moves", &self.epsilon_moves)
			.field("is_deterministic", &self.is_deterministic)
			.field("is_epsilon_free", &self.is_epsilon_free)
			.field("is_total", &self.is_total)
			.field("is_empty", &self.is_empty)
			.finish()
	}
}

impl<P> Sfa<P> {
	/// Every state of the automaton.
	pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.states.iter().copied()
	}

	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	pub fn transition_count(&self) -> usize {
		self.input_moves.values().map(Vec::len).sum::<usize>()
			+ self.epsilon_moves.values().map(Vec::len).sum::<usize>()
	}

	pub fn initial_state(&self) -> StateId {
		self.initial
	}

	pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.finals.iter().copied()
	}

	pub fn is_final(&self, state: StateId) -> bool {
		self.finals.contains(&state)
	}

	/// The next unused state id; fresh states allocated by a construction
	/// should start here to avoid colliding with this automaton's states.
	pub fn max_state_id(&self) -> StateId {
		self.max_state_id
	}

	pub fn get_input_moves_from(&self, state: StateId) -> &[InputMove<P>] {
		self.input_moves.get(&state).map_or(&[], Vec::as_slice)
	}

	pub fn get_input_moves_to(&self, state: StateId) -> impl Iterator<Item = &InputMove<P>> + '_ {
		self.input_moves
			.values()
			.flatten()
			.filter(move |m| m.to == state)
	}

	pub fn get_epsilon_from(&self, state: StateId) -> &[EpsilonMove] {
		self.epsilon_moves.get(&state).map_or(&[], Vec::as_slice)
	}

	pub fn get_epsilon_to(&self, state: StateId) -> impl Iterator<Item = &EpsilonMove> + '_ {
		self.epsilon_moves
			.values()
			.flatten()
			.filter(move |m| m.to == state)
	}

	pub fn all_input_moves(&self) -> impl Iterator<Item = &InputMove<P>> + '_ {
		self.input_moves.values().flatten()
	}

	pub fn all_epsilon_moves(&self) -> impl Iterator<Item = &EpsilonMove> + '_ {
		self.epsilon_moves.values().flatten()
	}

	pub fn is_deterministic(&self) -> bool {
		self.is_deterministic
	}

	pub fn is_epsilon_free(&self) -> bool {
		self.is_epsilon_free
	}

	pub fn is_total(&self) -> bool {
		self.is_total
	}

	/// Whether this automaton's language is empty.
	pub fn is_empty_language(&self) -> bool {
		self.is_empty
	}

	/// Builds an `Sfa` directly from its parts, without any of the
	/// validation [`crate::construct::mk_sfa`] performs.
	///
	/// Only used internally, by algorithms (determinize, minimize, product
	/// constructions, ...) that build a well-formed result by construction
	/// and don't need to re-derive it through the public constructor.
	pub(crate) fn from_parts(
		states: BTreeSet<StateId>,
		initial: StateId,
		finals: BTreeSet<StateId>,
		input_moves: BTreeMap<StateId, Vec<InputMove<P>>>,
		epsilon_moves: BTreeMap<StateId, Vec<EpsilonMove>>,
		is_deterministic: bool,
		is_epsilon_free: bool,
		is_total: bool,
	) -> Self {
		let max_state_id = states.iter().copied().max().map_or(0, |m| m + 1);
		let is_empty = finals.is_empty();
		Self {
			states,
			initial,
			finals,
			input_moves,
			epsilon_moves,
			is_deterministic,
			is_epsilon_free,
			is_total,
			is_empty,
			max_state_id,
		}
	}
}
