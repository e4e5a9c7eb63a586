//! The SST container and its invariants (spec §3 Data Model, "SST").

use std::collections::{BTreeMap, BTreeSet};

use satra_core::{EpsilonMove, InputMove, StateId};

use crate::token::{FunctionalVariableUpdate, SimpleVariableUpdate};

/// A symbolic streaming string transducer: an SFA extended with a finite set
/// of string-valued registers updated simultaneously on each transition.
///
/// Immutable after construction, same as [`satra_sfa::Sfa`]. Final states
/// are exactly `output`'s keys (spec §3 invariant); there is no separate
/// finals set to keep in sync.
#[derive(Clone)]
pub struct Sst<P, S, F> {
	pub(crate) states: BTreeSet<StateId>,
	pub(crate) initial: StateId,
	pub(crate) variables: Vec<String>,
	pub(crate) variable_index: BTreeMap<String, usize>,
	pub(crate) output: BTreeMap<StateId, SimpleVariableUpdate<S>>,
	pub(crate) input_moves: BTreeMap<StateId, Vec<InputMove<P, FunctionalVariableUpdate<S, F>>>>,
	pub(crate) epsilon_moves: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<S>>>>,
	pub(crate) is_deterministic: bool,
	pub(crate) is_epsilon_free: bool,
	pub(crate) max_state_id: StateId,
}

impl<P, S, F> Sst<P, S, F> {
	pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.states.iter().copied()
	}

	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	pub fn transition_count(&self) -> usize {
		self.input_moves.values().map(Vec::len).sum::<usize>() + self.epsilon_moves.values().map(Vec::len).sum::<usize>()
	}

	pub fn initial_state(&self) -> StateId {
		self.initial
	}

	pub fn variables(&self) -> &[String] {
		&self.variables
	}

	pub fn variable_count(&self) -> usize {
		self.variables.len()
	}

	/// The dense index bound to a variable name, if declared.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.variable_index.get(name).copied()
	}

	pub fn is_final(&self, state: StateId) -> bool {
		self.output.contains_key(&state)
	}

	pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.output.keys().copied()
	}

	pub fn output_for(&self, state: StateId) -> Option<&SimpleVariableUpdate<S>> {
		self.output.get(&state)
	}

	/// The next unused state id; fresh states allocated by a construction
	/// should start here.
	pub fn max_state_id(&self) -> StateId {
		self.max_state_id
	}

	pub fn get_input_moves_from(&self, state: StateId) -> &[InputMove<P, FunctionalVariableUpdate<S, F>>] {
		self.input_moves.get(&state).map_or(&[], Vec::as_slice)
	}

	pub fn get_input_moves_to(&self, state: StateId) -> impl Iterator<Item = &InputMove<P, FunctionalVariableUpdate<S, F>>> + '_ {
		self.input_moves.values().flatten().filter(move |m| m.to == state)
	}

	pub fn get_epsilon_from(&self, state: StateId) -> &[EpsilonMove<SimpleVariableUpdate<S>>] {
		self.epsilon_moves.get(&state).map_or(&[], Vec::as_slice)
	}

	pub fn get_epsilon_to(&self, state: StateId) -> impl Iterator<Item = &EpsilonMove<SimpleVariableUpdate<S>>> + '_ {
		self.epsilon_moves.values().flatten().filter(move |m| m.to == state)
	}

	pub fn all_input_moves(&self) -> impl Iterator<Item = &InputMove<P, FunctionalVariableUpdate<S, F>>> + '_ {
		self.input_moves.values().flatten()
	}

	pub fn all_epsilon_moves(&self) -> impl Iterator<Item = &EpsilonMove<SimpleVariableUpdate<S>>> + '_ {
		self.epsilon_moves.values().flatten()
	}

	pub fn is_deterministic(&self) -> bool {
		self.is_deterministic
	}

	pub fn is_epsilon_free(&self) -> bool {
		self.is_epsilon_free
	}

	pub fn is_empty_language(&self) -> bool {
		self.output.is_empty()
	}

	/// Builds an `Sst` directly from its parts, without any of the
	/// validation [`crate::construct::mk_sst`] performs. Only used
	/// internally by algorithms that build a well-formed result by
	/// construction.
	pub(crate) fn from_parts(
		states: BTreeSet<StateId>,
		initial: StateId,
		variables: Vec<String>,
		output: BTreeMap<StateId, SimpleVariableUpdate<S>>,
		input_moves: BTreeMap<StateId, Vec<InputMove<P, FunctionalVariableUpdate<S, F>>>>,
		epsilon_moves: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<S>>>>,
		is_deterministic: bool,
		is_epsilon_free: bool,
	) -> Self {
		let variable_index = variables.iter().enumerate().map(|(i, name)| (name.clone(), i)).collect();
		let max_state_id = states.iter().copied().max().map_or(0, |m| m + 1);
		Self {
			states,
			initial,
			variables,
			variable_index,
			output,
			input_moves,
			epsilon_moves,
			is_deterministic,
			is_epsilon_free,
			max_state_id,
		}
	}
}

impl<P: std::fmt::Debug, S: std::fmt::Debug, F: std::fmt::Debug> std::fmt::Debug for Sst<P, S, F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Sst")
			.field("states", &self.states)
			.field("initial", &self.initial)
			.field("variables", &self.variables)
			.field("output", &self.output)
			.field("input_moves", &self.input_moves)
			.field("epsilon_moves", &self.epsilon_moves)
			.field("is_deterministic", &self.is_deterministic)
			.field("is_epsilon_free", &self.is_epsilon_free)
			.finish()
	}
}
