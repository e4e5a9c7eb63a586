//! `MkSST` and the base transducer factories (spec §4.2-analogue, §6).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{BooleanAlgebra, EpsilonMove, InputMove, StateId};

use crate::error::SstError;
use crate::sst::Sst;
use crate::token::{ConstantToken, FunctionalVariableUpdate, SimpleVariableUpdate, Token};

/// Builds an `Sst` from a collection of moves, an output function, and a
/// variable list, validating the invariants of spec §3: every update vector
/// has exactly `variables.len()` entries, and every `Variable` token refers
/// to a declared index. Unsatisfiable input guards are filtered the way
/// `mk_sfa` filters them; self-epsilons are dropped.
///
/// If `remove_unreachable`, states not both forward-reachable from `initial`
/// and backward-reachable from some state in `output.keys()` are dropped.
pub fn mk_sst<Ba: BooleanAlgebra>(
	ba: &Ba,
	input_moves: Vec<InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>>,
	epsilon_moves: Vec<EpsilonMove<SimpleVariableUpdate<Ba::Domain>>>,
	initial: StateId,
	variables: Vec<String>,
	output: BTreeMap<StateId, SimpleVariableUpdate<Ba::Domain>>,
	remove_unreachable: bool,
) -> Result<Sst<Ba::Predicate, Ba::Domain, Ba::Function>, SstError<Ba::Error>> {
	let span = tracing::debug_span!(
		"mk_sst",
		input_moves = input_moves.len(),
		epsilon_moves = epsilon_moves.len(),
		variables = variables.len()
	);
	let _enter = span.enter();

	let register_count = variables.len();

	let mut states: BTreeSet<StateId> = BTreeSet::new();
	states.insert(initial);
	states.extend(output.keys().copied());

	for (&state, update) in &output {
		check_update_length(state, update.len(), register_count)?;
		check_simple_indices(update, register_count)?;
	}

	let mut filtered_input = Vec::with_capacity(input_moves.len());
	for mv in input_moves {
		if !ba.is_satisfiable(&mv.guard).map_err(SstError::Ba)? {
			tracing::trace!(from = mv.from, to = mv.to, "dropping unsatisfiable guard");
			continue;
		}
		check_update_length(mv.from, mv.update.len(), register_count)?;
		check_functional_indices(&mv.update, register_count)?;
		states.insert(mv.from);
		states.insert(mv.to);
		filtered_input.push(mv);
	}

	let mut filtered_epsilon = Vec::with_capacity(epsilon_moves.len());
	for mv in epsilon_moves {
		if mv.is_self_loop() {
			continue;
		}
		check_update_length(mv.from, mv.update.len(), register_count)?;
		check_simple_indices(&mv.update, register_count)?;
		states.insert(mv.from);
		states.insert(mv.to);
		filtered_epsilon.push(mv);
	}

	let is_epsilon_free = filtered_epsilon.is_empty();

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>>> = BTreeMap::new();
	for mv in filtered_input {
		input_map.entry(mv.from).or_default().push(mv);
	}
	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<Ba::Domain>>>> = BTreeMap::new();
	for mv in filtered_epsilon {
		epsilon_map.entry(mv.from).or_default().push(mv);
	}

	let sst = Sst::from_parts(states, initial, variables, output, input_map, epsilon_map, false, is_epsilon_free);

	if remove_unreachable {
		Ok(remove_unreachable_states(sst))
	} else {
		Ok(sst)
	}
}

/// The transducer recognizing and producing nothing: the canonical empty
/// SST, mirroring [`satra_sfa::construct::empty_language`].
pub fn empty_sst<P, S, F>() -> Sst<P, S, F> {
	Sst::from_parts([0].into_iter().collect(), 0, vec!["x0".to_string()], BTreeMap::new(), BTreeMap::new(), true, true)
}

/// The transducer matching a single symbol satisfying `predicate` and
/// appending it to `x0` unchanged: `x0 := x0 . symbol`. `identity` is the
/// BA's deferred function returning its argument, supplied by the caller
/// since [`BooleanAlgebra`] makes no guarantee one exists.
pub fn single_predicate_sst<Ba: BooleanAlgebra>(predicate: Ba::Predicate, identity: Ba::Function) -> Sst<Ba::Predicate, Ba::Domain, Ba::Function> {
	let update: FunctionalVariableUpdate<Ba::Domain, Ba::Function> = vec![vec![Token::Constant(ConstantToken::Variable(0)), Token::Function(identity)]];
	let mut input_map = BTreeMap::new();
	input_map.insert(0, vec![InputMove::new(0, 1, predicate, update)]);
	let mut output = BTreeMap::new();
	output.insert(1, crate::token::identity_update(1));
	Sst::from_parts([0, 1].into_iter().collect(), 0, vec!["x0".to_string()], output, input_map, BTreeMap::new(), true, true)
}

fn check_update_length<E>(state: StateId, found: usize, expected: usize) -> Result<(), SstError<E>> {
	if found != expected {
		return Err(SstError::InconsistentUpdateLength { state, expected, found });
	}
	Ok(())
}

fn check_simple_indices<S, E>(update: &SimpleVariableUpdate<S>, register_count: usize) -> Result<(), SstError<E>> {
	for sequence in update {
		for token in sequence {
			if let ConstantToken::Variable(i) = token {
				if *i >= register_count {
					return Err(SstError::UndeclaredVariable { name: format!("x{i}") });
				}
			}
		}
	}
	Ok(())
}

fn check_functional_indices<S, F, E>(update: &FunctionalVariableUpdate<S, F>, register_count: usize) -> Result<(), SstError<E>> {
	for sequence in update {
		for token in sequence {
			if let Token::Constant(ConstantToken::Variable(i)) = token {
				if *i >= register_count {
					return Err(SstError::UndeclaredVariable { name: format!("x{i}") });
				}
			}
		}
	}
	Ok(())
}

/// Drops every state that is not both forward-reachable from the initial
/// state and backward-reachable from a final state (spec §9 open question
/// 3, mirroring [`satra_sfa::construct::mk_sfa`]'s `removeUnreachable`).
pub fn remove_unreachable_states<P, S, F>(sst: Sst<P, S, F>) -> Sst<P, S, F> {
	let forward = forward_reachable(&sst);
	let backward = backward_reachable(&sst);
	let alive: BTreeSet<StateId> = forward.intersection(&backward).copied().collect();

	let output: BTreeMap<StateId, SimpleVariableUpdate<S>> = sst.output.into_iter().filter(|(q, _)| alive.contains(q)).collect();

	let input_moves = sst
		.input_moves
		.into_iter()
		.filter(|(from, _)| alive.contains(from))
		.map(|(from, moves)| (from, moves.into_iter().filter(|m| alive.contains(&m.to)).collect()))
		.filter(|(_, moves): &(StateId, Vec<_>)| !moves.is_empty())
		.collect();

	let epsilon_moves = sst
		.epsilon_moves
		.into_iter()
		.filter(|(from, _)| alive.contains(from))
		.map(|(from, moves)| (from, moves.into_iter().filter(|m| alive.contains(&m.to)).collect()))
		.filter(|(_, moves): &(StateId, Vec<_>)| !moves.is_empty())
		.collect();

	Sst::from_parts(alive, sst.initial, sst.variables, output, input_moves, epsilon_moves, sst.is_deterministic, sst.is_epsilon_free)
}

fn forward_reachable<P, S, F>(sst: &Sst<P, S, F>) -> BTreeSet<StateId> {
	let mut seen = BTreeSet::new();
	let mut queue = VecDeque::new();
	seen.insert(sst.initial);
	queue.push_back(sst.initial);
	while let Some(q) = queue.pop_front() {
		for mv in sst.get_input_moves_from(q) {
			if seen.insert(mv.to) {
				queue.push_back(mv.to);
			}
		}
		for mv in sst.get_epsilon_from(q) {
			if seen.insert(mv.to) {
				queue.push_back(mv.to);
			}
		}
	}
	seen
}

fn backward_reachable<P, S, F>(sst: &Sst<P, S, F>) -> BTreeSet<StateId> {
	let mut seen: BTreeSet<StateId> = sst.output.keys().copied().collect();
	let mut queue: VecDeque<StateId> = seen.iter().copied().collect();
	while let Some(q) = queue.pop_front() {
		for mv in sst.get_input_moves_to(q) {
			if seen.insert(mv.from) {
				queue.push_back(mv.from);
			}
		}
		for mv in sst.get_epsilon_to(q) {
			if seen.insert(mv.from) {
				queue.push_back(mv.from);
			}
		}
	}
	seen
}
