//! `MkSFA` and the base automaton factories (spec §4.2, §6).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{BooleanAlgebra, EpsilonMove, InputMove, StateId};

use crate::error::SfaError;
use crate::sfa::Sfa;

/// Builds an `Sfa` from a collection of moves, filtering unsatisfiable input
/// guards and collapsing self-epsilons (spec §4.2).
///
/// If `normalize`, parallel input moves between the same pair of states are
/// collapsed into a single move whose guard is their disjunction, and at
/// most one epsilon move is kept per ordered pair of states.
///
/// If `remove_unreachable`, states not both forward-reachable from `initial`
/// and backward-reachable from some state in `finals` are dropped. If no
/// final state survives that pass, the canonical empty SFA is returned
/// instead (an empty result is not an error, spec §7 item 3).
pub fn mk_sfa<Ba: BooleanAlgebra>(
	ba: &Ba,
	input_moves: Vec<InputMove<Ba::Predicate>>,
	epsilon_moves: Vec<EpsilonMove>,
	initial: StateId,
	finals: BTreeSet<StateId>,
	remove_unreachable: bool,
	normalize: bool,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!(
		"mk_sfa",
		input_moves = input_moves.len(),
		epsilon_moves = epsilon_moves.len()
	);
	let _enter = span.enter();

	let mut states: BTreeSet<StateId> = BTreeSet::new();
	states.insert(initial);
	states.extend(finals.iter().copied());

	let mut filtered_input = Vec::with_capacity(input_moves.len());
	for mv in input_moves {
		if ba.is_satisfiable(&mv.guard).map_err(SfaError::Ba)? {
			states.insert(mv.from);
			states.insert(mv.to);
			filtered_input.push(mv);
		} else {
			tracing::trace!(from = mv.from, to = mv.to, "dropping unsatisfiable guard");
		}
	}

	let mut filtered_epsilon = Vec::with_capacity(epsilon_moves.len());
	for mv in epsilon_moves {
		if mv.is_self_loop() {
			continue;
		}
		states.insert(mv.from);
		states.insert(mv.to);
		filtered_epsilon.push(mv);
	}

	if normalize {
		filtered_input = normalize_input_moves(ba, filtered_input);
		filtered_epsilon = normalize_epsilon_moves(filtered_epsilon);
	}

	let is_epsilon_free = filtered_epsilon.is_empty();

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = BTreeMap::new();
	for mv in filtered_input {
		input_map.entry(mv.from).or_default().push(mv);
	}
	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove>> = BTreeMap::new();
	for mv in filtered_epsilon {
		epsilon_map.entry(mv.from).or_default().push(mv);
	}

	let sfa = Sfa::from_parts(
		states,
		initial,
		finals,
		input_map,
		epsilon_map,
		false,
		is_epsilon_free,
		false,
	);

	if remove_unreachable {
		Ok(restrict_to_alive(sfa))
	} else {
		Ok(sfa)
	}
}

/// Drops every state that is not both forward-reachable from the initial
/// state and backward-reachable from a final state. Returns the canonical
/// empty SFA if no final state is alive.
fn restrict_to_alive<P>(sfa: Sfa<P>) -> Sfa<P> {
	let forward = forward_reachable(&sfa);
	let backward = backward_reachable(&sfa);
	let alive: BTreeSet<StateId> = forward.intersection(&backward).copied().collect();

	let finals: BTreeSet<StateId> = sfa.finals.intersection(&alive).copied().collect();
	if finals.is_empty() {
		return Sfa::from_parts(
			[sfa.initial].into_iter().collect(),
			sfa.initial,
			BTreeSet::new(),
			BTreeMap::new(),
			BTreeMap::new(),
			true,
			true,
			false,
		);
	}

	let input_map = sfa
		.input_moves
		.into_iter()
		.filter(|(from, _)| alive.contains(from))
		.map(|(from, moves)| {
			(
				from,
				moves
					.into_iter()
					.filter(|m| alive.contains(&m.to))
					.collect(),
			)
		})
		.filter(|(_, moves): &(StateId, Vec<_>)| !moves.is_empty())
		.collect();

	let epsilon_map = sfa
		.epsilon_moves
		.into_iter()
		.filter(|(from, _)| alive.contains(from))
		.map(|(from, moves)| {
			(
				from,
				moves
					.into_iter()
					.filter(|m| alive.contains(&m.to))
					.collect(),
			)
		})
		.filter(|(_, moves): &(StateId, Vec<_>)| !moves.is_empty())
		.collect();

	Sfa::from_parts(
		alive,
		sfa.initial,
		finals,
		input_map,
		epsilon_map,
		sfa.is_deterministic,
		sfa.is_epsilon_free,
		sfa.is_total,
	)
}

fn forward_reachable<P>(sfa: &Sfa<P>) -> BTreeSet<StateId> {
	let mut seen = BTreeSet::new();
	let mut queue = VecDeque::new();
	seen.insert(sfa.initial);
	queue.push_back(sfa.initial);
	while let Some(q) = queue.pop_front() {
		for mv in sfa.get_input_moves_from(q) {
			if seen.insert(mv.to) {
				queue.push_back(mv.to);
			}
		}
		for mv in sfa.get_epsilon_from(q) {
			if seen.insert(mv.to) {
				queue.push_back(mv.to);
			}
		}
	}
	seen
}

fn backward_reachable<P>(sfa: &Sfa<P>) -> BTreeSet<StateId> {
	let mut seen: BTreeSet<StateId> = sfa.finals.clone();
	let mut queue: VecDeque<StateId> = seen.iter().copied().collect();
	while let Some(q) = queue.pop_front() {
		for mv in sfa.get_input_moves_to(q) {
			if seen.insert(mv.from) {
				queue.push_back(mv.from);
			}
		}
		for mv in sfa.get_epsilon_to(q) {
			if seen.insert(mv.from) {
				queue.push_back(mv.from);
			}
		}
	}
	seen
}

pub(crate) fn normalize_input_moves<Ba: BooleanAlgebra>(
	ba: &Ba,
	moves: Vec<InputMove<Ba::Predicate>>,
) -> Vec<InputMove<Ba::Predicate>> {
	let mut by_pair: BTreeMap<(StateId, StateId), Ba::Predicate> = BTreeMap::new();
	for mv in moves {
		by_pair
			.entry((mv.from, mv.to))
			.and_modify(|guard| *guard = ba.or(guard, &mv.guard))
			.or_insert(mv.guard);
	}
	by_pair
		.into_iter()
		.map(|((from, to), guard)| InputMove::unguarded_update(from, to, guard))
		.collect()
}

fn normalize_epsilon_moves(moves: Vec<EpsilonMove>) -> Vec<EpsilonMove> {
	let mut seen: BTreeSet<(StateId, StateId)> = BTreeSet::new();
	moves
		.into_iter()
		.filter(|mv| seen.insert((mv.from, mv.to)))
		.collect()
}

/// The canonical automaton recognizing the empty language.
pub fn empty_language<Ba: BooleanAlgebra>(_ba: &Ba) -> Sfa<Ba::Predicate> {
	Sfa::from_parts(
		[0].into_iter().collect(),
		0,
		BTreeSet::new(),
		BTreeMap::new(),
		BTreeMap::new(),
		true,
		true,
		false,
	)
}

/// The automaton recognizing every string over the domain (`Σ*`): a single
/// state, initial and final, with a `True` self-loop.
pub fn full_language<Ba: BooleanAlgebra>(ba: &Ba) -> Sfa<Ba::Predicate> {
	let mut input_map = BTreeMap::new();
	input_map.insert(0, vec![InputMove::unguarded_update(0, 0, ba.top())]);
	Sfa::from_parts(
		[0].into_iter().collect(),
		0,
		[0].into_iter().collect(),
		input_map,
		BTreeMap::new(),
		true,
		true,
		true,
	)
}

/// The automaton recognizing only the empty string (`{ε}`).
pub fn epsilon_language<Ba: BooleanAlgebra>(_ba: &Ba) -> Sfa<Ba::Predicate> {
	Sfa::from_parts(
		[0].into_iter().collect(),
		0,
		[0].into_iter().collect(),
		BTreeMap::new(),
		BTreeMap::new(),
		false,
		true,
		false,
	)
}

/// The automaton recognizing exactly the single-symbol strings satisfying
/// `predicate`.
pub fn single_predicate<Ba: BooleanAlgebra>(_ba: &Ba, predicate: Ba::Predicate) -> Sfa<Ba::Predicate> {
	let mut input_map = BTreeMap::new();
	input_map.insert(0, vec![InputMove::unguarded_update(0, 1, predicate)]);
	Sfa::from_parts(
		[0, 1].into_iter().collect(),
		0,
		[1].into_iter().collect(),
		input_map,
		BTreeMap::new(),
		true,
		true,
		false,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::BoolBa;
	use crate::Sfa;

	#[test]
	fn empty_language_has_no_finals() {
		let sfa: Sfa<bool> = empty_language(&BoolBa);
		assert_eq!(sfa.final_states().count(), 0);
		assert!(sfa.is_empty_language());
	}

	#[test]
	fn full_language_is_total_and_deterministic() {
		let sfa: Sfa<bool> = full_language(&BoolBa);
		assert!(sfa.is_total());
		assert!(sfa.is_deterministic());
		assert_eq!(sfa.final_states().count(), 1);
	}

	#[test]
	fn normalize_collapses_parallel_moves() {
		let moves = vec![
			InputMove::unguarded_update(0, 1, true),
			InputMove::unguarded_update(0, 1, false),
		];
		let sfa = mk_sfa(&BoolBa, moves, vec![], 0, [1].into_iter().collect(), false, true).unwrap();
		assert_eq!(sfa.get_input_moves_from(0).len(), 1);
	}

	#[test]
	fn remove_unreachable_drops_dead_states() {
		let moves = vec![
			InputMove::unguarded_update(0, 1, true),
			InputMove::unguarded_update(2, 3, true),
		];
		let sfa = mk_sfa(
			&BoolBa,
			moves,
			vec![],
			0,
			[1].into_iter().collect(),
			true,
			false,
		)
		.unwrap();
		assert_eq!(sfa.state_count(), 2);
	}

	#[test]
	fn remove_unreachable_to_no_final_yields_canonical_empty() {
		let moves = vec![InputMove::unguarded_update(0, 1, true)];
		let sfa = mk_sfa(&BoolBa, moves, vec![], 0, BTreeSet::new(), true, false).unwrap();
		assert!(sfa.is_empty_language());
		assert_eq!(sfa.state_count(), 1);
	}
}
