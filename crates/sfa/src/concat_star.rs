//! Concatenation and Kleene star via epsilon-stitching (spec §4.7).

use std::collections::{BTreeMap, BTreeSet};

use satra_core::{EpsilonMove, InputMove, StateId};

use crate::sfa::Sfa;

/// Concatenates `a` then `b`: `b`'s states are renumbered past `a`'s, and
/// every final state of `a` gets an epsilon move to `b`'s (renumbered)
/// initial state. The result's final states are `b`'s (renumbered) finals.
pub fn concatenate<P: Clone>(a: &Sfa<P>, b: &Sfa<P>) -> Sfa<P> {
	let offset = a.max_state_id();

	let mut states: BTreeSet<StateId> = a.states().collect();
	states.extend(b.states().map(|s| s + offset));

	let mut input_map: BTreeMap<StateId, Vec<InputMove<P>>> = BTreeMap::new();
	for mv in a.all_input_moves() {
		input_map.entry(mv.from).or_default().push(mv.clone());
	}
	for mv in b.all_input_moves() {
		let shifted = mv.clone().map_states(|s| s + offset);
		input_map.entry(shifted.from).or_default().push(shifted);
	}

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove>> = BTreeMap::new();
	for mv in a.all_epsilon_moves() {
		epsilon_map.entry(mv.from).or_default().push(mv.clone());
	}
	for mv in b.all_epsilon_moves() {
		let shifted = mv.clone().map_states(|s| s + offset);
		epsilon_map.entry(shifted.from).or_default().push(shifted);
	}

	let stitched_initial = b.initial_state() + offset;
	for final_a in a.final_states() {
		epsilon_map
			.entry(final_a)
			.or_default()
			.push(EpsilonMove::new(final_a, stitched_initial, ()));
	}

	let finals: BTreeSet<StateId> = b.final_states().map(|s| s + offset).collect();

	Sfa::from_parts(
		states,
		a.initial_state(),
		finals,
		input_map,
		epsilon_map,
		false,
		false,
		false,
	)
}

/// Kleene star of `sfa`: a fresh initial-and-final state with an epsilon move
/// into `sfa`'s initial state, and an epsilon move back from every one of
/// `sfa`'s final states to the fresh state, so iterating loops back through
/// it rather than directly into `sfa`'s original initial state.
pub fn star<P: Clone>(sfa: &Sfa<P>) -> Sfa<P> {
	let fresh_initial = sfa.max_state_id();

	let mut states: BTreeSet<StateId> = sfa.states().collect();
	states.insert(fresh_initial);

	let input_map: BTreeMap<StateId, Vec<InputMove<P>>> = sfa
		.all_input_moves()
		.map(|mv| (mv.from, mv.clone()))
		.fold(BTreeMap::new(), |mut map, (from, mv)| {
			map.entry(from).or_insert_with(Vec::new).push(mv);
			map
		});

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove>> = BTreeMap::new();
	for mv in sfa.all_epsilon_moves() {
		epsilon_map.entry(mv.from).or_default().push(mv.clone());
	}
	epsilon_map
		.entry(fresh_initial)
		.or_default()
		.push(EpsilonMove::new(fresh_initial, sfa.initial_state(), ()));
	for final_state in sfa.final_states() {
		epsilon_map
			.entry(final_state)
			.or_default()
			.push(EpsilonMove::new(final_state, fresh_initial, ()));
	}

	Sfa::from_parts(
		states,
		fresh_initial,
		[fresh_initial].into_iter().collect(),
		input_map,
		epsilon_map,
		false,
		false,
		false,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::single_predicate;
	use crate::test_support::BoolBa;

	#[test]
	fn concatenate_stitches_a_final_to_b_initial() {
		let a = single_predicate(&BoolBa, true);
		let b = single_predicate(&BoolBa, false);
		let cat = concatenate(&a, &b);
		assert_eq!(cat.final_states().count(), 1);
		assert_eq!(cat.get_epsilon_from(1).len(), 1);
	}

	#[test]
	fn star_accepts_the_empty_string() {
		let sfa = single_predicate(&BoolBa, true);
		let starred = star(&sfa);
		assert!(starred.is_final(starred.initial_state()));
		assert_eq!(starred.get_epsilon_from(starred.initial_state()).len(), 1);
	}
}
