//! Complement, intersection, union and difference (spec §4.6).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{BooleanAlgebra, EpsilonMove, InputMove, Pair, StateId, TimeoutBudget};

use crate::error::SfaError;
use crate::sfa::Sfa;
use crate::total::totalize;

/// Complements `sfa`: determinizes and totalizes it first, then flips which
/// states are final. The result is deterministic and total.
pub fn complement<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let total = totalize(ba, sfa, budget)?;

	let finals: BTreeSet<StateId> = total.states().filter(|&s| !total.is_final(s)).collect();
	let input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = total
		.states()
		.filter_map(|s| {
			let moves = total.get_input_moves_from(s).to_vec();
			(!moves.is_empty()).then_some((s, moves))
		})
		.collect();

	Ok(Sfa::from_parts(
		total.states().collect(),
		total.initial_state(),
		finals,
		input_map,
		BTreeMap::new(),
		true,
		true,
		true,
	))
}

/// Intersects `a` and `b` via an on-the-fly product construction: a state
/// pair `(p, q)` is final iff both `p` and `q` are, and has one outgoing move
/// per pair of `a`- and `b`-moves whose conjoined guard is satisfiable.
pub fn intersect<Ba: BooleanAlgebra>(
	ba: &Ba,
	a: &Sfa<Ba::Predicate>,
	b: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("intersect", a_states = a.state_count(), b_states = b.state_count());
	let _enter = span.enter();

	let mut reached: BTreeMap<Pair, StateId> = BTreeMap::new();
	let mut pairs_by_id: Vec<Pair> = Vec::new();
	let mut worklist: VecDeque<StateId> = VecDeque::new();

	let initial_pair = Pair::new(a.initial_state(), b.initial_state());
	let initial_id = intern(initial_pair, &mut reached, &mut pairs_by_id, &mut worklist);

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = BTreeMap::new();
	let mut finals: BTreeSet<StateId> = BTreeSet::new();

	while let Some(id) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(id, e.budget_ms))?;

		let Pair(p, q) = pairs_by_id[id];
		if a.is_final(p) && b.is_final(q) {
			finals.insert(id);
		}

		for mv_a in a.get_input_moves_from(p) {
			for mv_b in b.get_input_moves_from(q) {
				let guard = ba.and(&mv_a.guard, &mv_b.guard);
				if !ba.is_satisfiable(&guard).map_err(SfaError::Ba)? {
					continue;
				}
				let target_id = intern(
					Pair::new(mv_a.to, mv_b.to),
					&mut reached,
					&mut pairs_by_id,
					&mut worklist,
				);
				input_map
					.entry(id)
					.or_default()
					.push(InputMove::unguarded_update(id, target_id, guard));
			}
		}
	}

	let states: BTreeSet<StateId> = (0..pairs_by_id.len()).collect();
	Ok(Sfa::from_parts(
		states,
		initial_id,
		finals,
		input_map,
		BTreeMap::new(),
		a.is_deterministic() && b.is_deterministic(),
		true,
		false,
	))
}

/// Unions `a` and `b`: a fresh initial state with epsilon moves to both
/// automata's initial states, the rest of each automaton renumbered to avoid
/// colliding state ids.
pub fn union<P: Clone>(a: &Sfa<P>, b: &Sfa<P>) -> Sfa<P> {
	let offset = a.max_state_id();
	let fresh_initial = offset + b.max_state_id();

	let mut states: BTreeSet<StateId> = a.states().collect();
	states.extend(b.states().map(|s| s + offset));
	states.insert(fresh_initial);

	let mut finals: BTreeSet<StateId> = a.final_states().collect();
	finals.extend(b.final_states().map(|s| s + offset));

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
	epsilon_map
		.entry(fresh_initial)
		.or_default()
		.extend([
			EpsilonMove::new(fresh_initial, a.initial_state(), ()),
			EpsilonMove::new(fresh_initial, b.initial_state() + offset, ()),
		]);

	Sfa::from_parts(
		states,
		fresh_initial,
		finals,
		input_map,
		epsilon_map,
		false,
		false,
		false,
	)
}

/// `a \ b`, computed as `a ∩ complement(b)`.
pub fn difference<Ba: BooleanAlgebra>(
	ba: &Ba,
	a: &Sfa<Ba::Predicate>,
	b: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let not_b = complement(ba, b, budget)?;
	intersect(ba, a, &not_b, budget)
}

fn intern(
	pair: Pair,
	reached: &mut BTreeMap<Pair, StateId>,
	pairs_by_id: &mut Vec<Pair>,
	worklist: &mut VecDeque<StateId>,
) -> StateId {
	if let Some(&id) = reached.get(&pair) {
		return id;
	}
	let id = pairs_by_id.len();
	reached.insert(pair, id);
	pairs_by_id.push(pair);
	worklist.push_back(id);
	id
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::{full_language, mk_sfa, single_predicate};
	use crate::test_support::BoolBa;

	#[test]
	fn complement_of_full_language_is_empty() {
		let sfa = full_language(&BoolBa);
		let comp = complement(&BoolBa, &sfa, &TimeoutBudget::unbounded()).unwrap();
		assert!(comp.is_total());
		assert_eq!(comp.final_states().count(), 0);
	}

	#[test]
	fn intersect_of_disjoint_guards_is_empty() {
		let a = single_predicate(&BoolBa, true);
		let b = single_predicate(&BoolBa, false);
		let prod = intersect(&BoolBa, &a, &b, &TimeoutBudget::unbounded()).unwrap();
		assert_eq!(prod.final_states().count(), 0);
	}

	#[test]
	fn union_accepts_either_branch() {
		let a = single_predicate(&BoolBa, true);
		let b = mk_sfa(
			&BoolBa,
			vec![InputMove::unguarded_update(0, 1, false)],
			vec![],
			0,
			[1].into_iter().collect(),
			false,
			false,
		)
		.unwrap();
		let u = union(&a, &b);
		assert_eq!(u.final_states().count(), 2);
		assert_eq!(u.get_epsilon_from(u.initial_state()).len(), 2);
	}

	#[test]
	fn difference_removes_overlap() {
		let a = single_predicate(&BoolBa, true);
		let b = single_predicate(&BoolBa, true);
		let diff = difference(&BoolBa, &a, &b, &TimeoutBudget::unbounded()).unwrap();
		assert_eq!(diff.final_states().count(), 0);
	}
}
