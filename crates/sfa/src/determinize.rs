//! Determinization via minterm enumeration (spec §4.4).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::ba::MintermError;
use satra_core::{BooleanAlgebra, InputMove, StateId, TimeoutBudget};

use crate::epsilon::remove_epsilon_moves;
use crate::error::SfaError;
use crate::sfa::Sfa;

/// Determinizes `sfa`: epsilon-eliminates it first if needed, then runs a
/// symbolic subset construction. At each subset state, the outgoing guards
/// `{φ_i}` are handed to [`BooleanAlgebra::get_minterms`]; each minterm
/// becomes one outgoing move of the determinized state, guarded by the
/// minterm's predicate and targeting the union of the `to` states whose bit
/// the minterm sets. Minterms are pairwise disjoint by construction, so the
/// result's guards out of each state are too.
pub fn determinize<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("determinize", states = sfa.state_count());
	let _enter = span.enter();

	let eliminated;
	let sfa: &Sfa<Ba::Predicate> = if sfa.is_epsilon_free() {
		sfa
	} else {
		eliminated = remove_epsilon_moves(sfa, budget)?;
		&eliminated
	};

	if sfa.is_deterministic() {
		return Ok(sfa.clone());
	}

	let mut reached: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
	let mut sets_by_id: Vec<BTreeSet<StateId>> = Vec::new();
	let mut worklist: VecDeque<StateId> = VecDeque::new();

	let initial_set: BTreeSet<StateId> = [sfa.initial_state()].into_iter().collect();
	let initial_id = intern(initial_set, &mut reached, &mut sets_by_id, &mut worklist);

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = BTreeMap::new();
	let mut finals: BTreeSet<StateId> = BTreeSet::new();

	while let Some(id) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(id, e.budget_ms))?;

		let set = sets_by_id[id].clone();
		if set.iter().any(|&s| sfa.is_final(s)) {
			finals.insert(id);
		}

		let moves: Vec<&InputMove<Ba::Predicate>> = set
			.iter()
			.flat_map(|&q| sfa.get_input_moves_from(q))
			.collect();
		if moves.is_empty() {
			continue;
		}

		let guards: Vec<Ba::Predicate> = moves.iter().map(|m| m.guard.clone()).collect();
		let minterms = ba.get_minterms(&guards, budget).map_err(|e| match e {
			MintermError::Timeout(t) => SfaError::timeout(id, t.budget_ms),
			MintermError::Ba(err) => SfaError::Ba(err),
		})?;

		tracing::trace!(state = id, minterms = minterms.len(), "split outgoing guards");

		for minterm in minterms {
			let mut successor: BTreeSet<StateId> = BTreeSet::new();
			for idx in minterm.entailed_indices() {
				successor.insert(moves[idx].to);
			}
			if successor.is_empty() {
				continue;
			}
			let succ_id = intern(successor, &mut reached, &mut sets_by_id, &mut worklist);
			input_map.entry(id).or_default().push(InputMove::unguarded_update(
				id,
				succ_id,
				minterm.predicate().clone(),
			));
		}
	}

	let states: BTreeSet<StateId> = (0..sets_by_id.len()).collect();
	Ok(Sfa::from_parts(
		states,
		initial_id,
		finals,
		input_map,
		BTreeMap::new(),
		true,
		true,
		false,
	))
}

fn intern(
	set: BTreeSet<StateId>,
	reached: &mut BTreeMap<BTreeSet<StateId>, StateId>,
	sets_by_id: &mut Vec<BTreeSet<StateId>>,
	worklist: &mut VecDeque<StateId>,
) -> StateId {
	if let Some(&id) = reached.get(&set) {
		return id;
	}
	let id = sets_by_id.len();
	reached.insert(set.clone(), id);
	sets_by_id.push(set);
	worklist.push_back(id);
	id
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::mk_sfa;
	use crate::test_support::BoolBa;

	#[test]
	fn merges_states_reachable_on_same_minterm() {
		// 0 -true-> 1 (final), 0 -true-> 2 (final): both moves collapse into
		// one minterm (`true`), so the determinized automaton should have a
		// single successor state reachable on it.
		let inputs = vec![
			InputMove::unguarded_update(0, 1, true),
			InputMove::unguarded_update(0, 2, true),
		];
		let sfa = mk_sfa(&BoolBa, inputs, vec![], 0, [1, 2].into_iter().collect(), false, false).unwrap();
		let det = determinize(&BoolBa, &sfa, &TimeoutBudget::unbounded()).unwrap();
		assert!(det.is_deterministic());
		assert_eq!(det.get_input_moves_from(det.initial_state()).len(), 1);
	}

	#[test]
	fn already_deterministic_is_returned_as_is() {
		let sfa = mk_sfa(
			&BoolBa,
			vec![InputMove::unguarded_update(0, 1, true)],
			vec![],
			0,
			[1].into_iter().collect(),
			false,
			false,
		)
		.unwrap();
		let det = determinize(&BoolBa, &sfa, &TimeoutBudget::unbounded()).unwrap();
		assert_eq!(det.state_count(), sfa.state_count());
	}
}
