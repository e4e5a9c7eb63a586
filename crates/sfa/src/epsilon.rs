//! Epsilon-elimination via subset construction over epsilon-closures (spec
//! §4.3).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{InputMove, StateId, TimeoutBudget};

use crate::error::SfaError;
use crate::sfa::Sfa;

/// The set of states reachable from `state` by zero or more epsilon moves,
/// `state` itself included.
pub fn epsilon_closure<P>(sfa: &Sfa<P>, state: StateId) -> BTreeSet<StateId> {
	let mut closure = BTreeSet::new();
	let mut stack = vec![state];
	closure.insert(state);
	while let Some(q) = stack.pop() {
		for mv in sfa.get_epsilon_from(q) {
			if closure.insert(mv.to) {
				stack.push(mv.to);
			}
		}
	}
	closure
}

/// Eliminates epsilon moves, returning an epsilon-free automaton accepting
/// the same language.
///
/// The frontier is a reached-map from *set of states* to a fresh id: for
/// each frontier set, for every non-epsilon move out of any of its members,
/// the move's target epsilon-closure is interned (allocating a fresh id if
/// new) and a move is added from the frontier set's id to that id. A
/// frontier set is final iff any of its members is final.
pub fn remove_epsilon_moves<P: Clone, E>(
	sfa: &Sfa<P>,
	budget: &TimeoutBudget,
) -> Result<Sfa<P>, SfaError<E>> {
	let span = tracing::debug_span!("remove_epsilon_moves", states = sfa.state_count());
	let _enter = span.enter();

	if sfa.is_epsilon_free() {
		return Ok(sfa.clone());
	}

	let mut reached: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
	let mut sets_by_id: Vec<BTreeSet<StateId>> = Vec::new();
	let mut worklist: VecDeque<StateId> = VecDeque::new();

	let initial_closure = epsilon_closure(sfa, sfa.initial_state());
	let initial_id = intern(initial_closure, &mut reached, &mut sets_by_id, &mut worklist);

	let mut input_map: BTreeMap<StateId, Vec<InputMove<P>>> = BTreeMap::new();
	let mut finals: BTreeSet<StateId> = BTreeSet::new();

	while let Some(id) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(id, e.budget_ms))?;

		let set = sets_by_id[id].clone();
		if set.iter().any(|&s| sfa.is_final(s)) {
			finals.insert(id);
		}

		for &q in &set {
			for mv in sfa.get_input_moves_from(q) {
				tracing::trace!(from = id, via = q, "expanding non-epsilon move");
				let target_closure = epsilon_closure(sfa, mv.to);
				let target_id = intern(target_closure, &mut reached, &mut sets_by_id, &mut worklist);
				input_map
					.entry(id)
					.or_default()
					.push(InputMove::unguarded_update(id, target_id, mv.guard.clone()));
			}
		}
	}

	let states: BTreeSet<StateId> = (0..sets_by_id.len()).collect();
	Ok(Sfa::from_parts(
		states,
		initial_id,
		finals,
		input_map,
		BTreeMap::new(),
		false,
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
