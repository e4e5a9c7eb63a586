//! Totalization via a sink state (spec §4.5).

use std::collections::{BTreeMap, BTreeSet};

use satra_core::{BooleanAlgebra, InputMove, StateId, TimeoutBudget};

use crate::determinize::determinize;
use crate::error::SfaError;
use crate::sfa::Sfa;

/// Makes `sfa` total: for every state whose outgoing guards don't cover the
/// whole domain, adds a move to a fresh sink state guarded by the negation of
/// their disjunction. The sink itself gets a `True` self-loop and is never
/// final.
///
/// Precondition: deterministic. `sfa` is determinized first if it isn't —
/// the non-disjoint guards of a non-deterministic state would otherwise make
/// `not(or_all(outgoing))` an incorrect complement.
pub fn totalize<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let determinized;
	let sfa: &Sfa<Ba::Predicate> = if sfa.is_deterministic() {
		sfa
	} else {
		determinized = determinize(ba, sfa, budget)?;
		&determinized
	};

	if sfa.is_total() {
		return Ok(sfa.clone());
	}

	let span = tracing::debug_span!("totalize", states = sfa.state_count());
	let _enter = span.enter();

	let sink = sfa.max_state_id();
	let mut states: BTreeSet<StateId> = sfa.states().collect();
	states.insert(sink);

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = BTreeMap::new();
	for q in sfa.states() {
		let mut moves = sfa.get_input_moves_from(q).to_vec();
		let covered = ba.or_all(moves.iter().map(|m| &m.guard));
		let remainder = ba.not(&covered);
		if ba.is_satisfiable(&remainder).map_err(SfaError::Ba)? {
			tracing::trace!(state = q, "adding sink move for uncovered guard");
			moves.push(InputMove::unguarded_update(q, sink, remainder));
		}
		if !moves.is_empty() {
			input_map.insert(q, moves);
		}
	}
	input_map.insert(sink, vec![InputMove::unguarded_update(sink, sink, ba.top())]);

	let mut epsilon_map: BTreeMap<StateId, Vec<satra_core::EpsilonMove>> = BTreeMap::new();
	for mv in sfa.all_epsilon_moves() {
		epsilon_map.entry(mv.from).or_default().push(mv.clone());
	}

	Ok(Sfa::from_parts(
		states,
		sfa.initial_state(),
		sfa.final_states().collect(),
		input_map,
		epsilon_map,
		sfa.is_deterministic(),
		sfa.is_epsilon_free(),
		true,
	))
}
