//! SST epsilon-elimination with composed register updates (spec §4.11).

use std::collections::BTreeMap;

use satra_core::{InputMove, StateId, TimeoutBudget};

use crate::error::SstError;
use crate::sst::Sst;
use crate::token::{identity_update, SimpleVariableUpdate};
use crate::update::{self as register_update, compose_simple, compose_with};

/// The epsilon-closure of `source`, as a map from each reachable state
/// (`source` itself included, bound to the identity update) to the
/// `SimpleVariableUpdate` composed along the path that reaches it.
///
/// The path must be tree-shaped: if two distinct epsilon edges both lead
/// back into a state already in the closure, that is a structural error
/// (spec §3 "tree invariant") — there would be two mutually-exclusive ways
/// to have arrived at that state's registers, and no way to pick one without
/// making the transducer non-functional.
fn epsilon_closure_with_update<P, S: Clone, F, E>(sst: &Sst<P, S, F>, source: StateId, register_count: usize) -> Result<BTreeMap<StateId, SimpleVariableUpdate<S>>, SstError<E>> {
	let mut closure: BTreeMap<StateId, SimpleVariableUpdate<S>> = BTreeMap::new();
	closure.insert(source, identity_update(register_count));
	let mut stack = vec![source];

	while let Some(q) = stack.pop() {
		let composed_at_q = closure[&q].clone();
		for mv in sst.get_epsilon_from(q) {
			if closure.contains_key(&mv.to) {
				return Err(SstError::EpsilonTreeViolation { state: mv.to });
			}
			let composed = compose_simple(&composed_at_q, &mv.update);
			closure.insert(mv.to, composed);
			stack.push(mv.to);
		}
	}

	Ok(closure)
}

/// Eliminates epsilon moves, returning an epsilon-free transducer computing
/// the same string-to-string function.
///
/// Unlike [`satra_sfa`]'s subset-construction epsilon removal, no states are
/// merged: the tree invariant already guarantees each state's closure is
/// single-valued, so every original state keeps its identity and simply
/// gains direct input moves "pushed through" its closure, with its update
/// composed in front of each non-epsilon move's own update.
pub fn remove_epsilon_moves<P: Clone, S: Clone, F: Clone, E>(sst: &Sst<P, S, F>, budget: &TimeoutBudget) -> Result<Sst<P, S, F>, SstError<E>> {
	let span = tracing::debug_span!("sst_remove_epsilon_moves", states = sst.state_count());
	let _enter = span.enter();

	if sst.is_epsilon_free() {
		return Ok(sst.clone());
	}

	let register_count = sst.variable_count();
	let mut input_map: BTreeMap<StateId, Vec<InputMove<P, crate::token::FunctionalVariableUpdate<S, F>>>> = BTreeMap::new();
	let mut output: BTreeMap<StateId, SimpleVariableUpdate<S>> = BTreeMap::new();

	for q in sst.states() {
		budget.checkpoint().map_err(|e| SstError::timeout(q, e.budget_ms))?;

		let closure = epsilon_closure_with_update(sst, q, register_count)?;

		let final_members: Vec<StateId> = closure.keys().copied().filter(|m| sst.is_final(*m)).collect();
		match final_members.as_slice() {
			[] => {}
			[only] => {
				let original_output = sst.output_for(*only).expect("final state has an output");
				output.insert(q, compose_simple(&closure[only], original_output));
			}
			many => {
				return Err(SstError::AmbiguousFinalClosure { states: many.to_vec() });
			}
		}

		for (&member, composed) in &closure {
			for mv in sst.get_input_moves_from(member) {
				tracing::trace!(from = q, via = member, "pushing move through epsilon closure");
				let new_update = compose_with(composed, &mv.update);
				input_map.entry(q).or_default().push(InputMove::new(q, mv.to, mv.guard.clone(), new_update));
			}
		}
	}

	Ok(Sst::from_parts(sst.states.clone(), sst.initial, sst.variables.clone(), output, input_map, BTreeMap::new(), false, true))
}

// Re-exported so callers composing updates across a closure and a
// subsequent construction (e.g. `combine`) can reach for the same helpers
// without reaching into `crate::update` directly.
pub use register_update::{combine_output_updates, combine_updates};
