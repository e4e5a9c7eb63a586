//! Block-refinement minimization adapted to symbolic guards (spec §4.9).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use satra_core::partition::{Partition, Worklist};
use satra_core::{BooleanAlgebra, InputMove, StateId, TimeoutBudget};

use crate::construct::normalize_input_moves;
use crate::error::SfaError;
use crate::sfa::Sfa;
use crate::total::totalize;

/// Minimizes `sfa`: determinizes and totalizes it first, then repeatedly
/// splits blocks of a finals/non-finals partition by a state's "combined
/// guard" into a splitter block — the disjunction of the guards of its
/// moves landing in that block. Two states in the same block are separated
/// the moment their combined guards into some splitter stop being
/// BA-equivalent; a block is split by picking one state as a representative
/// and peeling off everything equivalent to it, repeating on the leftover
/// until what's left is itself homogeneous.
pub fn minimize<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("minimize", states = sfa.state_count());
	let _enter = span.enter();

	let sfa = totalize(ba, sfa, budget)?;

	let all_states: BTreeSet<StateId> = sfa.states().collect();
	let finals: BTreeSet<StateId> = sfa.final_states().collect();
	let non_finals: BTreeSet<StateId> = all_states.difference(&finals).copied().collect();

	let mut partition = Partition::new(vec![finals, non_finals]);
	let mut worklist = Worklist::new();
	for idx in partition.block_indices() {
		worklist.push(idx);
	}

	while let Some(splitter) = worklist.pop() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(splitter, e.budget_ms))?;

		let splitter_block = partition.block(splitter).clone();
		let mut combined_guard: BTreeMap<StateId, Ba::Predicate> = BTreeMap::new();
		for &target in &splitter_block {
			for mv in sfa.get_input_moves_to(target) {
				combined_guard
					.entry(mv.from)
					.and_modify(|g| *g = ba.or(g, &mv.guard))
					.or_insert_with(|| mv.guard.clone());
			}
		}

		let affected_blocks: BTreeSet<usize> = combined_guard
			.keys()
			.map(|q| partition.block_index(q))
			.collect();

		for block_idx in affected_blocks {
			let mut current = block_idx;
			loop {
				let block = partition.block(current).clone();
				if block.len() <= 1 {
					break;
				}
				let rep = *block.iter().next().expect("non-empty block");
				let rep_guard = combined_guard.get(&rep).cloned().unwrap_or_else(|| ba.bottom());

				let mut same_as_rep: HashMap<StateId, bool> = HashMap::with_capacity(block.len());
				for &q in &block {
					let guard = combined_guard.get(&q).cloned().unwrap_or_else(|| ba.bottom());
					same_as_rep.insert(q, ba.are_equivalent(&rep_guard, &guard).map_err(SfaError::Ba)?);
				}

				match partition.split(current, |q| same_as_rep[q]) {
					Some((kept, leftover)) => {
						tracing::trace!(splitter, block = current, kept, leftover, "split block");
						worklist.adopt_split(current, kept, leftover, |i| partition.block(i).len());
						current = leftover;
					}
					None => break,
				}
			}
		}
	}

	let num_blocks = partition.num_blocks();
	let initial_block = partition.block_index(&sfa.initial_state());

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate>>> = BTreeMap::new();
	let mut finals = BTreeSet::new();
	for block_idx in 0..num_blocks {
		let rep = *partition.block(block_idx).iter().next().expect("non-empty block");
		if sfa.is_final(rep) {
			finals.insert(block_idx);
		}
		let moves: Vec<InputMove<Ba::Predicate>> = sfa
			.get_input_moves_from(rep)
			.iter()
			.map(|mv| InputMove::unguarded_update(block_idx, partition.block_index(&mv.to), mv.guard.clone()))
			.collect();
		let moves = normalize_input_moves(ba, moves);
		if !moves.is_empty() {
			input_map.insert(block_idx, moves);
		}
	}

	Ok(Sfa::from_parts(
		(0..num_blocks).collect(),
		initial_block,
		finals,
		input_map,
		BTreeMap::new(),
		true,
		true,
		true,
	))
}
