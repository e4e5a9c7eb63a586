//! Symbolic Hopcroft-Karp equivalence checking (spec §4.8).

use std::collections::{BTreeMap, VecDeque};

use satra_core::ba::MintermError;
use satra_core::union_find::DisjointSets;
use satra_core::{BooleanAlgebra, Pair, StateId, TimeoutBudget};

use crate::error::SfaError;
use crate::sfa::Sfa;
use crate::total::totalize;

/// The outcome of [`are_equivalent`].
#[derive(Debug, Clone)]
pub enum Equivalence<D> {
	Equivalent,
	/// `witness` is a word on which exactly one of the two automata accepts.
	NotEquivalent { witness: Vec<D> },
}

/// Checks whether `a` and `b` accept the same language.
///
/// Both automata are first determinized and totalized, so that every state
/// has exactly one outgoing move per element of any minterm partition of its
/// guards. A combined union-find universe (`a`'s states, then `b`'s states
/// offset past them) tracks which cross-automaton states have already been
/// proven equivalent, so a pair already subsumed by transitivity is never
/// re-explored. A side map records, for each freshly-discovered pair, the
/// predecessor pair and the symbol that reached it, purely so a finality
/// mismatch can be turned into a counterexample word by walking that chain
/// back to the initial pair.
pub fn are_equivalent<Ba: BooleanAlgebra>(
	ba: &Ba,
	a: &Sfa<Ba::Predicate>,
	b: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Equivalence<Ba::Domain>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("are_equivalent", a_states = a.state_count(), b_states = b.state_count());
	let _enter = span.enter();

	let a = totalize(ba, a, budget)?;
	let b = totalize(ba, b, budget)?;

	let offset = a.max_state_id();
	let mut ds: DisjointSets<Ba::Domain> = DisjointSets::new();
	for _ in 0..(offset + b.max_state_id()) {
		ds.push();
	}

	let mut came_from: BTreeMap<Pair, (Pair, Ba::Domain)> = BTreeMap::new();
	let mut worklist: VecDeque<(StateId, StateId)> = VecDeque::new();

	let init = (a.initial_state(), b.initial_state());
	let seed_witness = ba
		.generate_witness(&ba.top())
		.map_err(SfaError::Ba)?
		.expect("the top predicate is always satisfiable");
	ds.union(init.0, init.1 + offset, seed_witness);
	worklist.push_back(init);

	while let Some((p, q)) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(p, e.budget_ms))?;

		if a.is_final(p) != b.is_final(q) {
			tracing::trace!(p, q, "finality mismatch");
			return Ok(Equivalence::NotEquivalent {
				witness: reconstruct_witness(&came_from, Pair::new(p, q)),
			});
		}

		let a_moves = a.get_input_moves_from(p);
		let b_moves = b.get_input_moves_from(q);
		let a_count = a_moves.len();

		let mut guards: Vec<Ba::Predicate> = a_moves.iter().map(|m| m.guard.clone()).collect();
		guards.extend(b_moves.iter().map(|m| m.guard.clone()));

		let minterms = ba.get_minterms(&guards, budget).map_err(|e| match e {
			MintermError::Timeout(t) => SfaError::timeout(p, t.budget_ms),
			MintermError::Ba(err) => SfaError::Ba(err),
		})?;

		for minterm in minterms {
			let Some(ia) = minterm.entailed_indices().find(|&i| i < a_count) else {
				continue;
			};
			let Some(ib) = minterm.entailed_indices().find(|&i| i >= a_count) else {
				continue;
			};
			let ta = a_moves[ia].to;
			let tb = b_moves[ib - a_count].to;

			if !ds.same_set(ta, tb + offset) {
				let witness = ba
					.generate_witness(minterm.predicate())
					.map_err(SfaError::Ba)?
					.expect("minterm predicates are satisfiable by construction");
				ds.union(ta, tb + offset, witness.clone());
				came_from.insert(Pair::new(ta, tb), (Pair::new(p, q), witness));
				worklist.push_back((ta, tb));
			}
		}
	}

	Ok(Equivalence::Equivalent)
}

fn reconstruct_witness<D: Clone>(came_from: &BTreeMap<Pair, (Pair, D)>, mut node: Pair) -> Vec<D> {
	let mut word = Vec::new();
	while let Some((prev, symbol)) = came_from.get(&node) {
		word.push(symbol.clone());
		node = *prev;
	}
	word.reverse();
	word
}
