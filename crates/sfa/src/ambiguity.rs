//! Ambiguity detection via self-product (spec §4.10).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{BooleanAlgebra, Pair, TimeoutBudget};

use crate::error::SfaError;
use crate::sfa::Sfa;

/// Whether `sfa` is unambiguous: every accepted string has exactly one
/// accepting run. Checked by a self-product worklist over pairs `(p, q)`
/// with `p != q` reachable by the same word: if such a pair can reach a
/// configuration where both sides are simultaneously final, two distinct
/// runs accept the same string, so the automaton is ambiguous.
pub fn is_unambiguous<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<bool, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("is_unambiguous", states = sfa.state_count());
	let _enter = span.enter();

	let mut reached: BTreeSet<Pair> = BTreeSet::new();
	let mut worklist: VecDeque<Pair> = VecDeque::new();

	let initial = Pair::new(sfa.initial_state(), sfa.initial_state());
	reached.insert(initial);
	worklist.push_back(initial);

	while let Some(Pair(p, q)) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(p, e.budget_ms))?;

		if p != q && sfa.is_final(p) && sfa.is_final(q) {
			tracing::trace!(p, q, "two distinct runs accept the same word");
			return Ok(false);
		}

		for mv_p in sfa.get_input_moves_from(p) {
			for mv_q in sfa.get_input_moves_from(q) {
				// Surviving self-loops (p, p) only need their own diagonal
				// explored once; off-diagonal pairs explore every combination.
				if p == q && mv_p.to > mv_q.to {
					continue;
				}
				let guard = ba.and(&mv_p.guard, &mv_q.guard);
				if !ba.is_satisfiable(&guard).map_err(SfaError::Ba)? {
					continue;
				}
				let next = Pair::new(mv_p.to, mv_q.to);
				if reached.insert(next) {
					worklist.push_back(next);
				}
			}
		}
	}

	Ok(true)
}

/// Builds the witness word reconstruction table for [`is_unambiguous`]'s
/// failing case, exposed separately so callers that only need the boolean
/// don't pay for book-keeping they don't use.
pub fn find_ambiguous_witness<Ba: BooleanAlgebra>(
	ba: &Ba,
	sfa: &Sfa<Ba::Predicate>,
	budget: &TimeoutBudget,
) -> Result<Option<Vec<Ba::Domain>>, SfaError<Ba::Error>> {
	let mut reached: BTreeMap<Pair, (Pair, Ba::Domain)> = BTreeMap::new();
	let mut seen: BTreeSet<Pair> = BTreeSet::new();
	let mut worklist: VecDeque<Pair> = VecDeque::new();

	let initial = Pair::new(sfa.initial_state(), sfa.initial_state());
	seen.insert(initial);
	worklist.push_back(initial);

	while let Some(pair @ Pair(p, q)) = worklist.pop_front() {
		budget
			.checkpoint()
			.map_err(|e| SfaError::timeout(p, e.budget_ms))?;

		if p != q && sfa.is_final(p) && sfa.is_final(q) {
			let mut word = Vec::new();
			let mut node = pair;
			while let Some((prev, symbol)) = reached.get(&node) {
				word.push(symbol.clone());
				node = *prev;
			}
			word.reverse();
			return Ok(Some(word));
		}

		for mv_p in sfa.get_input_moves_from(p) {
			for mv_q in sfa.get_input_moves_from(q) {
				if p == q && mv_p.to > mv_q.to {
					continue;
				}
				let guard = ba.and(&mv_p.guard, &mv_q.guard);
				if !ba.is_satisfiable(&guard).map_err(SfaError::Ba)? {
					continue;
				}
				let next = Pair::new(mv_p.to, mv_q.to);
				if seen.insert(next) {
					let witness = ba
						.generate_witness(&guard)
						.map_err(SfaError::Ba)?
						.expect("satisfiable guard has a witness");
					reached.insert(next, (pair, witness));
					worklist.push_back(next);
				}
			}
		}
	}

	Ok(None)
}
