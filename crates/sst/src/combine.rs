//! SST combine/union/concatenation/iteration/shuffle constructions (spec
//! §4.13).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use satra_core::{BooleanAlgebra, EpsilonMove, InputMove, Pair, StateId, TimeoutBudget};

use crate::error::SstError;
use crate::sst::Sst;
use crate::token::{rename_tokens, ConstantToken, FunctionalVariableUpdate, SimpleVariableUpdate, Token};
use crate::update::{combine_output_updates, combine_updates, lift_to_n_vars, rename_vars};

fn intern(pair: Pair, reached: &mut BTreeMap<Pair, StateId>, pairs_by_id: &mut Vec<Pair>, worklist: &mut VecDeque<StateId>) -> StateId {
	if let Some(&id) = reached.get(&pair) {
		return id;
	}
	let id = pairs_by_id.len();
	reached.insert(pair, id);
	pairs_by_id.push(pair);
	worklist.push_back(id);
	id
}

/// Synchronized product of `a` and `b` on satisfiable guard conjunctions:
/// `a`'s registers keep their original indices, `b`'s are offset past them,
/// and a joint final state's output is the two renamed outputs'
/// concatenation.
///
/// Assumes both inputs are epsilon-free, deterministic, single-valued
/// transducers; the product of two ambiguous transducers is not itself
/// meaningful, and this function does not check for it (spec §9 "combine
/// assumes... callers must ensure functionality").
pub fn combine<Ba: BooleanAlgebra>(ba: &Ba, a: &Sst<Ba::Predicate, Ba::Domain, Ba::Function>, b: &Sst<Ba::Predicate, Ba::Domain, Ba::Function>, budget: &TimeoutBudget) -> Result<Sst<Ba::Predicate, Ba::Domain, Ba::Function>, SstError<Ba::Error>> {
	let span = tracing::debug_span!("combine", a_states = a.state_count(), b_states = b.state_count());
	let _enter = span.enter();

	let a_count = a.variable_count();
	let b_count = b.variable_count();
	let rename_a: Vec<usize> = (0..a_count).collect();
	let rename_b: Vec<usize> = (0..b_count).map(|i| a_count + i).collect();
	let variables: Vec<String> = (0..(a_count + b_count)).map(|i| format!("x{i}")).collect();

	let mut reached: BTreeMap<Pair, StateId> = BTreeMap::new();
	let mut pairs_by_id: Vec<Pair> = Vec::new();
	let mut worklist: VecDeque<StateId> = VecDeque::new();

	let initial_id = intern(Pair::new(a.initial_state(), b.initial_state()), &mut reached, &mut pairs_by_id, &mut worklist);

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>>> = BTreeMap::new();
	let mut output: BTreeMap<StateId, SimpleVariableUpdate<Ba::Domain>> = BTreeMap::new();

	while let Some(id) = worklist.pop_front() {
		budget.checkpoint().map_err(|e| SstError::timeout(id, e.budget_ms))?;
		let Pair(p, q) = pairs_by_id[id];

		if a.is_final(p) && b.is_final(q) {
			let out = combine_output_updates(&rename_a, &rename_b, a.output_for(p).expect("final state has output"), b.output_for(q).expect("final state has output"));
			output.insert(id, out);
		}

		for mv_p in a.get_input_moves_from(p) {
			for mv_q in b.get_input_moves_from(q) {
				let guard = ba.and(&mv_p.guard, &mv_q.guard);
				if !ba.is_satisfiable(&guard).map_err(SstError::Ba)? {
					continue;
				}
				let update = combine_updates(&rename_a, &rename_b, &mv_p.update, &mv_q.update);
				let target = intern(Pair::new(mv_p.to, mv_q.to), &mut reached, &mut pairs_by_id, &mut worklist);
				input_map.entry(id).or_default().push(InputMove::new(id, target, guard, update));
			}
		}
	}

	let states: BTreeSet<StateId> = (0..pairs_by_id.len()).collect();
	Ok(Sst::from_parts(states, initial_id, variables, output, input_map, BTreeMap::new(), false, a.is_epsilon_free() && b.is_epsilon_free()))
}

/// Union: a fresh initial state with epsilon edges to `a`'s and `b`'s
/// (state-renumbered) initials, each carrying the all-empty update over the
/// shared register set — `max(|X_A|, |X_B|)` registers, reused by both
/// branches since only one of them ever runs per input. Outputs are the
/// originals, padded out to the shared register count.
pub fn union<P: Clone, S: Clone, F: Clone>(a: &Sst<P, S, F>, b: &Sst<P, S, F>) -> Sst<P, S, F> {
	let register_count = a.variable_count().max(b.variable_count());
	let variables: Vec<String> = (0..register_count).map(|i| format!("x{i}")).collect();

	let offset = a.max_state_id();
	let fresh = offset + b.max_state_id();

	let mut input_map: BTreeMap<StateId, Vec<InputMove<P, FunctionalVariableUpdate<S, F>>>> = a.input_moves.iter().map(|(from, moves)| (*from, moves.iter().map(|mv| InputMove::new(mv.from, mv.to, mv.guard.clone(), lift_to_n_vars(&mv.update, register_count))).collect())).collect();
	for (from, moves) in &b.input_moves {
		let shifted = moves.iter().map(|mv| InputMove::new(mv.from + offset, mv.to + offset, mv.guard.clone(), lift_to_n_vars(&mv.update, register_count))).collect();
		input_map.insert(from + offset, shifted);
	}

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<S>>>> = a.epsilon_moves.iter().map(|(from, moves)| (*from, moves.iter().map(|mv| EpsilonMove::new(mv.from, mv.to, lift_to_n_vars(&mv.update, register_count))).collect())).collect();
	for (from, moves) in &b.epsilon_moves {
		let shifted = moves.iter().map(|mv| EpsilonMove::new(mv.from + offset, mv.to + offset, lift_to_n_vars(&mv.update, register_count))).collect();
		epsilon_map.insert(from + offset, shifted);
	}

	let empty_update: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
	epsilon_map.insert(fresh, vec![EpsilonMove::new(fresh, a.initial_state(), empty_update.clone()), EpsilonMove::new(fresh, b.initial_state() + offset, empty_update)]);

	let mut output: BTreeMap<StateId, SimpleVariableUpdate<S>> = a.output.iter().map(|(q, u)| (*q, lift_to_n_vars(u, register_count))).collect();
	for (q, u) in &b.output {
		output.insert(q + offset, lift_to_n_vars(u, register_count));
	}

	let states: BTreeSet<StateId> = a.states().chain(b.states().map(|s| s + offset)).chain([fresh]).collect();
	Sst::from_parts(states, fresh, variables, output, input_map, epsilon_map, false, false)
}

/// Concatenation: `a` and `b` are renamed onto a shared register space (a
/// dedicated accumulator register appended after both), `a`'s finals get an
/// epsilon to `b`'s initial that stashes `a`'s output into the accumulator,
/// and `b`'s finals prepend the accumulator to their own output.
pub fn concatenate<P: Clone, S: Clone, F: Clone>(a: &Sst<P, S, F>, b: &Sst<P, S, F>) -> Sst<P, S, F> {
	let a_count = a.variable_count();
	let b_count = b.variable_count();
	let register_count = a_count.max(b_count) + 1;
	let acc = register_count - 1;
	let variables: Vec<String> = (0..register_count).map(|i| format!("x{i}")).collect();

	let offset = a.max_state_id();

	let input_map: BTreeMap<StateId, Vec<InputMove<P, FunctionalVariableUpdate<S, F>>>> = a
		.input_moves
		.iter()
		.map(|(from, moves)| (*from, moves.iter().map(|mv| InputMove::new(mv.from, mv.to, mv.guard.clone(), lift_to_n_vars(&mv.update, register_count))).collect()))
		.chain(b.input_moves.iter().map(|(from, moves)| {
			(
				from + offset,
				moves
					.iter()
					.map(|mv| {
						let mut update = lift_to_n_vars(&mv.update, register_count);
						update[acc] = vec![crate::token::Token::Constant(ConstantToken::Variable(acc))];
						InputMove::new(mv.from + offset, mv.to + offset, mv.guard.clone(), update)
					})
					.collect(),
			)
		}))
		.collect();

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<S>>>> = a.epsilon_moves.iter().map(|(from, moves)| (*from, moves.iter().map(|mv| EpsilonMove::new(mv.from, mv.to, lift_to_n_vars(&mv.update, register_count))).collect())).collect();
	for (from, moves) in &b.epsilon_moves {
		let shifted = moves
			.iter()
			.map(|mv| {
				let mut update = lift_to_n_vars(&mv.update, register_count);
				update[acc] = vec![ConstantToken::Variable(acc)];
				EpsilonMove::new(mv.from + offset, mv.to + offset, update)
			})
			.collect();
		epsilon_map.insert(from + offset, shifted);
	}

	for (&final_a, out_a) in &a.output {
		let mut stash: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
		stash[acc] = out_a[0].clone();
		epsilon_map.entry(final_a).or_default().push(EpsilonMove::new(final_a, b.initial_state() + offset, stash));
	}

	let mut output: BTreeMap<StateId, SimpleVariableUpdate<S>> = BTreeMap::new();
	for (&final_b, out_b) in &b.output {
		let mut combined: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
		let mut x0 = vec![ConstantToken::Variable(acc)];
		x0.extend(out_b[0].clone());
		combined[0] = x0;
		output.insert(final_b + offset, combined);
	}

	let states: BTreeSet<StateId> = a.states().chain(b.states().map(|s| s + offset)).collect();
	Sst::from_parts(states, a.initial_state(), variables, output, input_map, epsilon_map, false, false)
}

/// Kleene star: a fresh initial/final state with an accumulator register.
/// Each of `sst`'s own finals gets an epsilon back to the fresh state that
/// appends its output to the accumulator (`x_acc := x_acc . out(q)`); the
/// fresh state's own output is the accumulator alone. `left` reverses the
/// append order, giving `leftStar`'s iteration order (spec §8 scenario 4).
pub fn star<P: Clone, S: Clone, F: Clone>(sst: &Sst<P, S, F>, left: bool) -> Sst<P, S, F> {
	let base_count = sst.variable_count();
	let register_count = base_count + 1;
	let acc = register_count - 1;
	let variables: Vec<String> = (0..register_count).map(|i| format!("x{i}")).collect();

	let fresh = sst.max_state_id();

	let input_map: BTreeMap<StateId, Vec<InputMove<P, FunctionalVariableUpdate<S, F>>>> = sst
		.input_moves
		.iter()
		.map(|(from, moves)| {
			(
				*from,
				moves
					.iter()
					.map(|mv| {
						let mut update = lift_to_n_vars(&mv.update, register_count);
						update[acc] = vec![crate::token::Token::Constant(ConstantToken::Variable(acc))];
						InputMove::new(mv.from, mv.to, mv.guard.clone(), update)
					})
					.collect(),
			)
		})
		.collect();

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<S>>>> = sst
		.epsilon_moves
		.iter()
		.map(|(from, moves)| {
			(
				*from,
				moves
					.iter()
					.map(|mv| {
						let mut update = lift_to_n_vars(&mv.update, register_count);
						update[acc] = vec![ConstantToken::Variable(acc)];
						EpsilonMove::new(mv.from, mv.to, update)
					})
					.collect(),
			)
		})
		.collect();

	for (&final_q, out_q) in &sst.output {
		let mut update: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
		update[acc] = if left {
			let mut seq = out_q[0].clone();
			seq.push(ConstantToken::Variable(acc));
			seq
		} else {
			let mut seq = vec![ConstantToken::Variable(acc)];
			seq.extend(out_q[0].clone());
			seq
		};
		epsilon_map.entry(final_q).or_default().push(EpsilonMove::new(final_q, fresh, update));
	}

	let mut output = BTreeMap::new();
	let mut fresh_output: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
	fresh_output[0] = vec![ConstantToken::Variable(acc)];
	output.insert(fresh, fresh_output);

	// Re-enter the loop body: clear the base registers for the next
	// iteration but keep what has been accumulated so far.
	let mut reenter: SimpleVariableUpdate<S> = crate::token::empty_update(register_count);
	reenter[acc] = vec![ConstantToken::Variable(acc)];
	epsilon_map.insert(fresh, vec![EpsilonMove::new(fresh, sst.initial_state(), reenter)]);

	let states: BTreeSet<StateId> = sst.states().chain([fresh]).collect();
	Sst::from_parts(states, fresh, variables, output, input_map, epsilon_map, false, false)
}

fn intern_tuple(tuple: Vec<StateId>, reached: &mut BTreeMap<Vec<StateId>, StateId>, tuples_by_id: &mut Vec<Vec<StateId>>, worklist: &mut VecDeque<StateId>) -> StateId {
	if let Some(&id) = reached.get(&tuple) {
		return id;
	}
	let id = tuples_by_id.len();
	reached.insert(tuple.clone(), id);
	tuples_by_id.push(tuple);
	worklist.push_back(id);
	id
}

/// All combinations picking one move from each of `options`, as index lists
/// into the respective slices.
fn cartesian_indices(options: &[usize]) -> Vec<Vec<usize>> {
	options.iter().fold(vec![Vec::new()], |acc, &len| {
		if len == 0 {
			return Vec::new();
		}
		acc.into_iter().flat_map(|prefix| (0..len).map(move |i| [prefix.clone(), vec![i]].concat())).collect()
	})
}

/// Shuffles `components` (all sharing the same guard and register-token
/// types), interleaving one iteration's output from each component per
/// round. Built as three synchronized copies of the n-ary synchronized
/// product: the first copy just scans input and, at a tuple where every
/// component is simultaneously final, hands off to the second copy via an
/// epsilon that buffers each component's current output (`x_buf_i :=
/// out_i(q_i)`); the second and third copies cycle into each other on
/// further rounds, alternately combining the freshly-buffered half into the
/// shared accumulator (`x_acc := x_acc . buf . new_buf`, reversed for
/// `left`) and re-arming the buffers — both of their own final tuples mirror
/// the accumulator into register 0.
pub fn compute_shuffle<Ba: BooleanAlgebra>(ba: &Ba, components: &[&Sst<Ba::Predicate, Ba::Domain, Ba::Function>], left: bool, budget: &TimeoutBudget) -> Result<Sst<Ba::Predicate, Ba::Domain, Ba::Function>, SstError<Ba::Error>> {
	let span = tracing::debug_span!("compute_shuffle", components = components.len());
	let _enter = span.enter();

	let n = components.len();
	let mut renames: Vec<Vec<usize>> = Vec::with_capacity(n);
	let mut offset = 0usize;
	for c in components {
		let count = c.variable_count();
		renames.push((0..count).map(|i| offset + i).collect());
		offset += count;
	}
	let buf_start = offset;
	let acc = buf_start + n;
	let register_count = acc + 1;
	let variables: Vec<String> = (0..register_count).map(|i| format!("x{i}")).collect();

	// The n-ary synchronized product, shared by all three copies' scanning
	// transitions (only the epsilon hand-offs differ between copies).
	let mut reached: BTreeMap<Vec<StateId>, StateId> = BTreeMap::new();
	let mut tuples_by_id: Vec<Vec<StateId>> = Vec::new();
	let mut worklist: VecDeque<StateId> = VecDeque::new();

	let initial_tuple: Vec<StateId> = components.iter().map(|c| c.initial_state()).collect();
	intern_tuple(initial_tuple, &mut reached, &mut tuples_by_id, &mut worklist);

	let mut base_moves: BTreeMap<StateId, Vec<InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>>> = BTreeMap::new();
	let mut product_finals: BTreeSet<StateId> = BTreeSet::new();

	while let Some(id) = worklist.pop_front() {
		budget.checkpoint().map_err(|e| SstError::timeout(id, e.budget_ms))?;
		let tuple = tuples_by_id[id].clone();

		if tuple.iter().zip(components).all(|(&q, c)| c.is_final(q)) {
			product_finals.insert(id);
		}

		let move_lists: Vec<&[InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>]> = tuple.iter().zip(components).map(|(&q, c)| c.get_input_moves_from(q)).collect();
		let lens: Vec<usize> = move_lists.iter().map(|l| l.len()).collect();
		for combo_indices in cartesian_indices(&lens) {
			let combo: Vec<&InputMove<_, _>> = combo_indices.iter().enumerate().map(|(i, &j)| &move_lists[i][j]).collect();
			let guard = ba.and_all(combo.iter().map(|mv| &mv.guard));
			if !ba.is_satisfiable(&guard).map_err(SstError::Ba)? {
				continue;
			}
			let mut update: FunctionalVariableUpdate<Ba::Domain, Ba::Function> = vec![Vec::new(); register_count];
			for (i, mv) in combo.iter().enumerate() {
				for (slot, seq) in rename_vars(&mv.update, &renames[i]).into_iter().enumerate() {
					update[renames[i][slot]] = seq;
				}
			}
			for b in 0..n {
				update[buf_start + b] = vec![Token::Constant(ConstantToken::Variable(buf_start + b))];
			}
			update[acc] = vec![Token::Constant(ConstantToken::Variable(acc))];

			let target_tuple: Vec<StateId> = combo.iter().map(|mv| mv.to).collect();
			let target_id = intern_tuple(target_tuple, &mut reached, &mut tuples_by_id, &mut worklist);
			base_moves.entry(id).or_default().push(InputMove::new(id, target_id, guard, update));
		}
	}

	let tuple_count = tuples_by_id.len();
	let copy = |c: usize, id: StateId| -> StateId { id + c * tuple_count };

	let mut input_map: BTreeMap<StateId, Vec<InputMove<Ba::Predicate, FunctionalVariableUpdate<Ba::Domain, Ba::Function>>>> = BTreeMap::new();
	for c in 0..3 {
		for (&from, moves) in &base_moves {
			let shifted = moves.iter().map(|mv| InputMove::new(copy(c, mv.from), copy(c, mv.to), mv.guard.clone(), mv.update.clone())).collect();
			input_map.insert(copy(c, from), shifted);
		}
	}

	let mut epsilon_map: BTreeMap<StateId, Vec<EpsilonMove<SimpleVariableUpdate<Ba::Domain>>>> = BTreeMap::new();
	let mut output: BTreeMap<StateId, SimpleVariableUpdate<Ba::Domain>> = BTreeMap::new();

	for &id in &product_finals {
		let tuple = &tuples_by_id[id];
		let component_outputs: Vec<Vec<ConstantToken<Ba::Domain>>> = tuple
			.iter()
			.zip(components)
			.enumerate()
			.map(|(i, (&q, c))| rename_tokens(&c.output_for(q).expect("final tuple member has output")[0], &renames[i]))
			.collect();

		// Re-arming edge shared by copy0->copy1 and copy2->copy1: buffer this
		// round's outputs, reset per-component registers, keep the accumulator.
		let rearm = |target_copy: usize| -> EpsilonMove<SimpleVariableUpdate<Ba::Domain>> {
			let mut update: SimpleVariableUpdate<Ba::Domain> = crate::token::empty_update(register_count);
			for (i, out) in component_outputs.iter().enumerate() {
				update[buf_start + i] = out.clone();
			}
			update[acc] = vec![ConstantToken::Variable(acc)];
			EpsilonMove::new(0, copy(target_copy, id), update)
		};

		epsilon_map.entry(copy(0, id)).or_default().push({
			let mut mv = rearm(1);
			mv.from = copy(0, id);
			mv
		});
		epsilon_map.entry(copy(2, id)).or_default().push({
			let mut mv = rearm(1);
			mv.from = copy(2, id);
			mv
		});

		// Combining edge copy1->copy2: fold this round's fresh outputs
		// together with the previously-buffered half into the accumulator.
		let mut combine_update: SimpleVariableUpdate<Ba::Domain> = crate::token::empty_update(register_count);
		let mut acc_seq = vec![ConstantToken::Variable(acc)];
		for (i, out) in component_outputs.iter().enumerate() {
			let pair = if left {
				let mut seq = out.clone();
				seq.push(ConstantToken::Variable(buf_start + i));
				seq
			} else {
				let mut seq = vec![ConstantToken::Variable(buf_start + i)];
				seq.extend(out.clone());
				seq
			};
			acc_seq.extend(pair);
		}
		combine_update[acc] = acc_seq;
		epsilon_map.entry(copy(1, id)).or_default().push(EpsilonMove::new(copy(1, id), copy(2, id), combine_update));

		let mut out_update: SimpleVariableUpdate<Ba::Domain> = crate::token::empty_update(register_count);
		out_update[0] = vec![ConstantToken::Variable(acc)];
		output.insert(copy(1, id), out_update.clone());
		output.insert(copy(2, id), out_update);
	}

	let states: BTreeSet<StateId> = (0..3).flat_map(|c| (0..tuple_count).map(move |id| copy(c, id))).collect();
	let initial_id = copy(0, reached[&tuples_by_id[0].clone()]);

	Ok(Sst::from_parts(states, initial_id, variables, output, input_map, epsilon_map, false, false))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::mk_sst;
	use crate::test_support::CharBa;
	use crate::token::{identity_update, Token};

	fn single_symbol_sst() -> Sst<std::collections::BTreeSet<char>, char, fn(char) -> char> {
		let update: FunctionalVariableUpdate<char, fn(char) -> char> = vec![vec![Token::Constant(ConstantToken::Variable(0)), Token::Function(|c| c)]];
		let moves = vec![InputMove::new(0, 1, CharBa::range('a', 'z'), update)];
		let mut output = BTreeMap::new();
		output.insert(1, identity_update(1));
		mk_sst(&CharBa, moves, vec![], 0, vec!["x0".into()], output, false).unwrap()
	}

	#[test]
	fn union_keeps_both_branches_reachable() {
		let a = single_symbol_sst();
		let b = single_symbol_sst();
		let u = union(&a, &b);
		assert_eq!(u.get_epsilon_from(u.initial_state()).len(), 2);
	}

	#[test]
	fn concatenate_stashes_first_branchs_output_in_the_accumulator() {
		let a = single_symbol_sst();
		let b = single_symbol_sst();
		let c = concatenate(&a, &b);
		assert!(!c.is_empty_language());
	}

	#[test]
	fn star_accepts_the_empty_string_via_the_fresh_final() {
		let a = single_symbol_sst();
		let s = star(&a, false);
		assert!(s.is_final(s.initial_state()));
	}

	#[test]
	fn shuffle_builds_three_state_copies() {
		let a = single_symbol_sst();
		let b = single_symbol_sst();
		let budget = TimeoutBudget::unbounded();
		let shuffled = compute_shuffle(&CharBa, &[&a, &b], false, &budget).unwrap();
		assert_eq!(shuffled.state_count() % 3, 0);
		assert!(shuffled.final_states().count() >= 2);
	}

	#[test]
	fn left_shuffle_reverses_accumulation_order() {
		let a = single_symbol_sst();
		let b = single_symbol_sst();
		let budget = TimeoutBudget::unbounded();
		let right = compute_shuffle(&CharBa, &[&a, &b], false, &budget).unwrap();
		let left = compute_shuffle(&CharBa, &[&a, &b], true, &budget).unwrap();
		assert_eq!(right.variable_count(), left.variable_count());
	}
}
