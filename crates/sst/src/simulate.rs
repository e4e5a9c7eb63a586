//! Running an `Sst` over a concrete input word (spec §4.14).

use satra_core::{BooleanAlgebra, TimeoutBudget};

use crate::error::SstError;
use crate::sst::Sst;
use crate::token::{ConstantToken, FunctionalVariableUpdate, SimpleVariableUpdate, Token};

/// The runtime register state: one concrete symbol sequence per register,
/// as opposed to the token sequences an `Sst`'s moves carry at rest.
pub type VariableAssignment<S> = Vec<Vec<S>>;

fn empty_assignment<S>(register_count: usize) -> VariableAssignment<S> {
	vec![Vec::new(); register_count]
}

fn apply_simple<S: Clone>(update: &SimpleVariableUpdate<S>, assignment: &VariableAssignment<S>) -> VariableAssignment<S> {
	update
		.iter()
		.map(|sequence| {
			sequence
				.iter()
				.flat_map(|token| match token {
					ConstantToken::Variable(i) => assignment[*i].clone(),
					ConstantToken::Literal(s) => vec![s.clone()],
				})
				.collect()
		})
		.collect()
}

fn apply_functional<Ba: BooleanAlgebra>(ba: &Ba, update: &FunctionalVariableUpdate<Ba::Domain, Ba::Function>, assignment: &VariableAssignment<Ba::Domain>, symbol: &Ba::Domain) -> VariableAssignment<Ba::Domain> {
	update
		.iter()
		.map(|sequence| {
			sequence
				.iter()
				.flat_map(|token| match token {
					Token::Constant(ConstantToken::Variable(i)) => assignment[*i].clone(),
					Token::Constant(ConstantToken::Literal(s)) => vec![s.clone()],
					Token::Function(f) => vec![ba.apply(f, symbol)],
				})
				.collect()
		})
		.collect()
}

/// Runs `sst` on `input`, returning the value of register `0` at whatever
/// final state is reached after the last symbol, or `None` if no final
/// state is reachable by then.
///
/// Configurations are tracked as a set of `(state, assignment)` pairs
/// rather than a single one: an `Sst` need not be deterministic, and
/// distinct paths through it can reach the same state with different
/// register contents.
pub fn run<Ba: BooleanAlgebra>(ba: &Ba, sst: &Sst<Ba::Predicate, Ba::Domain, Ba::Function>, input: &[Ba::Domain], budget: &TimeoutBudget) -> Result<Option<Vec<Ba::Domain>>, SstError<Ba::Error>> {
	let span = tracing::debug_span!("sst_run", states = sst.state_count(), input_len = input.len());
	let _enter = span.enter();

	let register_count = sst.variable_count();
	let mut configs: Vec<(satra_core::StateId, VariableAssignment<Ba::Domain>)> = vec![(sst.initial_state(), empty_assignment(register_count))];

	for symbol in input {
		budget.checkpoint().map_err(|e| SstError::timeout(sst.initial_state(), e.budget_ms))?;

		let mut next = Vec::new();
		for (state, assignment) in &configs {
			for mv in sst.get_input_moves_from(*state) {
				if ba.denotes(&mv.guard, symbol).map_err(SstError::Ba)? {
					let updated = apply_functional(ba, &mv.update, assignment, symbol);
					next.push((mv.to, updated));
				}
			}
		}
		configs = next;
		if configs.is_empty() {
			break;
		}
	}

	for (state, assignment) in &configs {
		if let Some(output) = sst.output_for(*state) {
			let result = apply_simple(output, assignment);
			return Ok(Some(result[0].clone()));
		}
	}

	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::mk_sst;
	use crate::test_support::CharBa;
	use satra_core::InputMove;
	use std::collections::BTreeMap;

	#[test]
	fn echoes_matched_symbols_into_register_zero() {
		fn identity(c: char) -> char {
			c
		}
		let update: FunctionalVariableUpdate<char, fn(char) -> char> = vec![vec![Token::Constant(ConstantToken::Variable(0)), Token::Function(identity)]];
		let moves = vec![InputMove::new(0, 0, CharBa::range('a', 'z'), update)];
		let mut output = BTreeMap::new();
		output.insert(0, crate::token::identity_update(1));
		let sst = mk_sst(&CharBa, moves, vec![], 0, vec!["x0".into()], output, false).unwrap();

		let input: Vec<char> = "abc".chars().collect();
		let result = run(&CharBa, &sst, &input, &TimeoutBudget::unbounded()).unwrap();
		assert_eq!(result, Some(vec!['a', 'b', 'c']));
	}

	#[test]
	fn no_final_state_reached_yields_no_result() {
		fn identity(c: char) -> char {
			c
		}
		let update: FunctionalVariableUpdate<char, fn(char) -> char> = vec![vec![Token::Constant(ConstantToken::Variable(0)), Token::Function(identity)]];
		let moves = vec![InputMove::new(0, 1, CharBa::range('a', 'z'), update)];
		let mut output = BTreeMap::new();
		output.insert(1, crate::token::identity_update(1));
		let sst = mk_sst(&CharBa, moves, vec![], 0, vec!["x0".into()], output, false).unwrap();

		let input: Vec<char> = vec!['!'];
		let result = run(&CharBa, &sst, &input, &TimeoutBudget::unbounded()).unwrap();
		assert_eq!(result, None);
	}
}
