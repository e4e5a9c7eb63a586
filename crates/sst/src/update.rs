//! Register update algebra: lifting, renaming, and composing variable
//! updates (spec §4.12).

use crate::token::{rename_tokens, ConstantToken, FunctionalVariableUpdate, Renamable, SimpleVariableUpdate, Token, VariableUpdate};

/// Pads `update` out to `register_count` registers by appending the empty
/// sequence for every fresh register, leaving the existing ones untouched.
pub fn lift_to_n_vars<T>(update: &VariableUpdate<T>, register_count: usize) -> VariableUpdate<T>
where
	T: Clone,
{
	let mut lifted = update.clone();
	lifted.resize_with(register_count, Vec::new);
	lifted
}

/// Substitutes every `Variable(i)` occurring in `update` with `Variable(map[i])`,
/// leaving literal and function tokens untouched.
pub fn rename_vars<T: Renamable>(update: &VariableUpdate<T>, map: &[usize]) -> VariableUpdate<T> {
	update.iter().map(|sequence| rename_tokens(sequence, map)).collect()
}

/// Composes two updates of the same register space: `first` is applied to
/// the pre-state, then `second` is applied to the result, i.e. this computes
/// `second . first` in the sense that a `Variable(i)` token in `second`
/// expands into `first`'s sequence for register `i`.
///
/// [`identity_update`](crate::token::identity_update) is the left and right
/// identity of this operation.
pub fn compose_with<S, F>(first: &SimpleVariableUpdate<S>, second: &FunctionalVariableUpdate<S, F>) -> FunctionalVariableUpdate<S, F>
where
	S: Clone,
	F: Clone,
{
	second
		.iter()
		.map(|sequence| {
			sequence
				.iter()
				.flat_map(|token| match token {
					Token::Constant(ConstantToken::Variable(i)) => first[*i]
						.iter()
						.map(|t| Token::Constant(t.clone()))
						.collect::<Vec<_>>(),
					Token::Constant(ConstantToken::Literal(s)) => vec![Token::Constant(ConstantToken::Literal(s.clone()))],
					Token::Function(f) => vec![Token::Function(f.clone())],
				})
				.collect()
		})
		.collect()
}

/// Composes two simple updates (both constant-only), used when chaining
/// updates along an all-epsilon path where no input symbol is ever
/// consulted.
pub fn compose_simple<S>(first: &SimpleVariableUpdate<S>, second: &SimpleVariableUpdate<S>) -> SimpleVariableUpdate<S>
where
	S: Clone,
{
	second
		.iter()
		.map(|sequence| {
			sequence
				.iter()
				.flat_map(|token| match token {
					ConstantToken::Variable(i) => first[*i].clone(),
					ConstantToken::Literal(s) => vec![ConstantToken::Literal(s.clone())],
				})
				.collect()
		})
		.collect()
}

/// Builds the disjoint-union update over a combined register space: `u_a`'s
/// registers are renamed through `rename_a` and `u_b`'s through `rename_b`
/// (expected to map into disjoint ranges of `0..rename_a.len() +
/// rename_b.len()`), and placed side by side.
pub fn combine_updates<T: Clone + Renamable>(rename_a: &[usize], rename_b: &[usize], u_a: &VariableUpdate<T>, u_b: &VariableUpdate<T>) -> VariableUpdate<T> {
	let total = rename_a.len() + rename_b.len();
	let mut combined: VariableUpdate<T> = vec![Vec::new(); total];
	for (i, sequence) in u_a.iter().enumerate() {
		combined[rename_a[i]] = rename_tokens(sequence, rename_a);
	}
	for (j, sequence) in u_b.iter().enumerate() {
		combined[rename_b[j]] = rename_tokens(sequence, rename_b);
	}
	combined
}

/// The single-vector equivalent of [`combine_updates`] used at a joint final
/// state reached by [`combine`](crate::combine::combine): every register
/// keeps its disjoint-union value, except register `0`, which becomes the
/// concatenation `out_a[0] . out_b[0]` — the two branches' outputs, one
/// after the other.
pub fn combine_output_updates<S: Clone>(rename_a: &[usize], rename_b: &[usize], out_a: &SimpleVariableUpdate<S>, out_b: &SimpleVariableUpdate<S>) -> SimpleVariableUpdate<S> {
	let mut combined = combine_updates(rename_a, rename_b, out_a, out_b);
	let mut concatenated = rename_tokens(&out_a[0], rename_a);
	concatenated.extend(rename_tokens(&out_b[0], rename_b));
	combined[0] = concatenated;
	combined
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::identity_update;

	#[test]
	fn lift_pads_with_empty_sequences() {
		let base: SimpleVariableUpdate<char> = identity_update(2);
		let lifted = lift_to_n_vars(&base, 4);
		assert_eq!(lifted.len(), 4);
		assert_eq!(lifted[2], Vec::<ConstantToken<char>>::new());
		assert_eq!(lifted[3], Vec::<ConstantToken<char>>::new());
	}

	#[test]
	fn identity_is_left_and_right_identity_of_composition() {
		let update: SimpleVariableUpdate<char> = vec![vec![ConstantToken::Variable(1), ConstantToken::Literal('x')], vec![ConstantToken::Variable(0)]];
		let id = identity_update(2);
		assert_eq!(compose_simple(&id, &update), update);
		assert_eq!(compose_simple(&update, &id), update);
	}

	#[test]
	fn compose_with_expands_variables_in_second() {
		let first: SimpleVariableUpdate<char> = vec![vec![ConstantToken::Literal('a')], vec![ConstantToken::Literal('b')]];
		let second: FunctionalVariableUpdate<char, ()> = vec![vec![Token::Constant(ConstantToken::Variable(1)), Token::Constant(ConstantToken::Variable(0))]];
		let composed = compose_with(&first, &second);
		assert_eq!(composed, vec![vec![Token::Constant(ConstantToken::Literal('b')), Token::Constant(ConstantToken::Literal('a'))]]);
	}

	#[test]
	fn combine_updates_places_branches_side_by_side() {
		let u_a: SimpleVariableUpdate<char> = identity_update(2);
		let u_b: SimpleVariableUpdate<char> = identity_update(1);
		let rename_a = [0, 1];
		let rename_b = [2];
		let combined = combine_updates(&rename_a, &rename_b, &u_a, &u_b);
		assert_eq!(combined.len(), 3);
		assert_eq!(combined[2], vec![ConstantToken::Variable(2)]);
	}

	#[test]
	fn combine_output_concatenates_register_zero() {
		let out_a: SimpleVariableUpdate<char> = vec![vec![ConstantToken::Literal('a')]];
		let out_b: SimpleVariableUpdate<char> = vec![vec![ConstantToken::Literal('b')]];
		let combined = combine_output_updates(&[0], &[1], &out_a, &out_b);
		assert_eq!(combined[0], vec![ConstantToken::Literal('a'), ConstantToken::Literal('b')]);
	}
}
