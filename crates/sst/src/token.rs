//! Token types carried on a register's right-hand side (spec §3 "Token").

/// A literal symbol of the alphabet, or a reference to a register by its
/// dense index (spec §3 "`StringVariable`").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstantToken<S> {
	Literal(S),
	Variable(usize),
}

/// A [`ConstantToken`], or a deferred BA function applied to the current
/// input symbol — only ever appears inside a [`FunctionalVariableUpdate`]
/// (spec §3 "`FunctionToken`").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<S, F> {
	Constant(ConstantToken<S>),
	Function(F),
}

/// A register update: one token sequence per register, assigned
/// simultaneously (spec §3 "`VariableUpdate`").
pub type VariableUpdate<T> = Vec<Vec<T>>;

/// A [`VariableUpdate`] whose tokens are all [`ConstantToken`]s — used on
/// epsilon moves, output functions, and wherever the input symbol is already
/// known (spec §3).
pub type SimpleVariableUpdate<S> = VariableUpdate<ConstantToken<S>>;

/// A [`VariableUpdate`] that may additionally contain deferred function
/// tokens — used on input moves (spec §3).
pub type FunctionalVariableUpdate<S, F> = VariableUpdate<Token<S, F>>;

/// The update that leaves every register unchanged: register `i`'s sequence
/// is the single token `Variable(i)`. Left- and right-identity of update
/// composition (spec §8 "SST properties").
pub fn identity_update<S>(register_count: usize) -> SimpleVariableUpdate<S> {
	(0..register_count).map(|i| vec![ConstantToken::Variable(i)]).collect()
}

/// The update that clears every register to the empty sequence.
pub fn empty_update<T>(register_count: usize) -> VariableUpdate<T> {
	(0..register_count).map(|_| Vec::new()).collect()
}

/// A token type whose embedded variable references can be substituted
/// through an index-to-index renaming map.
pub trait Renamable {
	fn rename(&self, map: &[usize]) -> Self;
}

impl<S: Clone> Renamable for ConstantToken<S> {
	fn rename(&self, map: &[usize]) -> Self {
		match self {
			ConstantToken::Literal(s) => ConstantToken::Literal(s.clone()),
			ConstantToken::Variable(i) => ConstantToken::Variable(map[*i]),
		}
	}
}

impl<S: Clone, F: Clone> Renamable for Token<S, F> {
	fn rename(&self, map: &[usize]) -> Self {
		match self {
			Token::Constant(c) => Token::Constant(c.rename(map)),
			Token::Function(f) => Token::Function(f.clone()),
		}
	}
}

/// Applies [`Renamable::rename`] to every token of a sequence.
pub fn rename_tokens<T: Renamable>(tokens: &[T], map: &[usize]) -> Vec<T> {
	tokens.iter().map(|t| t.rename(map)).collect()
}

/// Lifts a constant token into a functional one.
pub fn lift_constant<S, F>(token: &ConstantToken<S>) -> Token<S, F>
where
	S: Clone,
{
	Token::Constant(token.clone())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_update_maps_every_register_to_itself() {
		let id: SimpleVariableUpdate<char> = identity_update(3);
		assert_eq!(id, vec![vec![ConstantToken::Variable(0)], vec![ConstantToken::Variable(1)], vec![ConstantToken::Variable(2)]]);
	}

	#[test]
	fn rename_substitutes_variable_indices_only() {
		let tokens = vec![ConstantToken::Literal('a'), ConstantToken::Variable(0)];
		let renamed = rename_tokens(&tokens, &[5]);
		assert_eq!(renamed, vec![ConstantToken::Literal('a'), ConstantToken::Variable(5)]);
	}
}
