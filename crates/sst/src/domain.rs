//! Projection of an `Sst`'s input domain onto a plain `Sfa` (spec §4.15).

use std::collections::BTreeSet;

use satra_core::{BooleanAlgebra, InputMove};
use satra_sfa::construct::mk_sfa;
use satra_sfa::{Sfa, SfaError};

use crate::sst::Sst;

/// Forgets every register update and keeps only the guarded shape of `sst`,
/// using its final states (`output.keys()`) as the resulting `Sfa`'s finals.
/// The result recognizes exactly the set of input words `sst` is defined on.
pub fn get_domain<Ba: BooleanAlgebra>(ba: &Ba, sst: &Sst<Ba::Predicate, Ba::Domain, Ba::Function>) -> Result<Sfa<Ba::Predicate>, SfaError<Ba::Error>> {
	let span = tracing::debug_span!("get_domain", states = sst.state_count());
	let _enter = span.enter();

	let moves = sst.all_input_moves().map(|mv| InputMove::new(mv.from, mv.to, mv.guard.clone(), ())).collect();
	let finals: BTreeSet<_> = sst.final_states().collect();

	mk_sfa(ba, moves, vec![], sst.initial_state(), finals, false, false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::construct::mk_sst;
	use crate::test_support::CharBa;
	use crate::token::{identity_update, FunctionalVariableUpdate};
	use std::collections::BTreeMap;

	#[test]
	fn domain_keeps_guards_and_finals_drops_updates() {
		fn identity(c: char) -> char {
			c
		}
		let update: FunctionalVariableUpdate<char, fn(char) -> char> = vec![vec![crate::token::Token::Constant(crate::token::ConstantToken::Variable(0)), crate::token::Token::Function(identity)]];
		let moves = vec![InputMove::new(0, 1, CharBa::range('a', 'z'), update)];
		let mut output = BTreeMap::new();
		output.insert(1, identity_update(1));
		let sst = mk_sst(&CharBa, moves, vec![], 0, vec!["x0".into()], output, false).unwrap();

		let sfa = get_domain(&CharBa, &sst).unwrap();
		assert_eq!(sfa.final_states().count(), 1);
		assert_eq!(sfa.transition_count(), 1);
	}
}
