//! Property-based checks of the algebraic laws satisfied by the SFA
//! closure operations: commutativity and associativity of union and
//! intersection, double-complement, `A \ A ≡ ∅`, and that
//! `determinize`/`totalize`/`minimize` all preserve language equivalence.

mod support;

use proptest::prelude::*;
use satra::prelude::*;
use satra::sfa::boolean_ops::{complement, difference, intersect, union};
use satra::sfa::construct::{empty_language, epsilon_language, single_predicate};
use satra::sfa::determinize::determinize;
use satra::sfa::equivalence::{are_equivalent, Equivalence};
use satra::sfa::minimize::minimize;
use satra::sfa::total::totalize;
use support::CharSetBa;

const ALPHABET: [char; 3] = ['a', 'b', 'c'];

fn word_automaton(word: &str) -> Sfa<std::collections::BTreeSet<char>> {
	word.chars().fold(epsilon_language(&CharSetBa), |acc, c| {
		satra::sfa::concat_star::concatenate(&acc, &single_predicate(&CharSetBa, CharSetBa::single(c)))
	})
}

fn language_automaton(words: &[String]) -> Sfa<std::collections::BTreeSet<char>> {
	words.iter().fold(empty_language(&CharSetBa), |acc, w| union(&acc, &word_automaton(w)))
}

fn equivalent(a: &Sfa<std::collections::BTreeSet<char>>, b: &Sfa<std::collections::BTreeSet<char>>) -> bool {
	matches!(are_equivalent(&CharSetBa, a, b, &TimeoutBudget::unbounded()).unwrap(), Equivalence::Equivalent)
}

fn word_strategy() -> impl Strategy<Value = String> {
	proptest::collection::vec(proptest::sample::select(ALPHABET.to_vec()), 0..=3).prop_map(|cs| cs.into_iter().collect())
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
	proptest::collection::vec(word_strategy(), 0..=3)
}

proptest! {
	#[test]
	fn union_is_commutative(a in words_strategy(), b in words_strategy()) {
		let left = union(&language_automaton(&a), &language_automaton(&b));
		let right = union(&language_automaton(&b), &language_automaton(&a));
		prop_assert!(equivalent(&left, &right));
	}

	#[test]
	fn union_is_associative(a in words_strategy(), b in words_strategy(), c in words_strategy()) {
		let (sa, sb, sc) = (language_automaton(&a), language_automaton(&b), language_automaton(&c));
		let left = union(&union(&sa, &sb), &sc);
		let right = union(&sa, &union(&sb, &sc));
		prop_assert!(equivalent(&left, &right));
	}

	#[test]
	fn intersection_is_commutative(a in words_strategy(), b in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let left = intersect(&CharSetBa, &language_automaton(&a), &language_automaton(&b), &budget).unwrap();
		let right = intersect(&CharSetBa, &language_automaton(&b), &language_automaton(&a), &budget).unwrap();
		prop_assert!(equivalent(&left, &right));
	}

	#[test]
	fn intersection_is_associative(a in words_strategy(), b in words_strategy(), c in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let (sa, sb, sc) = (language_automaton(&a), language_automaton(&b), language_automaton(&c));
		let ab = intersect(&CharSetBa, &sa, &sb, &budget).unwrap();
		let left = intersect(&CharSetBa, &ab, &sc, &budget).unwrap();
		let bc = intersect(&CharSetBa, &sb, &sc, &budget).unwrap();
		let right = intersect(&CharSetBa, &sa, &bc, &budget).unwrap();
		prop_assert!(equivalent(&left, &right));
	}

	#[test]
	fn double_complement_is_identity(words in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let a = language_automaton(&words);
		let not_a = complement(&CharSetBa, &a, &budget).unwrap();
		let not_not_a = complement(&CharSetBa, &not_a, &budget).unwrap();
		prop_assert!(equivalent(&a, &not_not_a));
	}

	#[test]
	fn a_minus_a_is_empty(words in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let a = language_automaton(&words);
		let diff = difference(&CharSetBa, &a, &a, &budget).unwrap();
		prop_assert!(equivalent(&diff, &empty_language(&CharSetBa)));
	}

	#[test]
	fn determinize_preserves_equivalence(words in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let a = language_automaton(&words);
		let d = determinize(&CharSetBa, &a, &budget).unwrap();
		prop_assert!(equivalent(&a, &d));
	}

	#[test]
	fn totalize_preserves_equivalence(words in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let a = language_automaton(&words);
		let t = totalize(&CharSetBa, &a, &budget).unwrap();
		prop_assert!(equivalent(&a, &t));
	}

	#[test]
	fn minimize_preserves_equivalence(words in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let a = language_automaton(&words);
		let m = minimize(&CharSetBa, &a, &budget).unwrap();
		prop_assert!(equivalent(&a, &m));
	}

	#[test]
	fn hopcroft_karp_agrees_with_difference_based_equivalence(a in words_strategy(), b in words_strategy()) {
		let budget = TimeoutBudget::unbounded();
		let sa = language_automaton(&a);
		let sb = language_automaton(&b);

		let hk_equivalent = equivalent(&sa, &sb);

		let a_minus_b = difference(&CharSetBa, &sa, &sb, &budget).unwrap();
		let b_minus_a = difference(&CharSetBa, &sb, &sa, &budget).unwrap();
		let diff_equivalent = a_minus_b.is_empty_language() && b_minus_a.is_empty_language();

		prop_assert_eq!(hk_equivalent, diff_equivalent);
	}
}
