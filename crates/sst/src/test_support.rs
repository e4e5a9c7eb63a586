//! A small explicit-alphabet Boolean algebra shared by this crate's own
//! unit tests: `Predicate = BTreeSet<char>`, exact (not interval) subsets of
//! a fixed printable-ASCII universe. Exactness keeps `and`/`or`/`not`
//! trivial set operations closed over `Predicate`, unlike a single-interval
//! representation, which a union of two disjoint ranges would escape.
//!
//! Not exported outside `#[cfg(test)]` — concrete algebras are an external
//! concern (spec §1 "Out of scope").

use std::collections::BTreeSet;

use satra_core::ba::{BooleanAlgebra, Minterm, MintermError};
use satra_core::TimeoutBudget;

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("unreachable: CharBa never fails")]
pub struct Never;

pub struct CharBa;

impl CharBa {
	fn universe() -> BTreeSet<char> {
		('a'..='z').chain('A'..='Z').chain(['!', ' ']).collect()
	}

	pub fn single(c: char) -> BTreeSet<char> {
		[c].into_iter().collect()
	}

	pub fn range(lo: char, hi: char) -> BTreeSet<char> {
		(lo..=hi).filter(|c| Self::universe().contains(c)).collect()
	}
}

impl BooleanAlgebra for CharBa {
	type Predicate = BTreeSet<char>;
	type Domain = char;
	type Function = fn(char) -> char;
	type Error = Never;

	fn top(&self) -> BTreeSet<char> {
		Self::universe()
	}

	fn bottom(&self) -> BTreeSet<char> {
		BTreeSet::new()
	}

	fn and(&self, a: &BTreeSet<char>, b: &BTreeSet<char>) -> BTreeSet<char> {
		a.intersection(b).copied().collect()
	}

	fn or(&self, a: &BTreeSet<char>, b: &BTreeSet<char>) -> BTreeSet<char> {
		a.union(b).copied().collect()
	}

	fn not(&self, a: &BTreeSet<char>) -> BTreeSet<char> {
		Self::universe().difference(a).copied().collect()
	}

	fn is_satisfiable(&self, p: &BTreeSet<char>) -> Result<bool, Never> {
		Ok(!p.is_empty())
	}

	fn generate_witness(&self, p: &BTreeSet<char>) -> Result<Option<char>, Never> {
		Ok(p.iter().next().copied())
	}

	fn apply(&self, f: &fn(char) -> char, symbol: &char) -> char {
		f(*symbol)
	}

	fn denotes(&self, p: &BTreeSet<char>, symbol: &char) -> Result<bool, Never> {
		Ok(p.contains(symbol))
	}

	fn get_minterms(&self, preds: &[BTreeSet<char>], budget: &TimeoutBudget) -> Result<Vec<Minterm<BTreeSet<char>>>, MintermError<Never>> {
		budget.checkpoint()?;
		let mut blocks: Vec<(BTreeSet<char>, Vec<bool>)> = vec![(Self::universe(), vec![false; preds.len()])];
		for (i, p) in preds.iter().enumerate() {
			let mut next = Vec::new();
			for (set, entails) in blocks {
				let inside: BTreeSet<char> = set.intersection(p).copied().collect();
				let outside: BTreeSet<char> = set.difference(p).copied().collect();
				if !inside.is_empty() {
					let mut e = entails.clone();
					e[i] = true;
					next.push((inside, e));
				}
				if !outside.is_empty() {
					next.push((outside, entails));
				}
			}
			blocks = next;
		}
		Ok(blocks.into_iter().map(|(set, entails)| Minterm::new(set, entails)).collect())
	}
}
