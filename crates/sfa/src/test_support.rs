//! A trivial two-valued Boolean algebra (`Predicate = bool`, `Domain = ()`)
//! shared by this crate's own unit tests.
//!
//! Not exported outside `#[cfg(test)]`: the core stays BA-agnostic, concrete
//! algebras are an external concern (spec §1 "Out of scope"). `true`/`false`
//! stand in for "matches"/"never matches"; minterms of a predicate list are
//! just "the constant true, if any predicate is true" and "the constant
//! false, if some predicate is false (or the list is empty)".

use satra_core::ba::{BooleanAlgebra, Minterm, MintermError};
use satra_core::TimeoutBudget;

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("unreachable: BoolBa never fails")]
pub struct Never;

pub struct BoolBa;

impl BooleanAlgebra for BoolBa {
	type Predicate = bool;
	type Domain = ();
	type Function = ();
	type Error = Never;

	fn top(&self) -> bool {
		true
	}

	fn bottom(&self) -> bool {
		false
	}

	fn and(&self, a: &bool, b: &bool) -> bool {
		*a && *b
	}

	fn or(&self, a: &bool, b: &bool) -> bool {
		*a || *b
	}

	fn not(&self, a: &bool) -> bool {
		!*a
	}

	fn is_satisfiable(&self, p: &bool) -> Result<bool, Never> {
		Ok(*p)
	}

	fn generate_witness(&self, p: &bool) -> Result<Option<()>, Never> {
		Ok(p.then_some(()))
	}

	fn apply(&self, _f: &(), _symbol: &()) {}

	fn denotes(&self, p: &bool, _symbol: &()) -> Result<bool, Never> {
		Ok(*p)
	}

	fn get_minterms(
		&self,
		preds: &[bool],
		budget: &TimeoutBudget,
	) -> Result<Vec<Minterm<bool>>, MintermError<Never>> {
		budget.checkpoint()?;
		let mut out = Vec::new();
		if preds.iter().any(|p| *p) {
			out.push(Minterm::new(true, preds.to_vec()));
		}
		if preds.iter().any(|p| !*p) || preds.is_empty() {
			out.push(Minterm::new(false, preds.iter().map(|_| false).collect()));
		}
		Ok(out)
	}
}
