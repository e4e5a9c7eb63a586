//! The Boolean algebra contract (spec §4.1).
//!
//! `satra` never implements a concrete Boolean algebra: guard predicates,
//! satisfiability, and minterm enumeration are all supplied by the caller
//! through this trait. The two engines only ever borrow a `&impl
//! BooleanAlgebra` for the duration of a call; they never embed or mutate it
//! (spec §9 "Shared BA handle").

use crate::budget::{TimeoutBudget, TimeoutExceeded};

/// An effective Boolean algebra of predicates `Predicate` over a domain
/// `Domain`, with a family of deferred functions `Function` usable inside SST
/// functional updates.
///
/// Implementors are expected to be cheap to borrow (most are zero-sized or a
/// thin wrapper); `satra` never clones a `BooleanAlgebra` value, only the
/// predicates it produces.
pub trait BooleanAlgebra {
	/// A predicate over [`Self::Domain`]. Never compared structurally by the
	/// core — only through this trait's methods.
	type Predicate: Clone;

	/// An element of the alphabet the predicates range over.
	type Domain: Clone;

	/// A deferred function from the current input symbol to a replacement
	/// value, used inside SST functional updates.
	type Function: Clone;

	/// The error an implementor's own operations may fail with. Propagated
	/// unchanged by both engines (spec §7 item 4).
	type Error: std::error::Error + Send + Sync + 'static;

	/// The predicate satisfied by every element of the domain.
	fn top(&self) -> Self::Predicate;

	/// The predicate satisfied by no element of the domain.
	fn bottom(&self) -> Self::Predicate;

	/// Conjunction of two predicates.
	fn and(&self, a: &Self::Predicate, b: &Self::Predicate) -> Self::Predicate;

	/// Conjunction of an arbitrary number of predicates. Implementors may
	/// override this for a more efficient n-ary conjunction; the default
	/// folds with [`BooleanAlgebra::and`], starting from [`BooleanAlgebra::top`].
	fn and_all<'a, I>(&self, preds: I) -> Self::Predicate
	where
		I: IntoIterator<Item = &'a Self::Predicate>,
		Self::Predicate: 'a,
	{
		preds
			.into_iter()
			.fold(self.top(), |acc, p| self.and(&acc, p))
	}

	/// Disjunction of two predicates.
	fn or(&self, a: &Self::Predicate, b: &Self::Predicate) -> Self::Predicate;

	/// Disjunction of an arbitrary number of predicates, starting from
	/// [`BooleanAlgebra::bottom`].
	fn or_all<'a, I>(&self, preds: I) -> Self::Predicate
	where
		I: IntoIterator<Item = &'a Self::Predicate>,
		Self::Predicate: 'a,
	{
		preds
			.into_iter()
			.fold(self.bottom(), |acc, p| self.or(&acc, p))
	}

	/// Negation of a predicate.
	fn not(&self, a: &Self::Predicate) -> Self::Predicate;

	/// Whether some element of the domain satisfies `p`.
	fn is_satisfiable(&self, p: &Self::Predicate) -> Result<bool, Self::Error>;

	/// Whether `a` and `b` are satisfied by exactly the same elements.
	///
	/// Optional per spec §4.1; the default implementation derives it from
	/// [`BooleanAlgebra::is_satisfiable`]: `a ≡ b` iff neither
	/// `a ∧ ¬b` nor `b ∧ ¬a` is satisfiable.
	fn are_equivalent(&self, a: &Self::Predicate, b: &Self::Predicate) -> Result<bool, Self::Error> {
		let not_b = self.not(b);
		let not_a = self.not(a);
		let a_minus_b = self.and(a, &not_b);
		let b_minus_a = self.and(b, &not_a);
		Ok(!self.is_satisfiable(&a_minus_b)? && !self.is_satisfiable(&b_minus_a)?)
	}

	/// Produces some element of the domain satisfying `p`, if any.
	fn generate_witness(&self, p: &Self::Predicate) -> Result<Option<Self::Domain>, Self::Error>;

	/// Evaluates a deferred function against a concrete input symbol.
	fn apply(&self, f: &Self::Function, symbol: &Self::Domain) -> Self::Domain;

	/// Whether `symbol` satisfies `p`. Used by simulation (spec §4.14) to
	/// decide which guarded moves a concrete input symbol may take; not
	/// needed by any of the purely symbolic constructions, which only ever
	/// combine and test predicates for satisfiability in the abstract.
	fn denotes(&self, p: &Self::Predicate, symbol: &Self::Domain) -> Result<bool, Self::Error>;

	/// Enumerates the minterms of `preds`: a finite, pairwise-disjoint,
	/// jointly-exhaustive family of satisfiable predicates such that every
	/// `preds[i]` is a disjunction of some subset of the minterms.
	///
	/// Each returned [`Minterm`] records, for every index `i` of `preds`,
	/// whether the minterm entails `preds[i]`.
	fn get_minterms(
		&self,
		preds: &[Self::Predicate],
		budget: &TimeoutBudget,
	) -> Result<Vec<Minterm<Self::Predicate>>, MintermError<Self::Error>>;
}

/// A maximal conjunction of literals over a finite predicate set, paired
/// with the bit for each input predicate it entails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minterm<P> {
	predicate: P,
	entails: Vec<bool>,
}

impl<P> Minterm<P> {
	pub fn new(predicate: P, entails: Vec<bool>) -> Self {
		Self { predicate, entails }
	}

	/// The minterm's predicate: a satisfiable conjunction of literals.
	pub fn predicate(&self) -> &P {
		&self.predicate
	}

	/// Whether this minterm entails the input predicate at `index`.
	pub fn entails(&self, index: usize) -> bool {
		self.entails.get(index).copied().unwrap_or(false)
	}

	/// The indices of the input predicates this minterm entails.
	pub fn entailed_indices(&self) -> impl Iterator<Item = usize> + '_ {
		self.entails
			.iter()
			.enumerate()
			.filter_map(|(i, &b)| b.then_some(i))
	}
}

/// Failure of [`BooleanAlgebra::get_minterms`]: either the BA itself failed,
/// or the coarse-grained timeout budget for minterm enumeration expired.
#[derive(Debug, thiserror::Error)]
pub enum MintermError<E> {
	#[error("minterm enumeration exceeded its timeout budget")]
	Timeout(#[from] TimeoutExceeded),
	#[error(transparent)]
	Ba(E),
}
