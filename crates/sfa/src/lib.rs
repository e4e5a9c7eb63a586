//! Symbolic finite automata: a closure-complete regular language toolkit
//! over an abstract Boolean algebra of predicates.
//!
//! An [`Sfa`] replaces concrete alphabet symbols on its transitions with
//! predicates drawn from a caller-supplied [`satra_core::BooleanAlgebra`].
//! Automata are immutable after construction ([`construct::mk_sfa`]); every
//! algorithm in this crate consumes its inputs by shared reference and
//! returns a fresh value.

pub mod ambiguity;
pub mod boolean_ops;
pub mod concat_star;
pub mod construct;
pub mod determinize;
pub mod equivalence;
pub mod error;
pub mod epsilon;
pub mod minimize;
mod sfa;
#[cfg(test)]
mod test_support;
pub mod total;

pub use construct::mk_sfa;
pub use error::SfaError;
pub use sfa::Sfa;

pub use satra_core::{EpsilonMove, InputMove, StateId, TimeoutBudget};
