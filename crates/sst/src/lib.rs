//! Symbolic streaming string transducers: SFAs extended with string-valued
//! registers updated simultaneously on every transition, over the same
//! abstract [`satra_core::BooleanAlgebra`] [`satra_sfa`] is built on.
//!
//! An [`Sst`] is immutable after construction ([`construct::mk_sst`]).
//! [`epsilon::remove_epsilon_moves`] composes register updates along
//! epsilon paths; [`combine`] holds the product/union/concatenation/star/
//! shuffle constructions; [`simulate::run`] executes a transducer on a
//! concrete word; [`domain::get_domain`] projects one onto a plain `Sfa`.

pub mod combine;
pub mod construct;
pub mod domain;
pub mod epsilon;
pub mod error;
pub mod simulate;
mod sst;
#[cfg(test)]
mod test_support;
pub mod token;
pub mod update;

pub use error::SstError;
pub use sst::Sst;

pub use satra_core::{BooleanAlgebra, EpsilonMove, InputMove, StateId, TimeoutBudget};
