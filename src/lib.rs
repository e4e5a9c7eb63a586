//! `satra` ties together symbolic finite automata ([`satra_sfa`]) and
//! symbolic streaming string transducers ([`satra_sst`]) over a common,
//! caller-supplied Boolean algebra of predicates ([`satra_core`]).
//!
//! Neither engine implements a concrete Boolean algebra itself — callers
//! bring their own [`prelude::BooleanAlgebra`] implementation (character
//! ranges, intervals, whatever the alphabet calls for) and hand it to
//! [`prelude::mk_sfa`]/[`prelude::mk_sst`] and the algorithms built on them.

pub use satra_core as core;
pub use satra_sfa as sfa;
pub use satra_sst as sst;

/// Re-exports of the types most programs touch, so a caller building
/// against a single Boolean algebra can `use satra::prelude::*;` instead of
/// reaching into each crate individually.
pub mod prelude {
	pub use satra_core::ba::{BooleanAlgebra, Minterm, MintermError};
	pub use satra_core::budget::TimeoutExceeded;
	pub use satra_core::{EpsilonMove, InputMove, Pair, StateId, TimeoutBudget};

	pub use satra_sfa::construct::mk_sfa;
	pub use satra_sfa::{Sfa, SfaError};

	pub use satra_sst::construct::mk_sst;
	pub use satra_sst::token::{ConstantToken, FunctionalVariableUpdate, SimpleVariableUpdate, Token, VariableUpdate};
	pub use satra_sst::{Sst, SstError};
}
