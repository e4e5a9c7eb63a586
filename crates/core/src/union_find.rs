//! Union-find with accumulated witnesses, used by the symbolic
//! Hopcroft-Karp equivalence check (spec §4.8).
//!
//! Grounded on the union-find used to drive automaton worklists in
//! `dennisss-dacha/pkg/automata/src/fsm.rs` (`common::algorithms::DisjointSets`),
//! reimplemented here since `common` is not an independently fetchable
//! crate. Unlike a classic union-find this one never path-compresses: doing
//! so would have to merge the accumulated witness sequences on every lookup,
//! which defeats the point of keeping them. Lookups are `O(depth)`, which is
//! acceptable since depth is bounded by the number of pair-states explored.

/// A forest of sets over a dynamically growing universe `0..len()`, where
/// each union records a witness value on the edge it creates. Walking from
/// any element back to its set's root accumulates the witnesses on the path,
/// which is exactly the counterexample word Hopcroft-Karp needs when two
/// states turn out not to be equivalent.
#[derive(Debug, Clone)]
pub struct DisjointSets<W> {
	parent: Vec<Option<usize>>,
	edge_witness: Vec<Option<W>>,
}

impl<W: Clone> DisjointSets<W> {
	/// Creates an empty forest.
	pub fn new() -> Self {
		Self {
			parent: Vec::new(),
			edge_witness: Vec::new(),
		}
	}

	/// Adds a new singleton set, returning its index.
	pub fn push(&mut self) -> usize {
		let id = self.parent.len();
		self.parent.push(None);
		self.edge_witness.push(None);
		id
	}

	pub fn len(&self) -> usize {
		self.parent.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parent.is_empty()
	}

	/// The representative of the set containing `x`.
	pub fn find(&self, mut x: usize) -> usize {
		while let Some(p) = self.parent[x] {
			x = p;
		}
		x
	}

	pub fn same_set(&self, a: usize, b: usize) -> bool {
		self.find(a) == self.find(b)
	}

	/// Merges the sets containing `a` and `b`, recording `witness` on the
	/// edge created between their two roots. Returns `false` (and does
	/// nothing) if `a` and `b` were already in the same set.
	pub fn union(&mut self, a: usize, b: usize, witness: W) -> bool {
		let ra = self.find(a);
		let rb = self.find(b);
		if ra == rb {
			return false;
		}
		self.parent[ra] = Some(rb);
		self.edge_witness[ra] = Some(witness);
		true
	}

	/// The sequence of witnesses from `x` up to its set's root, in that
	/// order (`x`'s own outgoing edge first).
	pub fn witness_path_to_root(&self, mut x: usize) -> Vec<W> {
		let mut path = Vec::new();
		while let Some(p) = self.parent[x] {
			path.push(self.edge_witness[x].clone().expect("edge always set with parent"));
			x = p;
		}
		path
	}
}

impl<W: Clone> Default for DisjointSets<W> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn union_merges_sets() {
		let mut ds: DisjointSets<char> = DisjointSets::new();
		let a = ds.push();
		let b = ds.push();
		let c = ds.push();
		assert!(!ds.same_set(a, b));
		assert!(ds.union(a, b, 'x'));
		assert!(ds.same_set(a, b));
		assert!(!ds.same_set(a, c));
		assert!(!ds.union(a, b, 'y'));
	}

	#[test]
	fn witness_path_accumulates_in_order() {
		let mut ds: DisjointSets<char> = DisjointSets::new();
		let a = ds.push();
		let b = ds.push();
		let c = ds.push();
		ds.union(a, b, 'x');
		ds.union(b, c, 'y');
		// a -> b (via 'x'), b -> c (via 'y'); root is c.
		assert_eq!(ds.find(a), c);
		assert_eq!(ds.witness_path_to_root(a), vec!['x', 'y']);
	}
}
