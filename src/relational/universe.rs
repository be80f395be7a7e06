/*!
The universe of atoms for one command invocation: a fixed, ordered set of
atoms partitioned by signature, immutable once built (spec §3).
*/

use std::collections::BTreeSet;

/// An element of the universe, identified by a small integer index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Atom {
    pub index: usize,
    pub name: String,
}

/// The fixed set of atoms available to one command, plus the contiguous
/// index range each signature (including its subtypes) was allocated.
#[derive(Clone, Debug, Default)]
pub struct Universe {
    atoms: Vec<Atom>,
    ranges: Vec<(String, std::ops::Range<usize>)>,
}

impl Universe {
    pub fn new() -> Self {
        Universe::default()
    }

    /// Append `count` fresh atoms named `{prefix}{i}`, recording the
    /// contiguous range allocated to `signature`.
    pub fn allocate_signature(&mut self, signature: &str, prefix: &str, count: usize) -> std::ops::Range<usize> {
        let start = self.atoms.len();
        for i in 0..count {
            self.atoms.push(Atom {
                index: start + i,
                name: format!("{prefix}{i}"),
            });
        }
        let range = start..(start + count);
        self.ranges.push((signature.to_string(), range.clone()));
        range
    }

    /// The atom-index range belonging to exactly `signature` (not its subtypes).
    pub fn range_of(&self, signature: &str) -> Option<std::ops::Range<usize>> {
        self.ranges
            .iter()
            .find(|(name, _)| name == signature)
            .map(|(_, r)| r.clone())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn name_of(&self, index: usize) -> &str {
        &self.atoms[index].name
    }
}

/// An ordered sequence of atom indices, of length `arity >= 1`.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct AtomTuple(Vec<usize>);

impl AtomTuple {
    pub fn new(indices: Vec<usize>) -> Self {
        assert!(!indices.is_empty(), "a tuple must have arity >= 1");
        AtomTuple(indices)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn first(&self) -> usize {
        self.0[0]
    }

    pub fn last(&self) -> usize {
        *self.0.last().unwrap()
    }

    /// All but the last column.
    pub fn prefix(&self) -> &[usize] {
        &self.0[..self.0.len() - 1]
    }

    /// All but the first column.
    pub fn suffix(&self) -> &[usize] {
        &self.0[1..]
    }

    /// Concatenate two tuples' index sequences into a new one.
    pub fn concat(left: &[usize], right: &[usize]) -> AtomTuple {
        let mut v = Vec::with_capacity(left.len() + right.len());
        v.extend_from_slice(left);
        v.extend_from_slice(right);
        AtomTuple(v)
    }
}

/// A set of same-arity [AtomTuple]s, canonically ordered lexicographically.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TupleSet {
    arity: Option<usize>,
    tuples: BTreeSet<AtomTuple>,
}

impl TupleSet {
    pub fn empty() -> Self {
        TupleSet::default()
    }

    pub fn from_tuples(tuples: impl IntoIterator<Item = AtomTuple>) -> Self {
        let mut set = TupleSet::empty();
        for t in tuples {
            set.insert(t);
        }
        set
    }

    pub fn insert(&mut self, tuple: AtomTuple) {
        if let Some(arity) = self.arity {
            assert_eq!(arity, tuple.arity(), "all tuples in a TupleSet share one arity");
        } else {
            self.arity = Some(tuple.arity());
        }
        self.tuples.insert(tuple);
    }

    pub fn contains(&self, tuple: &AtomTuple) -> bool {
        self.tuples.contains(tuple)
    }

    pub fn arity(&self) -> usize {
        self.arity.unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Tuples in canonical (lexicographic) order.
    pub fn iter(&self) -> impl Iterator<Item = &AtomTuple> {
        self.tuples.iter()
    }

    pub fn is_subset(&self, other: &TupleSet) -> bool {
        self.tuples.is_subset(&other.tuples)
    }

    pub fn union(&self, other: &TupleSet) -> TupleSet {
        let mut out = self.clone();
        for t in other.iter() {
            out.insert(t.clone());
        }
        out
    }
}
