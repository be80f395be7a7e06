/*!
[RelationBounds]: the lower (must-be-present) and upper (may-be-present)
tuple sets allocated to one relation before a [BooleanMatrix](super::matrix::BooleanMatrix)
is materialized for it (spec §3, §4.3).
*/

use super::universe::TupleSet;

/// The lower and upper bound tuple sets for one relation, at one arity.
/// Invariant: `lower` is a subset of `upper`.
#[derive(Clone, Debug)]
pub struct RelationBounds {
    pub arity: usize,
    pub lower: TupleSet,
    pub upper: TupleSet,
}

impl RelationBounds {
    pub fn new(arity: usize, lower: TupleSet, upper: TupleSet) -> Self {
        debug_assert!(lower.is_subset(&upper), "lower bound must be a subset of the upper bound");
        RelationBounds { arity, lower, upper }
    }

    /// A relation bounded only above — no tuple is forced present.
    pub fn unconstrained(arity: usize, upper: TupleSet) -> Self {
        RelationBounds::new(arity, TupleSet::empty(), upper)
    }

    /// A relation whose bounds coincide — every upper-bound tuple is forced present.
    pub fn exact(arity: usize, tuples: TupleSet) -> Self {
        RelationBounds::new(arity, tuples.clone(), tuples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::universe::AtomTuple;

    #[test]
    #[should_panic(expected = "subset")]
    fn lower_must_be_subset_of_upper_in_debug() {
        let lower = TupleSet::from_tuples([AtomTuple::new(vec![5])]);
        let upper = TupleSet::from_tuples([AtomTuple::new(vec![0])]);
        RelationBounds::new(1, lower, upper);
    }
}
