/*!
[Trace]: the `k`-state lasso skeleton a command's temporal scope allocates,
and [TemporalRelation]: one relation's value across that trace (spec §3, §4.4).
*/

use crate::cnf::builder::CnfBuilder;
use crate::cnf::formula::{BooleanFormula, Formula};
use crate::relational::bounds::RelationBounds;
use crate::relational::matrix::BooleanMatrix;
use crate::relational::universe::AtomTuple;
use crate::sat::literal::Literal;

/// The `k`-state skeleton of a bounded trace, plus (if `requires_loop`) the
/// mutually exclusive loop-back selectors asserted exactly-one.
pub struct Trace {
    k: usize,
    requires_loop: bool,
    loop_vars: Vec<Literal>,
}

impl Trace {
    /// Build a trace of `k` states. If `requires_loop`, allocates `k` loop
    /// selector variables and asserts exactly one is true (spec §4.4).
    pub fn new(k: usize, requires_loop: bool, builder: &mut CnfBuilder) -> Self {
        assert!(k >= 1, "a trace must have at least one state");
        let mut loop_vars = Vec::new();
        if requires_loop {
            for _ in 0..k {
                let v = builder.allocate_fresh_variable();
                loop_vars.push(Literal::new(v, true));
            }
            // at-least-one
            builder.add_clause(loop_vars.clone());
            // pairwise at-most-one
            for i in 0..loop_vars.len() {
                for j in (i + 1)..loop_vars.len() {
                    builder.add_clause(vec![loop_vars[i].negate(), loop_vars[j].negate()]);
                }
            }
        }
        Trace { k, requires_loop, loop_vars }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn requires_loop(&self) -> bool {
        self.requires_loop
    }

    /// `loopVar[i]` as a formula; only meaningful when `requires_loop`.
    pub fn loops_to(&self, i: usize) -> Formula {
        BooleanFormula::literal(self.loop_vars[i])
    }

    pub fn loop_variable(&self, i: usize) -> Literal {
        self.loop_vars[i]
    }
}

/// One relation's value across a [Trace]: a `BooleanMatrix` per state if
/// `is_variable`, else one matrix shared by every state.
pub struct TemporalRelation {
    is_variable: bool,
    states: Vec<BooleanMatrix>,
}

impl TemporalRelation {
    /// Allocate a constant relation: one matrix, reused at every state.
    pub fn constant(bounds: &RelationBounds, builder: &mut CnfBuilder) -> Self {
        TemporalRelation {
            is_variable: false,
            states: vec![BooleanMatrix::allocate(bounds, builder)],
        }
    }

    /// Allocate a variable relation: one independently-allocated matrix per
    /// trace state.
    pub fn variable(bounds: &RelationBounds, k: usize, builder: &mut CnfBuilder) -> Self {
        let states = (0..k).map(|_| BooleanMatrix::allocate(bounds, builder)).collect();
        TemporalRelation { is_variable: true, states }
    }

    pub fn is_variable(&self) -> bool {
        self.is_variable
    }

    /// The matrix at state `s` (state 0's matrix, if this relation is constant).
    pub fn at(&self, s: usize) -> &BooleanMatrix {
        if self.is_variable {
            &self.states[s]
        } else {
            &self.states[0]
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// `primedMembership(tuple, at s)` (spec §4.4): the value this relation's
    /// tuple `t` takes at the state *after* `s`. For a constant relation this
    /// is simply its (unchanging) membership. For a variable relation it is
    /// `matrix(s+1).mem(t)` when `s` is not the last state, and otherwise the
    /// lasso-combined membership across every possible loop target (`false`
    /// if the trace has no loop).
    pub fn primed_membership(&self, tuple: &AtomTuple, s: usize, trace: &Trace) -> Formula {
        if !self.is_variable {
            return self.at(0).contains_formula(tuple);
        }
        let k = self.states.len();
        if s + 1 < k {
            self.states[s + 1].contains_formula(tuple)
        } else if trace.requires_loop() {
            let disjuncts: Vec<Formula> = (0..k)
                .map(|l| BooleanFormula::and([trace.loops_to(l), self.states[l].contains_formula(tuple)]))
                .collect();
            BooleanFormula::or(disjuncts)
        } else {
            BooleanFormula::constant(false)
        }
    }
}
