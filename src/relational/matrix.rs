/*!
[BooleanMatrix]: the symbolic representation of one relation's value at one
state — a [TupleSet] enumerating its upper bound together with a per-tuple
[BooleanValue] giving symbolic membership — and the relational operators
over it (spec §3, §4.2).
*/

use std::collections::HashMap;
use std::rc::Rc;

use crate::cnf::builder::CnfBuilder;
use crate::cnf::formula::BooleanFormula;
use crate::sat::literal::Literal;

use super::bounds::RelationBounds;
use super::universe::{AtomTuple, TupleSet};

/// Symbolic membership of one tuple: either settled at allocation time
/// (forced present by the lower bound, or absent because it is outside the
/// upper bound) or carried by a fresh SAT variable (spec §3).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BooleanValue {
    Constant(bool),
    Variable(Literal),
}

impl BooleanValue {
    pub fn to_formula(self) -> crate::cnf::formula::Formula {
        match self {
            BooleanValue::Constant(b) => BooleanFormula::constant(b),
            BooleanValue::Variable(l) => BooleanFormula::literal(l),
        }
    }

    /// Evaluate against a dense model (indexed `variable - 1`).
    pub fn evaluate(self, model: &[bool]) -> bool {
        match self {
            BooleanValue::Constant(b) => b,
            BooleanValue::Variable(l) => l.evaluate(model),
        }
    }
}

/// One relation's value at one state: the tuples of its upper bound, in
/// canonical order, paired with their symbolic membership.
#[derive(Clone, Debug)]
pub struct BooleanMatrix {
    arity: usize,
    tuples: Vec<AtomTuple>,
    values: Vec<BooleanValue>,
}

pub(crate) fn materialize(builder: &mut CnfBuilder, formula: &crate::cnf::formula::Formula) -> BooleanValue {
    match formula.as_ref() {
        BooleanFormula::Const(b) => BooleanValue::Constant(*b),
        _ => BooleanValue::Variable(builder.encode(formula)),
    }
}

impl BooleanMatrix {
    pub fn from_parts(arity: usize, tuples: Vec<AtomTuple>, values: Vec<BooleanValue>) -> Self {
        assert_eq!(tuples.len(), values.len());
        BooleanMatrix { arity, tuples, values }
    }

    /// Allocate a matrix for `bounds`: lower-bound tuples are forced
    /// `Constant(true)`; every other upper-bound tuple gets a fresh variable.
    pub fn allocate(bounds: &RelationBounds, builder: &mut CnfBuilder) -> Self {
        let tuples: Vec<AtomTuple> = bounds.upper.iter().cloned().collect();
        let mut values = Vec::with_capacity(tuples.len());
        for t in &tuples {
            if bounds.lower.contains(t) {
                values.push(BooleanValue::Constant(true));
            } else {
                values.push(BooleanValue::Variable(fresh_literal(builder)));
            }
        }
        BooleanMatrix { arity: bounds.arity, tuples, values }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn tuples(&self) -> &[AtomTuple] {
        &self.tuples
    }

    fn index_of(&self, tuple: &AtomTuple) -> Option<usize> {
        self.tuples.binary_search(tuple).ok()
    }

    pub fn value_of(&self, tuple: &AtomTuple) -> BooleanValue {
        match self.index_of(tuple) {
            Some(i) => self.values[i],
            None => BooleanValue::Constant(false),
        }
    }

    pub fn contains_formula(&self, tuple: &AtomTuple) -> crate::cnf::formula::Formula {
        self.value_of(tuple).to_formula()
    }

    /// Decode this matrix's tuple set against a satisfying model (spec §4.7).
    pub fn extract(&self, model: &[bool]) -> TupleSet {
        let mut set = TupleSet::empty();
        for (t, v) in self.tuples.iter().zip(self.values.iter()) {
            if v.evaluate(model) {
                set.insert(t.clone());
            }
        }
        set
    }
}

fn fresh_literal(builder: &mut CnfBuilder) -> Literal {
    let v = builder.allocate_fresh_variable();
    Literal::new(v, true)
}

fn union_upper(a: &[AtomTuple], b: &[AtomTuple]) -> Vec<AtomTuple> {
    let mut set: std::collections::BTreeSet<AtomTuple> = a.iter().cloned().collect();
    set.extend(b.iter().cloned());
    set.into_iter().collect()
}

fn elementwise(
    a: &BooleanMatrix,
    b: &BooleanMatrix,
    builder: &mut CnfBuilder,
    combine: impl Fn(crate::cnf::formula::Formula, crate::cnf::formula::Formula) -> crate::cnf::formula::Formula,
) -> BooleanMatrix {
    assert_eq!(a.arity, b.arity, "elementwise operators require matching arity");
    let tuples = union_upper(&a.tuples, &b.tuples);
    let mut values = Vec::with_capacity(tuples.len());
    for t in &tuples {
        let formula = combine(a.contains_formula(t), b.contains_formula(t));
        values.push(materialize(builder, &formula));
    }
    BooleanMatrix::from_parts(a.arity, tuples, values)
}

/// `a | b`.
pub fn union(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    elementwise(a, b, builder, |x, y| BooleanFormula::or([x, y]))
}

/// `a & b`.
pub fn intersection(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    elementwise(a, b, builder, |x, y| BooleanFormula::and([x, y]))
}

/// `a - b`.
pub fn difference(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    elementwise(a, b, builder, |x, y| BooleanFormula::and([x, BooleanFormula::not(y)]))
}

/// `a ++ b`: tuples grouped by every column but the last form the override
/// domain; wherever `b` has any tuple in a group, `b` wins that whole group.
pub fn override_with(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    assert_eq!(a.arity, b.arity, "override requires matching arity");
    let arity = a.arity;

    let mut exists_b: HashMap<Vec<usize>, crate::cnf::formula::Formula> = HashMap::new();
    for t in &b.tuples {
        let key = t.prefix().to_vec();
        let f = b.contains_formula(t);
        exists_b
            .entry(key)
            .and_modify(|e| *e = BooleanFormula::or([Rc::clone(e), Rc::clone(&f)]))
            .or_insert(f);
    }

    let tuples = union_upper(&a.tuples, &b.tuples);
    let mut values = Vec::with_capacity(tuples.len());
    for t in &tuples {
        let key = t.prefix().to_vec();
        let has_override = exists_b.get(&key).cloned().unwrap_or_else(|| BooleanFormula::constant(false));
        let formula = BooleanFormula::ite(has_override, b.contains_formula(t), a.contains_formula(t));
        values.push(materialize(builder, &formula));
    }
    BooleanMatrix::from_parts(arity, tuples, values)
}

/// Relational join `a.b`: arity `m + n - 2`.
pub fn join(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    let m = a.arity;
    let n = b.arity;
    assert!(m >= 1 && n >= 1, "join operands must have arity >= 1");

    let mut terms: HashMap<AtomTuple, Vec<crate::cnf::formula::Formula>> = HashMap::new();
    for at in &a.tuples {
        let mid = at.last();
        let left = at.prefix();
        for bt in &b.tuples {
            if bt.first() != mid {
                continue;
            }
            let right = bt.suffix();
            if left.is_empty() && right.is_empty() {
                continue; // arity 1 join of arity-1 relations has no output columns
            }
            let out_tuple = AtomTuple::concat(left, right);
            let term = BooleanFormula::and([a.contains_formula(at), b.contains_formula(bt)]);
            terms.entry(out_tuple).or_default().push(term);
        }
    }

    let mut tuples: Vec<AtomTuple> = terms.keys().cloned().collect();
    tuples.sort();
    let mut values = Vec::with_capacity(tuples.len());
    for t in &tuples {
        let disjuncts = terms.remove(t).unwrap();
        let formula = BooleanFormula::or(disjuncts);
        values.push(materialize(builder, &formula));
    }
    BooleanMatrix::from_parts(m + n - 2, tuples, values)
}

/// Cartesian product `a -> b`: arity `m + n`.
pub fn product(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> BooleanMatrix {
    let mut tuples = Vec::with_capacity(a.tuples.len() * b.tuples.len());
    let mut values = Vec::with_capacity(a.tuples.len() * b.tuples.len());
    let mut paired: Vec<(AtomTuple, BooleanValue)> = Vec::new();
    for at in &a.tuples {
        for bt in &b.tuples {
            let out_tuple = AtomTuple::concat(at.as_slice(), bt.as_slice());
            let formula = BooleanFormula::and([a.contains_formula(at), b.contains_formula(bt)]);
            paired.push((out_tuple, materialize(builder, &formula)));
        }
    }
    paired.sort_by(|x, y| x.0.cmp(&y.0));
    for (t, v) in paired {
        tuples.push(t);
        values.push(v);
    }
    BooleanMatrix::from_parts(a.arity + b.arity, tuples, values)
}

/// Transpose `~a`: swaps the two columns of a binary relation.
pub fn transpose(a: &BooleanMatrix) -> BooleanMatrix {
    assert_eq!(a.arity, 2, "transpose is defined over binary relations");
    let mut paired: Vec<(AtomTuple, BooleanValue)> = a
        .tuples
        .iter()
        .zip(a.values.iter())
        .map(|(t, v)| {
            let s = t.as_slice();
            (AtomTuple::new(vec![s[1], s[0]]), *v)
        })
        .collect();
    paired.sort_by(|x, y| x.0.cmp(&y.0));
    let (tuples, values) = paired.into_iter().unzip();
    BooleanMatrix::from_parts(2, tuples, values)
}

/// Transitive closure `^a`: union of `a`, `a.a`, `a.a.a`, ... up to
/// `universe_size` joins (spec §4.2).
pub fn transitive_closure(a: &BooleanMatrix, universe_size: usize, builder: &mut CnfBuilder) -> BooleanMatrix {
    assert_eq!(a.arity, 2, "closure is defined over binary relations");
    if universe_size == 0 {
        return a.clone();
    }
    let mut acc = a.clone();
    let mut power = a.clone();
    for _ in 1..universe_size {
        power = join(&power, a, builder);
        acc = union(&acc, &power, builder);
    }
    acc
}

/// Reflexive-transitive closure `*a = ^a | iden`.
pub fn reflexive_transitive_closure(
    a: &BooleanMatrix,
    universe_size: usize,
    builder: &mut CnfBuilder,
) -> BooleanMatrix {
    let trans = transitive_closure(a, universe_size, builder);
    let iden = identity(universe_size);
    union(&trans, &iden, builder)
}

/// The identity relation over a universe of `universe_size` atoms.
pub fn identity(universe_size: usize) -> BooleanMatrix {
    let tuples: Vec<AtomTuple> = (0..universe_size).map(|i| AtomTuple::new(vec![i, i])).collect();
    let values = vec![BooleanValue::Constant(true); tuples.len()];
    BooleanMatrix::from_parts(2, tuples, values)
}

/// `a = b` (spec §4.2 equality: `iff` over every tuple in the combined upper bound).
pub fn equals(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> crate::cnf::formula::Formula {
    assert_eq!(a.arity, b.arity);
    let tuples = union_upper(&a.tuples, &b.tuples);
    let conjuncts = tuples
        .iter()
        .map(|t| BooleanFormula::iff(a.contains_formula(t), b.contains_formula(t)))
        .collect::<Vec<_>>();
    let f = BooleanFormula::and(conjuncts);
    let l = builder.encode(&f);
    BooleanFormula::literal(l)
}

/// `a in b` (subset).
pub fn subset(a: &BooleanMatrix, b: &BooleanMatrix, builder: &mut CnfBuilder) -> crate::cnf::formula::Formula {
    assert_eq!(a.arity, b.arity);
    let conjuncts = a
        .tuples
        .iter()
        .map(|t| BooleanFormula::implies(a.contains_formula(t), b.contains_formula(t)))
        .collect::<Vec<_>>();
    let f = BooleanFormula::and(conjuncts);
    let l = builder.encode(&f);
    BooleanFormula::literal(l)
}

/// `no a` (emptiness).
pub fn is_empty(a: &BooleanMatrix, builder: &mut CnfBuilder) -> crate::cnf::formula::Formula {
    let conjuncts = a
        .tuples
        .iter()
        .map(|t| BooleanFormula::not(a.contains_formula(t)))
        .collect::<Vec<_>>();
    let f = BooleanFormula::and(conjuncts);
    let l = builder.encode(&f);
    BooleanFormula::literal(l)
}

/// `some a` (non-emptiness).
pub fn is_nonempty(a: &BooleanMatrix, builder: &mut CnfBuilder) -> crate::cnf::formula::Formula {
    BooleanFormula::not(is_empty(a, builder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sat::report::Report;
    use crate::sat::solver::Solver;

    fn matrix_from_names(names: &[&str], builder: &mut CnfBuilder) -> BooleanMatrix {
        let tuples: Vec<AtomTuple> = (0..names.len()).map(|i| AtomTuple::new(vec![i])).collect();
        let values: Vec<BooleanValue> = tuples
            .iter()
            .map(|_| BooleanValue::Variable(fresh_literal(builder)))
            .collect();
        BooleanMatrix::from_parts(1, tuples, values)
    }

    #[test]
    fn union_round_trips_through_a_model() {
        let mut builder = CnfBuilder::new();
        let a = matrix_from_names(&["0", "1"], &mut builder);
        let b = matrix_from_names(&["0", "1"], &mut builder);
        // force a = {0}, b = {1}
        builder.assert_true(&a.contains_formula(&AtomTuple::new(vec![0])));
        builder.assert_false(&a.contains_formula(&AtomTuple::new(vec![1])));
        builder.assert_true(&b.contains_formula(&AtomTuple::new(vec![1])));
        builder.assert_false(&b.contains_formula(&AtomTuple::new(vec![0])));

        let u = union(&a, &b, &mut builder);
        let high = builder.variable_high_watermark() as usize;
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.clauses() {
            solver.add_clause(clause.clone());
        }
        match solver.solve() {
            Report::Satisfiable(model) => {
                let extracted = u.extract(&model);
                assert_eq!(extracted.len(), 2);
            }
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn join_composes_binary_relations() {
        let mut builder = CnfBuilder::new();
        // r: 0->1, s: 1->2 over a 3-atom universe.
        let r = BooleanMatrix::from_parts(
            2,
            vec![AtomTuple::new(vec![0, 1])],
            vec![BooleanValue::Constant(true)],
        );
        let s = BooleanMatrix::from_parts(
            2,
            vec![AtomTuple::new(vec![1, 2])],
            vec![BooleanValue::Constant(true)],
        );
        let joined = join(&r, &s, &mut builder);
        assert_eq!(joined.tuples().len(), 1);
        assert_eq!(joined.tuples()[0].as_slice(), &[0, 2]);
        assert_eq!(joined.value_of(&AtomTuple::new(vec![0, 2])), BooleanValue::Constant(true));
    }

    #[test]
    fn transitive_closure_of_a_chain_reaches_every_later_atom() {
        let mut builder = CnfBuilder::new();
        let r = BooleanMatrix::from_parts(
            2,
            vec![AtomTuple::new(vec![0, 1]), AtomTuple::new(vec![1, 2])],
            vec![BooleanValue::Constant(true), BooleanValue::Constant(true)],
        );
        let closure = transitive_closure(&r, 3, &mut builder);
        assert_eq!(closure.value_of(&AtomTuple::new(vec![0, 2])), BooleanValue::Constant(true));
    }

    #[test]
    fn override_prefers_right_operand_within_a_domain_group() {
        let mut builder = CnfBuilder::new();
        let a = BooleanMatrix::from_parts(
            2,
            vec![AtomTuple::new(vec![0, 1])],
            vec![BooleanValue::Constant(true)],
        );
        let b = BooleanMatrix::from_parts(
            2,
            vec![AtomTuple::new(vec![0, 2])],
            vec![BooleanValue::Constant(true)],
        );
        let overridden = override_with(&a, &b, &mut builder);
        assert_eq!(
            overridden.value_of(&AtomTuple::new(vec![0, 1])),
            BooleanValue::Constant(false)
        );
        assert_eq!(
            overridden.value_of(&AtomTuple::new(vec![0, 2])),
            BooleanValue::Constant(true)
        );
    }
}
