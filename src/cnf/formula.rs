/*!
[BooleanFormula]: the recursive DAG of propositional connectives that the
relational translator and LTL encoder build, and that [crate::cnf::builder]
Tseitin-encodes into clauses (spec §3, §4.1).

Nodes are reference-counted so that sharing a subformula across multiple
parents (common for temporal unrolling, where the same state formula is
reused at many positions) is just cloning a handle, and so [crate::cnf::builder]
can memoize encoding by node identity rather than by structural equality.
*/

use std::rc::Rc;

use crate::sat::literal::Literal;

/// A handle to a (possibly shared) formula node.
pub type Formula = Rc<BooleanFormula>;

/// A propositional formula over [Literal]s.
#[derive(Debug)]
pub enum BooleanFormula {
    Const(bool),
    Lit(Literal),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Not(Formula),
    Implies(Formula, Formula),
    Iff(Formula, Formula),
    Ite(Formula, Formula, Formula),
}

impl BooleanFormula {
    pub fn constant(value: bool) -> Formula {
        Rc::new(BooleanFormula::Const(value))
    }

    pub fn literal(literal: Literal) -> Formula {
        Rc::new(BooleanFormula::Lit(literal))
    }

    /// The empty conjunction is `true`; a singleton is passed through unwrapped.
    pub fn and(children: impl IntoIterator<Item = Formula>) -> Formula {
        let children: Vec<Formula> = children.into_iter().collect();
        match children.len() {
            0 => Self::constant(true),
            1 => children.into_iter().next().unwrap(),
            _ => Rc::new(BooleanFormula::And(children)),
        }
    }

    /// The empty disjunction is `false`; a singleton is passed through unwrapped.
    pub fn or(children: impl IntoIterator<Item = Formula>) -> Formula {
        let children: Vec<Formula> = children.into_iter().collect();
        match children.len() {
            0 => Self::constant(false),
            1 => children.into_iter().next().unwrap(),
            _ => Rc::new(BooleanFormula::Or(children)),
        }
    }

    pub fn not(child: Formula) -> Formula {
        if let BooleanFormula::Not(inner) = child.as_ref() {
            return Rc::clone(inner);
        }
        Rc::new(BooleanFormula::Not(child))
    }

    pub fn implies(antecedent: Formula, consequent: Formula) -> Formula {
        Rc::new(BooleanFormula::Implies(antecedent, consequent))
    }

    pub fn iff(left: Formula, right: Formula) -> Formula {
        Rc::new(BooleanFormula::Iff(left, right))
    }

    pub fn ite(condition: Formula, then_branch: Formula, else_branch: Formula) -> Formula {
        Rc::new(BooleanFormula::Ite(condition, then_branch, else_branch))
    }

    /// A stable identity for memoization: the address of this node's allocation.
    pub fn identity(this: &Formula) -> usize {
        Rc::as_ptr(this) as usize
    }

    /// Direct (unencoded) evaluation against a dense model, for testing the
    /// encoder against a ground truth (spec §8's CNF correctness property).
    pub fn evaluate(this: &Formula, model: &[bool]) -> bool {
        match this.as_ref() {
            BooleanFormula::Const(v) => *v,
            BooleanFormula::Lit(l) => l.evaluate(model),
            BooleanFormula::And(xs) => xs.iter().all(|x| Self::evaluate(x, model)),
            BooleanFormula::Or(xs) => xs.iter().any(|x| Self::evaluate(x, model)),
            BooleanFormula::Not(x) => !Self::evaluate(x, model),
            BooleanFormula::Implies(a, b) => !Self::evaluate(a, model) || Self::evaluate(b, model),
            BooleanFormula::Iff(a, b) => Self::evaluate(a, model) == Self::evaluate(b, model),
            BooleanFormula::Ite(c, t, e) => {
                if Self::evaluate(c, model) {
                    Self::evaluate(t, model)
                } else {
                    Self::evaluate(e, model)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: u32, pol: bool) -> Formula {
        BooleanFormula::literal(Literal::new(v, pol))
    }

    #[test]
    fn direct_evaluation_matches_expectations() {
        let model = [true, false];
        let f = BooleanFormula::and([lit(1, true), lit(2, false)]);
        assert!(BooleanFormula::evaluate(&f, &model));

        let g = BooleanFormula::iff(lit(1, true), lit(2, true));
        assert!(!BooleanFormula::evaluate(&g, &model));
    }

    #[test]
    fn double_negation_cancels_structurally() {
        let p = lit(1, true);
        let nn = BooleanFormula::not(BooleanFormula::not(Rc::clone(&p)));
        assert!(Rc::ptr_eq(&nn, &p));
    }
}
