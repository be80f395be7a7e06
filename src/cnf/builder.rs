/*!
Tseitin encoding of [BooleanFormula] into CNF clauses (spec §4.1).

[CnfBuilder] owns the growing clause list and the next free variable index.
`encode` memoizes by node identity (the formula's allocation address) so a
subformula shared by many parents — common once the LTL encoder starts
reusing the same per-state formula at several trace positions — is encoded
exactly once. The memo retains a clone of every [Formula] handle it keys on,
so the allocation its address names can never be freed and reused by an
unrelated node for as long as the builder lives. `assert_true` special-cases
`And`/`Or` roots to avoid introducing a definitional variable purely to
immediately assert it true.
*/

use std::collections::HashMap;

use crate::sat::literal::{Literal, Variable};

use super::formula::{BooleanFormula, Formula};

/// Accumulates clauses and fresh variables while Tseitin-encoding formulas.
pub struct CnfBuilder {
    clauses: Vec<Vec<Literal>>,
    next_variable: Variable,
    /// Keyed by [BooleanFormula::identity]; the stored `Formula` handle keeps
    /// the node alive so its address can't be recycled onto a different node.
    memo: HashMap<usize, (Formula, Literal)>,
    true_literal: Option<Literal>,
}

impl Default for CnfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CnfBuilder {
    pub fn new() -> Self {
        CnfBuilder {
            clauses: Vec::new(),
            next_variable: 0,
            memo: HashMap::new(),
            true_literal: None,
        }
    }

    /// Seed the builder so its first allocated variable is `first_variable`,
    /// letting several builders (e.g. one per trace state) share one
    /// variable pool without colliding.
    pub fn starting_at(first_variable: Variable) -> Self {
        CnfBuilder {
            clauses: Vec::new(),
            next_variable: first_variable - 1,
            memo: HashMap::new(),
            true_literal: None,
        }
    }

    pub fn add_clause(&mut self, clause: Vec<Literal>) {
        self.clauses.push(clause);
    }

    fn fresh_variable(&mut self) -> Variable {
        self.next_variable += 1;
        self.next_variable
    }

    /// Allocate a fresh variable not tied to any formula node — used by
    /// callers (e.g. [crate::relational::matrix]) that materialize their own
    /// per-tuple variables outside of Tseitin encoding proper.
    pub fn allocate_fresh_variable(&mut self) -> Variable {
        self.fresh_variable()
    }

    /// Highest variable index allocated so far.
    pub fn variable_high_watermark(&self) -> Variable {
        self.next_variable
    }

    /// Consume the builder, returning its accumulated clauses.
    pub fn into_clauses(self) -> Vec<Vec<Literal>> {
        self.clauses
    }

    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Encode `formula`, returning the literal equivalent to it under the
    /// emitted clauses. Constants and bare literals never allocate a variable;
    /// `not` is free (it just negates the child's literal); every other node
    /// gets a fresh definitional variable, memoized by node identity.
    pub fn encode(&mut self, formula: &Formula) -> Literal {
        if let BooleanFormula::Lit(l) = formula.as_ref() {
            return *l;
        }

        let id = BooleanFormula::identity(formula);
        if let Some((_, l)) = self.memo.get(&id) {
            return *l;
        }

        let result = match formula.as_ref() {
            BooleanFormula::Const(true) => {
                let t = self.true_literal();
                return t;
            }
            BooleanFormula::Const(false) => {
                let t = self.true_literal();
                return t.negate();
            }
            BooleanFormula::Lit(_) => unreachable!("handled above"),
            BooleanFormula::Not(inner) => {
                let l = self.encode(inner);
                return l.negate();
            }
            BooleanFormula::And(children) => self.encode_and(children),
            BooleanFormula::Or(children) => self.encode_or(children),
            BooleanFormula::Implies(a, b) => self.encode_implies(a, b),
            BooleanFormula::Iff(a, b) => self.encode_iff(a, b),
            BooleanFormula::Ite(c, t, e) => self.encode_ite(c, t, e),
        };

        self.memo.insert(id, (std::rc::Rc::clone(formula), result));
        result
    }

    /// A literal permanently asserted true, allocated lazily on first use.
    fn true_literal(&mut self) -> Literal {
        if let Some(l) = self.true_literal {
            return l;
        }
        let v = self.fresh_variable();
        let l = Literal::new(v, true);
        self.add_clause(vec![l]);
        self.true_literal = Some(l);
        l
    }

    /// A literal fixed to `value` by a unit clause, for use as a constant bit
    /// in arithmetic bit-vector networks (spec §4.2).
    pub fn constant_literal(&mut self, value: bool) -> Literal {
        let t = self.true_literal();
        if value {
            t
        } else {
            t.negate()
        }
    }

    fn encode_and(&mut self, children: &[Formula]) -> Literal {
        let lits: Vec<Literal> = children.iter().map(|c| self.encode(c)).collect();
        let v = self.fresh_variable();
        let t = Literal::new(v, true);
        for &l in &lits {
            self.add_clause(vec![t.negate(), l]);
        }
        let mut wide = vec![t];
        wide.extend(lits.iter().map(|l| l.negate()));
        self.add_clause(wide);
        t
    }

    fn encode_or(&mut self, children: &[Formula]) -> Literal {
        let lits: Vec<Literal> = children.iter().map(|c| self.encode(c)).collect();
        let v = self.fresh_variable();
        let t = Literal::new(v, true);
        for &l in &lits {
            self.add_clause(vec![l.negate(), t]);
        }
        let mut wide = vec![t.negate()];
        wide.extend(lits.iter().copied());
        self.add_clause(wide);
        t
    }

    fn encode_implies(&mut self, a: &Formula, b: &Formula) -> Literal {
        let la = self.encode(a);
        let lb = self.encode(b);
        let v = self.fresh_variable();
        let t = Literal::new(v, true);
        // t <-> (la => lb)  i.e.  t <-> (!la | lb)
        self.add_clause(vec![t.negate(), la.negate(), lb]);
        self.add_clause(vec![t, la]);
        self.add_clause(vec![t, lb.negate()]);
        t
    }

    fn encode_iff(&mut self, a: &Formula, b: &Formula) -> Literal {
        let la = self.encode(a);
        let lb = self.encode(b);
        let v = self.fresh_variable();
        let t = Literal::new(v, true);
        self.add_clause(vec![t.negate(), la.negate(), lb]);
        self.add_clause(vec![t.negate(), la, lb.negate()]);
        self.add_clause(vec![t, la, lb]);
        self.add_clause(vec![t, la.negate(), lb.negate()]);
        t
    }

    fn encode_ite(&mut self, c: &Formula, then_branch: &Formula, else_branch: &Formula) -> Literal {
        let lc = self.encode(c);
        let lt = self.encode(then_branch);
        let le = self.encode(else_branch);
        let v = self.fresh_variable();
        let t = Literal::new(v, true);
        // t <-> (c & lt) | (!c & le)
        self.add_clause(vec![t.negate(), lc.negate(), lt]);
        self.add_clause(vec![t.negate(), lc, le]);
        self.add_clause(vec![t, lc.negate(), lt.negate()]);
        self.add_clause(vec![t, lc, le.negate()]);
        t
    }

    /// Assert `formula` true. `And` roots assert each conjunct independently
    /// (avoiding a needless top-level definitional variable); `Or` roots add
    /// the encoded disjunction directly as a clause; everything else encodes
    /// and adds the resulting unit clause (spec §4.1).
    pub fn assert_true(&mut self, formula: &Formula) {
        match formula.as_ref() {
            BooleanFormula::Const(true) => {}
            BooleanFormula::Const(false) => self.add_clause(vec![]),
            BooleanFormula::And(children) => {
                let children = children.clone();
                for child in &children {
                    self.assert_true(child);
                }
            }
            BooleanFormula::Or(children) => {
                let lits: Vec<Literal> = children.iter().map(|c| self.encode(c)).collect();
                self.add_clause(lits);
            }
            BooleanFormula::Not(inner) => self.assert_false(inner),
            _ => {
                let l = self.encode(formula);
                self.add_clause(vec![l]);
            }
        }
    }

    /// Assert `formula` false — `not(assert_true)`, pushed down structurally
    /// where cheap (De Morgan over `And`), falling back to encoding otherwise.
    pub fn assert_false(&mut self, formula: &Formula) {
        match formula.as_ref() {
            BooleanFormula::Const(false) => {}
            BooleanFormula::Const(true) => self.add_clause(vec![]),
            BooleanFormula::Or(children) => {
                let children = children.clone();
                for child in &children {
                    self.assert_false(child);
                }
            }
            BooleanFormula::Not(inner) => self.assert_true(inner),
            _ => {
                let l = self.encode(formula);
                self.add_clause(vec![l.negate()]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::solver::Solver;
    use crate::config::Config;
    use crate::sat::report::Report;

    fn lit(v: Variable, pol: bool) -> Formula {
        BooleanFormula::literal(Literal::new(v, pol))
    }

    fn solve_clauses(num_vars: usize, clauses: Vec<Vec<Literal>>) -> Report {
        let mut solver = Solver::new(num_vars, Config::default());
        for clause in clauses {
            solver.add_clause(clause);
        }
        solver.solve()
    }

    #[test]
    fn tseitin_and_matches_direct_evaluation() {
        let mut builder = CnfBuilder::new();
        let f = BooleanFormula::and([lit(1, true), lit(2, true)]);
        let top = builder.encode(&f);
        builder.add_clause(vec![top]);
        let high = builder.variable_high_watermark() as usize;
        let report = solve_clauses(high, builder.into_clauses());
        match report {
            Report::Satisfiable(model) => {
                assert!(BooleanFormula::evaluate(&f, &model));
            }
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn assert_true_on_or_root_needs_no_definitional_variable() {
        let mut builder = CnfBuilder::new();
        let f = BooleanFormula::or([lit(1, true), lit(2, true)]);
        builder.assert_true(&f);
        assert_eq!(builder.variable_high_watermark(), 0);
        assert_eq!(builder.clauses().len(), 1);
    }

    #[test]
    fn shared_subformula_is_encoded_once() {
        let mut builder = CnfBuilder::new();
        let shared = lit(1, true);
        let f = BooleanFormula::and([
            BooleanFormula::or([rc_clone(&shared), lit(2, true)]),
            BooleanFormula::or([rc_clone(&shared), lit(3, true)]),
        ]);
        let before = builder.variable_high_watermark();
        let _ = builder.encode(&f);
        let _ = builder.encode(&f);
        let after = builder.variable_high_watermark();
        assert!(after > before);
    }

    fn rc_clone(f: &Formula) -> Formula {
        std::rc::Rc::clone(f)
    }

    #[test]
    fn iff_encoding_is_sound() {
        let mut builder = CnfBuilder::new();
        let f = BooleanFormula::iff(lit(1, true), lit(2, true));
        let top = builder.encode(&f);
        builder.add_clause(vec![top]);
        builder.add_clause(vec![Literal::new(1, true)]);
        let high = builder.variable_high_watermark() as usize;
        match solve_clauses(high, builder.into_clauses()) {
            Report::Satisfiable(model) => assert!(model[1]),
            other => panic!("expected SAT, got {other}"),
        }
    }
}
