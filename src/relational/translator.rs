/*!
The relational translator: elaborates a [SymbolTable] and a chosen
[Command] into asserted [BooleanFormula]s over a freshly allocated
[Universe], dispatching on [Expr]/[Formula] node kind (spec §4.3).

Quantifiers are expanded by finite instantiation over their bound signature's
atoms; temporal operators delegate to [crate::temporal::ltl]; fixed-width
integer operators delegate to [super::arithmetic].

Field multiplicities are supported for single-target (binary) fields only —
the common case in practice (`f: lone Node`, `var f: S`) and the one spec.md's
own worked examples use (§8, scenarios 2 and 4). Multi-arrow field types with
a multiplicity at every arrow are a further generalization this translator
does not attempt; see DESIGN.md.
*/

use std::collections::HashMap;
use std::rc::Rc;

use crate::cnf::builder::CnfBuilder;
use crate::cnf::formula::{BooleanFormula, Formula};
use crate::error::TranslationError;
use crate::temporal::trace::{TemporalRelation, Trace};
use crate::temporal::ltl;

use super::arithmetic::{self, BitVector};
use super::ast::{
    Command, CommandScope, CommandTarget, Expr, Formula as AstFormula, IntCmpOp, IntExpr, Multiplicity,
    QuantifierKind, SymbolTable,
};
use super::bounds::RelationBounds;
use super::matrix::{self, BooleanMatrix, BooleanValue};
use super::universe::{AtomTuple, TupleSet, Universe};

/// Variable bindings in scope while elaborating one (sub)formula: singleton
/// atoms bound by a quantifier, and whole relations bound by a predicate call.
#[derive(Clone, Default)]
struct Env {
    atoms: HashMap<String, usize>,
    relations: HashMap<String, BooleanMatrix>,
}

impl Env {
    fn with_atom(&self, name: &str, atom: usize) -> Env {
        let mut e = self.clone();
        e.atoms.insert(name.to_string(), atom);
        e
    }
}

fn at_least_one(items: &[Formula]) -> Formula {
    BooleanFormula::or(items.to_vec())
}

fn at_most_one(items: &[Formula]) -> Formula {
    let mut conj = Vec::new();
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            conj.push(BooleanFormula::not(BooleanFormula::and([
                Rc::clone(&items[i]),
                Rc::clone(&items[j]),
            ])));
        }
    }
    BooleanFormula::and(conj)
}

fn exactly_one(items: &[Formula]) -> Formula {
    BooleanFormula::and([at_least_one(items), at_most_one(items)])
}

/// Elaborates one command's worth of facts and body into asserted clauses.
pub struct Translator<'a> {
    symbols: &'a SymbolTable,
    universe: Universe,
    builder: CnfBuilder,
    int_bits: usize,
    sig_ranges: HashMap<String, std::ops::Range<usize>>,
    sig_matrices: HashMap<String, BooleanMatrix>,
    fields: HashMap<String, TemporalRelation>,
    trace: Option<Trace>,
}

impl<'a> Translator<'a> {
    /// Allocate the universe, signature and field bounds, and (if the scope
    /// calls for more than one step) the trace skeleton for `scope`.
    pub fn new(symbols: &'a SymbolTable, scope: &CommandScope) -> Self {
        let mut universe = Universe::new();
        let mut sig_ranges = HashMap::new();

        for sig in &symbols.signatures {
            if sig.is_abstract || !sig.subset_parents.is_empty() {
                continue;
            }
            let count = scope
                .type_scopes
                .iter()
                .find(|t| t.signature_name == sig.name)
                .map(|t| t.count)
                .or(if sig.multiplicity == Some(Multiplicity::One) {
                    Some(1)
                } else {
                    None
                })
                .unwrap_or_else(|| scope.default_scope.unwrap_or(3));
            let range = universe.allocate_signature(&sig.name, &sig.name, count);
            sig_ranges.insert(sig.name.clone(), range);
        }

        let mut builder = CnfBuilder::new();

        let k = scope.steps.unwrap_or(1).max(1);
        let trace = if k > 1 { Some(Trace::new(k, true, &mut builder)) } else { None };

        let mut translator = Translator {
            symbols,
            universe,
            builder,
            int_bits: scope.int_bits,
            sig_ranges,
            sig_matrices: HashMap::new(),
            fields: HashMap::new(),
            trace,
        };

        translator.allocate_signatures();
        translator.allocate_fields();
        translator
    }

    /// Atom indices belonging to `signature`, including descendants
    /// (`extends`) and unioned subset parents (`in A + B`).
    fn atoms_for(&self, signature: &str) -> Vec<usize> {
        let Some(sig) = self.symbols.signature(signature) else {
            return Vec::new();
        };
        if !sig.subset_parents.is_empty() {
            let mut set: Vec<usize> = sig.subset_parents.iter().flat_map(|p| self.atoms_for(p)).collect();
            set.sort_unstable();
            set.dedup();
            return set;
        }
        let mut atoms: Vec<usize> = self.sig_ranges.get(signature).cloned().map(|r| r.collect()).unwrap_or_default();
        for child in self.symbols.signatures.iter().filter(|s| s.parent.as_deref() == Some(signature)) {
            atoms.extend(self.atoms_for(&child.name));
        }
        atoms.sort_unstable();
        atoms.dedup();
        atoms
    }

    fn allocate_signatures(&mut self) {
        for sig in self.symbols.signatures.clone().iter() {
            let atoms = self.atoms_for(&sig.name);
            let tuples: Vec<AtomTuple> = atoms.iter().map(|&a| AtomTuple::new(vec![a])).collect();
            let is_subset = !sig.subset_parents.is_empty();
            let matrix = if is_subset {
                let upper = TupleSet::from_tuples(tuples);
                let bounds = RelationBounds::unconstrained(1, upper);
                BooleanMatrix::allocate(&bounds, &mut self.builder)
            } else {
                let values = vec![BooleanValue::Constant(true); tuples.len()];
                BooleanMatrix::from_parts(1, tuples, values)
            };
            self.sig_matrices.insert(sig.name.clone(), matrix);
        }

        for sig in self.symbols.signatures.clone().iter() {
            let items: Vec<Formula> = self
                .atoms_for(&sig.name)
                .iter()
                .map(|&a| self.sig_matrices[&sig.name].contains_formula(&AtomTuple::new(vec![a])))
                .collect();
            match sig.multiplicity {
                Some(Multiplicity::One) => self.builder.assert_true(&exactly_one(&items)),
                Some(Multiplicity::Lone) => self.builder.assert_true(&at_most_one(&items)),
                Some(Multiplicity::Some) => self.builder.assert_true(&at_least_one(&items)),
                Some(Multiplicity::Set) | None => {}
            }
        }
    }

    fn allocate_fields(&mut self) {
        let trace_k = self.trace.as_ref().map(|t| t.k()).unwrap_or(1);
        for sig in self.symbols.signatures.clone().iter() {
            let domain_atoms = self.atoms_for(&sig.name);
            for field in &sig.fields {
                // Single-target binary fields only (see module docs).
                let Some(column) = field.columns.first() else { continue };
                let range_atoms = self.atoms_for(&column.signature);
                let mut upper = TupleSet::empty();
                for &d in &domain_atoms {
                    for &r in &range_atoms {
                        upper.insert(AtomTuple::new(vec![d, r]));
                    }
                }
                let bounds = RelationBounds::unconstrained(2, upper);
                let relation = if field.is_variable {
                    TemporalRelation::variable(&bounds, trace_k, &mut self.builder)
                } else {
                    TemporalRelation::constant(&bounds, &mut self.builder)
                };
                self.fields.insert(field.name.clone(), relation);

                for &d in &domain_atoms {
                    let items: Vec<Formula> = range_atoms
                        .iter()
                        .map(|&r| self.fields[&field.name].at(0).contains_formula(&AtomTuple::new(vec![d, r])))
                        .collect();
                    match column.multiplicity {
                        Multiplicity::One => self.builder.assert_true(&exactly_one(&items)),
                        Multiplicity::Lone => self.builder.assert_true(&at_most_one(&items)),
                        Multiplicity::Some => self.builder.assert_true(&at_least_one(&items)),
                        Multiplicity::Set => {}
                    }
                }
            }
        }
    }

    fn elaborate_expr(&mut self, expr: &Expr, s: usize, env: &Env) -> Result<BooleanMatrix, TranslationError> {
        match expr {
            Expr::SigRef(name) => self
                .sig_matrices
                .get(name)
                .cloned()
                .ok_or_else(|| TranslationError::UnknownSignature(name.clone())),
            Expr::FieldRef(name) => self
                .fields
                .get(name)
                .map(|r| r.at(s).clone())
                .ok_or_else(|| TranslationError::UnknownRelation(name.clone())),
            Expr::VarRef(name) => {
                if let Some(&atom) = env.atoms.get(name) {
                    Ok(BooleanMatrix::from_parts(1, vec![AtomTuple::new(vec![atom])], vec![BooleanValue::Constant(true)]))
                } else if let Some(m) = env.relations.get(name) {
                    Ok(m.clone())
                } else {
                    Err(TranslationError::UnboundVariable(name.clone()))
                }
            }
            Expr::Union(a, b) => self.binary_op(a, b, s, env, matrix::union),
            Expr::Intersection(a, b) => self.binary_op(a, b, s, env, matrix::intersection),
            Expr::Difference(a, b) => self.binary_op(a, b, s, env, matrix::difference),
            Expr::Override(a, b) => self.binary_op(a, b, s, env, matrix::override_with),
            Expr::Join(a, b) => {
                let la = self.elaborate_expr(a, s, env)?;
                let lb = self.elaborate_expr(b, s, env)?;
                Ok(matrix::join(&la, &lb, &mut self.builder))
            }
            Expr::Product(a, b) => self.binary_op(a, b, s, env, matrix::product),
            Expr::Transpose(a) => {
                let m = self.elaborate_expr(a, s, env)?;
                if m.arity() != 2 {
                    return Err(TranslationError::ArityMismatch { expected: 2, found: m.arity() });
                }
                Ok(matrix::transpose(&m))
            }
            Expr::Closure(a) => {
                let m = self.elaborate_expr(a, s, env)?;
                if m.arity() != 2 {
                    return Err(TranslationError::ArityMismatch { expected: 2, found: m.arity() });
                }
                Ok(matrix::transitive_closure(&m, self.universe.len(), &mut self.builder))
            }
            Expr::ReflexiveClosure(a) => {
                let m = self.elaborate_expr(a, s, env)?;
                if m.arity() != 2 {
                    return Err(TranslationError::ArityMismatch { expected: 2, found: m.arity() });
                }
                Ok(matrix::reflexive_transitive_closure(&m, self.universe.len(), &mut self.builder))
            }
            Expr::Prime(inner) => self.elaborate_prime(inner, s),
            Expr::Comprehension { decls, body } => self.elaborate_comprehension(decls, body, s, env),
        }
    }

    fn binary_op(
        &mut self,
        a: &Expr,
        b: &Expr,
        s: usize,
        env: &Env,
        op: impl Fn(&BooleanMatrix, &BooleanMatrix, &mut CnfBuilder) -> BooleanMatrix,
    ) -> Result<BooleanMatrix, TranslationError> {
        let la = self.elaborate_expr(a, s, env)?;
        let lb = self.elaborate_expr(b, s, env)?;
        Ok(op(&la, &lb, &mut self.builder))
    }

    fn elaborate_prime(&mut self, inner: &Expr, s: usize) -> Result<BooleanMatrix, TranslationError> {
        let Expr::FieldRef(name) = inner else {
            return Err(TranslationError::UnknownRelation(
                "priming is only supported directly on a field reference".to_string(),
            ));
        };
        let trace = self.trace.as_ref().expect("a model using ' requires a multi-step trace");
        let relation = self.fields.get(name).ok_or_else(|| TranslationError::UnknownRelation(name.clone()))?;
        let tuples = relation.at(0).tuples().to_vec();
        let arity = relation.at(0).arity();
        let mut values = Vec::with_capacity(tuples.len());
        for t in &tuples {
            let f = relation.primed_membership(t, s, trace);
            values.push(matrix::materialize(&mut self.builder, &f));
        }
        Ok(BooleanMatrix::from_parts(arity, tuples, values))
    }

    fn elaborate_comprehension(
        &mut self,
        decls: &[(String, String)],
        body: &AstFormula,
        s: usize,
        env: &Env,
    ) -> Result<BooleanMatrix, TranslationError> {
        let envs = self.instantiate(decls, env);
        let mut tuples = Vec::with_capacity(envs.len());
        let mut values = Vec::with_capacity(envs.len());
        for bound_env in &envs {
            let tuple = AtomTuple::new(decls.iter().map(|(name, _)| bound_env.atoms[name]).collect());
            let f = self.elaborate_formula(body, s, bound_env)?;
            tuples.push(tuple);
            values.push(matrix::materialize(&mut self.builder, &f));
        }
        let mut paired: Vec<(AtomTuple, BooleanValue)> = tuples.into_iter().zip(values).collect();
        paired.sort_by(|x, y| x.0.cmp(&y.0));
        let (tuples, values) = paired.into_iter().unzip();
        Ok(BooleanMatrix::from_parts(decls.len(), tuples, values))
    }

    /// All instantiations of `decls` as the cartesian product of each
    /// variable's signature atoms, layered on top of `base`.
    fn instantiate(&self, decls: &[(String, String)], base: &Env) -> Vec<Env> {
        let mut envs = vec![base.clone()];
        for (var, sig) in decls {
            let atoms = self.atoms_for(sig);
            let mut next = Vec::with_capacity(envs.len() * atoms.len());
            for env in &envs {
                for &a in &atoms {
                    next.push(env.with_atom(var, a));
                }
            }
            envs = next;
        }
        envs
    }

    fn elaborate_int_expr(&mut self, expr: &IntExpr, s: usize, env: &Env) -> Result<BitVector, TranslationError> {
        let width = self.int_bits;
        match expr {
            IntExpr::Literal(v) => {
                let half = 1i64 << (width - 1);
                if *v < -half || *v >= half {
                    return Err(TranslationError::IntegerOverflow);
                }
                Ok(arithmetic::bitvector_from_int(&mut self.builder, *v, width))
            }
            IntExpr::Cardinality(e) => {
                let m = self.elaborate_expr(e, s, env)?;
                Ok(arithmetic::cardinality(&m, width, &mut self.builder))
            }
            IntExpr::Plus(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::add(builder, a, b, width)),
            IntExpr::Minus(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::subtract(builder, a, b, width)),
            IntExpr::Mul(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::multiply(builder, a, b, width)),
            IntExpr::Div(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::divide_remainder(builder, a, b, width).0),
            IntExpr::Rem(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::divide_remainder(builder, a, b, width).1),
            IntExpr::Shl(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::shift_left(builder, a, b, width)),
            IntExpr::Shr(a, b) => self.int_binary_op(a, b, s, env, |builder, a, b| arithmetic::shift_right(builder, a, b, width)),
        }
    }

    fn int_binary_op(
        &mut self,
        a: &IntExpr,
        b: &IntExpr,
        s: usize,
        env: &Env,
        op: impl Fn(&mut CnfBuilder, &BitVector, &BitVector) -> BitVector,
    ) -> Result<BitVector, TranslationError> {
        let av = self.elaborate_int_expr(a, s, env)?;
        let bv = self.elaborate_int_expr(b, s, env)?;
        Ok(op(&mut self.builder, &av, &bv))
    }

    fn elaborate_formula(&mut self, formula: &AstFormula, s: usize, env: &Env) -> Result<Formula, TranslationError> {
        match formula {
            AstFormula::True => Ok(BooleanFormula::constant(true)),
            AstFormula::False => Ok(BooleanFormula::constant(false)),
            AstFormula::Equals(a, b) => {
                let ma = self.elaborate_expr(a, s, env)?;
                let mb = self.elaborate_expr(b, s, env)?;
                Ok(matrix::equals(&ma, &mb, &mut self.builder))
            }
            AstFormula::Subset(a, b) => {
                let ma = self.elaborate_expr(a, s, env)?;
                let mb = self.elaborate_expr(b, s, env)?;
                Ok(matrix::subset(&ma, &mb, &mut self.builder))
            }
            AstFormula::Empty(a) => {
                let m = self.elaborate_expr(a, s, env)?;
                Ok(matrix::is_empty(&m, &mut self.builder))
            }
            AstFormula::NonEmpty(a) => {
                let m = self.elaborate_expr(a, s, env)?;
                Ok(matrix::is_nonempty(&m, &mut self.builder))
            }
            AstFormula::IntCompare(op, a, b) => {
                let width = self.int_bits;
                let av = self.elaborate_int_expr(a, s, env)?;
                let bv = self.elaborate_int_expr(b, s, env)?;
                let lit = match op {
                    IntCmpOp::Eq => arithmetic::bits_eq(&mut self.builder, &av, &bv, width),
                    IntCmpOp::Neq => arithmetic::bits_eq(&mut self.builder, &av, &bv, width).negate(),
                    IntCmpOp::Gte => arithmetic::bits_ge(&mut self.builder, &av, &bv, width),
                    IntCmpOp::Lt => arithmetic::bits_ge(&mut self.builder, &av, &bv, width).negate(),
                    IntCmpOp::Lte => arithmetic::bits_ge(&mut self.builder, &bv, &av, width),
                    IntCmpOp::Gt => arithmetic::bits_ge(&mut self.builder, &bv, &av, width).negate(),
                };
                Ok(BooleanFormula::literal(lit))
            }
            AstFormula::Not(f) => Ok(BooleanFormula::not(self.elaborate_formula(f, s, env)?)),
            AstFormula::And(fs) => {
                let items: Result<Vec<_>, _> = fs.iter().map(|f| self.elaborate_formula(f, s, env)).collect();
                Ok(BooleanFormula::and(items?))
            }
            AstFormula::Or(fs) => {
                let items: Result<Vec<_>, _> = fs.iter().map(|f| self.elaborate_formula(f, s, env)).collect();
                Ok(BooleanFormula::or(items?))
            }
            AstFormula::Implies(a, b) => {
                let fa = self.elaborate_formula(a, s, env)?;
                let fb = self.elaborate_formula(b, s, env)?;
                Ok(BooleanFormula::implies(fa, fb))
            }
            AstFormula::Iff(a, b) => {
                let fa = self.elaborate_formula(a, s, env)?;
                let fb = self.elaborate_formula(b, s, env)?;
                Ok(BooleanFormula::iff(fa, fb))
            }
            AstFormula::Quantifier { kind, decls, body } => {
                let envs = self.instantiate(decls, env);
                let instances: Result<Vec<Formula>, _> = envs.iter().map(|e| self.elaborate_formula(body, s, e)).collect();
                let instances = instances?;
                Ok(match kind {
                    QuantifierKind::All => BooleanFormula::and(instances),
                    QuantifierKind::Some => BooleanFormula::or(instances),
                    QuantifierKind::No => BooleanFormula::not(BooleanFormula::or(instances)),
                    QuantifierKind::One => {
                        let encoded: Vec<Formula> = instances
                            .into_iter()
                            .map(|f| BooleanFormula::literal(self.builder.encode(&f)))
                            .collect();
                        exactly_one(&encoded)
                    }
                    QuantifierKind::Lone => {
                        let encoded: Vec<Formula> = instances
                            .into_iter()
                            .map(|f| BooleanFormula::literal(self.builder.encode(&f)))
                            .collect();
                        at_most_one(&encoded)
                    }
                })
            }
            AstFormula::PredicateCall(name, args) => {
                let predicate = self
                    .symbols
                    .predicate(name)
                    .ok_or_else(|| TranslationError::UnknownRelation(name.clone()))?
                    .clone();
                if predicate.params.len() != args.len() {
                    return Err(TranslationError::ArityMismatch {
                        expected: predicate.params.len(),
                        found: args.len(),
                    });
                }
                let mut call_env = Env::default();
                for ((param, _), arg) in predicate.params.iter().zip(args.iter()) {
                    let m = self.elaborate_expr(arg, s, env)?;
                    call_env.relations.insert(param.clone(), m);
                }
                self.elaborate_formula(&predicate.body, s, &call_env)
            }
            AstFormula::Always(f) => self.elaborate_temporal_unary(f, s, env, |trace, s, inner| ltl::always(trace, s, inner)),
            AstFormula::Eventually(f) => self.elaborate_temporal_unary(f, s, env, |trace, s, inner| ltl::eventually(trace, s, inner)),
            AstFormula::Before(f) => self.elaborate_past_unary(f, s, env, ltl::before),
            AstFormula::Historically(f) => self.elaborate_past_unary(f, s, env, ltl::historically),
            AstFormula::Once(f) => self.elaborate_past_unary(f, s, env, ltl::once),
            AstFormula::Until(f, g) => self.elaborate_temporal_binary(f, g, s, env, ltl::until),
            AstFormula::Releases(f, g) => self.elaborate_temporal_binary(f, g, s, env, ltl::releases),
            AstFormula::Since(f, g) => self.elaborate_past_binary(f, g, s, env, ltl::since),
            AstFormula::Triggered(f, g) => self.elaborate_past_binary(f, g, s, env, ltl::triggered),
        }
    }

    /// Elaborate `f` at every state of the trace up front (temporal operators
    /// need a formula per state, not just the current one), then apply `op`.
    fn elaborate_temporal_unary(
        &mut self,
        f: &AstFormula,
        s: usize,
        env: &Env,
        op: impl Fn(&Trace, usize, &dyn Fn(usize) -> Formula) -> Formula,
    ) -> Result<Formula, TranslationError> {
        let k = self.trace.as_ref().map(|t| t.k()).unwrap_or(1);
        let mut per_state = Vec::with_capacity(k);
        for i in 0..k {
            per_state.push(self.elaborate_formula(f, i, env)?);
        }
        let trace = self.trace.as_ref().expect("temporal operator used without a multi-step trace");
        let lookup = |i: usize| Rc::clone(&per_state[i]);
        Ok(op(trace, s, &lookup))
    }

    fn elaborate_temporal_binary(
        &mut self,
        f: &AstFormula,
        g: &AstFormula,
        s: usize,
        env: &Env,
        op: impl Fn(&Trace, usize, &dyn Fn(usize) -> Formula, &dyn Fn(usize) -> Formula) -> Formula,
    ) -> Result<Formula, TranslationError> {
        let k = self.trace.as_ref().map(|t| t.k()).unwrap_or(1);
        let mut per_state_f = Vec::with_capacity(k);
        let mut per_state_g = Vec::with_capacity(k);
        for i in 0..k {
            per_state_f.push(self.elaborate_formula(f, i, env)?);
            per_state_g.push(self.elaborate_formula(g, i, env)?);
        }
        let trace = self.trace.as_ref().expect("temporal operator used without a multi-step trace");
        let lookup_f = |i: usize| Rc::clone(&per_state_f[i]);
        let lookup_g = |i: usize| Rc::clone(&per_state_g[i]);
        Ok(op(trace, s, &lookup_f, &lookup_g))
    }

    fn elaborate_past_unary(
        &mut self,
        f: &AstFormula,
        s: usize,
        env: &Env,
        op: impl Fn(usize, &dyn Fn(usize) -> Formula) -> Formula,
    ) -> Result<Formula, TranslationError> {
        let mut per_state = Vec::with_capacity(s + 1);
        for i in 0..=s {
            per_state.push(self.elaborate_formula(f, i, env)?);
        }
        let lookup = |i: usize| Rc::clone(&per_state[i]);
        Ok(op(s, &lookup))
    }

    fn elaborate_past_binary(
        &mut self,
        f: &AstFormula,
        g: &AstFormula,
        s: usize,
        env: &Env,
        op: impl Fn(usize, &dyn Fn(usize) -> Formula, &dyn Fn(usize) -> Formula) -> Formula,
    ) -> Result<Formula, TranslationError> {
        let mut per_state_f = Vec::with_capacity(s + 1);
        let mut per_state_g = Vec::with_capacity(s + 1);
        for i in 0..=s {
            per_state_f.push(self.elaborate_formula(f, i, env)?);
            per_state_g.push(self.elaborate_formula(g, i, env)?);
        }
        let lookup_f = |i: usize| Rc::clone(&per_state_f[i]);
        let lookup_g = |i: usize| Rc::clone(&per_state_g[i]);
        Ok(op(s, &lookup_f, &lookup_g))
    }

    /// Assert facts and the command's target body (spec §4.3: `run P` asserts
    /// facts ∧ P, `check A` asserts facts ∧ ¬A).
    pub fn translate_command(&mut self, command: &Command) -> Result<(), TranslationError> {
        let env = Env::default();
        let facts: Result<Vec<Formula>, _> = self
            .symbols
            .facts
            .clone()
            .iter()
            .map(|f| self.elaborate_formula(&f.body, 0, &env))
            .collect();
        let facts = BooleanFormula::and(facts?);
        self.builder.assert_true(&facts);

        match &command.target {
            CommandTarget::Run(Some(predicate_name)) => {
                let predicate = self
                    .symbols
                    .predicate(predicate_name)
                    .ok_or_else(|| TranslationError::NoSuchCommand(predicate_name.clone()))?
                    .clone();
                let body = self.elaborate_formula(&predicate.body, 0, &env)?;
                self.builder.assert_true(&body);
            }
            CommandTarget::Run(None) => {}
            CommandTarget::Check(assertion_name) => {
                let assertion = self
                    .symbols
                    .assertion(assertion_name)
                    .ok_or_else(|| TranslationError::NoSuchCommand(assertion_name.clone()))?
                    .clone();
                let body = self.elaborate_formula(&assertion.body, 0, &env)?;
                self.builder.assert_true(&BooleanFormula::not(body));
            }
        }
        Ok(())
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn sig_matrices(&self) -> &HashMap<String, BooleanMatrix> {
        &self.sig_matrices
    }

    pub fn fields(&self) -> &HashMap<String, TemporalRelation> {
        &self.fields
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Consume the translator, handing its builder to the solver and keeping
    /// everything needed to decode a model back into an [Instance](crate::instance::extractor::InstanceExtractor).
    pub fn into_parts(
        self,
    ) -> (
        Universe,
        CnfBuilder,
        HashMap<String, BooleanMatrix>,
        HashMap<String, TemporalRelation>,
        Option<Trace>,
    ) {
        (self.universe, self.builder, self.sig_matrices, self.fields, self.trace)
    }
}
