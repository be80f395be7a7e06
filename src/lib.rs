/*!
A bounded model checker for a first-order relational modeling language with
LTL extensions, built on an embedded CDCL SAT solver.

boundsat takes a model's signatures, fields, facts, predicates, and
assertions — already parsed into a [SymbolTable](relational::ast::SymbolTable),
parsing itself being out of scope — and a command naming a scope (universe
sizes, trace length, integer bit-width), and either finds an instance
satisfying the model or proves none exists within that scope.

# Orientation

A run moves through four layers, each its own module:

- [cnf] — Tseitin-encodes a [BooleanFormula](cnf::formula::BooleanFormula) DAG
  into CNF clauses. Every layer above eventually bottoms out here.
- [relational] — a finite universe of atoms, [BooleanMatrix](relational::matrix::BooleanMatrix)
  relations over it, and the [Translator](relational::translator::Translator)
  that elaborates a model's signatures/fields/facts/commands into formulas.
- [temporal] — the bounded lasso [Trace](temporal::trace::Trace) and the nine
  LTL operators, for models with `var` fields and a step count greater than one.
- [sat] — the bare CDCL search: watched-literal propagation, first-UIP
  conflict analysis, VSIDS branching, Luby restarts, clause database
  reduction. This is a self-contained CNF solver and knows nothing of the
  layers above it; see its [DIMACS reader](sat::dimacs) for a standalone
  entry point.

[instance] decodes a satisfying model back into tuple sets and drives
`nextInstance` enumeration; [diagnostics] is what a caller sees instead of a
solve when translation fails.

# Example

```rust
# use boundsat::cnf::builder::CnfBuilder;
# use boundsat::cnf::formula::BooleanFormula;
# use boundsat::config::Config;
# use boundsat::sat::report::Report;
# use boundsat::sat::solver::Solver;
let mut builder = CnfBuilder::new();
let p = BooleanFormula::literal(boundsat::sat::literal::Literal::new(builder.allocate_fresh_variable(), true));
builder.assert_true(&p);
let high = builder.variable_high_watermark() as usize;
let mut solver = Solver::new(high, Config::default());
for clause in builder.into_clauses() {
    solver.add_clause(clause);
}
assert!(matches!(solver.solve(), Report::Satisfiable(_)));
```

# Logs

Calls to [log!](log) are made throughout, with targets in [log_targets] so a
single `RUST_LOG` filter can isolate one stage — e.g. `RUST_LOG=boundsat::restart=trace`
for restart scheduling alone, or `RUST_LOG=boundsat::translation=debug` for
bound allocation during translation. Logging is only built on request (the
`log` crate compiles out disabled levels), so logs are left verbose.
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::too_many_arguments)]

pub mod error;
pub mod log_targets;

pub mod config;
pub mod generic;

pub mod sat;

pub mod cnf;
pub mod relational;
pub mod temporal;

pub mod instance;

pub mod diagnostics;
