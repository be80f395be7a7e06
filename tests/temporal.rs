//! LTL operators the `temporal::ltl` unit tests don't already cover —
//! `until`, `releases`, `since`, `triggered`, and `always` unrolled over a
//! trace that actually loops (spec §4.5, §8).

use boundsat::cnf::builder::CnfBuilder;
use boundsat::cnf::formula::BooleanFormula;
use boundsat::config::Config;
use boundsat::sat::literal::Literal;
use boundsat::sat::report::Report;
use boundsat::sat::solver::Solver;
use boundsat::temporal::ltl;
use boundsat::temporal::trace::Trace;

fn solved(builder: CnfBuilder) -> Vec<bool> {
    let high = builder.variable_high_watermark() as usize;
    let mut solver = Solver::new(high, Config::default());
    for clause in builder.into_clauses() {
        solver.add_clause(clause);
    }
    match solver.solve() {
        Report::Satisfiable(model) => model,
        other => panic!("expected SAT, got {other:?}"),
    }
}

fn unsatisfiable(builder: CnfBuilder) -> bool {
    let high = builder.variable_high_watermark() as usize;
    let mut solver = Solver::new(high, Config::default());
    for clause in builder.into_clauses() {
        solver.add_clause(clause);
    }
    solver.solve().is_unsatisfiable()
}

/// `p until q` with `q` forced false at every state is unsatisfiable: there
/// is no state at which `q` can hold.
#[test]
fn until_is_unsat_when_its_right_operand_never_holds() {
    let mut builder = CnfBuilder::new();
    let trace = Trace::new(3, false, &mut builder);
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    let q: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    for &l in &q {
        builder.assert_false(&BooleanFormula::literal(l));
    }
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let g = |i: usize| BooleanFormula::literal(q[i]);
    let formula = ltl::until(&trace, 0, f, g);
    builder.assert_true(&formula);

    assert!(unsatisfiable(builder));
}

/// `p until q` forced true with `q` forced true only at the last state
/// forces `p` at every earlier state.
#[test]
fn until_forces_the_left_operand_at_every_state_before_the_witness() {
    let mut builder = CnfBuilder::new();
    let trace = Trace::new(3, false, &mut builder);
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    let q: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    builder.assert_true(&BooleanFormula::literal(q[2]));
    builder.assert_false(&BooleanFormula::literal(q[0]));
    builder.assert_false(&BooleanFormula::literal(q[1]));
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let g = |i: usize| BooleanFormula::literal(q[i]);
    let formula = ltl::until(&trace, 0, f, g);
    builder.assert_true(&formula);

    let model = solved(builder);
    assert!(p[0].evaluate(&model));
    assert!(p[1].evaluate(&model));
}

/// `p releases q`: if `p` never holds, `q` must hold at every state
/// (`releases` degenerates to `always q`).
#[test]
fn releases_forces_the_right_operand_everywhere_when_the_left_never_holds() {
    let mut builder = CnfBuilder::new();
    let trace = Trace::new(3, false, &mut builder);
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    let q: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    for &l in &p {
        builder.assert_false(&BooleanFormula::literal(l));
    }
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let g = |i: usize| BooleanFormula::literal(q[i]);
    let formula = ltl::releases(&trace, 0, f, g);
    builder.assert_true(&formula);

    let model = solved(builder);
    assert!(q.iter().all(|l| l.evaluate(&model)));
}

/// `p since q` at state 2 with `q` forced false everywhere is unsatisfiable.
#[test]
fn since_is_unsat_when_its_right_operand_never_held() {
    let mut builder = CnfBuilder::new();
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    let q: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    for &l in &q {
        builder.assert_false(&BooleanFormula::literal(l));
    }
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let g = |i: usize| BooleanFormula::literal(q[i]);
    let formula = ltl::since(2, f, g);
    builder.assert_true(&formula);

    assert!(unsatisfiable(builder));
}

/// `p triggered q` with `p` forced false everywhere degenerates to
/// `historically q`, forcing `q` at every state up to and including the
/// current one.
#[test]
fn triggered_forces_the_right_operand_historically_when_the_left_never_holds() {
    let mut builder = CnfBuilder::new();
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    let q: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    for &l in &p {
        builder.assert_false(&BooleanFormula::literal(l));
    }
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let g = |i: usize| BooleanFormula::literal(q[i]);
    let formula = ltl::triggered(2, f, g);
    builder.assert_true(&formula);

    let model = solved(builder);
    assert!(q.iter().all(|l| l.evaluate(&model)));
}

/// `always p` over a *looping* trace must also hold at every state the loop
/// revisits — forcing `p` false at the loop target makes it unsatisfiable
/// even though `p` could otherwise hold at every state within `[0, k)`.
#[test]
fn always_over_a_looping_trace_also_binds_states_before_the_loop_target() {
    let mut builder = CnfBuilder::new();
    let trace = Trace::new(3, true, &mut builder);
    let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
    builder.assert_true(&trace.loops_to(0));
    builder.assert_false(&BooleanFormula::literal(p[0]));
    let f = |i: usize| BooleanFormula::literal(p[i]);
    let formula = ltl::always(&trace, 2, f);
    builder.assert_true(&formula);

    assert!(unsatisfiable(builder));
}
