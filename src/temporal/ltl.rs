/*!
Recursive unrolling of the nine LTL operators over state indices of a
[Trace] (spec §4.5). Each operator takes a state-indexed formula producer
`F(i)`; future operators additionally extend over every possible loop target
when the current state `s` lies after some `l < s` a loop could target,
since the lasso makes states before `s` reachable again after the loop.
*/

use crate::cnf::formula::{BooleanFormula, Formula};

use super::trace::Trace;

/// `after F`: `F(s+1)` if there is a next state, else the lasso-combined
/// value of `F` at every possible loop target, or `false` with no loop.
pub fn after(trace: &Trace, s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    if s + 1 < trace.k() {
        f(s + 1)
    } else if trace.requires_loop() {
        let disjuncts: Vec<Formula> = (0..trace.k()).map(|l| BooleanFormula::and([trace.loops_to(l), f(l)])).collect();
        BooleanFormula::or(disjuncts)
    } else {
        BooleanFormula::constant(false)
    }
}

/// `always F`.
pub fn always(trace: &Trace, s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    let mut conjuncts: Vec<Formula> = (s..trace.k()).map(&f).collect();
    if trace.requires_loop() {
        for l in 0..s {
            for i in l..s {
                conjuncts.push(BooleanFormula::implies(trace.loops_to(l), f(i)));
            }
        }
    }
    BooleanFormula::and(conjuncts)
}

/// `eventually F`.
pub fn eventually(trace: &Trace, s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    let mut disjuncts: Vec<Formula> = (s..trace.k()).map(&f).collect();
    if trace.requires_loop() {
        for l in 0..s {
            for i in l..s {
                disjuncts.push(BooleanFormula::and([trace.loops_to(l), f(i)]));
            }
        }
    }
    BooleanFormula::or(disjuncts)
}

/// `F until G`.
pub fn until(trace: &Trace, s: usize, f: impl Fn(usize) -> Formula, g: impl Fn(usize) -> Formula) -> Formula {
    let mut disjuncts = Vec::new();
    for j in s..trace.k() {
        let mut conj = vec![g(j)];
        conj.extend((s..j).map(&f));
        disjuncts.push(BooleanFormula::and(conj));
    }
    if trace.requires_loop() {
        for l in 0..s {
            for j in l..s {
                let mut conj = vec![trace.loops_to(l), g(j)];
                conj.extend((s..trace.k()).map(&f));
                conj.extend((l..j).map(&f));
                disjuncts.push(BooleanFormula::and(conj));
            }
        }
    }
    BooleanFormula::or(disjuncts)
}

/// `F releases G`.
pub fn releases(trace: &Trace, s: usize, f: impl Fn(usize) -> Formula, g: impl Fn(usize) -> Formula) -> Formula {
    let mut disjuncts = vec![always(trace, s, &g)];
    for j in s..trace.k() {
        let mut conj = vec![f(j)];
        conj.extend((s..=j).map(&g));
        disjuncts.push(BooleanFormula::and(conj));
    }
    if trace.requires_loop() {
        for l in 0..s {
            for j in l..s {
                let mut conj = vec![trace.loops_to(l), f(j)];
                conj.extend((s..trace.k()).map(&g));
                conj.extend((l..=j).map(&g));
                disjuncts.push(BooleanFormula::and(conj));
            }
        }
    }
    BooleanFormula::or(disjuncts)
}

/// `before F`: `F(s-1)`, or `false` at `s = 0`.
pub fn before(s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    if s == 0 {
        BooleanFormula::constant(false)
    } else {
        f(s - 1)
    }
}

/// `historically F`: `F` held at every state in `[0, s]`.
pub fn historically(s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    BooleanFormula::and((0..=s).map(f).collect::<Vec<_>>())
}

/// `once F`: `F` held at some state in `[0, s]`.
pub fn once(s: usize, f: impl Fn(usize) -> Formula) -> Formula {
    BooleanFormula::or((0..=s).map(f).collect::<Vec<_>>())
}

/// `F since G`.
pub fn since(s: usize, f: impl Fn(usize) -> Formula, g: impl Fn(usize) -> Formula) -> Formula {
    let mut disjuncts = Vec::new();
    for j in 0..=s {
        let mut conj = vec![g(j)];
        conj.extend(((j + 1)..=s).map(&f));
        disjuncts.push(BooleanFormula::and(conj));
    }
    BooleanFormula::or(disjuncts)
}

/// `F triggered G`.
pub fn triggered(s: usize, f: impl Fn(usize) -> Formula, g: impl Fn(usize) -> Formula) -> Formula {
    let mut disjuncts = vec![historically(s, &g)];
    for j in 0..=s {
        let mut conj = vec![f(j)];
        conj.extend((j..=s).map(&g));
        disjuncts.push(BooleanFormula::and(conj));
    }
    BooleanFormula::or(disjuncts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::builder::CnfBuilder;
    use crate::config::Config;
    use crate::sat::literal::Literal;
    use crate::sat::report::Report;
    use crate::sat::solver::Solver;

    fn solved(builder: CnfBuilder) -> Vec<bool> {
        let high = builder.variable_high_watermark() as usize;
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.into_clauses() {
            solver.add_clause(clause);
        }
        match solver.solve() {
            Report::Satisfiable(model) => model,
            other => panic!("expected SAT, got {other}"),
        }
    }

    /// `always p` over a non-looping trace of length 3 forces `p` true at
    /// every state.
    #[test]
    fn always_over_finite_trace_forces_every_state() {
        let mut builder = CnfBuilder::new();
        let trace = Trace::new(3, false, &mut builder);
        let p: Vec<Literal> = (0..3).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
        let f = |i: usize| BooleanFormula::literal(p[i]);

        let always_p = always(&trace, 0, f);
        builder.assert_true(&always_p);

        let model = solved(builder);
        assert!(p.iter().all(|l| l.evaluate(&model)));
    }

    /// `eventually p` with `p` forced false everywhere is UNSAT.
    #[test]
    fn eventually_is_unsat_when_p_never_holds() {
        let mut builder = CnfBuilder::new();
        let trace = Trace::new(2, false, &mut builder);
        let p: Vec<Literal> = (0..2).map(|_| Literal::new(builder.allocate_fresh_variable(), true)).collect();
        for &lit in &p {
            builder.assert_false(&BooleanFormula::literal(lit));
        }
        let f = |i: usize| BooleanFormula::literal(p[i]);
        let ev = eventually(&trace, 0, f);
        builder.assert_true(&ev);

        let high = builder.variable_high_watermark() as usize;
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.into_clauses() {
            solver.add_clause(clause);
        }
        assert!(solver.solve().is_unsatisfiable());
    }

    #[test]
    fn before_is_false_at_state_zero() {
        let f = |_: usize| BooleanFormula::constant(true);
        let b = before(0, f);
        assert!(!BooleanFormula::evaluate(&b, &[]));
    }
}
