//! `BooleanMatrix::allocate` and extraction against bounds (spec §8: for any
//! relation with bounds `(L, U)` and any model, the extracted tuple set `T`
//! satisfies `L ⊆ T ⊆ U`).

use boundsat::cnf::builder::CnfBuilder;
use boundsat::config::Config;
use boundsat::relational::bounds::RelationBounds;
use boundsat::relational::matrix::{self, BooleanMatrix};
use boundsat::relational::universe::{AtomTuple, TupleSet};
use boundsat::sat::report::Report;
use boundsat::sat::solver::Solver;

fn solve(builder: CnfBuilder) -> Vec<bool> {
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

#[test]
fn extraction_always_lies_between_the_lower_and_upper_bounds() {
    let mut builder = CnfBuilder::new();
    let lower = TupleSet::from_tuples([AtomTuple::new(vec![0])]);
    let upper = TupleSet::from_tuples([AtomTuple::new(vec![0]), AtomTuple::new(vec![1]), AtomTuple::new(vec![2])]);
    let bounds = RelationBounds::new(1, lower.clone(), upper.clone());
    let matrix = BooleanMatrix::allocate(&bounds, &mut builder);

    // leave the free tuples (1, 2) unconstrained and solve for any model.
    let model = solve(builder);
    let extracted = matrix.extract(&model);

    assert!(lower.is_subset(&extracted));
    assert!(extracted.is_subset(&upper));
}

#[test]
fn an_unconstrained_relation_can_extract_to_its_entire_upper_bound() {
    let mut builder = CnfBuilder::new();
    let upper = TupleSet::from_tuples([AtomTuple::new(vec![0]), AtomTuple::new(vec![1])]);
    let bounds = RelationBounds::unconstrained(1, upper.clone());
    let matrix = BooleanMatrix::allocate(&bounds, &mut builder);

    for t in upper.iter() {
        builder.assert_true(&matrix.contains_formula(t));
    }
    let model = solve(builder);
    assert_eq!(matrix.extract(&model), upper);
}

#[test]
fn an_exact_relation_always_extracts_to_precisely_its_tuples() {
    let mut builder = CnfBuilder::new();
    let tuples = TupleSet::from_tuples([AtomTuple::new(vec![0, 1]), AtomTuple::new(vec![1, 2])]);
    let bounds = RelationBounds::exact(2, tuples.clone());
    let matrix = BooleanMatrix::allocate(&bounds, &mut builder);
    let model = solve(builder);
    assert_eq!(matrix.extract(&model), tuples);
}

/// `subset`/`equals` over matrices with overlapping but distinct upper
/// bounds agree with the tuple sets extracted from a solved model.
#[test]
fn subset_and_equals_formulas_agree_with_extracted_tuple_sets() {
    let mut builder = CnfBuilder::new();
    let a = BooleanMatrix::allocate(
        &RelationBounds::unconstrained(1, TupleSet::from_tuples([AtomTuple::new(vec![0]), AtomTuple::new(vec![1])])),
        &mut builder,
    );
    let b = BooleanMatrix::allocate(
        &RelationBounds::unconstrained(1, TupleSet::from_tuples([AtomTuple::new(vec![0]), AtomTuple::new(vec![1])])),
        &mut builder,
    );

    let subset_formula = matrix::subset(&a, &b, &mut builder);
    builder.assert_true(&subset_formula);
    // force a = {0}; b must then extract to a superset of {0}.
    builder.assert_true(&a.contains_formula(&AtomTuple::new(vec![0])));
    builder.assert_false(&a.contains_formula(&AtomTuple::new(vec![1])));

    let model = solve(builder);
    let a_set = a.extract(&model);
    let b_set = b.extract(&model);
    assert!(a_set.is_subset(&b_set));
}
