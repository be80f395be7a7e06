/*!
Decoding a dense SAT model back into tuple sets (spec §4.7 / §6's
`Instance`): every signature and non-temporal field is read directly from
its `BooleanMatrix`; variable fields are additionally read at every trace
state, and the loop target (if any) is read off the trace's loop variables.
*/

use std::collections::HashMap;

use crate::log_targets as targets;
use crate::relational::matrix::BooleanMatrix;
use crate::relational::universe::TupleSet;
use crate::temporal::trace::{TemporalRelation, Trace};

/// The sequence of per-state tuple sets a variable field takes across a
/// trace, plus the loop target a lasso model settled on.
#[derive(Clone, Debug)]
pub struct TraceInstance {
    pub states: Vec<HashMap<String, TupleSet>>,
    pub loop_state: Option<usize>,
}

/// One satisfying model, decoded into the shapes callers consume (spec §6).
#[derive(Clone, Debug)]
pub struct Instance {
    pub signatures: HashMap<String, TupleSet>,
    pub fields: HashMap<String, TupleSet>,
    pub trace: Option<TraceInstance>,
}

/// Decodes a model against the matrices a [Translator](crate::relational::translator::Translator)
/// allocated for one command.
pub struct InstanceExtractor<'a> {
    sig_matrices: &'a HashMap<String, BooleanMatrix>,
    fields: &'a HashMap<String, TemporalRelation>,
    trace: Option<&'a Trace>,
}

impl<'a> InstanceExtractor<'a> {
    pub fn new(
        sig_matrices: &'a HashMap<String, BooleanMatrix>,
        fields: &'a HashMap<String, TemporalRelation>,
        trace: Option<&'a Trace>,
    ) -> Self {
        InstanceExtractor { sig_matrices, fields, trace }
    }

    pub fn extract(&self, model: &[bool]) -> Instance {
        let signatures = self
            .sig_matrices
            .iter()
            .map(|(name, matrix)| (name.clone(), matrix.extract(model)))
            .collect();

        let fields = self
            .fields
            .iter()
            .map(|(name, relation)| (name.clone(), relation.at(0).extract(model)))
            .collect();

        let trace = self.trace.map(|trace| self.extract_trace(trace, model));

        log::debug!(target: targets::ENUMERATION, "extracted instance ({} signatures, {} fields, trace={})",
            self.sig_matrices.len(), self.fields.len(), trace.is_some());

        Instance { signatures, fields, trace }
    }

    fn extract_trace(&self, trace: &Trace, model: &[bool]) -> TraceInstance {
        let states = (0..trace.k())
            .map(|s| {
                self.fields
                    .iter()
                    .filter(|(_, relation)| relation.is_variable())
                    .map(|(name, relation)| (name.clone(), relation.at(s).extract(model)))
                    .collect()
            })
            .collect();

        let loop_state = if trace.requires_loop() {
            (0..trace.k()).find(|&i| trace.loop_variable(i).evaluate(model))
        } else {
            None
        };

        TraceInstance { states, loop_state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::builder::CnfBuilder;
    use crate::cnf::formula::BooleanFormula;
    use crate::config::Config;
    use crate::relational::bounds::RelationBounds;
    use crate::relational::universe::AtomTuple;
    use crate::sat::report::Report;
    use crate::sat::solver::Solver;

    #[test]
    fn extracted_signature_tuple_set_matches_the_forced_model() {
        let mut builder = CnfBuilder::new();
        let bounds = RelationBounds::unconstrained(1, TupleSet::from_tuples([AtomTuple::new(vec![0]), AtomTuple::new(vec![1])]));
        let matrix = BooleanMatrix::allocate(&bounds, &mut builder);
        builder.assert_true(&matrix.contains_formula(&AtomTuple::new(vec![0])));
        builder.assert_false(&matrix.contains_formula(&AtomTuple::new(vec![1])));
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);

        let high = builder.variable_high_watermark() as usize;
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.into_clauses() {
            solver.add_clause(clause);
        }
        let model = match solver.solve() {
            Report::Satisfiable(m) => m,
            other => panic!("expected SAT, got {other}"),
        };

        let mut sig_matrices = HashMap::new();
        sig_matrices.insert("A".to_string(), matrix);
        let fields = HashMap::new();
        let extractor = InstanceExtractor::new(&sig_matrices, &fields, None);
        let instance = extractor.extract(&model);

        let a = &instance.signatures["A"];
        assert!(a.contains(&AtomTuple::new(vec![0])));
        assert!(!a.contains(&AtomTuple::new(vec![1])));
        assert!(instance.trace.is_none());
    }

    #[test]
    fn trace_extraction_reports_the_satisfied_loop_target() {
        let mut builder = CnfBuilder::new();
        let trace = Trace::new(2, true, &mut builder);
        builder.assert_true(&trace.loops_to(1));
        let top = builder.encode(&BooleanFormula::constant(true));
        builder.add_clause(vec![top]);

        let high = builder.variable_high_watermark() as usize;
        let mut solver = Solver::new(high, Config::default());
        for clause in builder.into_clauses() {
            solver.add_clause(clause);
        }
        let model = match solver.solve() {
            Report::Satisfiable(m) => m,
            other => panic!("expected SAT, got {other}"),
        };

        let sig_matrices = HashMap::new();
        let fields = HashMap::new();
        let extractor = InstanceExtractor::new(&sig_matrices, &fields, Some(&trace));
        let instance = extractor.extract(&model);

        let trace_instance = instance.trace.expect("a trace was supplied");
        assert_eq!(trace_instance.loop_state, Some(1));
        assert_eq!(trace_instance.states.len(), 2);
    }
}
