/*!
[EnumerationSession]: the per-command owner of the clause set, blocking-clause
history, and busy/cancel guards that `executeRun`/`executeCheck`/`nextInstance`
drive (spec §4.7, §5, §9's "global mutable state" design note).

Each enumeration step rebuilds a fresh [Solver] over the accumulated clause
set rather than resuming one long-lived solver mid-search: the bare solver
exposes no API for re-propagating a clause added after a solve has already
completed (every existing caller — see the tests throughout `sat/` and
`relational/` — adds its whole clause set before the first `solve()`), so
re-deriving from scratch is the only safe way to incorporate a blocking
clause without violating the watch/trail invariants (spec §8).
*/

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::SolveError;
use crate::log_targets as targets;
use crate::relational::matrix::BooleanMatrix;
use crate::relational::translator::Translator;
use crate::relational::universe::Universe;
use crate::sat::literal::Literal;
use crate::sat::report::Report;
use crate::sat::solver::Solver;
use crate::temporal::trace::{TemporalRelation, Trace};

use super::extractor::{Instance, InstanceExtractor};

/// What one `solve`/`nextInstance` step produced, at the relational level
/// (spec §6's `SolveResult`).
#[derive(Clone, Debug)]
pub enum SolveOutcome {
    Sat(Instance),
    Unsat,
    Unknown(String),
}

/// Owns everything one command needs to run, and re-run with successive
/// blocking clauses, independent of any other command (spec §9).
pub struct EnumerationSession {
    universe: Universe,
    sig_matrices: HashMap<String, BooleanMatrix>,
    fields: HashMap<String, TemporalRelation>,
    trace: Option<Trace>,

    base_clauses: Vec<Vec<Literal>>,
    num_variables: usize,
    config: Config,

    blocking_clauses: Vec<Vec<Literal>>,
    last_model: Option<Vec<bool>>,
    has_solved: bool,

    busy: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl EnumerationSession {
    /// Take ownership of an already-translated command.
    pub fn from_translator(translator: Translator, config: Config) -> Self {
        let (universe, builder, sig_matrices, fields, trace) = translator.into_parts();
        let num_variables = builder.variable_high_watermark() as usize;
        let base_clauses = builder.into_clauses();

        EnumerationSession {
            universe,
            sig_matrices,
            fields,
            trace,
            base_clauses,
            num_variables,
            config,
            blocking_clauses: Vec::new(),
            last_model: None,
            has_solved: false,
            busy: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// A handle a caller can flip to cooperatively cancel the solve
    /// currently in progress (spec §5).
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn run_once(&mut self) -> Report {
        let mut solver = Solver::with_cancel_handle(self.num_variables, self.config.clone(), Arc::clone(&self.cancel));
        for clause in self.base_clauses.iter().chain(self.blocking_clauses.iter()) {
            solver.add_clause(clause.clone());
        }
        solver.solve()
    }

    /// `executeRun`/`executeCheck`: run the translated command to completion.
    /// A re-entrant call while one is already in progress is a no-op
    /// returning [SolveError::Busy] (spec §5).
    pub fn solve(&mut self) -> Result<SolveOutcome, SolveError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(SolveError::Busy);
        }
        let report = self.run_once();
        self.busy.store(false, Ordering::Release);
        self.has_solved = true;

        log::debug!(target: targets::ENUMERATION, "initial solve: {report}");
        Ok(self.interpret(report))
    }

    /// `nextInstance`: block out the previous model and re-solve (spec §4.7).
    /// Fails with [SolveError::NoPreviousInstance] if `solve` has not yet
    /// been called successfully in this session.
    pub fn next_instance(&mut self) -> Result<SolveOutcome, SolveError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(SolveError::Busy);
        }
        let Some(model) = self.last_model.clone() else {
            self.busy.store(false, Ordering::Release);
            return Err(SolveError::NoPreviousInstance);
        };

        let blocking: Vec<Literal> = (1..=self.num_variables)
            .map(|v| {
                let v = v as crate::sat::literal::Variable;
                let was_true = model.get(v as usize - 1).copied().unwrap_or(false);
                Literal::new(v, !was_true)
            })
            .collect();
        self.blocking_clauses.push(blocking);

        let report = self.run_once();
        self.busy.store(false, Ordering::Release);

        log::debug!(target: targets::ENUMERATION, "nextInstance ({} blocking clauses): {report}", self.blocking_clauses.len());
        Ok(self.interpret(report))
    }

    /// Reset blocking-clause and model history, as a new command's
    /// `EnumerationSession` replacement would (spec §9); kept for callers
    /// that want to rerun the same translated command from a clean slate.
    pub fn reset_enumeration(&mut self) {
        self.blocking_clauses.clear();
        self.last_model = None;
        self.has_solved = false;
    }

    fn interpret(&mut self, report: Report) -> SolveOutcome {
        match report {
            Report::Satisfiable(model) => {
                let extractor = InstanceExtractor::new(&self.sig_matrices, &self.fields, self.trace.as_ref());
                let instance = extractor.extract(&model);
                self.last_model = Some(model);
                SolveOutcome::Sat(instance)
            }
            Report::Unsatisfiable => SolveOutcome::Unsat,
            Report::Unknown(reason) => SolveOutcome::Unknown(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::ast::{AssertionDecl, Command, CommandScope, CommandTarget, Formula, QuantifierKind, SigDecl, SymbolTable};

    fn two_element_session() -> EnumerationSession {
        let mut symbols = SymbolTable::default();
        symbols.signatures.push(SigDecl {
            name: "X".into(),
            multiplicity: None,
            is_abstract: false,
            parent: None,
            subset_parents: vec![],
            fields: vec![],
        });

        let mut scope = CommandScope::default();
        scope.default_scope = Some(2);
        scope.steps = None;

        let mut translator = Translator::new(&symbols, &scope);
        translator
            .translate_command(&Command {
                name: "run0".into(),
                target: CommandTarget::Run(None),
                scope: scope.clone(),
            })
            .unwrap();

        EnumerationSession::from_translator(translator, Config::default())
    }

    /// Every `nextInstance` call excludes the previous model; the scope's
    /// finite set of models is eventually exhausted (spec §8's "enumeration
    /// non-repetition").
    #[test]
    fn enumeration_eventually_exhausts_a_finite_scope() {
        let mut session = two_element_session();
        let mut models = Vec::new();
        match session.solve().unwrap() {
            SolveOutcome::Sat(instance) => models.push(instance),
            other => panic!("expected an initial SAT outcome, got {other:?}"),
        }

        loop {
            match session.next_instance().unwrap() {
                SolveOutcome::Sat(instance) => models.push(instance),
                SolveOutcome::Unsat => break,
                SolveOutcome::Unknown(reason) => panic!("unexpected unknown outcome: {reason}"),
            }
            assert!(models.len() <= 16, "enumeration did not terminate");
        }

        assert!(!models.is_empty());
    }

    #[test]
    fn next_instance_without_a_prior_solve_reports_no_previous_instance() {
        let mut session = two_element_session();
        match session.next_instance() {
            Err(SolveError::NoPreviousInstance) => {}
            other => panic!("expected NoPreviousInstance, got {other:?}"),
        }
    }

    /// `check` asserts the negation of the assertion body, so checking
    /// `all x:X | false` (true only when `X` is empty) forces `X` nonempty.
    #[test]
    fn checking_a_false_assertion_finds_a_nonempty_counterexample() {
        let mut symbols = SymbolTable::default();
        symbols.signatures.push(SigDecl {
            name: "X".into(),
            multiplicity: None,
            is_abstract: false,
            parent: None,
            subset_parents: vec![],
            fields: vec![],
        });
        symbols.assertions.push(AssertionDecl {
            name: "noneExist".into(),
            body: Formula::Quantifier {
                kind: QuantifierKind::All,
                decls: vec![("x".into(), "X".into())],
                body: Box::new(Formula::False),
            },
        });

        let mut scope = CommandScope::default();
        scope.default_scope = Some(1);
        scope.steps = None;

        let mut translator = Translator::new(&symbols, &scope);
        translator
            .translate_command(&Command {
                name: "check0".into(),
                target: CommandTarget::Check("noneExist".into()),
                scope: scope.clone(),
            })
            .unwrap();

        let mut session = EnumerationSession::from_translator(translator, Config::default());
        match session.solve().unwrap() {
            SolveOutcome::Sat(instance) => assert!(!instance.signatures["X"].is_empty()),
            other => panic!("expected SAT, got {other:?}"),
        }
    }
}
