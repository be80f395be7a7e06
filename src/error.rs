/*!
Error types used throughout the library.

Most of these are unlikely to occur in practice. Some are internally expected —
e.g. a `BCP::Conflict` is par for the course during a solve and is simply the
trigger for conflict analysis. Others are external — e.g. a caller may be told
enumeration has no previous instance to exclude.

Names of the error enums overlap, for the most part, with the subsystem they
belong to, so `err::{self}` is typically used to prefix use of these types.
*/

use crate::sat::clause::ClauseRef;

/// A union of the varied error kinds produced by the library.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// An error during conflict analysis.
    Analysis(AnalysisError),
    /// An error while adding or retrieving a clause.
    ClauseDb(ClauseDbError),
    /// An error while parsing a DIMACS CNF file.
    Dimacs(DimacsError),
    /// An error while translating a model into a boolean formula.
    Translation(TranslationError),
    /// An error from a solve that did not run to completion.
    Solve(SolveError),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis(e) => write!(f, "conflict analysis error: {e:?}"),
            Self::ClauseDb(e) => write!(f, "clause database error: {e:?}"),
            Self::Dimacs(e) => write!(f, "DIMACS parse error: {e:?}"),
            Self::Translation(e) => write!(f, "translation error: {e:?}"),
            Self::Solve(e) => write!(f, "solve error: {e:?}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// An error during conflict analysis (§4.6, §7 "internal invariant violation").
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// Resolution collapsed to the empty clause — the formula is unsatisfiable
    /// and no learned clause can be asserted.
    EmptyResolution,
    /// Resolution did not terminate with a single literal at the current
    /// decision level (the first-UIP invariant was violated).
    NoUniqueImplicationPoint,
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

/// An error while retrieving or mutating a clause in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDbError {
    /// The clause reference does not index a live clause.
    InvalidRef,
    /// An attempt was made to store an empty clause outside of the
    /// unconditional-unsatisfiability path (§4.1).
    EmptyClause,
}

impl From<ClauseDbError> for ErrorKind {
    fn from(e: ClauseDbError) -> Self {
        ErrorKind::ClauseDb(e)
    }
}

/// An error while parsing a DIMACS CNF file (supplemental, §4 of SPEC_FULL.md).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DimacsError {
    /// The `p cnf <vars> <clauses>` problem line was missing or malformed.
    MissingProblemLine,
    /// A problem line appeared somewhere other than the header.
    MisplacedProblemLine(usize),
    /// A non-numeric token was found where a literal was expected, at the given line.
    BadLiteral(usize),
}

impl From<DimacsError> for ErrorKind {
    fn from(e: DimacsError) -> Self {
        ErrorKind::Dimacs(e)
    }
}

/// A translation error (§7): a constraint could not be expressed under the
/// chosen scope or bit-width. Surfaced as a [Diagnostic](crate::diagnostics::Diagnostic)
/// rather than attempted as a solve.
#[derive(Clone, Debug, PartialEq)]
pub enum TranslationError {
    /// A signature named in a scope or expression was not declared.
    UnknownSignature(String),
    /// A relation (field) named in an expression was not declared.
    UnknownRelation(String),
    /// A quantified variable was referenced outside the scope of its binder.
    UnboundVariable(String),
    /// An arity mismatch between operands of a relational operator.
    ArityMismatch { expected: usize, found: usize },
    /// An integer literal or arithmetic result cannot be represented in the
    /// configured bit-width (overflow is certain, §7).
    IntegerOverflow,
    /// The command named by the caller does not exist, and no command at all
    /// was declared to fall back to (§9 Open Question 1).
    NoSuchCommand(String),
    /// A command was issued against an empty universe with no declared
    /// commands to run.
    NoCommands,
}

impl From<TranslationError> for ErrorKind {
    fn from(e: TranslationError) -> Self {
        ErrorKind::Translation(e)
    }
}

/// An error produced while driving a solve to completion via
/// [EnumerationSession](crate::instance::session::EnumerationSession).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The solve was cooperatively cancelled (§5, §7).
    Cancelled,
    /// `nextInstance` was requested with no prior `solve` in this session (§7).
    NoPreviousInstance,
    /// A re-entrant call was made while a solve was already in progress (§5).
    Busy,
}

impl From<SolveError> for ErrorKind {
    fn from(e: SolveError) -> Self {
        ErrorKind::Solve(e)
    }
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoPreviousInstance => write!(f, "no previous instance"),
            Self::Busy => write!(f, "busy"),
        }
    }
}

/// A conflict discovered during boolean constraint propagation: the watched
/// clause identified by [ClauseRef] is unsatisfiable on the current valuation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BcpConflict(pub ClauseRef);
