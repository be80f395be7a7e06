/*!
The bare boolean satisfiability engine: literals, clauses, the clause
database, the assignment trail, VSIDS branching, and the CDCL search loop
itself, together with a DIMACS reader as a self-contained entry point.

Everything above this module (the relational translator, the LTL encoder)
is, ultimately, a way of producing a [clause::Clause] list and reading back a
[report::Report] — the rest of the crate never reaches into the guts of a
solve.
*/

pub mod clause;
pub mod clause_db;
pub mod dimacs;
pub mod literal;
pub mod report;
pub mod solver;
pub mod trail;
pub mod vsids;

pub use clause::{Clause, ClauseRef};
pub use literal::{Literal, Variable};
pub use report::Report;
pub use solver::Solver;
