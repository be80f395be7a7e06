/*!
The boolean-formula layer between the relational translator and the bare SAT
engine: a [formula::BooleanFormula] DAG plus a [builder::CnfBuilder] that
Tseitin-encodes it into clauses (spec §4.1).
*/

pub mod builder;
pub mod formula;

pub use builder::CnfBuilder;
pub use formula::{BooleanFormula, Formula};
