/*!
The relational-to-SAT translator: a symbolic boolean-matrix engine over a
finite universe of atoms, and the translator that elaborates a model's
signatures, fields, facts, and commands into [crate::cnf::formula::BooleanFormula]s
(spec §3, §4.2, §4.3).
*/

pub mod arithmetic;
pub mod ast;
pub mod bounds;
pub mod matrix;
pub mod translator;
pub mod universe;

pub use bounds::RelationBounds;
pub use matrix::{BooleanMatrix, BooleanValue};
pub use translator::Translator;
pub use universe::{Atom, AtomTuple, TupleSet, Universe};
