/*!
The bounded lasso-trace model and LTL encoder (spec §4.4, §4.5): replicate
relations across `k` states, allocate mutually exclusive loop-back
selectors, and recursively unroll the nine temporal operators into
[crate::cnf::formula::BooleanFormula]s honoring the lasso.
*/

pub mod ltl;
pub mod trace;

pub use trace::{Trace, TemporalRelation};
