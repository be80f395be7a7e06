/*!
Decoding a satisfying model back into relational terms, and driving repeated
`nextInstance` enumeration over one command (spec §4.7, §5).
*/

pub mod extractor;
pub mod session;

pub use extractor::{Instance, InstanceExtractor, TraceInstance};
pub use session::{EnumerationSession, SolveOutcome};
