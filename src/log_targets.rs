/*!
Target strings used with [log]'s target-qualified macros, so a single
`RUST_LOG` filter can isolate one stage of the pipeline.
*/

/// Unit propagation / watched-literal maintenance.
pub const PROPAGATION: &str = "boundsat::propagation";

/// Conflict analysis / clause learning.
pub const ANALYSIS: &str = "boundsat::analysis";

/// Decision making (VSIDS, phase saving).
pub const DECISION: &str = "boundsat::decision";

/// Restart scheduling.
pub const RESTART: &str = "boundsat::restart";

/// Clause database reduction.
pub const REDUCTION: &str = "boundsat::reduction";

/// Relational translation (Tseitin encoding, bound allocation).
pub const TRANSLATION: &str = "boundsat::translation";

/// Temporal (trace/LTL) encoding.
pub const TEMPORAL: &str = "boundsat::temporal";

/// Instance extraction and `nextInstance` enumeration.
pub const ENUMERATION: &str = "boundsat::enumeration";
