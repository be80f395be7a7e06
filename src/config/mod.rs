/*!
Configuration of the CDCL solver.

All tuning knobs for a [solve](crate::sat::solver::Solver::solve) live on a single
[Config] value, handed to the solver at construction. Options are represented as
[ConfigOption] so callers can inspect bounds alongside the currently configured value.
*/

mod config_option;
pub use config_option::ConfigOption;

pub mod vsids;
pub use vsids::Vsids;

mod lbd;
pub use lbd::LBD;

mod rng;
pub use rng::{PolarityLean, RandomDecisionBias};

mod scheduler;
pub use scheduler::Scheduler;

use crate::generic::luby::LubyRepresentation;

/// Activity score representation, used by both the atom (VSIDS) heap and the clause database.
pub type Activity = f64;

/// Configuration of the clause database's reduction policy.
#[derive(Clone, Copy, Debug)]
pub struct ClauseDbConfig {
    /// The amount the activity of a bumped clause is increased by, dynamically rescaled.
    pub bump: ConfigOption<Activity>,

    /// The multiplicative decay applied to the clause bump after each conflict.
    pub decay: ConfigOption<Activity>,

    /// Clauses with LBD at or below this bound are never removed by reduction.
    pub lbd_bound: ConfigOption<LBD>,

    /// Initial number of learned clauses tolerated before a reduction pass is due.
    pub reduction_budget: ConfigOption<u32>,

    /// Factor the reduction budget is scaled by after each reduction.
    pub budget_growth: ConfigOption<f64>,
}

impl Default for ClauseDbConfig {
    fn default() -> Self {
        ClauseDbConfig {
            bump: ConfigOption {
                name: "clause_bump",
                min: 0.0,
                max: (2.0_f64).powi(512),
                value: 1.0,
            },
            decay: ConfigOption {
                name: "clause_decay",
                min: 0.0,
                max: 1.0,
                value: 1.0 / 0.999,
            },
            lbd_bound: ConfigOption {
                name: "lbd_bound",
                min: LBD::MIN,
                max: LBD::MAX,
                value: 2,
            },
            reduction_budget: ConfigOption {
                name: "reduction_budget",
                min: 1,
                max: u32::MAX,
                value: 2_000,
            },
            budget_growth: ConfigOption {
                name: "budget_growth",
                min: 1.0,
                max: 10.0,
                value: 1.1,
            },
        }
    }
}

/// Configuration of the atom (VSIDS) activity heap.
#[derive(Clone, Copy, Debug)]
pub struct AtomDbConfig {
    /// Activity added to an atom each time it is bumped.
    pub bump: ConfigOption<Activity>,

    /// Multiplicative decay applied to the bump increment after each conflict.
    pub decay: ConfigOption<Activity>,

    /// Threshold beyond which activities and the bump are rescaled, to avoid overflow.
    pub rescale_threshold: ConfigOption<Activity>,
}

impl Default for AtomDbConfig {
    fn default() -> Self {
        AtomDbConfig {
            bump: ConfigOption {
                name: "atom_bump",
                min: 0.0,
                max: (2.0_f64).powi(512),
                value: 1.0,
            },
            decay: ConfigOption {
                name: "atom_decay",
                min: 0.0,
                max: 1.0,
                value: 0.95,
            },
            rescale_threshold: ConfigOption {
                name: "atom_rescale_threshold",
                min: 1.0,
                max: f64::MAX,
                value: 1e100,
            },
        }
    }
}

/// The primary solver configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// Configuration of the atom activity heap (VSIDS).
    pub atom_db: AtomDbConfig,

    /// Configuration of the clause database's reduction policy.
    pub clause_db: ClauseDbConfig,

    /// Number of conflicts the base Luby interval is multiplied by (§6 default `100`).
    pub luby_base: ConfigOption<LubyRepresentation>,

    /// Probability of choosing positive polarity when no saved phase is available.
    pub polarity_lean: ConfigOption<PolarityLean>,

    /// Probability of making a uniformly random decision rather than following VSIDS.
    pub random_decision_bias: ConfigOption<RandomDecisionBias>,

    /// Scheduling of clause database reductions.
    pub scheduler: Scheduler,

    /// Whether the saved phase of an atom is preferred over `polarity_lean` when deciding.
    pub phase_saving: ConfigOption<bool>,

    /// Whether scheduled restarts are permitted.
    pub restart: ConfigOption<bool>,

    /// Which VSIDS bumping variant to apply during conflict analysis.
    pub vsids_variant: Vsids,

    /// The fixed bit-width used for finite two's-complement integer arithmetic (§4.2).
    ///
    /// Mirrors `CommandScope.intBits` (spec §6); kept here too since the boolean-matrix
    /// arithmetic operators are shared by the bare solver's test harness.
    pub int_bits: ConfigOption<u32>,

    /// Seed for the solver's random number source (random decisions, random polarity),
    /// kept on `Config` rather than drawn from entropy so a solve is reproducible (spec §5).
    pub seed: ConfigOption<u64>,
}

impl Default for Config {
    /// Configured to give quick, deterministic results suitable for a test suite.
    fn default() -> Self {
        Config {
            atom_db: AtomDbConfig::default(),
            clause_db: ClauseDbConfig::default(),

            luby_base: ConfigOption {
                name: "luby_base",
                min: LubyRepresentation::MIN,
                max: LubyRepresentation::MAX,
                value: 100,
            },

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            scheduler: Scheduler {
                luby: Some(1),
                conflict: None,
            },

            phase_saving: ConfigOption {
                name: "phase_saving",
                min: false,
                max: true,
                value: true,
            },

            restart: ConfigOption {
                name: "restart",
                min: false,
                max: true,
                value: true,
            },

            vsids_variant: Vsids::MiniSat,

            int_bits: ConfigOption {
                name: "int_bits",
                min: 1,
                max: 64,
                value: 4,
            },

            seed: ConfigOption {
                name: "seed",
                min: 0,
                max: u64::MAX,
                value: 0,
            },
        }
    }
}
