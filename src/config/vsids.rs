/*!
Ways to apply VSIDS (variable state independent decaying sum) during conflict analysis.

See [Understanding VSIDS branching heuristics in conflict-driven clause-learning sat solvers](https://arxiv.org/abs/1506.08905) for an overview.
*/

/// Supported VSIDS variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Vsids {
    /// Bump every atom occurring in the learnt clause, as in [Chaff](https://dl.acm.org/doi/10.1145/378239.379017).
    Chaff,
    /// Bump every atom touched during resolution, including the learnt clause,
    /// as in [MiniSat](https://link.springer.com/chapter/10.1007/978-3-540-24605-3_37).
    MiniSat,
}

impl Default for Vsids {
    fn default() -> Self {
        Self::MiniSat
    }
}

impl std::fmt::Display for Vsids {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chaff => write!(f, "Chaff"),
            Self::MiniSat => write!(f, "MiniSat"),
        }
    }
}
