/*!
High-level outcomes of a solve (spec §6's `SolveResult`, restricted to the
bare boolean level — see [crate::instance] for the relational-level
`Sat(Instance)` wrapper).
*/

/// The result of a bare CNF solve.
#[derive(Clone, Debug)]
pub enum Report {
    /// The formula is satisfiable; carries a dense model indexed `variable - 1`.
    Satisfiable(Vec<bool>),
    /// The formula is unsatisfiable (a conflict was derived at decision level 0).
    Unsatisfiable,
    /// Satisfiability could not be determined — cancellation, a wall-clock
    /// timeout, or some other externally observed reason (spec §7).
    Unknown(String),
}

impl Report {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Report::Satisfiable(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Report::Unsatisfiable)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Satisfiable(_) => write!(f, "Satisfiable"),
            Report::Unsatisfiable => write!(f, "Unsatisfiable"),
            Report::Unknown(reason) => write!(f, "Unknown({reason})"),
        }
    }
}
