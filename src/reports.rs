/*!
Reports for the context.
*/

use crate::context::ContextState;

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The clauses and theories of the context are satisfiable.
    Satisfiable,

    /// The clauses and theories of the context are unsatisfiable.
    Unsatisfiable,

    /// Satisfiability of the context is unknown, for some reason.
    ///
    /// For example, the time limit of a solve was reached.
    Unknown,
}

impl From<&ContextState> for Report {
    fn from(value: &ContextState) -> Self {
        match value {
            ContextState::Configuration | ContextState::Input | ContextState::Solving => {
                Self::Unknown
            }
            ContextState::Satisfiable => Self::Satisfiable,
            ContextState::Unsatisfiable => Self::Unsatisfiable,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
