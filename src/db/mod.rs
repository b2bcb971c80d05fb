//! Databases for holding information relevant to a solve.
//!
//! - [The atom database](crate::db::atom)
//!   + The current valuation, with the level and reason of each valued atom.
//!   + The [trail](crate::db::trail) of assignments, partitioned by level.
//! - [The clause database](crate::db::clause)
//!   + A collection of clauses, each indexed by a clause key. \
//!     From an external perspective there are two important kinds of clause:
//!     * Original clauses \
//!       Original clauses are added to the context from some external source.
//!     * Added clauses \
//!       Clauses learnt during a solve, each of which is a consequence of the original clauses together with the theories of the context.
//! - [The theory database](crate::db::theory)
//!   + The theories of a context, together with the record the core keeps of each theory (capabilities, known level, which atoms are observed, etc.)
//!   + A record of each decision made on behalf of some theory.

pub mod atom;
pub mod clause;
pub mod theory;
pub mod trail;

/// The index of a decision level.
///
/// Level 0 is the base level, at which no decision has been made.
pub type LevelIndex = u32;

/// A key to access a clause stored in the [clause database](crate::db::clause).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClauseKey {
    /// The key to an original clause.
    Original(u32),

    /// The key to an added (learnt) clause.
    Addition(u32),
}

impl std::fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original(index) => write!(f, "Original({index})"),
            Self::Addition(index) => write!(f, "Addition({index})"),
        }
    }
}
