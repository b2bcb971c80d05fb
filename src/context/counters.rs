use std::time::Duration;

/// Counts for various things which count, roughly.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// A count of every conflict seen during a solve.
    pub total_conflicts: usize,

    /// A count of conflicts returned by some theory.
    pub theory_conflicts: usize,

    /// A count of all decisions made.
    pub total_decisions: usize,

    /// A count of decisions proposed by some theory and accepted.
    pub theory_decisions: usize,

    /// The total number of iterations through a solve.
    pub total_iterations: usize,

    /// A count of reasons built by some theory during analysis.
    pub reasons_built: usize,

    /// The time taken during a solve.
    pub time: Duration,
}
