/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library, writing a theory, and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].

For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
- Logs related to the exchange between the core and theories can be filtered with `RUST_LOG=theory …` or,
- Logs of the order in which theories are scheduled can be found with `RUST_LOG=scheduler=trace …`
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [BCP](crate::procedures::bcp)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to the exchange of literals and clauses with [theories](crate::theory)
    pub const THEORY: &str = "theory";

    /// Logs related to the [scheduling](crate::theory::scheduler) of theories
    pub const SCHEDULER: &str = "scheduler";

    /// Logs related to [analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to [backjumping](crate::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to [decisions](crate::procedures::decision)
    pub const DECISION: &str = "decision";

    /// Logs related to the [clause database](crate::db::clause)
    pub const CLAUSE_DB: &str = "clause_db";

    /// Logs related to a valuation
    pub const VALUATION: &str = "valuation";

    /// Logs related to [preprocessing](crate::procedures::preprocess)
    pub const PREPROCESSING: &str = "preprocessing";
}
