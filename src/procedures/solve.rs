//! Determines the satisfiability of the clauses and theories of a context.
//!
//! # Overview
//!
//! [solve](GenericContext::solve) is the conflict-driven clause-learning algorithm, extended with theories in the lazy DPLL(T) style.
//!
//! - Consequences of clauses and theories are [applied](crate::procedures::apply_consequences) to a fixpoint.
//! - If some conflict is found, a clause is [learnt](crate::procedures::analysis) and a [backjump](crate::procedures::backjump) made to the level at which the clause asserts some literal.
//!   Or, if the conflict holds at level 0, the context is unsatisfiable.
//! - Otherwise, a [decision](crate::procedures::decision) is made.
//! - If no decision can be made, as every atom has a value, each theory is asked to [solve](crate::theory::Theory::solve) in a final check.
//!   + If every theory is satisfied, the context is satisfiable.
//!   + If some theory finds a conflict, the conflict is recovered from as above.
//!   + If some theory values some literal, the search continues.
//!
//! Roughly, the loop is as diagrammed:
//!
//! ```none
//!           +---------------+          +-------------+
//!   +-------| make_decision |--------->| final_check |-----> satisfiable, if every theory is satisfied
//!   |       +---------------+          +-------------+
//!   |               ⌃                     |        |
//!   |               | if at fixpoint      |        | if a literal is valued, resume
//!   ⌄               |                     |        ⌄
//! --+-->+-------------------+             |       ...
//!   ⌃   |     propagate     |             |
//!   |   +-------------------+             | if conflict
//!   |               |                     ⌄
//!   |               | if conflict    +---------+
//!   |               +--------------->| recover |-----> unsatisfiable, if the conflict holds at level 0
//!   |                                +---------+
//!   |                                     |
//!   +-------------------------------------+
//! ```
//!
//! After each fixpoint at level 0 theories with the [clear satisfied](crate::theory::Capabilities::clear_satisfied) capability are asked to clear satisfied constraints, if some fact was added at level 0.
//!
//! # Time limit
//!
//! If a non-zero [time_limit](crate::config::Config::time_limit) is set and reached, the solve ends with an [Unknown](Report::Unknown) report.
//!
//! # Example
//!
//! ```rust
//! # use otter_smt::config::Config;
//! # use otter_smt::context::Context;
//! # use otter_smt::reports::Report;
//! let mut the_context = Context::from_config(Config::default());
//!
//! let p = the_context.fresh_or_max_literal();
//! let q = the_context.fresh_or_max_literal();
//! let _ = the_context.add_clause(vec![-p, q]);
//! let _ = the_context.add_clause(vec![p, -q]);
//! let _ = the_context.add_clause(vec![p, q]);
//!
//! assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
//!
//! let p_value = the_context.atom_db.value_of(p as u32);
//! assert_eq!(p_value, Some(true));
//! ```
//!
//! # Literature
//!
//! The integration of theories follows the lazy approach described in [Solving SAT and SAT Modulo Theories](https://doi.org/10.1145/1217856.1217859).

use crate::{
    context::{ContextState, GenericContext},
    misc::log::targets::{self},
    procedures::{
        apply_consequences::{PropagationOk, RecoverOk},
        decision::DecisionOk,
        theory_propagation::FinalCheckOk,
    },
    reports::Report,
    types::err::ErrorKind,
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Determines the satisfiability of the context.
    ///
    /// For documentation, see [procedures::solve](crate::procedures::solve).
    pub fn solve(&mut self) -> Result<Report, ErrorKind> {
        let total_time = std::time::Instant::now();

        if self.state == ContextState::Unsatisfiable {
            return Ok(Report::Unsatisfiable);
        }

        self.preprocess()?;
        self.state = ContextState::Solving;

        'solve_loop: loop {
            self.counters.total_iterations += 1;
            log::trace!("Iteration {}", self.counters.total_iterations);

            self.counters.time = total_time.elapsed();
            let time_limit = self.config.time_limit.value;
            if !time_limit.is_zero() && self.counters.time > time_limit {
                log::info!("Time limit of {time_limit:?} reached");
                return Ok(Report::Unknown);
            }

            let origin = match self.propagate()? {
                PropagationOk::Conflict(origin) => origin,

                PropagationOk::Fixpoint => {
                    self.theory_db.clear_satisfied(&self.atom_db.trail);

                    match self.make_decision()? {
                        DecisionOk::Literal(_) => continue 'solve_loop,

                        DecisionOk::Exhausted => match self.final_check()? {
                            FinalCheckOk::Satisfied => {
                                self.state = ContextState::Satisfiable;
                                break 'solve_loop;
                            }
                            FinalCheckOk::Assigned => continue 'solve_loop,
                            FinalCheckOk::Conflict(origin) => origin,
                        },
                    }
                }
            };

            match self.recover(origin)? {
                RecoverOk::Unsatisfiable => break 'solve_loop,
                RecoverOk::Asserted { literal, level, .. } => {
                    log::trace!(target: targets::BACKJUMP, "Asserted {literal} at level {level}");
                }
            }
        }

        self.counters.time = total_time.elapsed();
        Ok(self.report())
    }
}
