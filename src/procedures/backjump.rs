//! Recovery from a conflict.
//!
//! # Overview
//!
//! A backjump is a 'jump' from some (higher) level to some previous (lower) level.
//!
//! Typically, a backjump is made from level *l* to level *l - i* because a conflict was found at level *l* and analysis produced a clause which asserts some literal at level *l - i*.
//! In this case, all decisions and all consequences of those decisions from level *l* down to level *l - i* are undone.
//!
//! Theories follow the backjump, in order:
//! 1. Every decision made on behalf of a theory above the target level is retracted through [undecide](crate::theory::Theory::undecide), most recent first, and the reason given with the decision is dropped.
//! 2. Values given above the target level are cleared.
//! 3. Each theory known to be above the target level is told to [backtrack](crate::theory::Theory::backtrack_until).
//!
//! # Methods
//!
//! # [backjump](GenericContext::backjump) --- Backjump to a target level
//!
//! Performs a backjump to some level.
//!
//! Passing a target level greater than or equal to the current level is safe --- nothing will happen.
//!
//! # [backjump_level](GenericContext::non_chronological_backjump_level) --- The backjump level of a(n unsatisfiable) clause
//!
//! The backjump level of a clause is the highest level for which the clause is asserting on the corresponding valuation.
//!
//! - Soundness
//!   + With respect to implementation, the backjump level of a clause is the second highest level of the literals of the clause, or 0 (zero) if there is no second level. \
//!     In this respect the implementation of non_chronological_backjump_level is only sound to use when applied to an clause unsatisfiable on the current valuation.
//!
//! # Example
//!
//! ```rust,ignore
//! let index = self.non_chronological_backjump_level(&learnt_clause)?;
//! self.backjump(index);
//! ```

use crate::{
    context::{ContextState, GenericContext},
    db::LevelIndex,
    misc::log::targets::{self},
    structures::{clause::Clause, literal::Literal},
    types::err::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Backjumps to the given target level.
    ///
    /// For documentation, see [procedures::backjump](crate::procedures::backjump).
    pub fn backjump(&mut self, target: LevelIndex) {
        let level = self.atom_db.trail.level();
        if target >= level {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {level} to {target}");

        self.theory_db.retract_decisions_above(target);
        self.atom_db.forget_above(target);
        self.theory_db.backtrack_until(target, &self.atom_db.trail);
    }

    /// The non-chronological backjump level of a unsatisfiable clause.
    ///
    /// + The *non-chronological* backjump level is the previous level of a clause.
    /// + The *chronological* backjump level is the previous level of a context.
    ///
    /// For documentation, see [procedures::backjump](crate::procedures::backjump).
    pub fn non_chronological_backjump_level(
        &self,
        clause: &(impl Clause + ?Sized),
    ) -> Result<LevelIndex, err::ErrorKind> {
        // Work through the clause, keeping an ordered record of the top two levels: (second_to_top, top)
        let mut top_two: (Option<LevelIndex>, Option<LevelIndex>) = (None, None);
        for literal in clause.literals() {
            let Some(level) = self.atom_db.level_of(literal.atom()) else {
                log::error!(target: targets::BACKJUMP, "{literal} has no value");
                return Err(err::ErrorKind::Backjump);
            };

            match top_two {
                (_, None) => top_two.1 = Some(level),
                (_, Some(the_top)) if level > the_top => {
                    top_two.0 = top_two.1;
                    top_two.1 = Some(level);
                }
                (None, _) => top_two.0 = Some(level),
                (Some(second_to_top), _) if level > second_to_top => top_two.0 = Some(level),
                _ => {}
            }
        }

        Ok(top_two.0.unwrap_or(0))
    }

    /// Resets all decisions and consequences of those choices.
    ///
    /// In other words, backjumps to before any decision was made, and so allows further input.
    pub fn clear_decisions(&mut self) {
        self.backjump(0);
        if self.state != ContextState::Unsatisfiable {
            self.state = ContextState::Input;
        }
    }
}
