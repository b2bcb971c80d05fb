/*!
Applies consequences, of clauses and theories, to a fixpoint.

For an overview of [propagate](GenericContext::propagate) within a solve, see the documentation of the [solve procedure](crate::procedures::solve).

# Rounds

Each round of propagation:
1. Applies [BCP](crate::procedures::bcp) to a fixpoint.
2. Delivers each undelivered assignment on the trail to each theory observing the atom of the assignment, in order of assignment.
3. Takes the order of theories from the [scheduler](crate::theory::scheduler), once, and asks each theory in turn to [propagate](crate::procedures::theory_propagation).
   If a theory values some literal, BCP and delivery are applied again before the next theory is asked.

A round in which no theory values any literal is a fixpoint, and any conflict ends the round.

The following invariant is upheld:
<div class="warning">
propagate returns a fixpoint only if there are no further consequences to apply, from either clauses or theories.
</div>

# Recovery

A conflict is recovered from by [recover](GenericContext::recover), which:
- Returns to the highest level of the conflict, if the conflict has no literal at the current level.
- Notes the context is unsatisfiable, if the conflict has no literal above level 0.
- Otherwise, [analyses](crate::procedures::analysis) the conflict, [backjumps](crate::procedures::backjump) to the level at which the learnt clause asserts some literal, and values the literal.

```rust,ignore
loop {
    match self.propagate()? {
        PropagationOk::Fixpoint => break,
        PropagationOk::Conflict(origin) => match self.recover(origin)? {
            RecoverOk::Unsatisfiable => ...,
            RecoverOk::Asserted { .. } => continue,
        },
    }
}
```
*/

use crate::{
    context::{ContextState, GenericContext},
    db::{
        atom::{AtomValue, Reason},
        ClauseKey, LevelIndex,
    },
    misc::log::targets::{self},
    procedures::analysis::{AnalysisOk, ConflictOrigin},
    structures::{
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    types::err::{self, ErrorKind},
};

/// Ok results of [propagate](GenericContext::propagate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropagationOk {
    /// There were no (further) consequences to apply.
    Fixpoint,

    /// A conflict was found.
    Conflict(ConflictOrigin),
}

/// Ok results of [recover](GenericContext::recover).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoverOk {
    /// The conflict holds at level 0, and so the context is unsatisfiable.
    Unsatisfiable,

    /// A clause was learnt, and the literal asserted by the clause valued.
    Asserted {
        /// The key to the learnt clause.
        key: ClauseKey,

        /// The literal asserted by the clause.
        literal: CLiteral,

        /// The level the literal was valued at.
        level: LevelIndex,
    },
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Applies consequences of clauses and theories to a fixpoint, or until some conflict is found.
    ///
    /// For documentation, see [procedures::apply_consequences](crate::procedures::apply_consequences).
    pub fn propagate(&mut self) -> Result<PropagationOk, ErrorKind> {
        loop {
            if let Some(origin) = self.propagate_clauses()? {
                return Ok(PropagationOk::Conflict(origin));
            }
            self.theory_db.deliver_all(&self.atom_db.trail);

            let mut assigned = false;
            for index in self.theory_db.scheduler.order() {
                let assignment_count = self.atom_db.trail.assignments().len();

                if let Some(origin) = self.propagate_theory(index)? {
                    return Ok(PropagationOk::Conflict(origin));
                }

                if self.atom_db.trail.assignments().len() > assignment_count {
                    assigned = true;
                    if let Some(origin) = self.propagate_clauses()? {
                        return Ok(PropagationOk::Conflict(origin));
                    }
                    self.theory_db.deliver_all(&self.atom_db.trail);
                }
            }

            if !assigned {
                break;
            }
        }

        if self.config.check_theories.value {
            self.check_propagated()?;
        }

        Ok(PropagationOk::Fixpoint)
    }

    /// BCP, with a conflict returned as the origin of the conflict.
    fn propagate_clauses(&mut self) -> Result<Option<ConflictOrigin>, ErrorKind> {
        match self.bcp() {
            Ok(()) => Ok(None),
            Err(err::BCPError::Conflict(key)) => Ok(Some(ConflictOrigin::Clause(key))),
            Err(e) => Err(ErrorKind::from(e)),
        }
    }

    /// Recovers from a conflict, by learning a clause and backjumping.
    ///
    /// For documentation, see [procedures::apply_consequences](crate::procedures::apply_consequences).
    pub fn recover(&mut self, origin: ConflictOrigin) -> Result<RecoverOk, ErrorKind> {
        self.counters.total_conflicts += 1;

        let conflict: CClause = match origin {
            ConflictOrigin::Clause(key) => self.clause_db.get(key)?.clone(),
            ConflictOrigin::Theory { clause, .. } => clause,
        };

        let mut conflict_level = 0;
        for atom in conflict.atoms() {
            match self.atom_db.level_of(atom) {
                Some(level) => conflict_level = std::cmp::max(conflict_level, level),
                None => return Err(ErrorKind::from(err::AnalysisError::NoConflictAtLevel)),
            }
        }

        if conflict_level == 0 {
            log::info!(target: targets::ANALYSIS, "Conflict at level 0: {}", conflict.as_dimacs(false));
            self.state = ContextState::Unsatisfiable;
            return Ok(RecoverOk::Unsatisfiable);
        }

        if conflict_level < self.atom_db.trail.level() {
            log::trace!(target: targets::ANALYSIS, "Conflict below the current level, at {conflict_level}");
            self.backjump(conflict_level);
        }

        let (key, literal, level) = match self.conflict_analysis(conflict)? {
            AnalysisOk::UnitClause { key, literal } => (key, literal, 0),
            AnalysisOk::AssertingClause {
                key,
                literal,
                level,
            } => (key, literal, level),
        };

        self.backjump(level);
        match self.atom_db.assign(literal, Reason::Clause(key))? {
            AtomValue::NotSet => {}
            _ => {
                log::error!(target: targets::ANALYSIS, "Asserted {} was valued after backjump", literal.atom());
                return Err(ErrorKind::ValuationConflict);
            }
        }

        Ok(RecoverOk::Asserted {
            key,
            literal,
            level,
        })
    }
}
