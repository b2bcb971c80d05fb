/*!
The exchange of literals and clauses with theories.

# Propagation

[propagate_theory](GenericContext::propagate_theory) asks a single theory to propagate the consequences of the literals enqueued to the theory.
The theory is given a [view](crate::theory::TheoryTrail) of the trail, through which the theory may value literals together with a [marker](crate::theory::ReasonMarker) from which a reason for the value may be built, if needed.

If the theory has the [deferred enqueue](crate::theory::Capabilities::deferred_enqueue) capability, [enqueue_any_unqueued](crate::theory::Theory::enqueue_any_unqueued) is called before propagation.

# Conflicts

A theory may return a [Conflict] in place of propagation.
Every literal of a conflict clause must be false on the current valuation, and a conflict clause with some other literal is a defect in the theory, to which the context responds with [UnfalsifiedConflict](crate::types::err::TheoryError::UnfalsifiedConflict).

Each conflict bumps the activity of the theory.

# Final check

When every atom has a value and no decision can be made, [final_check](GenericContext::final_check) calls [solve](crate::theory::Theory::solve) on each theory, in order of the [scheduler](crate::theory::scheduler).
A theory which has the [satisfaction hint](crate::theory::Capabilities::satisfaction_hint) capability and reports the theory is [satisfied](crate::theory::Theory::is_satisfied) is skipped.

# Self-checks

If [check_theories](crate::config::Config::check_theories) is set:
- [check_propagated](crate::theory::Theory::check_propagated) is called on each theory whenever propagation reaches a fixpoint.
- [check_solved](crate::theory::Theory::check_solved) is called on each theory after a successful final check.

A failed check is a defect in the theory, and ends the solve with an error.
*/

use crate::{
    context::GenericContext,
    misc::log::targets::{self},
    procedures::analysis::ConflictOrigin,
    structures::clause::Clause,
    theory::{Conflict, TheoryIndex, TheoryTrail},
    types::err::{self, ErrorKind},
};

/// Ok results of a final check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinalCheckOk {
    /// Every theory is satisfied by the valuation.
    Satisfied,

    /// Some theory valued some literal, and so the search continues.
    Assigned,

    /// Some theory found a conflict.
    Conflict(ConflictOrigin),
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Asks the theory to propagate the consequences of the literals enqueued to the theory.
    ///
    /// Returns the origin of a conflict, if the theory found some conflict.
    pub fn propagate_theory(&mut self, index: TheoryIndex) -> Result<Option<ConflictOrigin>, ErrorKind> {
        let Some(record) = self.theory_db.records.get(index as usize) else {
            return Err(ErrorKind::from(err::TheoryError::UnknownTheory(index)));
        };
        let capabilities = record.capabilities;
        let theory = &mut self.theory_db.theories[index as usize];

        let mut trail = TheoryTrail::new(&mut self.atom_db, index);
        if capabilities.deferred_enqueue {
            theory.enqueue_any_unqueued(&trail);
        }

        match theory.propagate(&mut trail) {
            Ok(()) => Ok(None),
            Err(conflict) => Ok(Some(self.note_theory_conflict(index, conflict)?)),
        }
    }

    /// Checks a conflict from a theory, and notes the conflict with the scheduler.
    fn note_theory_conflict(
        &mut self,
        index: TheoryIndex,
        conflict: Conflict,
    ) -> Result<ConflictOrigin, ErrorKind> {
        let clause = conflict.clause;
        log::info!(target: targets::THEORY, "Conflict from theory {index}: {}", clause.as_dimacs(false));

        let valuation = self.atom_db.valuation();
        if !clause.unsatisfiable_on(valuation) {
            log::error!(target: targets::THEORY, "Theory {index} gave a conflict with some literal not false: {}", clause.as_dimacs(false));
            return Err(ErrorKind::from(err::TheoryError::UnfalsifiedConflict(index)));
        }

        self.counters.theory_conflicts += 1;
        self.theory_db.scheduler.bump(index);

        Ok(ConflictOrigin::Theory {
            theory: index,
            clause,
        })
    }

    /// Calls [check_propagated](crate::theory::Theory::check_propagated) on each theory.
    pub fn check_propagated(&mut self) -> Result<(), ErrorKind> {
        for (index, theory) in self.theory_db.theories.iter().enumerate() {
            let index = index as TheoryIndex;
            let trail = TheoryTrail::new(&mut self.atom_db, index);
            if !theory.check_propagated(&trail) {
                log::error!(target: targets::THEORY, "Theory {index} failed check after propagation");
                return Err(ErrorKind::from(err::TheoryError::CheckPropagated(index)));
            }
        }
        Ok(())
    }

    /// Calls [check_solved](crate::theory::Theory::check_solved) on each theory.
    pub fn check_solved(&mut self) -> Result<(), ErrorKind> {
        for (index, theory) in self.theory_db.theories.iter().enumerate() {
            let index = index as TheoryIndex;
            let trail = TheoryTrail::new(&mut self.atom_db, index);
            if !theory.check_solved(&trail) {
                log::error!(target: targets::THEORY, "Theory {index} failed check after solve");
                return Err(ErrorKind::from(err::TheoryError::CheckSolved(index)));
            }
        }
        Ok(())
    }

    /// Calls [solve](crate::theory::Theory::solve) on each theory not known to be satisfied, in order of the scheduler.
    ///
    /// For documentation, see [procedures::theory_propagation](crate::procedures::theory_propagation).
    pub fn final_check(&mut self) -> Result<FinalCheckOk, ErrorKind> {
        self.theory_db.deliver_all(&self.atom_db.trail);
        let assignment_count = self.atom_db.trail.assignments().len();

        for index in self.theory_db.scheduler.order() {
            let capabilities = self.theory_db.records[index as usize].capabilities;
            let theory = &mut self.theory_db.theories[index as usize];

            if capabilities.satisfaction_hint && theory.is_satisfied() {
                log::trace!(target: targets::THEORY, "Theory {index} is satisfied");
                continue;
            }

            let mut trail = TheoryTrail::new(&mut self.atom_db, index);
            if capabilities.deferred_enqueue {
                theory.enqueue_any_unqueued(&trail);
            }

            if let Err(conflict) = theory.solve(&mut trail) {
                let origin = self.note_theory_conflict(index, conflict)?;
                return Ok(FinalCheckOk::Conflict(origin));
            }

            if self.atom_db.trail.assignments().len() > assignment_count {
                log::trace!(target: targets::THEORY, "Theory {index} valued some literal during final check");
                return Ok(FinalCheckOk::Assigned);
            }
        }

        if self.config.check_theories.value {
            self.check_solved()?;
        }

        Ok(FinalCheckOk::Satisfied)
    }
}

