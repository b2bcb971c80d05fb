/*!
Analysis of an unsatisfiable clause.

Takes a clause which is unsatisfiable on the current valuation, with some literal valued at the current level, and returns an asserting clause.

In other words, conflict analysis applies resolution to the unsatisfiable clause using the reasons for (eventually) making the observation of a conflict given the decisions made, until exactly one literal of the resolvent was valued at the current level (the first unique implication point).

For the method, see: [conflict_analysis](GenericContext::conflict_analysis).

# Reasons

The reason for a literal valued through BCP is the clause used to value the literal.

The reason for a literal valued by a theory is built *lazily*, only when the literal is resolved on.
That is, the theory is given back the [marker](crate::theory::ReasonMarker) the theory supplied when valuing the literal and asked to [build](crate::theory::Theory::build_reason) a reason from the marker.
Each reason built bumps the activity of the theory.

Every reason from a theory is checked to contain the reasoned literal, and to contain only false literals assigned before the reasoned literal otherwise.
A failed check aborts analysis with [MalformedReason](crate::types::err::TheoryError::MalformedReason).

# Literals at the base level

Literals valued at level 0 are kept in the learnt clause, rather than resolved away.
So, the learnt clause is a consequence of the clauses and theories of the context without appeal to the base level valuation.

# Example

```rust, ignore
match self.conflict_analysis(clause)? {
    AnalysisOk::UnitClause { key, literal } => {
        self.backjump(0);
        ...
    }

    AnalysisOk::AssertingClause { key, literal, level } => {
        self.backjump(level);
        ...
    }
}
```
*/

use crate::{
    context::GenericContext,
    db::{atom::Reason, ClauseKey, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    theory::TheoryIndex,
    types::err::{self, ErrorKind},
};

/// The origin of a conflict, to be analysed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictOrigin {
    /// A clause found to be unsatisfiable during BCP.
    Clause(ClauseKey),

    /// A conflict clause returned by a theory.
    Theory {
        theory: TheoryIndex,
        clause: CClause,
    },
}

/// Possible 'Ok' results from conflict analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisOk {
    /// The result of analysis is a unit clause.
    UnitClause {
        /// The key of the clause.
        key: ClauseKey,

        /// The literal of the clause.
        literal: CLiteral,
    },

    /// The result of analysis is a (non-unit) asserting clause.
    AssertingClause {
        /// The key of the asserting clause.
        key: ClauseKey,

        /// The literal asserted by the clause.
        literal: CLiteral,

        /// The level at which the clause asserts the literal.
        level: LevelIndex,
    },
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// For details on conflict analysis see the [analysis](crate::procedures::analysis) procedure.
    pub fn conflict_analysis(&mut self, conflict: CClause) -> Result<AnalysisOk, ErrorKind> {
        let level = self.atom_db.trail.level();
        log::info!(target: targets::ANALYSIS, "Analysis of {} at level {level}", conflict.as_dimacs(false));
        log::trace!(target: targets::ANALYSIS, "Level: {:?}", self.atom_db.trail.top_level_assignments());

        let mut seen = vec![false; self.atom_db.count()];
        // Literals of the resolvent valued below the current level.
        let mut learnt: CClause = Vec::default();
        // A count of literals of the resolvent valued at the current level.
        let mut pending: usize = 0;

        let mut trail_index = self.atom_db.trail.literals.len();
        let mut clause = conflict;
        let mut resolved: Option<CLiteral> = None;

        let uip = loop {
            for literal in clause.literals() {
                if Some(literal) == resolved {
                    continue;
                }
                let atom = literal.atom() as usize;
                match seen.get(atom) {
                    Some(false) => seen[atom] = true,
                    Some(true) => continue,
                    None => return Err(ErrorKind::from(err::AtomDBError::UnknownAtom)),
                }

                match self.atom_db.level_of(literal.atom()) {
                    Some(literal_level) if literal_level == level => pending += 1,
                    Some(_) => learnt.push(literal),
                    None => return Err(ErrorKind::from(err::AnalysisError::MissingReason)),
                }
            }

            if pending == 0 {
                return Err(ErrorKind::from(err::AnalysisError::NoConflictAtLevel));
            }

            // The most recent assignment of the resolvent.
            let next = loop {
                if trail_index == 0 {
                    return Err(ErrorKind::from(err::AnalysisError::EmptyResolution));
                }
                trail_index -= 1;
                let literal = self.atom_db.trail.literals[trail_index];
                if seen[literal.atom() as usize] {
                    break literal;
                }
            };

            pending -= 1;
            if pending == 0 {
                break next;
            }

            clause = self.reason_for(next)?;
            resolved = Some(next);
        };

        let asserted = uip.negate();
        learnt.insert(0, asserted);

        let backjump_level = self.non_chronological_backjump_level(learnt.as_slice())?;
        let size = learnt.size();
        log::info!(target: targets::ANALYSIS, "Learnt: {}", learnt.as_dimacs(false));
        let key = self.clause_db.store(learnt, true)?;

        match size {
            1 => Ok(AnalysisOk::UnitClause {
                key,
                literal: asserted,
            }),
            _ => Ok(AnalysisOk::AssertingClause {
                key,
                literal: asserted,
                level: backjump_level,
            }),
        }
    }

    /// The reason `literal` was valued, building the reason if the literal was valued by a theory.
    fn reason_for(&mut self, literal: CLiteral) -> Result<CClause, ErrorKind> {
        match self.atom_db.reason_of(literal.atom()) {
            Some(Reason::Clause(key)) => Ok(self.clause_db.get(key)?.clone()),

            Some(Reason::Theory { theory, marker }) => {
                let Some(the_theory) = self.theory_db.theories.get_mut(theory as usize) else {
                    return Err(ErrorKind::from(err::TheoryError::UnknownTheory(theory)));
                };
                let reason = the_theory.build_reason(literal, marker);
                log::trace!(target: targets::THEORY, "Theory {theory} reason for {literal}: {}", reason.as_dimacs(false));

                self.counters.reasons_built += 1;
                self.theory_db.scheduler.bump(theory);

                if !self.well_formed_reason(literal, &reason) {
                    log::error!(target: targets::THEORY, "Malformed reason from theory {theory} for {literal}: {}", reason.as_dimacs(false));
                    return Err(ErrorKind::from(err::TheoryError::MalformedReason(theory)));
                }

                Ok(reason)
            }

            Some(Reason::Decision) | None => {
                log::error!(target: targets::ANALYSIS, "No reason for {literal}");
                Err(ErrorKind::from(err::AnalysisError::MissingReason))
            }
        }
    }

    /// True if `reason` contains `literal`, and every other literal is false and assigned before `literal`.
    fn well_formed_reason(&self, literal: CLiteral, reason: &CClause) -> bool {
        let Some(literal_level) = self.atom_db.level_of(literal.atom()) else {
            return false;
        };

        let mut contains_literal = false;
        for &other in reason {
            if other == literal {
                contains_literal = true;
                continue;
            }

            let other_atom = other.atom();
            let is_false = self.atom_db.value_of(other_atom) == Some(!other.polarity());
            let is_earlier = match self.atom_db.level_of(other_atom) {
                Some(other_level) if other_level < literal_level => true,
                Some(other_level) if other_level == literal_level => {
                    self.assigned_before(other_atom, literal.atom())
                }
                _ => false,
            };
            if !is_false || !is_earlier {
                return false;
            }
        }
        contains_literal
    }

    /// True if `earlier` was assigned before `later` on the trail.
    fn assigned_before(&self, earlier: Atom, later: Atom) -> bool {
        let literals = &self.atom_db.trail.literals;
        let position_of = |atom: Atom| literals.iter().rposition(|literal| literal.atom() == atom);
        match (position_of(earlier), position_of(later)) {
            (Some(earlier_position), Some(later_position)) => earlier_position < later_position,
            _ => false,
        }
    }
}
