/*!
Methods for choosing the value of an atom.

# Overview

Decisions are first delegated to theories.
Each theory with the [decisions](crate::theory::Capabilities::decisions) capability is asked, in order of the [scheduler](crate::theory::scheduler), to [propose](crate::theory::Theory::decide) a decision.
- The first proposal on an atom without a value is accepted.
- A proposal on an atom with some value (or an atom unknown to the context) is rejected, and the next theory is asked.

An accepted decision is recorded together with the proposing theory and any reason the theory gave, and on a backjump past the level of the decision the theory is asked to [undecide](crate::theory::Theory::undecide) the decision.

If every theory declines, the core decision procedure is straightforward:
- Search through all atoms in the context for an atom which is not assigned a value, and assign either true or false.

```rust,ignore
self.atom_db.valuation().unvalued_atoms().next();
// Or…
self.atom_db.valuation().unvalued_atoms().choose(rng_source);
```

# Decisions as literals

Strictly a decision is to value some atom *a* with value *v*.
Still, it is convenient to represent such a decision as a literal with atom *a* and polarity *v*.
For example, a decision to value *p* with value *false* can be represented with the literal *-p*.

# Phase saving

If phase saving is enabled if a chosen atom was previously valued *v* the atom is again valued *v*.
Otherwise, the value is chosen at random, leaning to true by [polarity_lean](crate::config::Config::polarity_lean).

# Levels

Every decision begins a fresh level, on the trail and on every theory.
Before the level is pushed, any undelivered assignment is delivered to theories, so each literal a theory is told of is at or below the level the theory is at.
*/

use rand::{seq::IteratorRandom, Rng};

use crate::{
    context::{ContextState, GenericContext},
    db::{atom::Reason, theory::DecisionRecord},
    misc::log::targets::{self},
    structures::{
        atom::{Atom, TOP_ATOM},
        literal::{CLiteral, Literal},
        valuation::Valuation,
    },
    theory::{ReasonMarker, TheoryDecision, TheoryIndex, TheoryTrail},
    types::err::{self, ErrorKind},
};

/// Possible 'Ok' results from choosing a truth value to assign an atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionOk {
    /// Some truth value was assigned to some atom.
    Literal(CLiteral),

    /// All atoms had already been assigned truth values, so no decision could be made.
    Exhausted,
}

/// Methods related to making decisions.
impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Makes a decision, delegated to some theory or otherwise.
    ///
    /// ```rust, ignore
    /// match self.make_decision()? {
    ///     DecisionOk::Literal(_) => continue,
    ///     DecisionOk::Exhausted => break,
    /// }
    /// ```
    pub fn make_decision(&mut self) -> Result<DecisionOk, ErrorKind> {
        self.preprocess()?;

        if let Some((theory, decision)) = self.theory_decision() {
            log::trace!(target: targets::DECISION, "Decision {} from theory {theory}", decision.literal);
            self.counters.theory_decisions += 1;
            self.apply_decision(decision.literal, Some((theory, decision.reason)))?;
            return Ok(DecisionOk::Literal(decision.literal));
        }

        // Takes ownership of rng to satisfy the borrow checker.
        let mut rng = std::mem::take(&mut self.rng);
        let chosen = self.atom_without_value(&mut rng).map(|atom| {
            let value = match self.config.phase_saving.value {
                true => self.atom_db.previous_value_of(atom),
                false => rng.random_bool(self.config.polarity_lean.value),
            };
            CLiteral::new(atom, value)
        });
        self.rng = rng;

        match chosen {
            Some(literal) => {
                log::trace!(target: targets::DECISION, "Decision {literal}");
                self.apply_decision(literal, None)?;
                Ok(DecisionOk::Literal(literal))
            }
            None => Ok(DecisionOk::Exhausted),
        }
    }

    /// Decides on `literal`, beginning a fresh level.
    ///
    /// The atom of the literal must be known to the context, and without a value.
    pub fn decide_literal(&mut self, literal: CLiteral) -> Result<(), ErrorKind> {
        let atom = literal.atom();
        if atom == TOP_ATOM || self.atom_db.count() <= atom as usize {
            return Err(ErrorKind::from(err::AtomDBError::UnknownAtom));
        }
        if self.atom_db.value_of(atom).is_some() {
            return Err(ErrorKind::ValuationConflict);
        }

        self.preprocess()?;
        log::trace!(target: targets::DECISION, "Decision {literal}");
        self.apply_decision(literal, None)
    }

    /// Returns an atom which has no value on the current valuation, either by random decision or the first such atom.
    pub fn atom_without_value(&self, rng: &mut impl Rng) -> Option<Atom> {
        match rng.random_bool(self.config.random_decision_bias.value) {
            true => self.atom_db.valuation().unvalued_atoms().choose(rng),
            false => self.atom_db.valuation().unvalued_atoms().next(),
        }
    }

    /// The first acceptable proposal from some theory, in order of the scheduler.
    fn theory_decision(&mut self) -> Option<(TheoryIndex, TheoryDecision)> {
        for index in self.theory_db.scheduler.order() {
            if !self.theory_db.records[index as usize].capabilities.decisions {
                continue;
            }

            let theory = &mut self.theory_db.theories[index as usize];
            let trail = TheoryTrail::new(&mut self.atom_db, index);
            let Some(decision) = theory.decide(&trail) else {
                continue;
            };

            let atom = decision.literal.atom();
            if atom == TOP_ATOM || self.atom_db.count() <= atom as usize {
                log::warn!(target: targets::DECISION, "Rejected decision {} from theory {index} on an unknown atom", decision.literal);
                continue;
            }
            if self.atom_db.value_of(atom).is_some() {
                log::info!(target: targets::DECISION, "Rejected decision {} from theory {index} on a valued atom", decision.literal);
                continue;
            }

            return Some((index, decision));
        }
        None
    }

    /// Begins a fresh level and values `literal` as a decision, noting the theory which proposed the decision, if any.
    fn apply_decision(
        &mut self,
        literal: CLiteral,
        proposer: Option<(TheoryIndex, Option<ReasonMarker>)>,
    ) -> Result<(), ErrorKind> {
        self.theory_db.deliver_all(&self.atom_db.trail);

        self.atom_db.trail.new_level();
        self.theory_db.new_decision_level();
        let level = self.atom_db.trail.level();

        if let Some((theory, reason)) = proposer {
            self.theory_db.decisions.push(DecisionRecord {
                level,
                theory,
                literal,
                reason,
            });
        }

        self.atom_db.assign(literal, Reason::Decision)?;
        self.counters.total_decisions += 1;
        self.state = ContextState::Solving;
        Ok(())
    }
}
