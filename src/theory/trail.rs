use crate::{
    db::{
        atom::{AtomDB, AtomValue, Reason},
        LevelIndex,
    },
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::AtomDBError,
};

use super::{ReasonMarker, TheoryIndex};

/// The view of the trail (and valuation) of a context given to a theory.
///
/// Through the view a theory may read the value and level of any atom, and (when propagating) value an atom with a reason.
/// The trail itself remains owned by the context.
pub struct TheoryTrail<'db> {
    atom_db: &'db mut AtomDB,
    theory: TheoryIndex,
    propagated: usize,
}

impl<'db> TheoryTrail<'db> {
    pub(crate) fn new(atom_db: &'db mut AtomDB, theory: TheoryIndex) -> Self {
        TheoryTrail {
            atom_db,
            theory,
            propagated: 0,
        }
    }

    /// The index of the theory the view was made for.
    pub fn theory(&self) -> TheoryIndex {
        self.theory
    }

    /// The value of `atom`, if the atom has some value.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.atom_db.value_of(atom)
    }

    /// The value of `literal`, if the atom of the literal has some value.
    ///
    /// Some(true) if the literal is true, Some(false) if the literal is false.
    pub fn value_of_literal(&self, literal: CLiteral) -> Option<bool> {
        self.atom_db
            .value_of(literal.atom())
            .map(|value| value == literal.polarity())
    }

    /// True if `literal` is false.
    pub fn is_false(&self, literal: CLiteral) -> bool {
        self.value_of_literal(literal) == Some(false)
    }

    /// The current level.
    pub fn level(&self) -> LevelIndex {
        self.atom_db.trail.level()
    }

    /// The level at which `atom` was valued, if the atom has some value.
    pub fn level_of(&self, atom: Atom) -> Option<LevelIndex> {
        self.atom_db.level_of(atom)
    }

    /// Every assignment on the trail, in order of assignment.
    pub fn assignments(&self) -> &[CLiteral] {
        self.atom_db.trail.assignments()
    }

    /// A count of literals valued through this view.
    pub fn propagated_count(&self) -> usize {
        self.propagated
    }

    /// Values `literal` as a consequence of the theory, at the current level.
    ///
    /// The marker is returned to the theory if the context requires a reason for the propagation.
    ///
    /// Returns:
    /// - [NotSet](AtomValue::NotSet), if the literal was valued by the call.
    /// - [Same](AtomValue::Same), if the literal was already true, and so nothing happened.
    /// - [Different](AtomValue::Different), if the literal is false.
    ///   In this case, the theory should return a conflict made from a reason for the literal.
    pub fn propagate(
        &mut self,
        literal: CLiteral,
        marker: ReasonMarker,
    ) -> Result<AtomValue, AtomDBError> {
        let reason = Reason::Theory {
            theory: self.theory,
            marker,
        };
        let result = self.atom_db.assign(literal, reason)?;
        if result == AtomValue::NotSet {
            self.propagated += 1;
            log::trace!(target: crate::misc::log::targets::THEORY, "Theory {} propagated {literal}", self.theory);
        }
        Ok(result)
    }
}
