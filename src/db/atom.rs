/*!
A database of 'atom related' things, accessed via fields on an [AtomDB] struct.

Things include:
- A current (often partial) [valuation](Valuation) and the previous value of each atom, for phase saving.
- A record of which level each atom was valued on, and the [Reason] for the value.
- The [trail](crate::db::trail) of assignments.

The atom [TOP_ATOM](crate::structures::atom::TOP_ATOM) is valued true at level 0 when the database is created, without any reason and without being stored on the trail.
*/

use crate::{
    db::{trail::Trail, ClauseKey, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::{Atom, ATOM_MAX},
        literal::{CLiteral, Literal},
        valuation::CValuation,
    },
    theory::{ReasonMarker, TheoryIndex},
    types::err::AtomDBError,
};

/// Why an atom has the value it has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    /// The atom was valued by a decision, made by the core or on behalf of some theory.
    Decision,

    /// The atom was valued as the only unvalued literal of a clause.
    Clause(ClauseKey),

    /// The atom was valued by a theory, and a reason may be built by the theory from the marker.
    Theory {
        theory: TheoryIndex,
        marker: ReasonMarker,
    },
}

/// The status of the valuation of an atom, relative to some known valuation or literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtomValue {
    /// The atom has no value.
    NotSet,

    /// The value of the atoms is the same as the polarity of the literal.
    Same,

    /// The value of the atoms is not the same as the polarity of the literal.
    Different,
}

/// The atom database.
pub struct AtomDB {
    /// A current (often partial) [valuation](crate::structures::valuation::Valuation).
    valuation: CValuation,

    /// The value each atom had when last valued, or some initial value.
    previous_valuation: Vec<bool>,

    /// The level at which each atom was valued.
    levels: Vec<Option<LevelIndex>>,

    /// The reason each atom was valued.
    reasons: Vec<Option<Reason>>,

    /// The trail of assignments.
    pub trail: Trail,
}

impl Default for AtomDB {
    fn default() -> Self {
        AtomDB::new()
    }
}

impl AtomDB {
    /// A new [AtomDB], with [TOP_ATOM](crate::structures::atom::TOP_ATOM) valued true.
    pub fn new() -> Self {
        AtomDB {
            valuation: vec![Some(true)],
            previous_valuation: vec![true],
            levels: vec![Some(0)],
            reasons: vec![None],
            trail: Trail::default(),
        }
    }

    /// A count of atoms in the [AtomDB], including top.
    pub fn count(&self) -> usize {
        self.valuation.len()
    }

    /// The current valuation.
    pub fn valuation(&self) -> &CValuation {
        &self.valuation
    }

    /// A fresh atom, whose previous value is `previous_value`.
    pub fn fresh_atom(&mut self, previous_value: bool) -> Result<Atom, AtomDBError> {
        let atom = match Atom::try_from(self.valuation.len()) {
            // ATOM_MAX over Atom::MAX, as the former is limited by the representation of literals.
            Ok(atom) if atom <= ATOM_MAX => atom,
            _ => return Err(AtomDBError::AtomsExhausted),
        };

        self.valuation.push(None);
        self.previous_valuation.push(previous_value);
        self.levels.push(None);
        self.reasons.push(None);

        Ok(atom)
    }

    /// The value of `atom`, if the atom is part of the database and has some value.
    pub fn value_of(&self, atom: Atom) -> Option<bool> {
        self.valuation.get(atom as usize).copied().flatten()
    }

    /// The status of `literal` relative to the current valuation.
    pub fn literal_status(&self, literal: CLiteral) -> AtomValue {
        match self.value_of(literal.atom()) {
            None => AtomValue::NotSet,
            Some(value) if value == literal.polarity() => AtomValue::Same,
            Some(_) => AtomValue::Different,
        }
    }

    /// The level at which `atom` was valued, if the atom has some value.
    pub fn level_of(&self, atom: Atom) -> Option<LevelIndex> {
        self.levels.get(atom as usize).copied().flatten()
    }

    /// The reason `atom` was valued, if the atom has some value other than as top.
    pub fn reason_of(&self, atom: Atom) -> Option<Reason> {
        self.reasons.get(atom as usize).copied().flatten()
    }

    /// The value `atom` had when last valued.
    pub fn previous_value_of(&self, atom: Atom) -> bool {
        self.previous_valuation
            .get(atom as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Values the atom of `literal` to match the polarity of `literal`, at the current level and for the given reason, storing the assignment on the trail.
    ///
    /// Returns the status of the literal prior to the call, and so:
    /// - [NotSet](AtomValue::NotSet) if the assignment was made.
    /// - [Same](AtomValue::Same) if the literal was already true, in which case nothing happens.
    /// - [Different](AtomValue::Different) if the literal is false, in which case nothing happens.
    pub fn assign(&mut self, literal: CLiteral, reason: Reason) -> Result<AtomValue, AtomDBError> {
        let atom = literal.atom() as usize;
        if atom >= self.valuation.len() {
            return Err(AtomDBError::UnknownAtom);
        }

        let status = self.literal_status(literal);
        if status == AtomValue::NotSet {
            let level = self.trail.level();
            log::trace!(target: targets::VALUATION, "Assigned {literal} at level {level}");
            self.valuation[atom] = Some(literal.polarity());
            self.levels[atom] = Some(level);
            self.reasons[atom] = Some(reason);
            self.trail.store_assignment(literal);
        }
        Ok(status)
    }

    /// Clears the value of an atom, noting the value as the previous value of the atom.
    ///
    /// # Soundness
    /// Does not remove the assignment from the trail.
    pub fn drop_value(&mut self, atom: Atom) {
        let atom = atom as usize;
        if let Some(Some(value)) = self.valuation.get(atom).copied() {
            log::trace!(target: targets::VALUATION, "Cleared atom: {atom}");
            self.previous_valuation[atom] = value;
            self.valuation[atom] = None;
            self.levels[atom] = None;
            self.reasons[atom] = None;
        }
    }

    /// Removes every level above `level`, clearing the value of each assignment made at those levels.
    ///
    /// Returns the cleared assignments, in order of assignment.
    pub fn forget_above(&mut self, level: LevelIndex) -> Vec<CLiteral> {
        let cleared = self.trail.clear_assignments_above(level);
        for literal in &cleared {
            self.drop_value(literal.atom());
        }
        cleared
    }
}

#[cfg(test)]
mod atom_db_tests {
    use super::*;

    #[test]
    fn top_is_true() {
        let atom_db = AtomDB::new();
        assert_eq!(atom_db.value_of(0), Some(true));
        assert_eq!(atom_db.level_of(0), Some(0));
        assert!(atom_db.trail.assignments().is_empty());
    }

    #[test]
    fn assign_and_forget() {
        let mut atom_db = AtomDB::new();
        let p = atom_db.fresh_atom(false).unwrap() as CLiteral;
        let q = atom_db.fresh_atom(false).unwrap() as CLiteral;

        assert_eq!(atom_db.assign(p, Reason::Decision), Ok(AtomValue::NotSet));
        atom_db.trail.new_level();
        assert_eq!(atom_db.assign(-q, Reason::Decision), Ok(AtomValue::NotSet));
        assert_eq!(atom_db.assign(-q, Reason::Decision), Ok(AtomValue::Same));
        assert_eq!(atom_db.assign(q, Reason::Decision), Ok(AtomValue::Different));
        assert_eq!(atom_db.level_of(q.atom()), Some(1));

        assert_eq!(atom_db.forget_above(0), vec![-q]);
        assert_eq!(atom_db.value_of(q.atom()), None);
        assert!(!atom_db.previous_value_of(q.atom()));
        assert_eq!(atom_db.value_of(p.atom()), Some(true));

        assert_eq!(atom_db.assign(9, Reason::Decision), Err(AtomDBError::UnknownAtom));
    }
}
