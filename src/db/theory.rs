/*!
A database of theories, together with the record the core keeps of each theory.

Theories are held as trait objects, in order of registration, and so the index of a theory is the position of the theory in the database.

For each theory the database records:
- The [capabilities](crate::theory::Capabilities) of the theory, read once at registration.
- The level the theory is known to be at.
- How much of the trail has been delivered to the theory through [enqueue](crate::theory::Theory::enqueue).
- Which atoms the theory observes.

In addition, the database records each decision made on behalf of a theory, so the decision can be retracted on a backjump.
*/

use crate::{
    config::SchedulerConfig,
    db::{trail::Trail, LevelIndex},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    theory::{scheduler::Scheduler, Capabilities, ReasonMarker, Theory, TheoryIndex},
    types::err::TheoryError,
};

/// The record of a theory kept by the core.
#[derive(Clone, Debug, Default)]
pub struct TheoryRecord {
    /// The capabilities of the theory, as read at registration.
    pub capabilities: Capabilities,

    /// The level the theory is known to be at.
    pub level: LevelIndex,

    /// The index of the first assignment on the trail not yet delivered to the theory.
    pub head: usize,

    /// Whether the theory has been preprocessed.
    pub preprocessed: bool,

    /// Whether the theory observes each atom, indexed by atom.
    observed: Vec<bool>,
}

impl TheoryRecord {
    /// True if the theory observes `atom`.
    pub fn observes(&self, atom: Atom) -> bool {
        self.observed.get(atom as usize).copied().unwrap_or(false)
    }

    /// An iterator over every atom observed by the theory.
    pub fn observed_atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.observed
            .iter()
            .enumerate()
            .filter_map(|(atom, observed)| observed.then_some(atom as Atom))
    }
}

/// A decision made on behalf of a theory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionRecord {
    /// The level the decision was made at.
    pub level: LevelIndex,

    /// The theory which proposed the decision.
    pub theory: TheoryIndex,

    /// The literal decided on.
    pub literal: CLiteral,

    /// The reason given by the theory, if any.
    pub reason: Option<ReasonMarker>,
}

/// The theory database.
pub struct TheoryDB {
    /// The theories, in order of registration.
    pub theories: Vec<Box<dyn Theory>>,

    /// The record of each theory, indexed by theory.
    pub records: Vec<TheoryRecord>,

    /// Priority and activity, indexed by theory.
    pub scheduler: Scheduler,

    /// Decisions made on behalf of some theory, in order of level.
    pub decisions: Vec<DecisionRecord>,

    /// A count of facts at the base level when satisfied constraints were last cleared.
    base_facts: usize,
}

impl TheoryDB {
    pub fn new(config: &SchedulerConfig) -> Self {
        TheoryDB {
            theories: Vec::default(),
            records: Vec::default(),
            scheduler: Scheduler::new(config),
            decisions: Vec::default(),
            base_facts: 0,
        }
    }

    /// A count of theories.
    pub fn count(&self) -> usize {
        self.theories.len()
    }

    /// Registers a theory, setting the index of the theory.
    ///
    /// A theory which reports some index prior to registration, or fails to keep the index given, is rejected.
    pub fn register(&mut self, mut theory: Box<dyn Theory>) -> Result<TheoryIndex, TheoryError> {
        let index = self.theories.len() as TheoryIndex;

        if let Some(existing) = theory.theory_index() {
            return Err(TheoryError::IndexAlreadySet(existing));
        }
        theory.set_theory_index(index);
        if theory.theory_index() != Some(index) {
            return Err(TheoryError::IndexNotKept(index));
        }

        let record = TheoryRecord {
            capabilities: theory.capabilities(),
            ..Default::default()
        };
        log::info!(target: targets::THEORY, "Registered theory {index} with {:?}", record.capabilities);

        self.theories.push(theory);
        self.records.push(record);
        self.scheduler.register();

        Ok(index)
    }

    /// Notes that the theory observes `atom`, and so is told of any value given to `atom`.
    ///
    /// Returns false if the theory already observed `atom`.
    pub fn observe(&mut self, index: TheoryIndex, atom: Atom) -> Result<bool, TheoryError> {
        let record = self
            .records
            .get_mut(index as usize)
            .ok_or(TheoryError::UnknownTheory(index))?;
        if record.observed.len() <= atom as usize {
            record.observed.resize(atom as usize + 1, false);
        }
        let fresh = !record.observed[atom as usize];
        record.observed[atom as usize] = true;
        Ok(fresh)
    }

    /// Enqueues every undelivered assignment on the trail with an observed atom to the theory, in order of assignment.
    ///
    /// Returns a count of the enqueued assignments.
    pub fn deliver(&mut self, index: TheoryIndex, trail: &Trail) -> usize {
        let (Some(theory), Some(record)) = (
            self.theories.get_mut(index as usize),
            self.records.get_mut(index as usize),
        ) else {
            return 0;
        };

        let mut count = 0;
        let pending = trail.assignments().get(record.head..).unwrap_or(&[]);
        for &literal in pending {
            if record.observes(literal.atom()) {
                log::trace!(target: targets::THEORY, "Enqueue {literal} to theory {index}");
                theory.enqueue(literal);
                count += 1;
            }
        }
        record.head = trail.assignments().len();
        count
    }

    /// Delivers the trail to every theory.
    pub fn deliver_all(&mut self, trail: &Trail) -> usize {
        (0..self.theories.len() as TheoryIndex)
            .map(|index| self.deliver(index, trail))
            .sum()
    }

    /// True if some assignment on the trail has not been delivered to some theory.
    pub fn undelivered(&self, trail: &Trail) -> bool {
        self.records
            .iter()
            .any(|record| record.head < trail.assignments().len())
    }

    /// Pushes a level on every theory.
    pub fn new_decision_level(&mut self) {
        for (theory, record) in self.theories.iter_mut().zip(self.records.iter_mut()) {
            theory.new_decision_level();
            record.level += 1;
        }
    }

    /// Retracts every decision made on behalf of a theory above `level`, most recent first, dropping the reason of each.
    pub fn retract_decisions_above(&mut self, level: LevelIndex) {
        while let Some(decision) = self.decisions.last().copied() {
            if decision.level <= level {
                break;
            }
            self.decisions.pop();
            if let Some(theory) = self.theories.get_mut(decision.theory as usize) {
                log::trace!(target: targets::THEORY, "Undecide {} on theory {}", decision.literal, decision.theory);
                theory.undecide(decision.literal);
            }
        }
    }

    /// Brings every theory to `level`, with the trail already cleared above `level`.
    ///
    /// The delivery head of each theory is clamped to the trail, and each theory known to be above `level` is told to backtrack.
    pub fn backtrack_until(&mut self, level: LevelIndex, trail: &Trail) {
        let trail_length = trail.assignments().len();
        for (theory, record) in self.theories.iter_mut().zip(self.records.iter_mut()) {
            record.head = std::cmp::min(record.head, trail_length);
            if record.level > level {
                theory.backtrack_until(level);
                record.level = level;
            }
        }
    }

    /// Calls [clear_satisfied](Theory::clear_satisfied) on every capable theory, if some fact has been added at the base level since the last call.
    ///
    /// Returns true if the theories were called.
    pub fn clear_satisfied(&mut self, trail: &Trail) -> bool {
        if trail.level() != 0 || trail.assignments().len() <= self.base_facts {
            return false;
        }
        self.base_facts = trail.assignments().len();

        for (theory, record) in self.theories.iter_mut().zip(self.records.iter()) {
            if record.capabilities.clear_satisfied {
                theory.clear_satisfied();
            }
        }
        true
    }
}
