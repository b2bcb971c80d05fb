use crate::{
    config::{Activity, Config},
    db::{atom::AtomDB, clause::ClauseDB, theory::TheoryDB, LevelIndex},
    reports::Report,
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    theory::{scheduler::Priority, TheoryIndex},
    types::err::{ErrorKind, TheoryError},
};

use super::{ContextState, Counters};

/// A generic context, parameratised to a source of randomness.
///
/// Requires a source of [rng](rand::Rng) which (also) implements [Default].
///
/// [Default] is used in calls to [make_decision](GenericContext::make_decision) to appease the borrow checker, and may be relaxed with a different implementation.
///
/// # Example
///
/// ```rust
/// # use otter_smt::context::GenericContext;
/// # use otter_smt::generic::random::Pcg32;
/// # use otter_smt::config::Config;
/// let context = GenericContext::<Pcg32>::from_config(Config::default());
/// ```
pub struct GenericContext<R: rand::Rng + std::default::Default> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context/solve.
    pub counters: Counters,

    /// The atom database.
    /// See [db::atom](crate::db::atom) for details.
    pub atom_db: AtomDB,

    /// The clause database.
    /// See [db::clause](crate::db::clause) for details.
    pub clause_db: ClauseDB,

    /// The theory database.
    /// See [db::theory](crate::db::theory) for details.
    pub theory_db: TheoryDB,

    /// The status of the context.
    pub state: ContextState,

    /// The source of rng.
    pub rng: R,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        Report::from(&self.state)
    }

    /// The current level.
    pub fn level(&self) -> LevelIndex {
        self.atom_db.trail.level()
    }

    /// The value of `atom`, if the atom has some value.
    pub fn value_of_atom(&self, atom: Atom) -> Option<bool> {
        self.atom_db.value_of(atom)
    }

    /// The value of `literal`, if the atom of the literal has some value.
    pub fn value_of(&self, literal: CLiteral) -> Option<bool> {
        self.atom_db
            .value_of(literal.atom())
            .map(|value| value == literal.polarity())
    }

    /// The priority of a theory, where a smaller priority is scheduled earlier.
    pub fn priority(&self, index: TheoryIndex) -> Result<Priority, ErrorKind> {
        self.theory_db
            .scheduler
            .priority(index)
            .ok_or(ErrorKind::from(TheoryError::UnknownTheory(index)))
    }

    pub fn set_priority(&mut self, index: TheoryIndex, priority: Priority) -> Result<(), ErrorKind> {
        Ok(self.theory_db.scheduler.set_priority(index, priority)?)
    }

    /// The activity of a theory, used to order theories of equal priority.
    pub fn activity(&self, index: TheoryIndex) -> Result<Activity, ErrorKind> {
        self.theory_db
            .scheduler
            .activity(index)
            .ok_or(ErrorKind::from(TheoryError::UnknownTheory(index)))
    }

    pub fn set_activity(&mut self, index: TheoryIndex, activity: Activity) -> Result<(), ErrorKind> {
        Ok(self.theory_db.scheduler.set_activity(index, activity)?)
    }

    /// Writes statistics of each theory to `out`, in order of registration.
    pub fn write_theory_stats(
        &self,
        detail_level: u32,
        out: &mut dyn std::io::Write,
    ) -> Result<(), ErrorKind> {
        for theory in &self.theory_db.theories {
            theory.write_stats(detail_level, out)?;
        }
        Ok(())
    }

    /// Writes the solution of each theory to `out`, in order of registration.
    ///
    /// Solutions are only available if the context is satisfiable.
    pub fn write_theory_solutions(&self, out: &mut dyn std::io::Write) -> Result<(), ErrorKind> {
        if self.state != ContextState::Satisfiable {
            return Err(ErrorKind::InvalidState);
        }
        for theory in &self.theory_db.theories {
            theory.write_solution(out)?;
        }
        Ok(())
    }

    /// Writes a witness from each theory to `out`, in order of registration.
    ///
    /// Witnesses are only available if the context is satisfiable.
    pub fn write_theory_witnesses(&self, out: &mut dyn std::io::Write) -> Result<(), ErrorKind> {
        if self.state != ContextState::Satisfiable {
            return Err(ErrorKind::InvalidState);
        }
        for theory in &self.theory_db.theories {
            theory.write_witness(out)?;
        }
        Ok(())
    }
}
