/*!
Tools for building a context.

# Basic methods

The library has three basic methods for building a context:
- [fresh_atom](crate::context::GenericContext::fresh_atom), to obtain a fresh atom.
- [add_clause](crate::context::GenericContext::add_clause), to add a clause.
- [add_theory](crate::context::GenericContext::add_theory), to register a theory, together with [observe](crate::context::GenericContext::observe) to declare the interest of a theory in some atom.

Each of these methods is only available at the base level.
After a solve, [clear_decisions](crate::context::GenericContext::clear_decisions) returns a context to the base level.

# Example

```rust
# use otter_smt::context::Context;
# use otter_smt::config::Config;
# use otter_smt::reports::Report;
# use otter_smt::builder::ClauseOk;
let mut the_context = Context::from_config(Config::default());
let p = the_context.fresh_or_max_literal();
let q = the_context.fresh_or_max_literal();

assert!(matches!(the_context.add_clause(vec![p, -q]), Ok(ClauseOk::Added(_))));
assert_eq!(the_context.add_clause(vec![p, -p]), Ok(ClauseOk::Tautology));
assert!(the_context.add_clause(vec![-p, q]).is_ok());

assert!(the_context.solve().is_ok());
assert_eq!(the_context.report(), Report::Satisfiable);

the_context.clear_decisions();
assert!(the_context.add_clause(vec![p]).is_ok());
assert!(the_context.add_clause(vec![-q]).is_ok());

assert!(the_context.solve().is_ok());
assert_eq!(the_context.report(), Report::Unsatisfiable);
```
*/

use crate::{
    context::{ContextState, GenericContext},
    db::{atom::Reason, clause::normalise, ClauseKey},
    misc::log::targets::{self},
    structures::{
        atom::{Atom, ATOM_MAX},
        clause::{CClause, Clause},
        literal::{CLiteral, Literal},
    },
    theory::{Theory, TheoryIndex},
    types::err::{self, ErrorKind},
};

/// Ok results of adding a clause to a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was added, with the given key.
    Added(ClauseKey),

    /// The clause was a tautology, and so was not added.
    Tautology,

    /// The clause conflicts with the base level valuation, and so the context is unsatisfiable.
    Unsatisfiable,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Returns a fresh atom.
    ///
    /// For a practical alternative, see [fresh_or_max_atom](GenericContext::fresh_or_max_atom).
    pub fn fresh_atom(&mut self) -> Result<Atom, err::AtomDBError> {
        let previous_value = self.rng.random_bool(self.config.polarity_lean.value);
        let atom = self.atom_db.fresh_atom(previous_value)?;
        if self.state == ContextState::Configuration {
            self.state = ContextState::Input;
        }
        Ok(atom)
    }

    /// Returns a fresh atom, or the maximum atom.
    ///
    /// In short, a safe alternative to unwrapping the result of [fresh_atom](GenericContext::fresh_atom), by defaulting to the maximum limit of an atom.
    pub fn fresh_or_max_atom(&mut self) -> Atom {
        match self.fresh_atom() {
            Ok(atom) => atom,
            Err(_) => ATOM_MAX,
        }
    }

    /// Returns a fresh literal with value true, or the maximum atom with value true.
    pub fn fresh_or_max_literal(&mut self) -> CLiteral {
        CLiteral::new(self.fresh_or_max_atom(), true)
    }

    /// Returns a vector containing `count` literals with either a fresh atom or the maximum atom and valued true.
    pub fn fresh_or_max_literals(&mut self, count: usize) -> Vec<CLiteral> {
        (0..count).map(|_| self.fresh_or_max_literal()).collect()
    }

    /// Ensure `atom` is present in the context, by introducing as many atoms as required to ensure atoms form a contiguous block: [0..`atom`].
    pub fn ensure_atom(&mut self, atom: Atom) -> Result<(), err::AtomDBError> {
        while self.atom_db.count() <= atom as usize {
            self.fresh_atom()?;
        }
        Ok(())
    }

    /// Adds a clause to the context.
    ///
    /// Duplicate literals are removed, and tautologies are skipped.
    /// If the clause asserts some literal on the base level valuation, the literal is valued.
    /// And, if the clause is empty or conflicts with the base level valuation, the context is noted to be unsatisfiable.
    pub fn add_clause(&mut self, clause: CClause) -> Result<ClauseOk, ErrorKind> {
        if self.atom_db.trail.level() > 0 {
            return Err(ErrorKind::from(err::ClauseDBError::DecisionMade));
        }

        for atom in clause.atoms() {
            self.ensure_atom(atom)?;
        }

        let Some(clause) = normalise(clause) else {
            log::trace!(target: targets::CLAUSE_DB, "Skipped tautology");
            return Ok(ClauseOk::Tautology);
        };

        if clause.is_empty() {
            self.state = ContextState::Unsatisfiable;
            return Ok(ClauseOk::Unsatisfiable);
        }

        let asserted = clause.asserts(self.atom_db.valuation());
        let unsatisfiable = clause.unsatisfiable_on(self.atom_db.valuation());

        let key = self.clause_db.store(clause, false)?;
        if self.state == ContextState::Configuration {
            self.state = ContextState::Input;
        }

        if let Some(literal) = asserted {
            self.atom_db.assign(literal, Reason::Clause(key))?;
        } else if unsatisfiable {
            log::info!(target: targets::CLAUSE_DB, "{key} conflicts with the base valuation");
            self.state = ContextState::Unsatisfiable;
            return Ok(ClauseOk::Unsatisfiable);
        }

        Ok(ClauseOk::Added(key))
    }

    /// Registers a theory with the context, returning the index of the theory.
    ///
    /// The theory is told of values given to an atom only if the theory [observes](GenericContext::observe) the atom.
    pub fn add_theory(&mut self, theory: Box<dyn Theory>) -> Result<TheoryIndex, ErrorKind> {
        if self.atom_db.trail.level() > 0 {
            return Err(ErrorKind::from(err::TheoryError::RegistrationAfterDecision));
        }

        let index = self.theory_db.register(theory)?;
        if self.state == ContextState::Configuration {
            self.state = ContextState::Input;
        }
        Ok(index)
    }

    /// Declares the interest of a theory in `atom`, and so the theory will be told of any value given to `atom`.
    ///
    /// If the atom was valued at the base level and the value already given to other theories, the value is given to the theory immediately.
    /// Observing an atom the theory already observes has no effect.
    pub fn observe(&mut self, index: TheoryIndex, atom: Atom) -> Result<(), ErrorKind> {
        if self.atom_db.trail.level() > 0 {
            return Err(ErrorKind::from(err::StateError::SolveInProgress));
        }
        if self.atom_db.count() <= atom as usize {
            return Err(ErrorKind::from(err::AtomDBError::UnknownAtom));
        }

        if !self.theory_db.observe(index, atom)? {
            return Ok(());
        }

        let head = self.theory_db.records[index as usize].head;
        let delivered = &self.atom_db.trail.assignments()[..head];
        if let Some(&literal) = delivered.iter().find(|literal| literal.atom() == atom) {
            log::trace!(target: targets::THEORY, "Enqueue {literal} to theory {index}");
            self.theory_db.theories[index as usize].enqueue(literal);
        }

        Ok(())
    }
}
