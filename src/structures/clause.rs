//! Clauses, aka. a collection of literals, interpreted as the disjunction of those literals.
//!
//! The canonical representation of a clause is as a vector of literals.
//!
//! ```rust
//! # use otter_smt::structures::clause::{CClause, Clause};
//! let clause: CClause = vec![23, -41, -3, 15, -4];
//!
//! assert_eq!(clause.size(), 5);
//!
//! let mut some_valuation = vec![Some(true); 42];
//!
//! some_valuation[23] = Some(false);
//! some_valuation[15] = Some(false);
//! assert!(clause.asserts(&some_valuation).is_none());
//!
//! some_valuation[41] = None;
//! assert_eq!(clause.asserts(&some_valuation), Some(-41));
//! ```
//!
//! - The empty clause is always false (never true).
//! - Single literals are identified with the clause containing that literal (aka. a 'unit' clause --- where the 'unit' is the literal).
//!
//! Clauses are also the currency of the theory protocol: a [conflict](crate::theory::Conflict) is a clause each of whose literals is false, and a reason is a clause containing the reasoned literal and otherwise only false literals.

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
    valuation::Valuation,
};

/// The clause trait.
pub trait Clause {
    /// A string of the clause in DIMACS form, with the terminating `0` as optional.
    fn as_dimacs(&self, zero: bool) -> String;

    /// The literal asserted by the clause on a given valuation, if one such literal exists. \
    /// In detail, returns:
    /// - Some(*l*), if *l* has no value on the given valuation and for every other literal *l'* in the clause the polarity of *l'* conflicts with the value of the atom of *l'*.
    /// - None, otherwise.
    fn asserts(&self, valuation: &impl Valuation) -> Option<CLiteral>;

    /// An iterator over all literals in the clause, in order.
    fn literals(&self) -> impl Iterator<Item = CLiteral>;

    /// The number of literals in the clause.
    fn size(&self) -> usize;

    /// An iterator over all atoms in the clause, in order of the literals.
    fn atoms(&self) -> impl Iterator<Item = Atom>;

    /// Returns whether every literal of the clause conflicts with the given valuation.
    ///
    /// Literals whose atom is outside the valuation, or has no value, are not unsatisfiable.
    fn unsatisfiable_on(&self, valuation: &impl Valuation) -> bool;
}

/// The implementation of a clause as a vector of literals.
pub type VClause = Vec<CLiteral>;

/// The canonical implementation of a clause.
pub type CClause = VClause;

impl Clause for [CLiteral] {
    fn as_dimacs(&self, zero: bool) -> String {
        let mut dimacs_string = self
            .iter()
            .map(|literal| literal.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if zero {
            if !dimacs_string.is_empty() {
                dimacs_string.push(' ');
            }
            dimacs_string.push('0');
        }
        dimacs_string
    }

    fn asserts(&self, valuation: &impl Valuation) -> Option<CLiteral> {
        let mut asserted_literal = None;
        for literal in self.literals() {
            match valuation.value_of(literal.atom()).flatten() {
                Some(value) if value == literal.polarity() => return None,
                Some(_) => continue,
                None if asserted_literal.is_none() => asserted_literal = Some(literal),
                None => return None,
            }
        }
        asserted_literal
    }

    fn literals(&self) -> impl Iterator<Item = CLiteral> {
        self.iter().copied()
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn atoms(&self) -> impl Iterator<Item = Atom> {
        self.iter().map(|literal| literal.atom())
    }

    fn unsatisfiable_on(&self, valuation: &impl Valuation) -> bool {
        self.literals().all(|literal| {
            valuation
                .value_of(literal.atom())
                .flatten()
                .is_some_and(|value| value != literal.polarity())
        })
    }
}
