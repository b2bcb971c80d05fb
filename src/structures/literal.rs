//! Literals are atoms paired with a (boolean) polarity.
//!
//! Or, rather, anything which has methods for returning an atom and a polarity (and a few other useful things).
//!
//! The canonical implementation of the literal trait is a signed integer ([CLiteral]), where the atom is the absolute value of the integer and the sign of the integer indicates the polarity.
//! This is the representation exchanged between the boolean core and each [theory](crate::theory).
//!
//! ```rust
//! # use otter_smt::structures::literal::{CLiteral, Literal};
//! let literal = CLiteral::new(79, true);
//!
//! assert!(literal.polarity());
//! assert_eq!(literal.atom(), 79);
//! assert_eq!(literal.negate(), -79);
//! assert!(!literal.negate().polarity());
//! ```
//!
//! Implementation of the literal trait requires implementation of two additional traits:
//! - [Ord], as literals are sorted when normalising clauses.
//! - [Hash](std::hash::Hash), as literals are used as keys of maps within theories.

use crate::structures::atom::Atom;

/// Something which has methods for returning an atom and a polarity, etc.
pub trait Literal: std::cmp::Ord + std::hash::Hash {
    /// A fresh literal, specified by pairing an atom with a boolean.
    fn new(atom: Atom, polarity: bool) -> Self;

    /// The negation of the literal.
    fn negate(&self) -> Self;

    /// The atom of the literal.
    fn atom(&self) -> Atom;

    /// The polarity of the literal.
    fn polarity(&self) -> bool;

    /// An index unique to the literal, with the literals of atom *a* at `2a` and `2a + 1`.
    ///
    /// Useful for indexing structures, such as occurrence lists, by literal.
    fn index(&self) -> usize;
}

/// The representation of a literal as a signed integer.
pub type IntLiteral = i32;

/// The canonical implementation of a literal.
pub type CLiteral = IntLiteral;

impl Literal for IntLiteral {
    fn new(atom: Atom, polarity: bool) -> Self {
        match polarity {
            true => atom as IntLiteral,
            false => -(atom as IntLiteral),
        }
    }

    fn negate(&self) -> Self {
        -self
    }

    fn atom(&self) -> Atom {
        self.unsigned_abs()
    }

    fn polarity(&self) -> bool {
        self.is_positive()
    }

    fn index(&self) -> usize {
        (2 * self.atom() as usize) + self.polarity() as usize
    }
}
